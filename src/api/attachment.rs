// SPDX-License-Identifier: MPL-2.0

use crate::api::message::IdCounters;
use crate::api::node::Node;
use crate::api::types::{
    Attachment, AttachmentKind, Audio, AudioPlaylist, Call, Document, Gift, Graffiti, Link,
    MoneyRequest, Photo, Product, ProductAlbum, Sticker, Story, Video, VoiceMessage, WallComment,
    WallPost,
};
use crate::api::ApiError;

/// Gift thumbnails, largest first
const GIFT_THUMBS: [&str; 4] = ["thumb_512", "thumb_256", "thumb_96", "thumb_48"];

/// Decode one `{"type": ..., <type>: {...}}` attachment object.
pub fn decode_attachment(node: &Node, counters: &mut IdCounters) -> Result<Attachment, ApiError> {
    let type_name = node.field("type")?.as_str()?;
    let kind = AttachmentKind::from_wire(type_name).ok_or_else(|| {
        ApiError::UnknownAttachmentKind {
            kind: type_name.to_string(),
            path: node.path().to_string(),
        }
    })?;

    let body = node.field(type_name)?;

    let attachment = match kind {
        AttachmentKind::Photo => Attachment::Photo(Photo {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            date: body.i64("date")?,
            url: body.field("orig_photo")?.string("url")?,
        }),
        AttachmentKind::Video => Attachment::Video(Video {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            date: body.i64("date")?,
            title: body.string("title")?,
            description: body.opt_string("description")?,
            image_url: video_image_url(&body)?,
        }),
        AttachmentKind::Audio => Attachment::Audio(decode_audio(&body)?),
        AttachmentKind::Document => Attachment::Document(Document {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            date: body.i64("date")?,
            title: body.string("title")?,
            ext: body.string("ext")?,
            url: body.string("url")?,
        }),
        AttachmentKind::Link => Attachment::Link(Link {
            id: counters.next_link(),
            url: body.string("url")?,
            title: body.opt_string("title")?.unwrap_or_default(),
            caption: body.opt_string("caption")?,
            description: body.opt_string("description")?,
        }),
        AttachmentKind::Product => {
            let price = body.field("price")?;
            let category = body.opt_field("category");
            Attachment::Product(Product {
                id: body.i64("id")?,
                owner_id: body.i64("owner_id")?,
                title: body.string("title")?,
                description: body.string("description")?,
                price: price.field("amount")?.as_text()?,
                currency: currency_name(&price)?,
                category_name: category
                    .as_ref()
                    .map(|c| c.opt_string("name"))
                    .transpose()?
                    .flatten(),
                category_section: category
                    .as_ref()
                    .and_then(|c| c.opt_field("section"))
                    .map(|s| s.opt_string("name"))
                    .transpose()?
                    .flatten(),
                thumb_url: body.string("thumb_photo")?,
            })
        }
        AttachmentKind::ProductAlbum => Attachment::ProductAlbum(ProductAlbum {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            title: body.string("title")?,
            is_main: body.bool("is_main")?,
            is_hidden: body.bool("is_hidden")?,
        }),
        AttachmentKind::WallPost => Attachment::WallPost(WallPost {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            from_id: body.i64("from_id")?,
            date: body.i64("date")?,
            text: body.string("text")?,
        }),
        AttachmentKind::WallComment => Attachment::WallComment(WallComment {
            id: body.i64("id")?,
            from_id: body.i64("from_id")?,
            date: body.i64("date")?,
            text: body.string("text")?,
        }),
        AttachmentKind::Sticker => {
            let id = body.i64("sticker_id")?;
            Attachment::Sticker(Sticker {
                id,
                local_id: counters.next_sticker(),
                url: sticker_url(id),
            })
        }
        AttachmentKind::Gift => Attachment::Gift(Gift {
            id: body.i64("id")?,
            url: gift_url(&body)?,
        }),
        AttachmentKind::Call => Attachment::Call(Call {
            id: counters.next_call(),
            initiator_id: body.i64("initiator_id")?,
            receiver_id: body.i64("receiver_id")?,
            state: body.string("state")?,
            time: body.i64("time")?,
            duration: body.i64("duration")?,
            video: body.bool("video")?,
        }),
        AttachmentKind::VoiceMessage => Attachment::VoiceMessage(VoiceMessage {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            duration: body.i64("duration")?,
            waveform: body
                .field("waveform")?
                .items()?
                .iter()
                .map(Node::as_u16)
                .collect::<Result<_, _>>()?,
            link_mp3: body.string("link_mp3")?,
        }),
        AttachmentKind::AudioPlaylist => Attachment::AudioPlaylist(AudioPlaylist {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            create_time: body.i64("create_time")?,
            update_time: body.i64("update_time")?,
            year: body.opt_i64("year")?,
            title: body.string("title")?,
            description: body.string("description")?,
            audios: body
                .field("audios")?
                .items()?
                .iter()
                .map(decode_audio)
                .collect::<Result<_, _>>()?,
        }),
        AttachmentKind::Graffiti => Attachment::Graffiti(Graffiti {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            url: body.string("url")?,
        }),
        AttachmentKind::MoneyRequest => {
            let amount = body.field("amount")?;
            Attachment::MoneyRequest(MoneyRequest {
                id: body.i64("id")?,
                from_id: body.i64("from_id")?,
                to_id: body.i64("to_id")?,
                amount: amount.field("amount")?.as_text()?,
                currency: currency_name(&amount)?,
            })
        }
        AttachmentKind::Story => Attachment::Story(Story {
            id: body.i64("id")?,
            owner_id: body.i64("owner_id")?,
            date: body.i64("date")?,
            expires_at: body.i64("expires_at")?,
        }),
    };

    Ok(attachment)
}

fn decode_audio(node: &Node) -> Result<Audio, ApiError> {
    Ok(Audio {
        id: node.i64("id")?,
        owner_id: node.i64("owner_id")?,
        artist: node.string("artist")?,
        title: node.string("title")?,
        duration: node.i64("duration")?,
    })
}

/// Preview image of a video: the last entry of the `image` size list.
fn video_image_url(video: &Node) -> Result<Option<String>, ApiError> {
    let Some(images) = video.opt_field("image") else {
        return Ok(None);
    };
    match images.items()?.last() {
        Some(image) => Ok(Some(image.string("url")?)),
        None => Ok(None),
    }
}

/// Currency arrives either as a bare string or as `{"name": ...}`.
fn currency_name(amount: &Node) -> Result<String, ApiError> {
    let currency = amount.field("currency")?;
    if currency.is_object() {
        currency.string("name")
    } else {
        Ok(currency.as_str()?.to_string())
    }
}

fn gift_url(gift: &Node) -> Result<String, ApiError> {
    for key in GIFT_THUMBS {
        if let Some(thumb) = gift.opt_field(key) {
            return Ok(thumb.as_str()?.to_string());
        }
    }
    Err(ApiError::MissingField {
        path: format!("{}.{}", gift.path(), GIFT_THUMBS[GIFT_THUMBS.len() - 1]),
    })
}

fn sticker_url(sticker_id: i64) -> String {
    format!("https://vk.com/sticker/1-{}-512", sticker_id)
}
