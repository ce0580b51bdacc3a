// SPDX-License-Identifier: MPL-2.0

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A conversation participant as returned by `users.get`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// One decoded message. Forwarded messages are owned children of the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Platform-wide id; missing on forwarded copies
    pub id: Option<i64>,
    pub from_id: i64,
    pub conversation_message_id: i64,
    pub date: i64,
    pub important: bool,
    pub text: String,
    pub reply_conversation_message_id: Option<i64>,
    pub attachments: Vec<Attachment>,
    pub fwd_messages: Vec<Message>,
    /// The message object exactly as received
    pub original_json: String,
}

impl Message {
    /// Natural key used for deduplication
    pub fn key(&self) -> (i64, i64) {
        (self.from_id, self.conversation_message_id)
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    /// Number of messages in this tree, including the root
    pub fn tree_size(&self) -> usize {
        1 + self.fwd_messages.iter().map(Message::tree_size).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub owner_id: i64,
    pub date: i64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: i64,
    pub owner_id: i64,
    pub date: i64,
    pub title: String,
    pub description: Option<String>,
    /// Preview image, when the platform supplied any sizes
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Audio {
    pub id: i64,
    pub owner_id: i64,
    pub artist: String,
    pub title: String,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i64,
    pub owner_id: i64,
    pub date: i64,
    pub title: String,
    pub ext: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Synthesized per run
    pub id: i64,
    pub url: String,
    pub title: String,
    pub caption: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub price: String,
    pub currency: String,
    pub category_name: Option<String>,
    pub category_section: Option<String>,
    pub thumb_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductAlbum {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub is_main: bool,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallPost {
    pub id: i64,
    pub owner_id: i64,
    pub from_id: i64,
    pub date: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallComment {
    pub id: i64,
    pub from_id: i64,
    pub date: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sticker {
    /// Source `sticker_id`, stable across runs
    pub id: i64,
    /// Synthesized per run, one per occurrence
    pub local_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gift {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Synthesized per run
    pub id: i64,
    pub initiator_id: i64,
    pub receiver_id: i64,
    pub state: String,
    pub time: i64,
    pub duration: i64,
    pub video: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceMessage {
    pub id: i64,
    pub owner_id: i64,
    pub duration: i64,
    pub waveform: Vec<u16>,
    pub link_mp3: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioPlaylist {
    pub id: i64,
    pub owner_id: i64,
    pub create_time: i64,
    pub update_time: i64,
    pub year: Option<i64>,
    pub title: String,
    pub description: String,
    pub audios: Vec<Audio>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graffiti {
    pub id: i64,
    pub owner_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoneyRequest {
    pub id: i64,
    pub from_id: i64,
    pub to_id: i64,
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: i64,
    pub owner_id: i64,
    pub date: i64,
    pub expires_at: i64,
}

/// Rich content embedded in a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Photo(Photo),
    Video(Video),
    Audio(Audio),
    Document(Document),
    Link(Link),
    Product(Product),
    ProductAlbum(ProductAlbum),
    WallPost(WallPost),
    WallComment(WallComment),
    Sticker(Sticker),
    Gift(Gift),
    Call(Call),
    VoiceMessage(VoiceMessage),
    AudioPlaylist(AudioPlaylist),
    Graffiti(Graffiti),
    MoneyRequest(MoneyRequest),
    Story(Story),
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Photo(_) => AttachmentKind::Photo,
            Attachment::Video(_) => AttachmentKind::Video,
            Attachment::Audio(_) => AttachmentKind::Audio,
            Attachment::Document(_) => AttachmentKind::Document,
            Attachment::Link(_) => AttachmentKind::Link,
            Attachment::Product(_) => AttachmentKind::Product,
            Attachment::ProductAlbum(_) => AttachmentKind::ProductAlbum,
            Attachment::WallPost(_) => AttachmentKind::WallPost,
            Attachment::WallComment(_) => AttachmentKind::WallComment,
            Attachment::Sticker(_) => AttachmentKind::Sticker,
            Attachment::Gift(_) => AttachmentKind::Gift,
            Attachment::Call(_) => AttachmentKind::Call,
            Attachment::VoiceMessage(_) => AttachmentKind::VoiceMessage,
            Attachment::AudioPlaylist(_) => AttachmentKind::AudioPlaylist,
            Attachment::Graffiti(_) => AttachmentKind::Graffiti,
            Attachment::MoneyRequest(_) => AttachmentKind::MoneyRequest,
            Attachment::Story(_) => AttachmentKind::Story,
        }
    }

    /// The id this attachment carries in the model. For stickers this is the
    /// source id, not the per-run local id.
    pub fn id(&self) -> i64 {
        match self {
            Attachment::Photo(a) => a.id,
            Attachment::Video(a) => a.id,
            Attachment::Audio(a) => a.id,
            Attachment::Document(a) => a.id,
            Attachment::Link(a) => a.id,
            Attachment::Product(a) => a.id,
            Attachment::ProductAlbum(a) => a.id,
            Attachment::WallPost(a) => a.id,
            Attachment::WallComment(a) => a.id,
            Attachment::Sticker(a) => a.id,
            Attachment::Gift(a) => a.id,
            Attachment::Call(a) => a.id,
            Attachment::VoiceMessage(a) => a.id,
            Attachment::AudioPlaylist(a) => a.id,
            Attachment::Graffiti(a) => a.id,
            Attachment::MoneyRequest(a) => a.id,
            Attachment::Story(a) => a.id,
        }
    }
}

/// Attachment discriminator, mapped one-to-one onto the wire `type` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Photo,
    Video,
    Audio,
    Document,
    Link,
    Product,
    ProductAlbum,
    WallPost,
    WallComment,
    Sticker,
    Gift,
    Call,
    VoiceMessage,
    AudioPlaylist,
    Graffiti,
    MoneyRequest,
    Story,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 17] = [
        AttachmentKind::Photo,
        AttachmentKind::Video,
        AttachmentKind::Audio,
        AttachmentKind::Document,
        AttachmentKind::Link,
        AttachmentKind::Product,
        AttachmentKind::ProductAlbum,
        AttachmentKind::WallPost,
        AttachmentKind::WallComment,
        AttachmentKind::Sticker,
        AttachmentKind::Gift,
        AttachmentKind::Call,
        AttachmentKind::VoiceMessage,
        AttachmentKind::AudioPlaylist,
        AttachmentKind::Graffiti,
        AttachmentKind::MoneyRequest,
        AttachmentKind::Story,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Video => "video",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Document => "doc",
            AttachmentKind::Link => "link",
            AttachmentKind::Product => "market",
            AttachmentKind::ProductAlbum => "market_album",
            AttachmentKind::WallPost => "wall",
            AttachmentKind::WallComment => "wall_reply",
            AttachmentKind::Sticker => "sticker",
            AttachmentKind::Gift => "gift",
            AttachmentKind::Call => "call",
            AttachmentKind::VoiceMessage => "audio_message",
            AttachmentKind::AudioPlaylist => "audio_playlist",
            AttachmentKind::Graffiti => "graffiti",
            AttachmentKind::MoneyRequest => "money_request",
            AttachmentKind::Story => "story",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
