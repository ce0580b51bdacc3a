// SPDX-License-Identifier: MPL-2.0

use crate::api::{Attachment, Message};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub url: String,
    pub ext: String,
}

/// Download URLs of every media file referenced by the exported messages,
/// one map per kind, keyed by attachment id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaLinks {
    pub photos: BTreeMap<i64, String>,
    pub video_images: BTreeMap<i64, String>,
    pub documents: BTreeMap<i64, DocumentLink>,
    pub product_thumbs: BTreeMap<i64, String>,
    pub stickers: BTreeMap<i64, String>,
    pub gifts: BTreeMap<i64, String>,
    pub audio_messages: BTreeMap<i64, String>,
    pub graffitis: BTreeMap<i64, String>,
}

impl MediaLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the media of `message` and everything it forwards.
    pub fn collect(&mut self, message: &Message) {
        for attachment in &message.attachments {
            match attachment {
                Attachment::Photo(a) => {
                    self.photos.insert(a.id, a.url.clone());
                }
                Attachment::Video(a) => {
                    if let Some(url) = &a.image_url {
                        self.video_images.insert(a.id, url.clone());
                    }
                }
                Attachment::Document(a) => {
                    self.documents.insert(
                        a.id,
                        DocumentLink {
                            url: a.url.clone(),
                            ext: a.ext.clone(),
                        },
                    );
                }
                Attachment::Product(a) => {
                    self.product_thumbs.insert(a.id, a.thumb_url.clone());
                }
                Attachment::Sticker(a) => {
                    self.stickers.insert(a.id, a.url.clone());
                }
                Attachment::Gift(a) => {
                    self.gifts.insert(a.id, a.url.clone());
                }
                Attachment::VoiceMessage(a) => {
                    self.audio_messages.insert(a.id, a.link_mp3.clone());
                }
                Attachment::Graffiti(a) => {
                    self.graffitis.insert(a.id, a.url.clone());
                }
                _ => {}
            }
        }

        for forwarded in &message.fwd_messages {
            self.collect(forwarded);
        }
    }

    /// Total number of files to download
    pub fn len(&self) -> usize {
        self.photos.len()
            + self.video_images.len()
            + self.documents.len()
            + self.product_thumbs.len()
            + self.stickers.len()
            + self.gifts.len()
            + self.audio_messages.len()
            + self.graffitis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
