// SPDX-License-Identifier: MPL-2.0

use crate::api::response::parse_response;
use crate::api::transport::{Params, Transport};
use crate::api::types::{Attachment, Message, User};
use crate::api::ApiError;
use crate::config::API_VERSION;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const USERS_METHOD: &str = "users.get";

/// Cache of every participant seen in the exported messages.
pub struct UserPool<'a, T: Transport + ?Sized> {
    transport: &'a T,
    access_token: String,
    users: BTreeMap<i64, User>,
}

impl<'a, T: Transport + ?Sized> UserPool<'a, T> {
    pub fn new(transport: &'a T, access_token: &str) -> Self {
        Self {
            transport,
            access_token: access_token.to_string(),
            users: BTreeMap::new(),
        }
    }

    /// Look up every participant of `message` that is not cached yet.
    ///
    /// Issues at most one `users.get` call, and none when all ids are known.
    pub fn observe(&mut self, message: &Message) -> Result<(), ApiError> {
        let mut ids = BTreeSet::new();
        collect_ids(message, &mut ids);

        // Non-positive ids are communities, which users.get rejects
        let missing: Vec<i64> = ids
            .into_iter()
            .filter(|id| *id > 0 && !self.users.contains_key(id))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let user_ids = missing
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        debug!("looking up {} users", missing.len());

        let params = Params::new()
            .with("user_ids", user_ids)
            .with("access_token", &self.access_token)
            .with("v", API_VERSION);
        let body = self.transport.call(USERS_METHOD, &params)?;
        let users: Vec<User> = serde_json::from_value(parse_response(&body)?)?;

        for user in users {
            self.users.entry(user.id).or_insert(user);
        }
        Ok(())
    }

    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Cached users in ascending id order
    pub fn users(&self) -> impl Iterator<Item = (i64, &User)> {
        self.users.iter().map(|(id, user)| (*id, user))
    }
}

/// Every identity referenced by the message tree.
fn collect_ids(message: &Message, ids: &mut BTreeSet<i64>) {
    ids.insert(message.from_id);

    for attachment in &message.attachments {
        match attachment {
            Attachment::Photo(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::Video(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::Audio(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::Document(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::Product(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::ProductAlbum(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::WallPost(a) => {
                ids.insert(a.owner_id);
                ids.insert(a.from_id);
            }
            Attachment::WallComment(a) => {
                ids.insert(a.from_id);
            }
            Attachment::Call(a) => {
                ids.insert(a.initiator_id);
                ids.insert(a.receiver_id);
            }
            Attachment::VoiceMessage(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::AudioPlaylist(a) => {
                ids.insert(a.owner_id);
                ids.extend(a.audios.iter().map(|audio| audio.owner_id));
            }
            Attachment::Graffiti(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::MoneyRequest(a) => {
                ids.insert(a.from_id);
                ids.insert(a.to_id);
            }
            Attachment::Story(a) => {
                ids.insert(a.owner_id);
            }
            Attachment::Link(_) | Attachment::Sticker(_) | Attachment::Gift(_) => {}
        }
    }

    for forwarded in &message.fwd_messages {
        collect_ids(forwarded, ids);
    }
}
