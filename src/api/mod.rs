// SPDX-License-Identifier: MPL-2.0

mod attachment;
mod message;
mod node;
mod response;
mod stream;
mod transport;
mod types;
mod users;

pub use attachment::decode_attachment;
pub use message::{IdCounters, decode_message};
pub use node::Node;
pub use response::parse_response;
pub use stream::MessageStream;
pub use transport::{HttpTransport, Params, Transport};
pub use types::{
    Attachment, AttachmentKind, Audio, AudioPlaylist, Call, Document, Gift, Graffiti, Link,
    Message, MoneyRequest, Photo, Product, ProductAlbum, Sticker, Story, User, Video,
    VoiceMessage, WallComment, WallPost,
};
pub use users::UserPool;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },
    #[error("API returned an error: {code} {message}")]
    Remote { code: i64, message: String },
    #[error("invalid API response: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid API response: missing field {path}")]
    MissingField { path: String },
    #[error("invalid API response: field {path} is not a valid {expected}")]
    InvalidField { path: String, expected: &'static str },
    #[error("invalid API response: attachment {path} has unknown type \"{kind}\"")]
    UnknownAttachmentKind { kind: String, path: String },
}
