// SPDX-License-Identifier: MPL-2.0

mod attachments;
mod db;
mod messages;
mod schema;
mod users;

pub use db::{ArchiveDb, IdBases};
pub use messages::MessageStore;
pub use schema::TABLES;
pub use users::UserStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("database path error: {0}")]
    Path(String),
}
