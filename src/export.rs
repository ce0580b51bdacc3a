// SPDX-License-Identifier: MPL-2.0

//! The export driver: stream the history, persist it, then fetch media.

use crate::api::{ApiError, MessageStream, Transport, UserPool};
use crate::config::ExportConfig;
use crate::media::{MediaDownloader, MediaError, MediaLinks};
use crate::store::{ArchiveDb, MessageStore, StoreError, UserStore};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// What one run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub messages_seen: usize,
    pub messages_inserted: usize,
    pub users_inserted: usize,
    pub files_downloaded: usize,
}

pub struct Exporter<'a, T: Transport + ?Sized> {
    config: &'a ExportConfig,
    transport: &'a T,
    db: &'a ArchiveDb,
}

impl<'a, T: Transport + ?Sized> Exporter<'a, T> {
    pub fn new(config: &'a ExportConfig, transport: &'a T, db: &'a ArchiveDb) -> Self {
        Self {
            config,
            transport,
            db,
        }
    }

    /// Export the whole conversation.
    ///
    /// Messages are persisted as they arrive, so an aborted run keeps every
    /// message tree stored before the failure. Users are written once the
    /// history is exhausted, and media is downloaded last.
    pub fn run(&self) -> Result<ExportSummary, ExportError> {
        let config = self.config;
        info!("Exporting conversation {}", config.peer_id);

        let mut stream = MessageStream::new(self.transport, config.peer_id, &config.access_token);
        let mut pool = UserPool::new(self.transport, &config.access_token);
        let mut links = MediaLinks::new();
        let messages = MessageStore::new(self.db)?;
        let mut summary = ExportSummary::default();

        while let Some(message) = stream.next_message()? {
            summary.messages_seen += 1;
            if let Some(sent_at) = message.sent_at() {
                debug!(
                    "message {} from {} at {} ({} in tree)",
                    message.conversation_message_id,
                    message.from_id,
                    sent_at.format("%Y-%m-%d %H:%M:%S"),
                    message.tree_size()
                );
            }
            links.collect(&message);
            pool.observe(&message)?;
            if messages.persist(&message)? {
                summary.messages_inserted += 1;
            }

            if config.show_progress {
                let total = stream.total().unwrap_or(0).max(summary.messages_seen as u64);
                info!(
                    "Saved {}/{} messages ({}%)",
                    summary.messages_seen,
                    total,
                    summary.messages_seen as u64 * 100 / total
                );
            }
        }
        info!(
            "Stored {} new of {} messages",
            summary.messages_inserted, summary.messages_seen
        );

        summary.users_inserted =
            UserStore::new(self.db).persist_all(pool.users().map(|(_, user)| user))?;
        info!(
            "Stored {} new of {} users",
            summary.users_inserted,
            pool.len()
        );

        info!("Downloading {} media files", links.len());
        let downloads = MediaDownloader::new(self.transport, config.destination())
            .with_progress(config.show_progress)
            .download_all(&links)?;
        summary.files_downloaded = downloads.total();

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    const STICKER_PAGE: &str = r#"{"response":{"count":1,"items":[{"from_id":1,"conversation_message_id":10,"date":100,"text":"hi","attachments":[{"type":"sticker","sticker":{"sticker_id":55}}]}]}}"#;
    const EMPTY_PAGE: &str = r#"{"response":{"count":1,"items":[]}}"#;

    fn users_response() -> String {
        json!({"response": [{"id": 1, "first_name": "Ann", "last_name": "Lee"}]}).to_string()
    }

    #[test]
    fn test_sticker_conversation_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new("token", 2000000001, dir.path()).with_progress(true);
        let db = ArchiveDb::open_in_memory().unwrap();
        let transport = ScriptedTransport::new()
            .respond(STICKER_PAGE)
            .respond(users_response())
            .respond(EMPTY_PAGE)
            .serve("https://vk.com/sticker/1-55-512", b"sticker");

        let summary = Exporter::new(&config, &transport, &db).run().unwrap();

        assert_eq!(
            summary,
            ExportSummary {
                messages_seen: 1,
                messages_inserted: 1,
                users_inserted: 1,
                files_downloaded: 1,
            }
        );
        let methods: Vec<String> = transport.calls().into_iter().map(|(m, _)| m).collect();
        assert_eq!(
            methods,
            ["messages.getHistory", "users.get", "messages.getHistory"]
        );

        let counts = db.counts().unwrap();
        assert_eq!(counts["messages"], 1);
        assert_eq!(counts["stickers"], 1);
        assert_eq!(counts["users"], 1);
        assert!(dir.path().join("stickers/55.png").is_file());
    }

    #[test]
    fn test_rerun_inserts_nothing_new() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new("token", 2000000001, dir.path());
        let db = ArchiveDb::open_in_memory().unwrap();
        let script = || {
            ScriptedTransport::new()
                .respond(STICKER_PAGE)
                .respond(users_response())
                .respond(EMPTY_PAGE)
                .serve("https://vk.com/sticker/1-55-512", b"sticker")
        };

        Exporter::new(&config, &script(), &db).run().unwrap();
        let before = db.counts().unwrap();
        let summary = Exporter::new(&config, &script(), &db).run().unwrap();

        assert_eq!(summary.messages_seen, 1);
        assert_eq!(summary.messages_inserted, 0);
        assert_eq!(summary.users_inserted, 0);
        assert_eq!(db.counts().unwrap(), before);
    }

    #[test]
    fn test_error_envelope_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new("bad", 2000000001, dir.path());
        let db = ArchiveDb::open_in_memory().unwrap();
        let transport =
            ScriptedTransport::new().respond(r#"{"error":{"error_code":5,"error_msg":"bad token"}}"#);

        let result = Exporter::new(&config, &transport, &db).run();

        match result {
            Err(ExportError::Api(ApiError::Remote { code, message })) => {
                assert_eq!(code, 5);
                assert_eq!(message, "bad token");
            }
            other => panic!("expected Remote error, got {:?}", other),
        }
        assert!(db.counts().unwrap().values().all(|rows| *rows == 0));
        assert!(transport.downloads().is_empty());
    }

    #[test]
    fn test_unknown_attachment_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new("token", 2000000001, dir.path());
        let db = ArchiveDb::open_in_memory().unwrap();
        let page = json!({"response": {"count": 1, "items": [{
            "from_id": 1, "conversation_message_id": 1, "date": 0, "text": "",
            "attachments": [{"type": "poll", "poll": {"id": 1}}]
        }]}});
        let transport = ScriptedTransport::new().respond(page.to_string());

        let result = Exporter::new(&config, &transport, &db).run();

        assert!(matches!(
            result,
            Err(ExportError::Api(ApiError::UnknownAttachmentKind { ref kind, .. })) if kind == "poll"
        ));
        assert_eq!(db.counts().unwrap()["messages"], 0);
    }
}
