// SPDX-License-Identifier: MPL-2.0

use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use vkexport::api::{ApiError, Params, Transport};
use vkexport::store::ArchiveDb;
use vkexport::{ExportConfig, Exporter};

/// Serves history pages in order, answers `users.get` from the requested ids
/// and serves media from a fixed map.
struct FakeVk {
    pages: RefCell<VecDeque<Value>>,
    files: HashMap<&'static str, &'static [u8]>,
    user_lookups: RefCell<Vec<String>>,
}

impl FakeVk {
    fn new(pages: Vec<Value>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            files: HashMap::from([
                ("https://cdn/photo11.jpg", b"photo".as_slice()),
                ("https://cdn/notes.txt", b"notes".as_slice()),
                ("https://cdn/video31_large.jpg", b"preview".as_slice()),
            ]),
            user_lookups: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for FakeVk {
    fn call(&self, method: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        let body = match method {
            "messages.getHistory" => self
                .pages
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| json!({"response": {"count": 0, "items": []}})),
            "users.get" => {
                let ids = params.get("user_ids").unwrap_or_default().to_string();
                let users: Vec<Value> = ids
                    .split(',')
                    .map(|id| {
                        json!({"id": id.parse::<i64>().unwrap(),
                               "first_name": format!("User{}", id), "last_name": "Test"})
                    })
                    .collect();
                self.user_lookups.borrow_mut().push(ids);
                json!({ "response": users })
            }
            other => panic!("unexpected method {}", other),
        };
        Ok(body.to_string().into_bytes())
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.files
            .get(url)
            .map(|data| data.to_vec())
            .ok_or_else(|| ApiError::Network {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            })
    }
}

fn history() -> Vec<Value> {
    vec![
        json!({"response": {"count": 3, "items": [
            {
                "id": 501, "from_id": 1, "conversation_message_id": 1, "date": 1000,
                "text": "first", "important": 1,
                "attachments": [
                    {"type": "photo", "photo": {"id": 11, "owner_id": -5, "date": 990,
                                                "orig_photo": {"url": "https://cdn/photo11.jpg"}}},
                    {"type": "link", "link": {"url": "https://example.org", "title": "Example"}},
                    {"type": "call", "call": {"initiator_id": 1, "receiver_id": 2, "state": "reached",
                                              "time": 1000, "duration": 30, "video": false}}
                ]
            },
            {
                "id": 502, "from_id": 2, "conversation_message_id": 2, "date": 1001,
                "text": "see this", "reply_conversation_message_id": 1,
                "fwd_messages": [{
                    "from_id": 3, "conversation_message_id": 77, "date": 500, "text": "old",
                    "attachments": [
                        {"type": "doc", "doc": {"id": 21, "owner_id": 3, "date": 500, "title": "notes",
                                                "ext": "txt", "url": "https://cdn/notes.txt"}}
                    ]
                }]
            }
        ]}}),
        json!({"response": {"count": 3, "items": [
            {
                "id": 503, "from_id": 1, "conversation_message_id": 3, "date": 1002, "text": "clip",
                "attachments": [
                    {"type": "video", "video": {"id": 31, "owner_id": 1, "date": 1002, "title": "clip",
                                                "image": [{"url": "https://cdn/video31_small.jpg"},
                                                          {"url": "https://cdn/video31_large.jpg"}]}}
                ]
            }
        ]}}),
    ]
}

#[test]
fn test_full_export_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig::new("token", 2000000001, dir.path());
    let db = ArchiveDb::open(&config.database_path()).unwrap();
    let vk = FakeVk::new(history());

    let summary = Exporter::new(&config, &vk, &db).run().unwrap();

    assert_eq!(summary.messages_seen, 3);
    assert_eq!(summary.messages_inserted, 3);
    assert_eq!(summary.users_inserted, 3);
    assert_eq!(summary.files_downloaded, 3);
    // community owner -5 is never looked up, user 1 is looked up once
    assert_eq!(*vk.user_lookups.borrow(), ["1,2", "3"]);

    let counts = db.counts().unwrap();
    assert_eq!(counts["messages"], 4);
    assert_eq!(counts["forwarded_messages"], 1);
    assert_eq!(counts["message_attachments"], 5);
    assert_eq!(counts["links"], 1);
    assert_eq!(counts["calls"], 1);
    assert_eq!(counts["users"], 3);

    let (important, reply): (bool, Option<i64>) = db
        .conn()
        .query_row(
            "SELECT important, reply_conversation_message_id FROM messages
             WHERE conversation_message_id = 2",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(!important);
    assert_eq!(reply, Some(1));

    assert_eq!(
        std::fs::read(dir.path().join("photos/11.png")).unwrap(),
        b"photo"
    );
    assert_eq!(
        std::fs::read(dir.path().join("documents/21.txt")).unwrap(),
        b"notes"
    );
    assert_eq!(
        std::fs::read(dir.path().join("video_images/31.png")).unwrap(),
        b"preview"
    );
    assert!(dir.path().join("messages.db").is_file());
}

#[test]
fn test_second_run_over_same_archive_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig::new("token", 2000000001, dir.path());

    let before = {
        let db = ArchiveDb::open(&config.database_path()).unwrap();
        Exporter::new(&config, &FakeVk::new(history()), &db)
            .run()
            .unwrap();
        db.counts().unwrap()
    };

    let db = ArchiveDb::open(&config.database_path()).unwrap();
    let summary = Exporter::new(&config, &FakeVk::new(history()), &db)
        .run()
        .unwrap();

    assert_eq!(summary.messages_seen, 3);
    assert_eq!(summary.messages_inserted, 0);
    assert_eq!(summary.users_inserted, 0);
    assert_eq!(db.counts().unwrap(), before);
}
