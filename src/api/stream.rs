// SPDX-License-Identifier: MPL-2.0

use crate::api::message::{IdCounters, decode_message};
use crate::api::node::Node;
use crate::api::response::parse_response;
use crate::api::transport::{Params, Transport};
use crate::api::types::Message;
use crate::api::ApiError;
use crate::config::{API_VERSION, PAGE_SIZE};
use std::collections::VecDeque;
use tracing::debug;

const HISTORY_METHOD: &str = "messages.getHistory";

/// Pulls a conversation's history page by page, oldest first, and hands out
/// one decoded message at a time.
pub struct MessageStream<'a, T: Transport + ?Sized> {
    transport: &'a T,
    peer_id: i64,
    access_token: String,
    offset: u64,
    buffer: VecDeque<Message>,
    counters: IdCounters,
    total: Option<u64>,
    exhausted: bool,
}

impl<'a, T: Transport + ?Sized> MessageStream<'a, T> {
    pub fn new(transport: &'a T, peer_id: i64, access_token: &str) -> Self {
        Self {
            transport,
            peer_id,
            access_token: access_token.to_string(),
            offset: 0,
            buffer: VecDeque::new(),
            counters: IdCounters::new(),
            total: None,
            exhausted: false,
        }
    }

    /// Next message, or `None` once the remote side has no more.
    pub fn next_message(&mut self) -> Result<Option<Message>, ApiError> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page()?;
        }
        Ok(self.buffer.pop_front())
    }

    /// Conversation size reported by the most recent page
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Offset the next page request will use
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn fetch_page(&mut self) -> Result<(), ApiError> {
        let params = Params::new()
            .with("offset", self.offset)
            .with("peer_id", self.peer_id)
            .with("access_token", &self.access_token)
            .with("count", PAGE_SIZE)
            .with("rev", 1)
            .with("v", API_VERSION);

        let body = self.transport.call(HISTORY_METHOD, &params)?;
        let payload = parse_response(&body)?;
        let page = Node::root(&payload);

        let total = page.i64("count")?.max(0) as u64;
        let items = page.field("items")?.items()?;

        // A page is taken whole or not at all
        let mut counters = self.counters.clone();
        let messages = items
            .iter()
            .map(|item| decode_message(item, &mut counters))
            .collect::<Result<Vec<_>, _>>()?;

        // The API's offset counts messages to skip, so advance by what arrived
        let fetched = messages.len();
        self.counters = counters;
        self.total = Some(total);
        self.buffer.extend(messages);
        self.offset += fetched as u64;

        debug!(
            "fetched {} messages from peer {} (offset now {})",
            fetched, self.peer_id, self.offset
        );

        if fetched == 0 {
            self.exhausted = true;
        }
        Ok(())
    }
}

impl<T: Transport + ?Sized> Iterator for MessageStream<'_, T> {
    type Item = Result<Message, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_message().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    fn page(count: u64, cmids: std::ops::Range<i64>) -> String {
        let items: Vec<_> = cmids
            .map(|cmid| {
                json!({"from_id": 1, "conversation_message_id": cmid, "date": cmid, "text": "m"})
            })
            .collect();
        json!({"response": {"count": count, "items": items}}).to_string()
    }

    #[test]
    fn test_yields_messages_in_page_order() {
        let transport = ScriptedTransport::new()
            .respond(page(3, 1..3))
            .respond(page(3, 3..4))
            .respond(page(3, 0..0));
        let stream = MessageStream::new(&transport, 2000000001, "token");

        let cmids: Vec<i64> = stream
            .map(|m| m.unwrap().conversation_message_id)
            .collect();
        assert_eq!(cmids, [1, 2, 3]);
        assert_eq!(transport.calls().len(), 3);
    }

    #[test]
    fn test_request_parameters_and_offsets() {
        let transport = ScriptedTransport::new()
            .respond(page(5, 1..3))
            .respond(page(5, 3..6))
            .respond(page(5, 0..0));
        let mut stream = MessageStream::new(&transport, 2000000001, "secret");
        while stream.next_message().unwrap().is_some() {}

        let calls = transport.calls();
        let (method, params) = &calls[0];
        assert_eq!(method, "messages.getHistory");
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["offset", "peer_id", "access_token", "count", "rev", "v"]);
        assert_eq!(params.get("peer_id"), Some("2000000001"));
        assert_eq!(params.get("access_token"), Some("secret"));
        assert_eq!(params.get("count"), Some("200"));
        assert_eq!(params.get("rev"), Some("1"));
        assert_eq!(params.get("v"), Some(API_VERSION));

        let offsets: Vec<_> = calls
            .iter()
            .map(|(_, p)| p.get("offset").unwrap().to_string())
            .collect();
        assert_eq!(offsets, ["0", "2", "5"]);
        assert_eq!(stream.total(), Some(5));
    }

    #[test]
    fn test_no_calls_after_end_of_stream() {
        let transport = ScriptedTransport::new().respond(page(0, 0..0));
        let mut stream = MessageStream::new(&transport, 1, "t");
        assert!(stream.next_message().unwrap().is_none());
        assert!(stream.next_message().unwrap().is_none());
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn test_remote_error_surfaces() {
        let transport = ScriptedTransport::new()
            .respond(r#"{"error": {"error_code": 5, "error_msg": "bad token"}}"#);
        let mut stream = MessageStream::new(&transport, 1, "t");
        match stream.next_message() {
            Err(ApiError::Remote { code, message }) => {
                assert_eq!(code, 5);
                assert_eq!(message, "bad token");
            }
            other => panic!("expected Remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_page_with_broken_item_is_dropped_whole() {
        let broken = json!({"response": {"count": 2, "items": [
            {"from_id": 1, "conversation_message_id": 1, "date": 0, "text": "ok",
             "attachments": [{"type": "link", "link": {"url": "https://a"}}]},
            {"from_id": 1, "conversation_message_id": 2, "date": 0}
        ]}})
        .to_string();
        let transport = ScriptedTransport::new().respond(broken).respond(page(2, 1..3));
        let mut stream = MessageStream::new(&transport, 1, "t");

        match stream.next_message() {
            Err(ApiError::MissingField { path }) => assert_eq!(path, "items[1].text"),
            other => panic!("expected MissingField, got {:?}", other),
        }
        assert_eq!(stream.offset(), 0);
        assert_eq!(stream.total(), None);

        // nothing from the broken page is handed out; the retry starts over
        let message = stream.next_message().unwrap().unwrap();
        assert_eq!(message.conversation_message_id, 1);
        assert!(message.attachments.is_empty());
        assert_eq!(stream.offset(), 2);

        let offsets: Vec<_> = transport
            .calls()
            .iter()
            .map(|(_, p)| p.get("offset").unwrap().to_string())
            .collect();
        assert_eq!(offsets, ["0", "0"]);
    }

    #[test]
    fn test_failed_page_does_not_advance_counters() {
        let link = |cmid: i64| {
            json!({"from_id": 1, "conversation_message_id": cmid, "date": 0, "text": "",
                   "attachments": [{"type": "link", "link": {"url": "https://a"}}]})
        };
        let broken = json!({"response": {"count": 2, "items": [
            link(1),
            {"from_id": 1, "conversation_message_id": 2, "date": "never", "text": ""}
        ]}});
        let fixed = json!({"response": {"count": 2, "items": [link(1), link(2)]}});
        let transport = ScriptedTransport::new()
            .respond(broken.to_string())
            .respond(fixed.to_string());
        let mut stream = MessageStream::new(&transport, 1, "t");

        assert!(matches!(
            stream.next_message(),
            Err(ApiError::InvalidField { ref path, .. }) if path == "items[1].date"
        ));
        let ids: Vec<i64> = (0..2)
            .map(|_| stream.next_message().unwrap().unwrap().attachments[0].id())
            .collect();
        assert_eq!(ids, [0, 1]);
    }

    #[test]
    fn test_counters_continue_across_pages() {
        let call_page = |cmid: i64| {
            json!({"response": {"count": 2, "items": [{
                "from_id": 1, "conversation_message_id": cmid, "date": 0, "text": "",
                "attachments": [{"type": "call", "call": {
                    "initiator_id": 1, "receiver_id": 2, "state": "reached",
                    "time": 0, "duration": 0, "video": 0}}]
            }]}})
            .to_string()
        };
        let transport = ScriptedTransport::new()
            .respond(call_page(1))
            .respond(call_page(2))
            .respond(page(2, 0..0));
        let ids: Vec<i64> = MessageStream::new(&transport, 1, "t")
            .map(|m| m.unwrap().attachments[0].id())
            .collect();
        assert_eq!(ids, [0, 1]);
    }
}
