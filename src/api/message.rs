// SPDX-License-Identifier: MPL-2.0

use crate::api::ApiError;
use crate::api::attachment::decode_attachment;
use crate::api::node::Node;
use crate::api::types::Message;

/// Per-run counters for attachments without a stable source id.
///
/// One value is shared by every decode of a run, so synthesized ids never
/// repeat within that run, whatever the forwarding depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdCounters {
    link: i64,
    call: i64,
    sticker: i64,
}

impl IdCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_link(&mut self) -> i64 {
        let id = self.link;
        self.link += 1;
        id
    }

    pub(crate) fn next_call(&mut self) -> i64 {
        let id = self.call;
        self.call += 1;
        id
    }

    pub(crate) fn next_sticker(&mut self) -> i64 {
        let id = self.sticker;
        self.sticker += 1;
        id
    }
}

/// Decode one message object, recursing into forwards and attachments.
pub fn decode_message(node: &Node, counters: &mut IdCounters) -> Result<Message, ApiError> {
    let original_json = serde_json::to_string(node.value())?;

    let reply_conversation_message_id = match node.opt_i64("reply_conversation_message_id")? {
        Some(id) => Some(id),
        None => node
            .opt_field("reply_message")
            .map(|reply| reply.i64("conversation_message_id"))
            .transpose()?,
    };

    let mut message = Message {
        id: node.opt_i64("id")?,
        from_id: node.i64("from_id")?,
        conversation_message_id: node.i64("conversation_message_id")?,
        date: node.i64("date")?,
        important: node
            .opt_field("important")
            .map(|n| n.as_bool())
            .transpose()?
            .unwrap_or(false),
        text: node.string("text")?,
        reply_conversation_message_id,
        attachments: Vec::new(),
        fwd_messages: Vec::new(),
        original_json,
    };

    if let Some(forwards) = node.opt_field("fwd_messages") {
        message.fwd_messages = forwards
            .items()?
            .iter()
            .map(|item| decode_message(item, counters))
            .collect::<Result<_, _>>()?;
    }

    if let Some(attachments) = node.opt_field("attachments") {
        message.attachments = attachments
            .items()?
            .iter()
            .map(|item| decode_attachment(item, counters))
            .collect::<Result<_, _>>()?;
    }

    Ok(message)
}
