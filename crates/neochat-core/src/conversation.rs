//! Conversation — the append-only message store of one chat session.
//!
//! A `Conversation` is created per session, grows monotonically, and is
//! handed into and back out of the agent loop by value. Nothing here ever
//! edits or removes a message once it has been pushed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Message, Role};

/// A tool result that is not directly preceded by its announcing call.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("tool message at index {index} (call id '{tool_call_id}') has no matching assistant tool call before it")]
pub struct ThreadingError {
    pub index: usize,
    pub tool_call_id: String,
}

/// Ordered, append-only sequence of conversation turns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// An empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Verify tool-result threading over the whole conversation.
    pub fn check_threading(&self) -> Result<(), ThreadingError> {
        check_threading(&self.messages)
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Every tool message must sit directly after an assistant message whose
/// `tool_calls` contains its `tool_call_id`.
pub fn check_threading(messages: &[Message]) -> Result<(), ThreadingError> {
    for (index, message) in messages.iter().enumerate() {
        let Some(id) = message.tool_call_id() else {
            continue;
        };

        let announced = index
            .checked_sub(1)
            .and_then(|prev| messages.get(prev))
            .filter(|prev| prev.role() == Role::Assistant)
            .map_or(false, |prev| prev.tool_calls().iter().any(|c| c.id == id));

        if !announced {
            return Err(ThreadingError {
                index,
                tool_call_id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;

    fn call(id: &str) -> ToolCall {
        ToolCall::new(id, "search_web", r#"{"query":"rust"}"#)
    }

    #[test]
    fn push_appends_in_order() {
        let mut conv = Conversation::new();
        conv.push(Message::user("hi"));
        conv.push(Message::assistant("hello"));

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].role(), Role::User);
        assert_eq!(conv.last().and_then(|m| m.content()), Some("hello"));
    }

    #[test]
    fn threading_accepts_announced_results() {
        let conv = Conversation::from(vec![
            Message::user("q"),
            Message::assistant_tool_calls(vec![call("a")]),
            Message::tool_result("a", "{}"),
            Message::assistant_tool_calls(vec![call("b")]),
            Message::tool_result("b", "{}"),
            Message::assistant("done"),
        ]);
        assert!(conv.check_threading().is_ok());
    }

    #[test]
    fn threading_rejects_orphan_result() {
        let conv = Conversation::from(vec![
            Message::user("q"),
            Message::tool_result("ghost", "{}"),
        ]);
        let err = conv.check_threading().unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.tool_call_id, "ghost");
    }

    #[test]
    fn threading_rejects_mismatched_id() {
        let messages = vec![
            Message::assistant_tool_calls(vec![call("a")]),
            Message::tool_result("b", "{}"),
        ];
        assert!(check_threading(&messages).is_err());
    }

    #[test]
    fn threading_rejects_result_at_start() {
        let messages = vec![Message::tool_result("a", "{}")];
        assert_eq!(check_threading(&messages).unwrap_err().index, 0);
    }

    #[test]
    fn serializes_as_plain_array() {
        let conv = Conversation::from(vec![Message::user("hi")]);
        let json = serde_json::to_value(&conv).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "user");
    }
}
