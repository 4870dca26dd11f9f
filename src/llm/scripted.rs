use super::types::{ChatMessage, LlmClient};
use crate::error::{DivergenError, Result};
use std::sync::Mutex;

/// Deterministic stand-in client for tests and offline runs
///
/// Replays a fixed list of canned replies in order; the final reply repeats
/// once the list is exhausted. Every received conversation is recorded and
/// can be inspected afterwards.
pub struct ScriptedClient {
    replies: Vec<String>,
    cursor: Mutex<usize>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            cursor: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Single canned reply, repeated for every call
    pub fn repeating(reply: impl Into<String>) -> Self {
        Self::new(vec![reply.into()])
    }

    /// Number of completions served so far
    pub fn calls(&self) -> usize {
        *self.cursor.lock().unwrap()
    }

    /// Conversations received so far, in call order
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmClient for ScriptedClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let mut cursor = self.cursor.lock().unwrap();
        let reply = self
            .replies
            .get(*cursor)
            .or_else(|| self.replies.last())
            .cloned()
            .ok_or_else(|| DivergenError::Llm("Script is empty".to_string()))?;
        *cursor += 1;

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies_in_order_then_repeat_last() {
        let client = ScriptedClient::new(vec!["a".to_string(), "b".to_string()]);
        let msgs = [ChatMessage::user("hi")];

        assert_eq!(client.complete(&msgs).unwrap(), "a");
        assert_eq!(client.complete(&msgs).unwrap(), "b");
        assert_eq!(client.complete(&msgs).unwrap(), "b");
        assert_eq!(client.calls(), 3);
    }

    #[test]
    fn test_records_requests() {
        let client = ScriptedClient::repeating("ok");
        client
            .complete(&[ChatMessage::system("sys"), ChatMessage::user("ctx")])
            .unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].len(), 2);
        assert_eq!(requests[0][0].content, "sys");
    }
}
