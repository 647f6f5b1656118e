//! Conversation log shared between the chat pipeline and the UI shell.
//!
//! Messages are append-only and carry explicit ids; assistant replies link
//! back to the user message that provoked them, so deleting an exchange never
//! depends on positional arithmetic over the raw log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monotonically assigned per-log sequence number. Never reused, survives
/// deletion and clear.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// For assistant replies: the user message this answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<MessageId>,
}

/// Ordered, append-only message log. Single logical writer (the UI thread);
/// callers that share it across threads wrap it in their own lock.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
    next_id: u64,
    /// When set, whole oldest exchanges are evicted once the message count
    /// exceeds this limit. None = unbounded.
    retention: Option<usize>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that keeps at most `max_messages` entries, evicting whole
    /// exchanges from the front once the limit is exceeded.
    pub fn with_retention(max_messages: usize) -> Self {
        Self {
            retention: Some(max_messages),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of user messages, i.e. the number of addressable exchanges.
    pub fn exchange_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }

    pub fn append_user(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Role::User, content.into(), None)
    }

    pub fn append_assistant(
        &mut self,
        content: impl Into<String>,
        in_reply_to: Option<MessageId>,
    ) -> MessageId {
        self.push(Role::Assistant, content.into(), in_reply_to)
    }

    fn push(&mut self, role: Role, content: String, in_reply_to: Option<MessageId>) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            content,
            created_at: Utc::now(),
            in_reply_to,
        });
        if let Some(limit) = self.retention {
            while self.messages.len() > limit {
                self.evict_front_exchange();
            }
        }
        id
    }

    fn evict_front_exchange(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let first = self.messages.remove(0);
        if first.role == Role::User {
            if let Some(pos) = self
                .messages
                .iter()
                .position(|m| m.in_reply_to == Some(first.id))
            {
                self.messages.remove(pos);
            }
        }
    }

    /// Remove the `pair_index`-th user message (counting from zero in the
    /// user-only projection of the log) together with its reply. The reply is
    /// the assistant message linked via `in_reply_to`, falling back to the
    /// entry immediately after the user message for logs imported without
    /// links. Returns false and leaves the log unchanged when `pair_index`
    /// is out of range.
    pub fn delete_exchange(&mut self, pair_index: usize) -> bool {
        let user_pos = match self
            .messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role == Role::User)
            .map(|(i, _)| i)
            .nth(pair_index)
        {
            Some(pos) => pos,
            None => return false,
        };
        let user_id = self.messages[user_pos].id;

        let reply_pos = self
            .messages
            .iter()
            .position(|m| m.in_reply_to == Some(user_id))
            .or_else(|| {
                let next = user_pos + 1;
                if next < self.messages.len() && self.messages[next].role == Role::Assistant {
                    Some(next)
                } else {
                    None
                }
            });

        match reply_pos {
            Some(reply) if reply > user_pos => {
                self.messages.remove(reply);
                self.messages.remove(user_pos);
            }
            Some(reply) => {
                self.messages.remove(user_pos);
                self.messages.remove(reply);
            }
            None => {
                self.messages.remove(user_pos);
            }
        }
        tracing::debug!(pair_index, "deleted conversation exchange");
        true
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Full log as pretty-printed JSON, suitable for a file export.
    pub fn export_snapshot(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.messages)?)
    }

    /// Parse a snapshot produced by [`export_snapshot`](Self::export_snapshot).
    /// The id counter resumes after the highest imported id.
    pub fn import_snapshot(text: &str) -> anyhow::Result<Self> {
        let messages: Vec<Message> = serde_json::from_str(text)?;
        let next_id = messages.iter().map(|m| m.id.0 + 1).max().unwrap_or(0);
        Ok(Self {
            messages,
            next_id,
            retention: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with_exchanges(n: usize) -> ConversationLog {
        let mut log = ConversationLog::new();
        for i in 0..n {
            let user = log.append_user(format!("question {}", i));
            log.append_assistant(format!("answer {}", i), Some(user));
        }
        log
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let mut log = ConversationLog::new();
        let a = log.append_user("hi");
        let b = log.append_assistant("hello", Some(a));
        let c = log.append_user("more");
        assert!(a < b && b < c);
        assert_eq!(log.len(), 3);
        assert_eq!(log.messages()[1].in_reply_to, Some(a));
    }

    #[test]
    fn test_delete_exchange_removes_pair_and_preserves_order() {
        let mut log = log_with_exchanges(3);
        assert_eq!(log.len(), 6);

        assert!(log.delete_exchange(1));

        assert_eq!(log.len(), 4);
        let contents: Vec<&str> = log.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["question 0", "answer 0", "question 2", "answer 2"]
        );
    }

    #[test]
    fn test_delete_exchange_out_of_range_is_a_no_op() {
        let mut log = log_with_exchanges(2);
        assert!(!log.delete_exchange(2));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_delete_exchange_on_non_alternating_log_uses_reply_links() {
        // Two user messages in a row: the second exchange's reply lands after
        // both. Positional (2i, 2i+1) deletion would remove the wrong rows.
        let mut log = ConversationLog::new();
        let first = log.append_user("first");
        let second = log.append_user("second");
        log.append_assistant("reply to second", Some(second));
        log.append_assistant("reply to first", Some(first));

        assert!(log.delete_exchange(0));

        let contents: Vec<&str> = log.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "reply to second"]);
    }

    #[test]
    fn test_delete_exchange_without_reply_removes_single_entry() {
        let mut log = ConversationLog::new();
        log.append_user("pending");
        assert!(log.delete_exchange(0));
        assert!(log.is_empty());
    }

    #[test]
    fn test_clear_empties_log_but_keeps_id_counter() {
        let mut log = log_with_exchanges(2);
        log.clear();
        assert!(log.is_empty());
        let id = log.append_user("fresh");
        assert_eq!(id, MessageId(4));
    }

    #[test]
    fn test_snapshot_round_trip_preserves_messages() {
        let log = log_with_exchanges(2);
        let snapshot = log.export_snapshot().unwrap();
        let restored = ConversationLog::import_snapshot(&snapshot).unwrap();
        assert_eq!(restored.messages(), log.messages());

        let mut restored = restored;
        let id = restored.append_user("new");
        assert_eq!(id, MessageId(4));
    }

    #[test]
    fn test_retention_evicts_oldest_exchange() {
        let mut log = ConversationLog::with_retention(4);
        for i in 0..3 {
            let user = log.append_user(format!("q{}", i));
            log.append_assistant(format!("a{}", i), Some(user));
        }
        assert_eq!(log.len(), 4);
        let contents: Vec<&str> = log.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
    }
}
