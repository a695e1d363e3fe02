//! Bounded question/answer history for an explorer session.

use std::collections::VecDeque;

use ai_client::Message;
use serde::{Deserialize, Serialize};

/// Default number of turns an explorer remembers.
pub const DEFAULT_HISTORY_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The most recent `capacity` turns, oldest first. Pushing past capacity
/// evicts from the front.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    capacity: usize,
    turns: VecDeque<ConversationTurn>,
}

impl SessionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            turns: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        if self.capacity == 0 {
            return;
        }
        while self.turns.len() >= self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn to_vec(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    /// Alternating user/assistant messages, oldest turn first.
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .flat_map(|turn| {
                [
                    Message::user(&turn.question),
                    Message::assistant(&turn.answer),
                ]
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_client::MessageRole;

    fn questions(history: &SessionHistory) -> Vec<&str> {
        history.turns().map(|t| t.question.as_str()).collect()
    }

    #[test]
    fn evicts_oldest_first() {
        let mut history = SessionHistory::new(2);
        history.push(ConversationTurn::new("A", "a"));
        history.push(ConversationTurn::new("B", "b"));
        history.push(ConversationTurn::new("C", "c"));

        assert_eq!(history.len(), 2);
        assert_eq!(questions(&history), vec!["B", "C"]);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut history = SessionHistory::default();
        for i in 0..50 {
            history.push(ConversationTurn::new(format!("q{i}"), format!("a{i}")));
            assert!(history.len() <= DEFAULT_HISTORY_LENGTH);
        }
        assert_eq!(history.turns().next().unwrap().question, "q42");
        assert_eq!(history.turns().last().unwrap().question, "q49");
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = SessionHistory::new(0);
        history.push(ConversationTurn::new("A", "a"));
        assert!(history.is_empty());
        assert!(history.to_messages().is_empty());
    }

    #[test]
    fn messages_alternate_roles() {
        let mut history = SessionHistory::new(4);
        history.push(ConversationTurn::new("Who rules?", "The Drowned Queen."));
        history.push(ConversationTurn::new("Since when?", "The third tide."));

        let messages = history.to_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[2].content, "Since when?");
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut history = SessionHistory::new(3);
        history.push(ConversationTurn::new("A", "a"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 3);
    }
}
