//! Project assistant chat

use crate::responses::{ResponseStrategy, StaticResponses};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One chat line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Conversation with the assistant
#[derive(Debug)]
pub struct ChatSession {
    strategy: Box<dyn ResponseStrategy>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Chat backed by `strategy`
    #[must_use]
    pub fn new(strategy: Box<dyn ResponseStrategy>) -> Self {
        Self {
            strategy,
            messages: Vec::new(),
        }
    }

    /// Ask a question; records both sides and returns the answer.
    ///
    /// Blank input is ignored.
    pub fn ask(&mut self, question: &str) -> Option<&ChatMessage> {
        if question.trim().is_empty() {
            return None;
        }
        let now = Utc::now();
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: question.to_string(),
            timestamp: now,
        });
        let answer = self.strategy.answer(question);
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text: answer,
            timestamp: Utc::now(),
        });
        self.messages.last()
    }

    /// Conversation so far, oldest first
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(Box::new(StaticResponses::chat()))
    }
}
