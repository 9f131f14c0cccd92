// chat session - the transcript one window keeps while it is open

use crate::Error;
use crate::core::ChatReply;

const EMPTY_ANSWER: &str = "Sorry, I couldn't generate a response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub role: Role,
    pub text: String,
}

/// Append-only transcript plus the in-flight flag. At most one send is
/// outstanding at a time.
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Vec<Entry>,
    loading: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Entry] {
        &self.transcript
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Records the user's message and marks a send in flight. Returns the text to
    /// send, or `None` when the input is blank or a send is already running.
    pub fn begin_send(&mut self, input: &str) -> Option<String> {
        if self.loading || input.trim().is_empty() {
            return None;
        }
        self.push(Role::User, input.to_string());
        self.loading = true;
        Some(input.to_string())
    }

    /// Records the outcome of the outstanding send. Always clears loading.
    pub fn finish(&mut self, outcome: Result<ChatReply, Error>) {
        match outcome {
            Ok(reply) if reply.text.is_empty() => {
                self.push(Role::Assistant, EMPTY_ANSWER.to_string())
            }
            Ok(reply) => self.push(Role::Assistant, reply.text),
            Err(e) => self.push(Role::Error, format!("Error: {e}. Please try again later.")),
        }
        self.loading = false;
    }

    /// Messages the user has sent, oldest first.
    pub fn sent(&self) -> impl Iterator<Item = &str> {
        self.transcript
            .iter()
            .filter(|e| e.role == Role::User)
            .map(|e| e.text.as_str())
    }

    fn push(&mut self, role: Role, text: String) {
        self.transcript.push(Entry { role, text });
    }
}
