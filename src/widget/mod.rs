//! Client-side chat widget state.
//!
//! The widget owns the conversation for one browser session. Nothing here is
//! persisted; dropping the widget drops the history.

pub mod handoff;
pub mod transport;

use log::warn;

use crate::models::chat::{ ChatMessage, HistoryTurn, RelayResponse, Role };
use self::transport::{ RelayTransport, TransportError };

pub const GREETING: &str =
    "Hi! I'm your Rately assistant. I can help you with questions about rating stores, managing your account, or navigating the platform. How can I help you today?";

pub const EMPTY_REPLY: &str = "No response.";

pub const SUGGESTIONS: [&str; 3] = [
    "How do I rate a store?",
    "How to create store owner?",
    "Where is my dashboard?",
];

/// Transient, toast-style message for the UI to display and forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
}

/// A submission that has been recorded locally and is waiting on the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub message: String,
    /// Conversation as it was before `message` was appended.
    pub history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone)]
pub struct ChatWidget {
    open: bool,
    history: Vec<ChatMessage>,
    draft: String,
    sending: bool,
    focus_requested: bool,
    notifications: Vec<Notification>,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            open: false,
            history: vec![ChatMessage::assistant(GREETING, chrono::Utc::now())],
            draft: String::new(),
            sending: false,
            focus_requested: false,
            notifications: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Opening the widget also asks the UI to focus the input.
    pub fn toggle_open(&mut self) -> bool {
        self.open = !self.open;
        if self.open {
            self.focus_requested = true;
        }
        self.open
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn apply_suggestion(&mut self, index: usize) -> bool {
        match SUGGESTIONS.get(index) {
            Some(text) => {
                self.draft = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
    }

    /// Records the draft as a user message and marks the widget busy.
    /// Returns `None` without touching state when the draft is blank or a
    /// submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingSubmit> {
        let message = self.draft.trim();
        if message.is_empty() || self.sending {
            return None;
        }
        let message = message.to_string();

        let history = self.history
            .iter()
            .map(ChatMessage::to_turn)
            .collect();
        self.history.push(ChatMessage::user(message.clone()));
        self.draft.clear();
        self.sending = true;

        Some(PendingSubmit { message, history })
    }

    pub fn finish_submit(&mut self, result: Result<RelayResponse, TransportError>) {
        match result {
            Ok(resp) => {
                let content = resp.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY.to_string());
                self.history.push(ChatMessage::assistant(content, resp.timestamp));
            }
            Err(e) => {
                warn!("Chat error: {}", e);
                let message = e.user_message();
                self.notifications.push(Notification::Error(message.clone()));
                self.history.push(ChatMessage::error(message));
            }
        }
        self.sending = false;
    }

    /// Sends the current draft through `transport`. Returns whether a request
    /// was issued.
    pub async fn submit<T: RelayTransport + ?Sized>(&mut self, transport: &T) -> bool {
        let Some(pending) = self.begin_submit() else {
            return false;
        };
        let result = transport.send(&pending.message, &pending.history).await;
        self.finish_submit(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct StubTransport {
        reply: Result<&'static str, (u16, &'static str)>,
        calls: Mutex<Vec<PendingSubmit>>,
    }

    impl StubTransport {
        fn replying(text: &'static str) -> Self {
            Self { reply: Ok(text), calls: Mutex::new(Vec::new()) }
        }

        fn failing(status: u16, message: &'static str) -> Self {
            Self { reply: Err((status, message)), calls: Mutex::new(Vec::new()) }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RelayTransport for StubTransport {
        async fn send(
            &self,
            message: &str,
            history: &[HistoryTurn]
        ) -> Result<RelayResponse, TransportError> {
            self.calls.lock().unwrap().push(PendingSubmit {
                message: message.to_string(),
                history: history.to_vec(),
            });
            match self.reply {
                Ok(text) =>
                    Ok(RelayResponse {
                        success: true,
                        message: Some(text.to_string()),
                        timestamp: Utc::now(),
                    }),
                Err((status, message)) =>
                    Err(TransportError::Rejected { status, message: message.to_string() }),
            }
        }
    }

    #[test]
    fn starts_closed_with_greeting() {
        let widget = ChatWidget::new();
        assert!(!widget.is_open());
        assert!(!widget.is_sending());
        assert!(widget.draft().is_empty());
        assert_eq!(widget.history().len(), 1);
        assert_eq!(widget.history()[0].role, Role::Assistant);
        assert_eq!(widget.history()[0].content, GREETING);
    }

    #[test]
    fn opening_requests_focus_once() {
        let mut widget = ChatWidget::new();
        assert!(widget.toggle_open());
        assert!(widget.take_focus_request());
        assert!(!widget.take_focus_request());

        assert!(!widget.toggle_open());
        assert!(!widget.take_focus_request());
    }

    #[tokio::test]
    async fn successful_round_trip() {
        let transport = StubTransport::replying("Go to the store page and click the stars.");
        let mut widget = ChatWidget::new();
        widget.set_draft("How do I rate a store?");

        assert!(widget.submit(&transport).await);

        let history = widget.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].role, Role::User);
        assert_eq!(history[1].content, "How do I rate a store?");
        assert_eq!(history[2].role, Role::Assistant);
        assert_eq!(history[2].content, "Go to the store page and click the stars.");
        assert!(!history[2].is_error);
        assert!(!widget.is_sending());
        assert!(widget.draft().is_empty());
        assert!(widget.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn relay_receives_history_before_the_new_message() {
        let transport = StubTransport::replying("ok");
        let mut widget = ChatWidget::new();
        widget.set_draft("  first  ");
        widget.submit(&transport).await;
        widget.set_draft("second");
        widget.submit(&transport).await;

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].message, "first");
        assert_eq!(calls[0].history, vec![HistoryTurn::new("assistant", GREETING)]);
        assert_eq!(calls[1].message, "second");
        assert_eq!(
            calls[1].history,
            vec![
                HistoryTurn::new("assistant", GREETING),
                HistoryTurn::new("user", "first"),
                HistoryTurn::new("assistant", "ok")
            ]
        );
    }

    #[tokio::test]
    async fn blank_draft_is_ignored() {
        let transport = StubTransport::replying("unused");
        let mut widget = ChatWidget::new();
        widget.set_draft("   ");

        assert!(!widget.submit(&transport).await);
        assert_eq!(widget.history().len(), 1);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn second_submit_while_sending_is_rejected() {
        let transport = StubTransport::replying("unused");
        let mut widget = ChatWidget::new();
        widget.set_draft("first");
        let pending = widget.begin_submit().unwrap();
        assert!(widget.is_sending());

        widget.set_draft("second");
        let len = widget.history().len();
        assert!(!widget.submit(&transport).await);
        assert_eq!(widget.history().len(), len);
        assert_eq!(widget.draft(), "second");
        assert_eq!(transport.call_count(), 0);

        widget.finish_submit(transport.send(&pending.message, &pending.history).await);
        assert!(!widget.is_sending());
    }

    #[tokio::test]
    async fn failure_becomes_error_entry_and_notification() {
        let transport = StubTransport::failing(500, "Model is overloaded");
        let mut widget = ChatWidget::new();
        widget.set_draft("hello");

        assert!(widget.submit(&transport).await);

        let last = widget.history().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.is_error);
        assert_eq!(last.content, "Model is overloaded");
        assert!(!widget.is_sending());
        assert_eq!(
            widget.take_notifications(),
            vec![Notification::Error("Model is overloaded".to_string())]
        );
        assert!(widget.take_notifications().is_empty());
    }

    #[test]
    fn transport_failure_without_body_uses_default_text() {
        let mut widget = ChatWidget::new();
        widget.set_draft("hello");
        widget.begin_submit().unwrap();
        widget.finish_submit(Err(TransportError::Status(502)));

        let last = widget.history().last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.content, transport::DEFAULT_ERROR);
    }

    #[test]
    fn empty_reply_is_shown_as_no_response() {
        let mut widget = ChatWidget::new();
        widget.set_draft("hello");
        widget.begin_submit().unwrap();
        widget.finish_submit(
            Ok(RelayResponse { success: true, message: None, timestamp: Utc::now() })
        );
        assert_eq!(widget.history().last().unwrap().content, EMPTY_REPLY);
    }

    #[test]
    fn suggestions_fill_the_draft() {
        let mut widget = ChatWidget::new();
        assert!(widget.apply_suggestion(0));
        assert_eq!(widget.draft(), "How do I rate a store?");
        assert!(!widget.apply_suggestion(SUGGESTIONS.len()));
        assert_eq!(widget.draft(), "How do I rate a store?");
    }

    #[test]
    fn last_assistant_reply_skips_user_messages() {
        let mut widget = ChatWidget::new();
        assert_eq!(widget.last_assistant_reply(), Some(GREETING));
        widget.set_draft("question");
        widget.begin_submit().unwrap();
        assert_eq!(widget.last_assistant_reply(), Some(GREETING));
    }
}
