use chrono::{ DateTime, Local };
use url::{ form_urlencoded, Url };

use super::ChatWidget;

pub const HANDOFF_PREFIX: &str = "Rately question: ";
pub const DEFAULT_HANDOFF_TEXT: &str = "Hello, I need help with Rately.";
pub const GUEST_LABEL: &str = "Guest";
const SEPARATOR: &str = " | ";

/// Caller-side facts that go into a hand-off message.
#[derive(Debug, Clone)]
pub struct HandoffContext<'a> {
    pub page: &'a str,
    /// Email of the signed-in user, if any.
    pub user_email: Option<&'a str>,
    pub time: DateTime<Local>,
}

/// Builds a WhatsApp deep link carrying a pre-filled support message.
#[derive(Debug, Clone)]
pub struct Handoff {
    destination: String,
    pub include_last_answer: bool,
    pub include_user_info: bool,
}

impl Handoff {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            include_last_answer: true,
            include_user_info: true,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn compose(&self, draft: &str, last_answer: Option<&str>, ctx: &HandoffContext<'_>) -> String {
        let draft = draft.trim();
        let text = if draft.is_empty() { DEFAULT_HANDOFF_TEXT } else { draft };

        let mut parts = vec![format!("{}{}", HANDOFF_PREFIX, text)];
        if self.include_user_info {
            parts.push(format!("From: {}", ctx.user_email.unwrap_or(GUEST_LABEL)));
        }
        parts.push(format!("Page: {}", ctx.page));
        parts.push(format!("Time: {}", ctx.time.format("%-m/%-d/%Y, %-I:%M:%S %p")));
        if self.include_last_answer {
            if let Some(answer) = last_answer.filter(|a| !a.is_empty()) {
                parts.push(format!("Last answer: {}", answer));
            }
        }
        parts.join(SEPARATOR)
    }

    /// Spaces are written as `%20`, not `+`.
    pub fn url(&self, text: &str) -> Result<Url, url::ParseError> {
        let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
        // A literal '+' is already "%2B" here, so every '+' left is a space.
        let encoded = encoded.replace('+', "%20");
        Url::parse(&format!("https://wa.me/{}?text={}", self.destination, encoded))
    }

    /// Composes the message from the widget's draft and last reply, and
    /// returns the link to open in a new browsing context.
    pub fn url_for(&self, widget: &ChatWidget, ctx: &HandoffContext<'_>) -> Result<Url, url::ParseError> {
        let text = self.compose(widget.draft(), widget.last_assistant_reply(), ctx);
        self.url(&text)
    }
}
