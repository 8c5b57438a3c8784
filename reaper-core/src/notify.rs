//! End-of-run notification text

use crate::event::Event;
use crate::host::Notifier;
use crate::report::Reporter;
use crate::Result;

/// Maximum number of transcript characters sent in a notification
pub const NOTIFICATION_TAIL_CHARS: usize = 4000;

/// Heading of the notification message
pub const NOTIFICATION_TITLE: &str = "**Azure DevOps Branch Cleanup Completed:**";

/// The last `max_chars` characters of `text`, starting on a line boundary
///
/// The cut is made on a character boundary and then moved past the first
/// newline so the tail never begins mid-line. When the final line alone is
/// longer than the budget, the raw character tail is returned instead.
pub fn transcript_tail(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }

    let start = text
        .char_indices()
        .nth(total - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let tail = &text[start..];

    if start > 0 && text.as_bytes()[start - 1] == b'\n' {
        return tail;
    }

    match tail.find('\n') {
        Some(nl) if nl + 1 < tail.len() => &tail[nl + 1..],
        _ => tail,
    }
}

/// Build the Teams message body for a transcript
pub fn notification_text(transcript: &str) -> String {
    format!(
        "{}\n```\n{}\n```",
        NOTIFICATION_TITLE,
        transcript_tail(transcript, NOTIFICATION_TAIL_CHARS)
    )
}

/// Send the transcript tail; failures are reported, never returned
///
/// Only a transcript write error is propagated.
pub async fn send_notification(notifier: &dyn Notifier, reporter: &mut Reporter) -> Result<()> {
    let text = notification_text(reporter.transcript().contents());

    match notifier.notify(&text).await {
        Ok(()) => reporter.record(Event::NotificationSent),
        Err(e) => reporter.record(Event::NotificationFailed {
            error: e.to_string(),
        }),
    }
}
