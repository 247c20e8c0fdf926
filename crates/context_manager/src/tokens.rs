//! Rough token heuristics used to decide when a conversation should be
//! summarized.

use chat_core::ChatMessage;
use chrono::{DateTime, Duration, Utc};

pub const SUMMARY_IDLE_MINUTES: i64 = 30;
pub const SUMMARY_TOKEN_THRESHOLD: usize = 1000;

/// ~1.5 tokens per CJK ideograph plus ~1.3 per whitespace-separated word.
pub fn estimate_tokens(text: &str) -> usize {
    let cjk_chars = text
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fa5}').contains(c))
        .count();

    // Pieces left after splitting on whitespace runs, empty edges included.
    let mut words = 1;
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                words += 1;
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
        }
    }

    (cjk_chars as f64 * 1.5 + words as f64 * 1.3).ceil() as usize
}

/// ~4 characters per token.
pub fn calculate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// True after 30 idle minutes or once the messages reach 1000 tokens.
pub fn should_generate_summary(
    messages: &[ChatMessage],
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    if now - last_activity >= Duration::minutes(SUMMARY_IDLE_MINUTES) {
        return true;
    }

    let total: usize = messages.iter().map(|m| calculate_tokens(&m.content)).sum();
    total >= SUMMARY_TOKEN_THRESHOLD
}
