//! Helper functions and utilities
//! 
//! This module contains common helper functions used throughout the application.

use std::time::Instant;

/// Calculate pagination offset
pub fn calculate_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1) * page_size
}

/// Milliseconds elapsed since `start`, saturating at `u64::MAX`
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
        assert_eq!(truncate_text("привет мир", 7), "прив...");
    }

    #[test]
    fn test_elapsed_ms() {
        let started = Instant::now() - std::time::Duration::from_millis(25);
        assert!(elapsed_ms(started) >= 25);
    }

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(1, 50), 0);
        assert_eq!(calculate_offset(3, 50), 100);
        assert_eq!(calculate_offset(0, 50), 0);
    }
}
