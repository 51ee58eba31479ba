//! Specialized museum agents

pub mod collection;
pub mod qa;
pub mod tour_booking;

pub use collection::CollectionManagementAgent;
pub use qa::QaAgent;
pub use tour_booking::TourBookingAgent;

/// Crude keyword extraction: drop interrogative filler so the remainder can
/// feed a catalogue search
pub(crate) fn strip_stop_words(text: &str, stop_words: &[&str]) -> String {
    let mut cleaned = text.to_string();
    for word in stop_words {
        cleaned = cleaned.replace(word, "");
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_stop_words() {
        let stop = ["请问", "的", "有", "什么", "吗"];
        assert_eq!(strip_stop_words("请问有青铜鼎吗", &stop), "青铜鼎");
        assert_eq!(strip_stop_words("请问", &stop), "");
    }

    #[test]
    fn test_strip_stop_words_collapses_whitespace() {
        let stop = ["about"];
        assert_eq!(strip_stop_words("tell me about  bronze", &stop), "tell me bronze");
    }
}
