pub mod notification;
pub mod post;
pub mod user;

/// Length limits are in characters, not bytes, so multibyte text is not
/// penalized for its encoding.
pub fn within_limit(text: &str, max: usize) -> bool {
    let chars = text.chars().count();
    chars >= 1 && chars <= max
}

#[cfg(test)]
mod tests {
    use super::post::{MAX_COMMENT_LEN, MAX_POST_LEN};
    use super::within_limit;

    #[test]
    fn limits_count_characters_not_bytes() {
        // 150 CJK characters is 450 bytes but well within the comment limit.
        let multibyte = "好".repeat(150);
        assert!(multibyte.len() > MAX_COMMENT_LEN);
        assert!(within_limit(&multibyte, MAX_COMMENT_LEN));

        let ascii = "a".repeat(MAX_POST_LEN);
        assert!(within_limit(&ascii, MAX_POST_LEN));
        assert!(!within_limit(&"a".repeat(MAX_POST_LEN + 1), MAX_POST_LEN));
    }

    #[test]
    fn empty_text_is_out_of_bounds() {
        assert!(!within_limit("", MAX_COMMENT_LEN));
    }
}
