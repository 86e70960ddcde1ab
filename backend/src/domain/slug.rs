//! Slug validation predicates for URL-addressable entities.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, hyphens and underscores.

/// Return `true` when `value` is a valid slug of at most `max_len` bytes.
pub(crate) fn is_valid_slug(value: &str, max_len: usize) -> bool {
    !value.is_empty() && value.len() <= max_len && value.chars().all(is_slug_char)
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::is_valid_slug;
    use rstest::rstest;

    #[rstest]
    #[case("cats", 50, true)]
    #[case("cats-and_dogs-2", 50, true)]
    #[case("", 50, false)]
    #[case(" cats", 50, false)]
    #[case("Cats", 50, false)]
    #[case("cats/dogs", 50, false)]
    #[case("abcdef", 5, false)]
    fn validates_slugs(#[case] value: &str, #[case] max_len: usize, #[case] expected: bool) {
        assert_eq!(is_valid_slug(value, max_len), expected);
    }
}
