//! Field keys

/// Operation label set by [`crate::Error::op`]
pub const OP: &str = "error_op";

/// The error's message
pub const MESSAGE: &str = "error";

/// Type of the value the error was created from
pub const TYPE: &str = "error_type";

/// Innermost frame of the creating call
pub const LOCATION: &str = "error_location";

/// Value of [`TYPE`] for errors created with [`crate::Error::new`]
pub const NEW_ERROR_TYPE: &str = "ctxerr::Error";

/// Normalize a field key: trimmed, lowercase, with every character that is not
/// ASCII alphanumeric turned into its own `_`. Runs are not collapsed.
///
/// `"DaTa_1"`, `"data-1"` and `"dATA+1"` all become `"data_1"`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn separators_and_case_normalize() {
        assert_eq!(normalize_key("DaTa_1"), "data_1");
        assert_eq!(normalize_key("dATA+1"), "data_1");
        assert_eq!(normalize_key(" User.Id "), "user_id");
        assert_eq!(normalize_key("Größe"), "gr__e");
    }

    #[test]
    fn separator_runs_are_kept() {
        assert_eq!(normalize_key("data--1"), "data__1");
        assert_eq!(normalize_key("_x_"), "_x_");
        assert_eq!(normalize_key("a. b"), "a__b");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(key in "\\PC{0,24}") {
            let once = normalize_key(&key);
            prop_assert_eq!(normalize_key(&once), once.clone());
        }

        #[test]
        fn case_never_matters(key in "[a-zA-Z0-9_+. -]{1,24}") {
            prop_assert_eq!(
                normalize_key(&key.to_uppercase()),
                normalize_key(&key.to_lowercase())
            );
        }

        #[test]
        fn output_is_ascii_word_characters(key in "\\PC{0,24}") {
            let normalized = normalize_key(&key);
            prop_assert!(normalized
                .chars()
                .all(|c| c == '_' || c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
