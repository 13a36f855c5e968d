//! School names double as export directory and archive entry names

/// A name is usable when it is non-blank and names exactly one path
/// component: no separators, no NUL, not `.` or `..`.
pub fn is_valid_school_name(name: &str) -> bool {
    !name.trim().is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        for name in ["Rice", "Johns Hopkins", "Université Laval", "St. John's", "..."] {
            assert!(is_valid_school_name(name), "{:?} should be accepted", name);
        }
    }

    #[test]
    fn test_rejects_path_like_names() {
        for name in ["", "  ", ".", "..", "a/b", "/abs", "..\\up", "nul\0"] {
            assert!(!is_valid_school_name(name), "{:?} should be rejected", name);
        }
    }
}
