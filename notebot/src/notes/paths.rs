//! Note path validation

/// How note paths coming from generated text are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathRule {
    /// Reject any path containing a `.` character. This also rejects
    /// ordinary extensions such as `todo.md`.
    #[default]
    Legacy,
    /// Reject `.`/`..` segments only.
    Strict,
}

impl PathRule {
    /// Both rules reject empty and absolute paths, including drive prefixes
    pub fn is_valid(&self, path: &str) -> bool {
        if path.trim().is_empty() || is_rooted(path) {
            return false;
        }
        match self {
            PathRule::Legacy => !path.contains('.'),
            PathRule::Strict => is_valid_strict(path),
        }
    }
}

/// `Path::join` replaces the base for any of these
fn is_rooted(path: &str) -> bool {
    // Windows drive prefixes ("C:foo") count as well
    path.starts_with('/') || path.starts_with('\\') || path.contains(':')
}

fn is_valid_strict(path: &str) -> bool {
    path.split(['/', '\\'])
        .all(|segment| segment != "." && segment != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_rejects_any_dot() {
        let rule = PathRule::Legacy;
        assert!(rule.is_valid("colors"));
        assert!(rule.is_valid("people/alice"));
        assert!(!rule.is_valid("../secrets"));
        assert!(!rule.is_valid("./colors"));
        assert!(!rule.is_valid("notes.md"));
        assert!(!rule.is_valid("a/b.c/d"));
        assert!(!rule.is_valid("/etc/passwd"));
        assert!(!rule.is_valid("\\server\\share"));
        assert!(!rule.is_valid("C:evil"));
    }

    #[test]
    fn test_strict_allows_extensions() {
        let rule = PathRule::Strict;
        assert!(rule.is_valid("notes.md"));
        assert!(rule.is_valid("people/alice.txt"));
        assert!(rule.is_valid("v1.2/changelog"));
        assert!(!rule.is_valid("a/../b"));
        assert!(!rule.is_valid("./a"));
        assert!(!rule.is_valid(".."));
        assert!(!rule.is_valid("/etc/passwd"));
        assert!(!rule.is_valid("C:evil"));
    }

    #[test]
    fn test_empty_path_rejected_by_both() {
        assert!(!PathRule::Legacy.is_valid(""));
        assert!(!PathRule::Legacy.is_valid("   "));
        assert!(!PathRule::Strict.is_valid(""));
    }
}
