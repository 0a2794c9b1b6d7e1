//! Common utility functions shared across the codebase.

use std::ops::Range;

use time::OffsetDateTime;
use time::macros::format_description;
use unicode_script::{Script, UnicodeScript};

/// Detects characters of the script being extracted (Han by default).
///
/// Everything that decides "does this text need translating" goes through
/// this type, so switching the target script is a config change only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptDetector {
    script: Script,
}

impl Default for ScriptDetector {
    fn default() -> Self {
        Self {
            script: Script::Han,
        }
    }
}

impl ScriptDetector {
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    /// Build a detector from a full (`Han`) or short (`Hani`) script name.
    pub fn from_name(name: &str) -> Option<Self> {
        Script::from_full_name(name)
            .or_else(|| Script::from_short_name(name))
            .map(Self::new)
    }

    pub fn script(&self) -> Script {
        self.script
    }

    pub fn is_target(&self, c: char) -> bool {
        c.script() == self.script
    }

    /// Checks if the text contains at least one character of the target script.
    ///
    /// # Examples
    ///
    /// ```
    /// use hanzi_i18n::utils::ScriptDetector;
    ///
    /// let han = ScriptDetector::default();
    /// assert!(han.contains("你好"));
    /// assert!(han.contains("Hello 世界"));
    /// assert!(!han.contains("Hello"));
    /// assert!(!han.contains("，。"));
    /// ```
    pub fn contains(&self, text: &str) -> bool {
        text.chars().any(|c| self.is_target(c))
    }

    /// Byte ranges of every maximal run of target-script characters.
    pub fn runs(&self, text: &str) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;

        for (idx, c) in text.char_indices() {
            match (self.is_target(c), start) {
                (true, None) => start = Some(idx),
                (false, Some(s)) => {
                    runs.push(s..idx);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(s..text.len());
        }

        runs
    }
}

/// Checks if the text is a valid JavaScript identifier (ASCII subset).
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character, leaving the rest untouched.
pub fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 1-indexed line number of a byte offset.
pub fn line_of_offset(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|b| *b == b'\n')
        .count()
        + 1
}

/// `YYYY-MM-DD_HH-MM-SS`, used in generated file and directory names.
pub fn file_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    at.format(&format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Escape a value for use inside a single-quoted JavaScript string.
pub fn escape_single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_contains_target_script() {
        let han = ScriptDetector::default();
        assert!(han.contains("你好"));
        assert!(han.contains("abc中文"));
        assert!(!han.contains("abc"));
        assert!(!han.contains(""));
        assert!(!han.contains("123-456"));
    }

    #[test]
    fn test_script_from_name() {
        assert_eq!(
            ScriptDetector::from_name("Han").map(|d| d.script()),
            Some(Script::Han)
        );
        assert_eq!(
            ScriptDetector::from_name("Hani").map(|d| d.script()),
            Some(Script::Han)
        );
        assert!(ScriptDetector::from_name("NotAScript").is_none());
    }

    #[test]
    fn test_runs() {
        let han = ScriptDetector::default();
        let text = "a你好，世界b";
        let runs: Vec<&str> = han.runs(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(runs, vec!["你好", "世界"]);

        let text = "全部中文";
        assert_eq!(han.runs(text), vec![0..text.len()]);
        assert!(han.runs("none").is_empty());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("name"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("$index"));
        assert!(is_identifier("item2"));
        assert!(!is_identifier("2item"));
        assert!(!is_identifier("a.b"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("user"), "User");
        assert_eq!(capitalize("User"), "User");
        assert_eq!(capitalize(""), "");
        assert_eq!(decapitalize("UserList"), "userList");
    }

    #[test]
    fn test_line_of_offset() {
        let src = "a\nb\nc";
        assert_eq!(line_of_offset(src, 0), 1);
        assert_eq!(line_of_offset(src, 2), 2);
        assert_eq!(line_of_offset(src, 4), 3);
    }

    #[test]
    fn test_escape_single_quoted() {
        assert_eq!(escape_single_quoted("it's"), "it\\'s");
        assert_eq!(escape_single_quoted("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_file_timestamp() {
        let at = time::macros::datetime!(2024-03-05 07:08:09 UTC);
        assert_eq!(file_timestamp(at), "2024-03-05_07-08-09");
    }
}
