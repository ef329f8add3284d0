//! Glob to regex translation.

use std::fmt;

use regex::Regex;

use crate::error::{GlobError, Result};

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    pattern: String,
    separator: char,
    regex: Regex,
}

impl GlobMatcher {
    /// Compile `pattern` for names whose segments are joined by `separator`.
    pub fn compile(pattern: &str, separator: char) -> Result<Self> {
        let source = glob_to_regex(pattern, separator);
        let regex = Regex::new(&source).map_err(|source| GlobError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            separator,
            regex,
        })
    }

    /// Whether the whole of `name` matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for GlobMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn escaped(ch: char) -> String {
    regex::escape(ch.encode_utf8(&mut [0u8; 4]))
}

/// Translate a glob into an anchored regex source string.
///
/// | glob      | meaning                                         |
/// |-----------|-------------------------------------------------|
/// | `*`       | any run of characters except the separator      |
/// | `**`      | any run of characters                           |
/// | `?`       | one character other than the separator          |
/// | `[abc]`   | one of the listed characters (never the separator) |
/// | `[!abc]`, `[^abc]` | none of the listed characters, nor the separator |
/// | `{a,b}`   | alternation                                     |
/// | `\x`      | literal `x`                                     |
///
/// Classes are emitted as an intersection with "not the separator". The
/// inner set is bracketed on its own so a negation applies to the listed
/// characters only, not to the intersection.
pub fn glob_to_regex(pattern: &str, separator: char) -> String {
    let not_sep = format!("[^{}]", escaped(separator));
    let chars: Vec<char> = pattern.chars().collect();

    let mut out = String::from("^(?:");
    let mut in_group = 0usize;
    let mut in_class = false;
    let mut class_start = usize::MAX;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' => {
                i += 1;
                match chars.get(i) {
                    // trailing backslash stays literal
                    None => out.push_str(r"\\"),
                    Some(&next) => out.push_str(&escaped(next)),
                }
            }
            '*' if !in_class => {
                if chars.get(i + 1) == Some(&'*') {
                    out.push_str(".*");
                    i += 1;
                } else {
                    out.push_str(&not_sep);
                    out.push('*');
                }
            }
            '?' if !in_class => out.push_str(&not_sep),
            '[' if !in_class => {
                in_class = true;
                class_start = i + 1;
                out.push_str("[[");
            }
            ']' if in_class => {
                in_class = false;
                out.push_str("]&&");
                out.push_str(&not_sep);
                out.push(']');
            }
            '!' | '^' if in_class && i == class_start => out.push('^'),
            '-' if in_class => out.push('-'),
            '{' if !in_class => {
                in_group += 1;
                out.push_str("(?:");
            }
            '}' if !in_class && in_group > 0 => {
                in_group -= 1;
                out.push(')');
            }
            ',' if !in_class && in_group > 0 => out.push('|'),
            _ => out.push_str(&escaped(ch)),
        }
        i += 1;
    }

    // Unclosed classes and groups are left open so compilation reports them.
    out.push_str(")$");
    out
}
