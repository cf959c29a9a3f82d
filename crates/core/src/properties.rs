//! Java `.properties` file reading
//!
//! Flutter writes toolchain values (`flutter.sdk`, `flutter.versionCode`,
//! `flutter.versionName`, ...) into `android/local.properties`. This module
//! reads that format: `#`/`!` comments, `=`/`:`/whitespace separators,
//! backslash line continuations and the usual escapes.

use crate::error::{Error, ErrorCode, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed key/value pairs, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parse properties from text
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = String::from(trimmed);
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let key = unescape(key).map_err(|msg| {
                Error::new(ErrorCode::ConfigParseError, msg)
                    .with_context(format!("properties line {}", index + 1))
            })?;
            let value = unescape(value).map_err(|msg| {
                Error::new(ErrorCode::ConfigParseError, msg)
                    .with_context(format!("properties line {}", index + 1))
            })?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// Read and parse a properties file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| e.with_context(path.display().to_string()))
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries were read
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An odd number of trailing backslashes continues the line
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (line[..i].trim_end(), line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .ok_or_else(|| format!("Malformed \\u escape: \\u{}", hex))?;
                let ch = char::from_u32(code)
                    .ok_or_else(|| format!("Invalid unicode escape: \\u{}", hex))?;
                out.push(ch);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_flutter_local_properties() {
        let props = Properties::parse(
            "sdk.dir=/Users/dev/Library/Android/sdk\n\
             flutter.sdk=/opt/flutter\n\
             flutter.buildMode=release\n\
             flutter.versionName=1.0.0\n\
             flutter.versionCode=1\n",
        )
        .unwrap();

        assert_eq!(props.len(), 5);
        assert_eq!(props.get("flutter.versionCode"), Some("1"));
        assert_eq!(props.get("flutter.versionName"), Some("1.0.0"));
        assert_eq!(props.get("missing"), None);
    }

    #[test]
    fn test_comments_and_separators() {
        let props = Properties::parse(
            "# comment\n! also a comment\n\na:1\nb 2\nc = 3\nd\n",
        )
        .unwrap();

        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.get("d"), Some(""));
    }

    #[test]
    fn test_windows_path_escapes() {
        let props = Properties::parse(r"sdk.dir=C\:\\Users\\dev\\sdk").unwrap();
        assert_eq!(props.get("sdk.dir"), Some(r"C:\Users\dev\sdk"));
    }

    #[test]
    fn test_line_continuation() {
        let props = Properties::parse("list=a,\\\n    b,\\\n    c\nnext=1").unwrap();
        assert_eq!(props.get("list"), Some("a,b,c"));
        assert_eq!(props.get("next"), Some("1"));
    }

    #[test]
    fn test_escaped_separator_in_key() {
        let props = Properties::parse(r"a\=b=c").unwrap();
        assert_eq!(props.get("a=b"), Some("c"));
    }

    #[test]
    fn test_unicode_escape() {
        let props = Properties::parse(r"name=caf\u00e9").unwrap();
        assert_eq!(props.get("name"), Some("café"));

        assert!(Properties::parse(r"name=\u00zz").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "flutter.versionCode=42").unwrap();

        let props = Properties::load(file.path()).unwrap();
        assert_eq!(props.get("flutter.versionCode"), Some("42"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Properties::load(Path::new("/nonexistent/local.properties")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }
}
