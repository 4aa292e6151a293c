//! Query-string parsing and the toggle algebra behind every facet link.
//!
//! A [`QueryString`] is an ordered list of key/value pairs. All link
//! generation goes through [`QueryString::modify`], which applies a single
//! parameter change and re-serializes — so every emitted URL is a complete,
//! valid representation of a query-state transition.
//!
//! # Toggle semantics
//!
//! - `String`: unconditionally set `param=value`.
//! - `Boolean`: presence toggle — if the param exists (any value) remove
//!   it entirely, else set it. The stored value is irrelevant once set.
//! - `Array`: the param is a comma-joined list; remove the value if
//!   present, else append it. Remaining order is preserved.
//!
//! After a change, every parameter whose value is the empty string is
//! stripped — except one literally named `models`, whose empty presence
//! means "an empty comparison group has been started".
//!
//! Boolean and array changes are true toggles: applying the same change
//! twice returns the original query string.

/// How [`QueryString::modify`] interprets a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Boolean,
    Array,
}

/// Parameter allowed to stay when its value is empty.
const EMPTY_EXEMPT: &str = "models";

/// Ordered query-string pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Parse a raw query string (leading `?` tolerated).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = raw
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((k, v)) => (decode(k), decode(v)),
                None => (decode(segment), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// First value for `param`, if present.
    pub fn get(&self, param: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == param)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `param` is present at all (even with an empty value).
    pub fn has(&self, param: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == param)
    }

    /// Set `param=value`, replacing the first occurrence in place or
    /// appending at the end.
    pub fn set(&mut self, param: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| k == param) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((param.to_string(), value)),
        }
    }

    /// Remove every occurrence of `param`.
    pub fn remove(&mut self, param: &str) {
        self.pairs.retain(|(k, _)| k != param);
    }

    /// Comma-separated values of `param`, empty entries dropped.
    pub fn get_array(&self, param: &str) -> Vec<&str> {
        self.get(param)
            .map(|v| v.split(',').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Apply a single parameter change, returning the new query string.
    ///
    /// Pure: `self` is untouched. Empty-valued params are stripped from the
    /// result, except `models`.
    pub fn modify(&self, param: &str, value: &str, kind: ParamKind) -> QueryString {
        let mut next = self.clone();
        match kind {
            ParamKind::String => next.set(param, value),
            ParamKind::Boolean => {
                if next.has(param) {
                    next.remove(param);
                } else {
                    next.set(param, value);
                }
            }
            ParamKind::Array => {
                let mut entries: Vec<String> = next
                    .get_array(param)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                if let Some(idx) = entries.iter().position(|e| e == value) {
                    entries.remove(idx);
                } else {
                    entries.push(value.to_string());
                }
                next.set(param, entries.join(","));
            }
        }
        next.strip_empty();
        next
    }

    /// Drop empty-valued params, keeping `models`.
    fn strip_empty(&mut self) {
        self.pairs
            .retain(|(k, v)| !v.is_empty() || k == EMPTY_EXEMPT);
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl std::fmt::Display for QueryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (k, v)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", encode(k), encode(v))?;
        }
        Ok(())
    }
}

/// Percent-decode, treating `+` as space.
fn decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = bytes.get(i + 1..i + 3);
                match hex.and_then(|h| u8::from_str_radix(std::str::from_utf8(h).ok()?, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode for query-string output.
///
/// `:`, `,`, `(`, `)`, `.` and `/` stay literal — they are load-bearing in
/// model identifiers and comma-joined lists, and URLs keep them readable.
fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'~'
            | b':'
            | b','
            | b'('
            | b')'
            | b'/' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
