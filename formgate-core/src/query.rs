// Raw query string parsing

use std::borrow::Cow;
use std::fmt;

/// Query component of a request URI, decoded into a multi-map.
///
/// Keys keep their first-seen order and every value supplied for a key is
/// retained in arrival order. Keys are unique: a repeated key appends to
/// the existing entry.
///
/// ```rust
/// use formgate_core::QueryString;
///
/// let query = QueryString::parse("tag=a&tag=b&name=john%20doe");
/// assert_eq!(query.get("tag"), Some("a"));
/// assert_eq!(query.get_all("tag"), ["a", "b"]);
/// assert_eq!(query.get("name"), Some("john doe"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    raw: String,
    params: Vec<(String, Vec<String>)>,
}

impl QueryString {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from query string (e.g., "a=1&b=2"), with or without a leading `?`.
    pub fn parse(query: &str) -> Self {
        let raw = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self {
            raw: raw.to_string(),
            params: Vec::new(),
        };

        for part in raw.split('&') {
            if part.is_empty() {
                continue;
            }

            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let key = decode(key);
            if key.is_empty() {
                continue;
            }
            parsed.push(key.into_owned(), decode(value).into_owned());
        }

        parsed
    }

    fn push(&mut self, key: String, value: String) {
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.params.push((key, vec![value])),
        }
    }

    /// The query string as it arrived, without the leading `?`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First value supplied for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Every value supplied for `key`, in arrival order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Check if key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    /// Iterate over keys with all their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Iterate over keys with their first value only.
    pub fn first_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .filter_map(|(k, values)| values.first().map(|v| (k.as_str(), v.as_str())))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

// Form encoding: '+' is a space, then percent escapes. Invalid UTF-8 after
// decoding keeps the raw text.
fn decode(s: &str) -> Cow<'_, str> {
    if !s.contains('+') {
        return urlencoding::decode(s).unwrap_or(Cow::Borrowed(s));
    }

    let spaced = s.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(Cow::into_owned).ok();
    Cow::Owned(decoded.unwrap_or(spaced))
}

impl fmt::Debug for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.params.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl From<&str> for QueryString {
    fn from(query: &str) -> Self {
        Self::parse(query)
    }
}
