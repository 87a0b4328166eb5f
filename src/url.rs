//! URL assembly: joining the base address with endpoint paths and
//! serializing query parameters with the provider's encoding rules.

use std::fmt;
use url::form_urlencoded;

/// Query parameter key whose list value is comma-joined instead of repeated.
pub const FIELDS_PARAM: &str = "_fields";
/// Boolean query parameter emitted as the literal `true` only when set.
pub const EMBED_PARAM: &str = "_embed";

/// A single query parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    String(String),
    Int(i64),
    UInt(u64),
    Bool(bool),
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::UInt(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::UInt(value as u64)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        ParamValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<u64>> for ParamValue {
    fn from(value: Vec<u64>) -> Self {
        ParamValue::List(value.into_iter().map(|v| v.to_string()).collect())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(value: Vec<i64>) -> Self {
        ParamValue::List(value.into_iter().map(|v| v.to_string()).collect())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::UInt(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// An insertion-ordered query parameter mapping.
///
/// Iteration and serialization follow the order keys were first inserted;
/// [`Params::set`] replaces an existing key's value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, keeping the key's original position if it
    /// already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Chainable form of [`Params::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Reads a numeric parameter, accepting any representation that parses.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            ParamValue::UInt(value) => Some(*value),
            ParamValue::Int(value) => u64::try_from(*value).ok(),
            ParamValue::String(value) => value.parse().ok(),
            _ => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the parameters into a url-encoded query string.
    ///
    /// Provider rules: the `_fields` list is comma-joined into a single
    /// pair, `_embed` emits `_embed=true` only when true, any other list
    /// repeats its key once per element in order, and empty lists emit
    /// nothing at all.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            match (key.as_str(), value) {
                (EMBED_PARAM, ParamValue::Bool(embed)) => {
                    if *embed {
                        serializer.append_pair(key, "true");
                    }
                }
                (FIELDS_PARAM, ParamValue::List(fields)) => {
                    if !fields.is_empty() {
                        serializer.append_pair(key, &fields.join(","));
                    }
                }
                (_, ParamValue::List(items)) => {
                    for item in items {
                        serializer.append_pair(key, item);
                    }
                }
                (_, other) => {
                    serializer.append_pair(key, &other.to_string());
                }
            }
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// Joins two path-like segments with exactly one `/` between them.
///
/// Strips one trailing slash from `left` and one leading slash from `right`;
/// slashes inside either segment (including the `://` scheme separator) are
/// left alone. An empty `right` returns `left` without its trailing slash,
/// and a bare `"/"` yields a single trailing slash.
pub fn join_path(left: &str, right: &str) -> String {
    let left = left.strip_suffix('/').unwrap_or(left);
    if right.is_empty() {
        return left.to_string();
    }
    let right = right.strip_prefix('/').unwrap_or(right);
    format!("{left}/{right}")
}

/// Appends a resource identifier to an endpoint base path.
///
/// Identifier joining goes through the same primitive as base/path joining,
/// so a trailing slash already present on `base_path` is collapsed rather
/// than doubled.
pub fn resource_path(base_path: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => join_path(base_path, id),
        None => base_path.to_string(),
    }
}

/// Builds the full request URL: joined base and path, plus the serialized
/// query when it is non-empty.
pub fn build_url(base: &str, path: &str, params: &Params) -> String {
    let joined = join_path(base, path);
    let query = params.to_query_string();
    if query.is_empty() {
        joined
    } else {
        format!("{joined}?{query}")
    }
}
