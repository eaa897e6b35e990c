//! Path parameters captured by a route match.
//!
//! [`Params`] keeps `(name, value)` pairs in the order the variables appear in
//! the matched pattern, so values can be read by name or by position.
//!
//! # Example
//!
//! ```
//! use pathmux::Params;
//!
//! // Route pattern: /users/:user/posts/:post
//! // Matched path:  /users/42/posts/hello
//! let mut params = Params::new();
//! params.push("user", "42");
//! params.push("post", "hello");
//!
//! assert_eq!(params.get("user"), Some("42"));
//! assert_eq!(params.get_as::<u32>("user"), Some(42));
//! assert_eq!(params.keys().collect::<Vec<_>>(), vec!["user", "post"]);
//! ```

use std::str::FromStr;

/// Ordered route parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty parameters with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    /// Get the value of the first parameter called `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Get the pair at `index`, counting from the leftmost variable.
    pub fn get_index(&self, index: usize) -> Option<(&str, &str)> {
        self.pairs
            .get(index)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterate over all `(key, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over the keys in pattern order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over the values in pattern order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, v)| v.as_str())
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
