//! Ordered query parameters.
//!
//! Keys keep insertion order; the signature covers the exact encoded string,
//! so the order parameters are pushed in is the order they go on the wire.

use serde::Serialize;

/// Ordered `key=value` pairs for a query string.
///
/// A key may repeat; that is how array-valued parameters are encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    /// Append one pair per value under the same key.
    pub fn push_all<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let params = QueryParams::new()
            .with("symbol", "BTCUSDT")
            .with("side", "BUY")
            .with("quantity", "0.5");
        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, vec!["symbol", "side", "quantity"]);
    }

    #[test]
    fn test_push_all_repeats_key() {
        let mut params = QueryParams::new();
        params.push_all("orderIdList", [1, 2]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("orderIdList"), Some("1"));
    }
}
