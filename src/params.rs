use std::collections::{BTreeMap, HashMap};

/// A collection of query parameters for a list request.
///
/// Parameters are kept sorted by name, so the URL built from them is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    inner: BTreeMap<String, String>,
}

impl Parameters {
    /// Creates a new empty collection of parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter to the collection
    pub fn param<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// Adds multiple parameters to the collection
    pub fn extend<I, K, V>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in iter {
            self.inner.insert(k.into(), v.into());
        }
        self
    }

    /// Returns the value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    /// Returns whether a parameter with the given name is present
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the parameters, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the inner map of parameters
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.inner
    }

    /// Returns a reference to the inner map of parameters
    pub fn as_inner(&self) -> &BTreeMap<String, String> {
        &self.inner
    }
}

impl From<HashMap<&str, &str>> for Parameters {
    fn from(value: HashMap<&str, &str>) -> Self {
        value.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for Parameters {
    fn from(value: HashMap<String, String>) -> Self {
        value.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Implement From for arrays to support the collection! macro
impl<const N: usize> From<[(&str, &str); N]> for Parameters {
    fn from(arr: [(&str, &str); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<const N: usize> From<[(String, String); N]> for Parameters {
    fn from(arr: [(String, String); N]) -> Self {
        Self {
            inner: arr.into_iter().collect(),
        }
    }
}
