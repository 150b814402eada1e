//! The ordered multi-map that holds the stored strings.

use std::fmt;

use crate::utils::{decode, encode_into};

/// An insertion-ordered multi-map of string keys to string values, with the
/// semantics of the WHATWG `URLSearchParams` interface.
///
/// [`UrlStateParams`](crate::UrlStateParams) only ever stores already
/// encoded strings here, and owns its instance exclusively.
pub trait MultiMap {
    type Pairs<'a>: Iterator<Item = (&'a str, &'a str)>
    where
        Self: 'a;

    /// The first value stored under `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// All values stored under `key`, in insertion order.
    fn get_all(&self, key: &str) -> Vec<&str>;

    /// Replaces every value under `key` with a single `value`.
    fn set(&mut self, key: &str, value: String);

    /// Adds a new pair at the end, keeping existing values.
    fn append(&mut self, key: &str, value: String);

    /// Removes every value under `key`.
    fn delete(&mut self, key: &str);

    /// Stably sorts the pairs by key.
    fn sort(&mut self);

    /// All pairs, in their current order.
    fn pairs(&self) -> Self::Pairs<'_>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn has_value(&self, key: &str, value: &str) -> bool {
        self.get_all(key).contains(&value)
    }

    fn len(&self) -> usize {
        self.pairs().count()
    }

    fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }

    /// Serializes the pairs as `key=value&...`, form-encoding keys and values.
    fn to_query_string(&self) -> String {
        let mut output = String::new();
        for (idx, (key, value)) in self.pairs().enumerate() {
            if idx > 0 {
                output.push('&');
            }
            encode_into(&mut output, key);
            output.push('=');
            encode_into(&mut output, value);
        }
        output
    }
}

/// The default [`MultiMap`], backed by a vector of pairs.
///
/// ```
/// use url_state_params::{MultiMap, SearchParams};
///
/// let mut params = SearchParams::parse("?b=1&a=x+y&b=2");
/// assert_eq!(params.get_all("b"), vec!["1", "2"]);
/// assert_eq!(params.get("a"), Some("x y"));
///
/// params.set("b", "3".to_owned());
/// params.sort();
/// assert_eq!(params.to_query_string(), "a=x+y&b=3");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a query string. A leading `?` is ignored, as are empty
    /// segments; a segment without `=` is a key with an empty value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode(key).into_owned(), decode(value).into_owned())
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SearchParams {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Iterator over the pairs of a [`SearchParams`].
#[derive(Clone, Debug)]
pub struct Pairs<'a>(std::slice::Iter<'a, (String, String)>);

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl MultiMap for SearchParams {
    type Pairs<'a> = Pairs<'a>;

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    fn set(&mut self, key: &str, value: String) {
        // the first pair keeps its position, later ones are dropped
        let mut value = Some(value);
        self.pairs.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            match value.take() {
                Some(new_value) => {
                    *v = new_value;
                    true
                }
                None => false,
            }
        });
        if let Some(value) = value {
            self.pairs.push((key.to_owned(), value));
        }
    }

    fn append(&mut self, key: &str, value: String) {
        self.pairs.push((key.to_owned(), value));
    }

    fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    fn sort(&mut self) {
        // keys are compared by UTF-16 code units, as browsers do
        self.pairs
            .sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));
    }

    fn pairs(&self) -> Self::Pairs<'_> {
        Pairs(self.pairs.iter())
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }

    fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
