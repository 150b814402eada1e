//! The typed facade over the stored query pairs.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde_json::Value as Json;

use crate::SEPARATOR;
use crate::config::Config;
use crate::de::{Decoded, Decoder};
use crate::envelope::Envelope;
use crate::error::Result;
use crate::params::{MultiMap, SearchParams};
use crate::ser::Encoder;
use crate::value::Value;

/// Query parameters that keep the type of the values stored in them.
///
/// Values are encoded when they are stored and decoded again every time
/// they are read, so all reads reflect the current pairs.
///
/// ```
/// use url_state_params::{UrlStateParams, Value, ValueSet};
///
/// let mut state = UrlStateParams::new();
/// state.set("page", 2);
/// state.set("tags", ValueSet::from_iter(["rust", "url"]));
/// state.append("sort", "name");
/// state.append("sort", true);
///
/// assert_eq!(state.get("page"), Some(Value::from(2)));
/// assert_eq!(state.get("tags"), Some(ValueSet::from_iter(["rust", "url"]).into()));
/// assert_eq!(state.get_all("sort"), vec![Value::from("name"), Value::from(true)]);
/// assert_eq!(
///     state.to_readable_string(),
///     r#"page=2&tags={"$t":"Set","$v":["rust","url"]}&sort=name|true"#
/// );
///
/// // and back from the wire
/// let restored = UrlStateParams::parse(&state.to_string());
/// assert_eq!(restored.get("tags"), state.get("tags"));
/// ```
#[derive(Clone, Debug)]
pub struct UrlStateParams<M = SearchParams> {
    params: M,
    config: Config,
}

impl UrlStateParams<SearchParams> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::from_params(SearchParams::new(), config)
    }

    /// Reads the pairs of a query string, e.g. the output of `to_string`.
    pub fn parse(query: &str) -> Self {
        Self::parse_with_config(query, Config::default())
    }

    pub fn parse_with_config(query: &str, config: Config) -> Self {
        Self::from_params(SearchParams::parse(query), config)
    }
}

impl Default for UrlStateParams<SearchParams> {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for UrlStateParams<SearchParams> {
    type Err = Infallible;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(query))
    }
}

impl<M: MultiMap> UrlStateParams<M> {
    /// Wraps an existing multi-map. Its values are expected to be in the
    /// stored form already.
    pub fn from_params(params: M, config: Config) -> Self {
        Self { params, config }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    fn encoder(&self) -> Encoder {
        self.config.encoder()
    }

    fn decoder(&self) -> Decoder {
        self.config.decoder()
    }

    /// Stores `value` under `key`, replacing whatever was there.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let encoded = self.encoder().safe_value(&value.into());
        self.params.set(key, encoded);
    }

    /// Like [`UrlStateParams::set`], but fails for values without an encoder.
    pub fn try_set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let encoded = self.encoder().try_safe_value(&value.into())?;
        self.params.set(key, encoded);
        Ok(())
    }

    /// Adds `value` under `key`. If the key already holds a value the two are
    /// joined with `|` into one stored string, which reads back as an array.
    pub fn append(&mut self, key: &str, value: impl Into<Value>) {
        let encoded = self.encoder().safe_value(&value.into());
        self.append_encoded(key, encoded);
    }

    pub fn try_append(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let encoded = self.encoder().try_safe_value(&value.into())?;
        self.append_encoded(key, encoded);
        Ok(())
    }

    fn append_encoded(&mut self, key: &str, encoded: String) {
        let joined = self
            .params
            .get(key)
            .map(|existing| format!("{existing}{SEPARATOR}{encoded}"));
        match joined {
            Some(joined) => self.params.set(key, joined),
            None => self.params.append(key, encoded),
        }
    }

    /// Reads the value under `key`, or `None` if there is none.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.params
            .get(key)
            .map(|raw| self.decoder().parse(raw).into_value())
    }

    /// Like [`UrlStateParams::get`], but fails on malformed envelopes.
    pub fn try_get(&self, key: &str) -> Result<Option<Value>> {
        self.params
            .get(key)
            .map(|raw| self.decoder().try_parse(raw).map(Decoded::into_value))
            .transpose()
    }

    /// Reads every value under `key`: each stored string is split on the
    /// separator and the results are concatenated in order.
    pub fn get_all(&self, key: &str) -> Vec<Value> {
        let decoder = self.decoder();
        self.params
            .get_all(key)
            .into_iter()
            .flat_map(|raw| decoder.parse(raw).into_values())
            .collect()
    }

    pub fn try_get_all(&self, key: &str) -> Result<Vec<Value>> {
        let decoder = self.decoder();
        let mut values = Vec::new();
        for raw in self.params.get_all(key) {
            values.extend(decoder.try_parse(raw)?.into_values());
        }
        Ok(values)
    }

    pub fn delete(&mut self, key: &str) {
        self.params.delete(key);
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.has(key)
    }

    /// Whether `key` holds a stored string equal to the encoded `value`.
    pub fn has_value(&self, key: &str, value: impl Into<Value>) -> bool {
        self.params.has(key)
            && self
                .params
                .has_value(key, &self.encoder().safe_value(&value.into()))
    }

    /// Sorts the pairs by key, keeping the relative order of equal keys.
    pub fn sort(&mut self) {
        self.params.sort();
    }

    /// The number of stored pairs.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Calls `callback` with every decoded value and its key, in order.
    pub fn for_each<F>(&self, mut callback: F)
    where
        F: FnMut(Value, &str, &Self),
    {
        for (key, value) in self.entries() {
            callback(value, key, self);
        }
    }

    pub fn entries(&self) -> Entries<'_, M> {
        Entries {
            pairs: self.params.pairs(),
            decoder: self.decoder(),
        }
    }

    pub fn keys(&self) -> Keys<'_, M> {
        Keys {
            pairs: self.params.pairs(),
        }
    }

    pub fn values(&self) -> Values<'_, M> {
        Values {
            entries: self.entries(),
        }
    }

    /// A form of the pairs meant for reading rather than for URLs: nothing
    /// is percent-encoded and envelopes are shown as JSON.
    ///
    /// The result is not guaranteed to parse back to the same values.
    pub fn to_readable_string(&self) -> String {
        let mut output = String::new();
        for (key, raw) in self.params.pairs() {
            if !output.is_empty() {
                output.push('&');
            }
            output.push_str(key);
            output.push('=');
            output.push_str(&self.readable_value(raw));
        }
        output
    }

    fn readable_value(&self, raw: &str) -> String {
        let Ok(json) = serde_json::from_str::<Json>(raw) else {
            return raw.to_owned();
        };
        if let Some(envelope) = Envelope::detect(&json, self.config.strict_envelopes) {
            return serde_json::to_string(&envelope).unwrap_or_else(|_| raw.to_owned());
        }
        match self.decoder().decode_json(json) {
            Value::String(s) => s,
            value @ (Value::Null | Value::Bool(_) | Value::Number(_)) => value.to_string(),
            value => self.encoder().safe_value(&value),
        }
    }
}

/// The percent-encoded query string, suitable for URLs.
impl<M: MultiMap> fmt::Display for UrlStateParams<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        diagnostic!(
            self.config,
            "query string output is percent-encoded and hard to read, use `to_readable_string` for a human readable form"
        );
        f.write_str(&self.params.to_query_string())
    }
}

impl<'a, M: MultiMap> IntoIterator for &'a UrlStateParams<M> {
    type Item = (&'a str, Value);
    type IntoIter = Entries<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

/// Iterator over keys and decoded values, created by
/// [`UrlStateParams::entries`].
pub struct Entries<'a, M: MultiMap + 'a> {
    pairs: M::Pairs<'a>,
    decoder: Decoder,
}

impl<'a, M: MultiMap + 'a> Iterator for Entries<'a, M> {
    type Item = (&'a str, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, raw) = self.pairs.next()?;
        Some((key, self.decoder.parse(raw).into_value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

pub struct Keys<'a, M: MultiMap + 'a> {
    pairs: M::Pairs<'a>,
}

impl<'a, M: MultiMap + 'a> Iterator for Keys<'a, M> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

pub struct Values<'a, M: MultiMap + 'a> {
    entries: Entries<'a, M>,
}

impl<'a, M: MultiMap + 'a> Iterator for Values<'a, M> {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}
