//! Dynamic representation of the values that can be stored in the query.
//!
//! [`Value`] covers the JSON data model plus the three types JSON cannot
//! represent faithfully on its own: [`ValueSet`], [`ValueMap`] (whose keys
//! may be any value) and dates.
//!
//! ```
//! use url_state_params::{Value, ValueMap, ValueSet};
//!
//! let tags: ValueSet = ["a", "b", "a"].into_iter().collect();
//! assert_eq!(tags.len(), 2);
//!
//! let mut scores = ValueMap::new();
//! scores.insert(1, "one");
//! scores.insert(true, 0);
//! assert_eq!(scores.get(&Value::from(1)), Some(&Value::from("one")));
//! ```

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

use crate::number;
use crate::types::{TypeName, classify};

/// An insertion-ordered plain object.
pub type Object = IndexMap<String, Value>;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    Set(ValueSet),
    Map(ValueMap),
    Date(DateTime<Utc>),
}

impl Value {
    /// Returns the canonical type name of this value.
    pub fn type_name(&self) -> TypeName {
        classify(self)
    }

    /// Whether this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is a boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Whether this is a number, including `NaN` and the infinities.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Whether this is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Whether this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Whether this is a plain object, i.e. not a set, map or date.
    pub fn is_plain_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Whether this is a [`ValueSet`].
    pub fn is_set(&self) -> bool {
        matches!(self, Value::Set(_))
    }

    /// Whether this is a [`ValueMap`].
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Whether this is a date.
    pub fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    /// Strings, numbers and booleans are stored as their plain coercion
    /// rather than through a type-specific encoder.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::String(_) | Value::Number(_) | Value::Bool(_))
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The fields, if this is a plain object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The set, if this is one.
    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// The map, if this is one.
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// String coercion with the semantics of `'' + value` in JS.
///
/// ```
/// use url_state_params::Value;
///
/// assert_eq!(Value::from(123).to_string(), "123");
/// assert_eq!(Value::from(vec![Value::from(1), Value::Null, Value::from("a")]).to_string(), "1,,a");
/// assert_eq!(Value::Object(Default::default()).to_string(), "[object Object]");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&number::format(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    // null elements join as empty strings
                    if !item.is_null() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Set(_) => f.write_str("[object Set]"),
            Value::Map(_) => f.write_str("[object Map]"),
            Value::Date(date) => f.write_str(&date_to_string(date)),
        }
    }
}

pub(crate) fn date_to_string(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Member and key equality for sets and maps: structural, except that `NaN`
/// equals itself.
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

/// An insertion-ordered collection of distinct values.
///
/// Equality ignores order, so two sets holding the same members compare
/// equal regardless of how they were built.
#[derive(Clone, Debug, Default)]
pub struct ValueSet(Vec<Value>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value`, returning `false` if an equal member was already present.
    pub fn insert(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.iter().any(|member| same_value_zero(member, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<V: Into<Value>> FromIterator<V> for ValueSet {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// An insertion-ordered map whose keys can be any [`Value`].
#[derive(Clone, Debug, Default)]
pub struct ValueMap(Vec<(Value, Value)>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. An existing key keeps its position and has its
    /// value replaced; the previous value is returned.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| same_value_zero(k, &key)) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| same_value_zero(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| same_value_zero(o, v)))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for ValueMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

macro_rules! from_number {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_number! { i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64 }

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<ValueSet> for Value {
    fn from(set: ValueSet) -> Self {
        Value::Set(set)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

/// Plain structural conversion: envelope-shaped objects stay objects.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(object) => Value::Object(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_ignores_duplicates() {
        let mut set = ValueSet::new();
        assert!(set.insert(1));
        assert!(set.insert("1"));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn set_equality_ignores_order() {
        let a: ValueSet = [1, 2, 3].into_iter().collect();
        let b: ValueSet = [3, 1, 2].into_iter().collect();
        assert_eq!(a, b);
        let c: ValueSet = [1, 2].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn nan_members_are_equal() {
        let mut set = ValueSet::new();
        assert!(set.insert(f64::NAN));
        assert!(!set.insert(f64::NAN));
        assert!(set.insert(0.0));
        assert!(!set.insert(-0.0));
        assert_eq!(set.len(), 2);
        assert_eq!(set, set.clone());

        let mut map = ValueMap::new();
        map.insert(f64::NAN, "first");
        assert_eq!(map.insert(f64::NAN, f64::NAN), Some(Value::from("first")));
        assert_eq!(map.len(), 1);
        assert!(
            map.get(&Value::from(f64::NAN))
                .and_then(Value::as_f64)
                .is_some_and(f64::is_nan)
        );
        assert_eq!(map, map.clone());
    }

    #[test]
    fn map_replaces_in_place() {
        let mut map = ValueMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(Value::from(1)));
        let keys: Vec<_> = map.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
        assert_eq!(map.get(&Value::from("a")), Some(&Value::from(3)));
    }

    #[test]
    fn coercion() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::Set(ValueSet::new()).to_string(), "[object Set]");
        assert_eq!(Value::Map(ValueMap::new()).to_string(), "[object Map]");
        let date = DateTime::from_timestamp(0, 0).expect("valid timestamp");
        assert_eq!(Value::from(date).to_string(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn from_json_is_structural() {
        let json = serde_json::json!({"$t": "Set", "$v": [1]});
        assert!(Value::from(json).is_plain_object());
    }
}
