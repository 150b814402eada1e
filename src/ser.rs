//! Encoding of values into their stored string form.

use serde_json::{Map as JsonMap, Number as JsonNumber, Value as Json};

use crate::config::{Config, Mode};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::types::TypeName;
use crate::value::{Value, date_to_string};

/// Turns values into the strings stored in the query.
///
/// * Strings, numbers and booleans are written as their string coercion.
/// * Arrays and plain objects are written as JSON.
/// * Sets and maps are wrapped in a tagged envelope and written as JSON.
///   Map entries are flattened to string keys and values by encoding each
///   side on its own.
/// * Anything else has no encoder. The lenient operations fall back to the
///   string coercion, the `try_*` operations return [`Error::Unsupported`].
///
/// ```
/// use url_state_params::{Config, Value, ValueMap, ValueSet};
///
/// let encoder = Config::new().encoder();
/// assert_eq!(encoder.safe_value(&Value::from(123)), "123");
/// assert_eq!(encoder.safe_value(&Value::from(vec![1, 2])), "[1,2]");
///
/// let set: ValueSet = ["a", "b"].into_iter().collect();
/// assert_eq!(encoder.safe_value(&set.into()), r#"{"$t":"Set","$v":["a","b"]}"#);
///
/// let map: ValueMap = [(Value::from(1), Value::from(true))].into_iter().collect();
/// assert_eq!(encoder.safe_value(&map.into()), r#"{"$t":"Map","$v":{"1":"true"}}"#);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    config: Config,
}

impl Encoder {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Encodes `value` as the type `type_name`.
    ///
    /// A type without an encoder, or a value that does not match the given
    /// type, is written as its string coercion.
    pub fn encode_value(&self, type_name: TypeName, value: &Value) -> String {
        match self.encode_with(type_name, value, Mode::Lenient) {
            Ok(encoded) => encoded,
            Err(err) => {
                diagnostic!(
                    self.config,
                    type_name = %type_name,
                    error = %err,
                    "no encoder for type, coercing to string"
                );
                value.to_string()
            }
        }
    }

    /// Like [`Encoder::encode_value`], but fails instead of coercing.
    pub fn try_encode_value(&self, type_name: TypeName, value: &Value) -> Result<String> {
        self.encode_with(type_name, value, Mode::Strict)
    }

    /// Encodes any value: primitives directly, everything else through
    /// [`Encoder::encode_value`] with the value's own type.
    pub fn safe_value(&self, value: &Value) -> String {
        if value.is_primitive() {
            return value.to_string();
        }
        self.encode_value(value.type_name(), value)
    }

    /// Like [`Encoder::safe_value`], but fails for types without an encoder.
    pub fn try_safe_value(&self, value: &Value) -> Result<String> {
        self.safe_value_with(value, Mode::Strict)
    }

    fn safe_value_with(&self, value: &Value, mode: Mode) -> Result<String> {
        if value.is_primitive() {
            return Ok(value.to_string());
        }
        match mode {
            Mode::Lenient => Ok(self.encode_value(value.type_name(), value)),
            Mode::Strict => self.try_encode_value(value.type_name(), value),
        }
    }

    fn encode_with(&self, type_name: TypeName, value: &Value, mode: Mode) -> Result<String> {
        let json = match (type_name, value) {
            (TypeName::Array | TypeName::Object, _)
            | (TypeName::Set, Value::Set(_))
            | (TypeName::Map, Value::Map(_)) => self.to_json(value, mode)?,
            _ => return Err(Error::Unsupported(type_name)),
        };
        Ok(json.to_string())
    }

    /// Builds the JSON form of a value. Nested sets and maps become
    /// envelopes and dates become ISO-8601 strings.
    fn to_json(&self, value: &Value, mode: Mode) -> Result<Json> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => json_number(*n),
            Value::String(s) => Json::String(s.clone()),
            Value::Date(date) => Json::String(date_to_string(date)),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.to_json(item, mode))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(object) => Json::Object(js_property_order(
                object
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), self.to_json(item, mode)?)))
                    .collect::<Result<_>>()?,
            )),
            Value::Set(set) => {
                let payload = set
                    .iter()
                    .map(|item| self.to_json(item, mode))
                    .collect::<Result<_>>()?;
                serde_json::to_value(Envelope::new(TypeName::Set, Json::Array(payload)))?
            }
            Value::Map(map) => {
                let mut payload = JsonMap::with_capacity(map.len());
                for (key, item) in map.iter() {
                    // a later key with the same string form overwrites the earlier value
                    payload.insert(
                        self.safe_value_with(key, mode)?,
                        Json::String(self.safe_value_with(item, mode)?),
                    );
                }
                let payload = js_property_order(payload.into_iter().collect());
                serde_json::to_value(Envelope::new(TypeName::Map, Json::Object(payload)))?
            }
        })
    }
}

/// Orders object keys the way JS enumerates them: array indices first in
/// ascending order, then the other keys in insertion order.
fn js_property_order(mut entries: Vec<(String, Json)>) -> JsonMap<String, Json> {
    entries.sort_by_key(|(key, _)| match array_index(key) {
        Some(index) => (0, index),
        None => (1, 0),
    });
    entries.into_iter().collect()
}

/// A canonical array index: decimal digits without a leading zero, below
/// `2^32 - 1`.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

/// Integral numbers that fit a 64-bit integer are written without a
/// fraction or exponent, non-finite numbers as `null`.
fn json_number(n: f64) -> Json {
    const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;
    const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

    if n.fract() == 0.0 && n.abs() < I64_LIMIT {
        Json::Number(JsonNumber::from(n as i64))
    } else if n.fract() == 0.0 && n > 0.0 && n < U64_LIMIT {
        Json::Number(JsonNumber::from(n as u64))
    } else {
        JsonNumber::from_f64(n).map_or(Json::Null, Json::Number)
    }
}
