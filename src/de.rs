//! Decoding of stored strings back into values.

use serde_json::Value as Json;

use crate::SEPARATOR;
use crate::config::{Config, Mode};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::number;
use crate::types::TypeName;
use crate::value::{Value, ValueMap, ValueSet};

/// The result of decoding one stored string.
///
/// A stored string holding the separator is read as several values, one per
/// appended piece.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Single(Value),
    Multi(Vec<Value>),
}

impl Decoded {
    /// Collapses multiple values into an array.
    pub fn into_value(self) -> Value {
        match self {
            Decoded::Single(value) => value,
            Decoded::Multi(values) => Value::Array(values),
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Decoded::Single(value) => vec![value],
            Decoded::Multi(values) => values,
        }
    }
}

/// Revives stored strings into values.
///
/// Decoding a single string tries, in order:
///
/// 1. the empty string, returned unchanged;
/// 2. `"true"` and `"false"`, returned as booleans;
/// 3. anything `Number(string)` accepts, returned as a number, so a stored
///    `"123"` always comes back as `123`;
/// 4. JSON, where envelopes are revived into sets and maps;
/// 5. otherwise the string itself.
///
/// Decoding never fails in the lenient operations. The `try_*` operations
/// report malformed envelopes as errors; a string that is not JSON is still
/// returned as a string.
///
/// ```
/// use url_state_params::{Config, Value};
///
/// let decoder = Config::new().decoder();
/// assert_eq!(decoder.decode_str("true"), Value::Bool(true));
/// assert_eq!(decoder.decode_str("0x10"), Value::Number(16.0));
/// assert_eq!(decoder.decode_str("[1,\"a\"]"), Value::from(vec![Value::from(1), Value::from("a")]));
/// assert_eq!(decoder.decode_str("name"), Value::from("name"));
/// assert_eq!(
///     decoder.parse("name|123").into_value(),
///     Value::from(vec![Value::from("name"), Value::from(123)]),
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Decoder {
    config: Config,
}

impl Decoder {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Revives the payload of an envelope tagged `tag`.
    ///
    /// The payload may be the JSON value itself or a string holding it.
    /// Unknown tags and malformed payloads are decoded on a best-effort
    /// basis: a string payload is parsed as JSON if possible and returned
    /// unchanged otherwise.
    pub fn decode_value(&self, tag: &str, payload: &Json) -> Value {
        match self.revive_envelope(tag, payload, Mode::Lenient) {
            Ok(value) => value,
            Err(err) => {
                diagnostic!(
                    self.config,
                    tag,
                    error = %err,
                    "envelope not revived, decoding best-effort"
                );
                self.best_effort(payload)
            }
        }
    }

    /// Like [`Decoder::decode_value`], but fails on unknown tags and
    /// malformed payloads.
    pub fn try_decode_value(&self, tag: &str, payload: &Json) -> Result<Value> {
        self.revive_envelope(tag, payload, Mode::Strict)
    }

    /// Decodes a single stored string, without splitting on the separator.
    pub fn decode_str(&self, raw: &str) -> Value {
        self.decode_str_with(raw, Mode::Lenient)
            .unwrap_or_else(|_| Value::String(raw.to_owned()))
    }

    pub fn try_decode_str(&self, raw: &str) -> Result<Value> {
        self.decode_str_with(raw, Mode::Strict)
    }

    /// Decodes a stored string, reading it as several values when it holds
    /// the separator.
    ///
    /// A single string value containing `|` cannot be told apart from
    /// appended values and is split as well.
    pub fn parse(&self, raw: &str) -> Decoded {
        self.parse_with(raw, Mode::Lenient)
            .unwrap_or_else(|_| Decoded::Single(Value::String(raw.to_owned())))
    }

    pub fn try_parse(&self, raw: &str) -> Result<Decoded> {
        self.parse_with(raw, Mode::Strict)
    }

    /// Converts decoded JSON into a value, reviving envelopes at any depth.
    pub fn decode_json(&self, json: Json) -> Value {
        self.revive_json(json.clone(), Mode::Lenient)
            .unwrap_or_else(|_| Value::from(json))
    }

    fn parse_with(&self, raw: &str, mode: Mode) -> Result<Decoded> {
        let decoded = self.decode_str_with(raw, mode)?;
        match &decoded {
            // split the stored string, not the decoded one
            Value::String(s) if s.contains(SEPARATOR) => raw
                .split(SEPARATOR)
                .map(|piece| self.decode_str_with(piece, mode))
                .collect::<Result<_>>()
                .map(Decoded::Multi),
            _ => Ok(Decoded::Single(decoded)),
        }
    }

    fn decode_str_with(&self, raw: &str, mode: Mode) -> Result<Value> {
        match raw {
            "" => return Ok(Value::String(String::new())),
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }

        if let Some(n) = number::parse(raw) {
            return Ok(Value::Number(n));
        }

        match serde_json::from_str::<Json>(raw) {
            Ok(json) => self.revive_json(json, mode),
            Err(_) => Ok(Value::String(raw.to_owned())),
        }
    }

    fn revive_json(&self, json: Json, mode: Mode) -> Result<Value> {
        if let Some(envelope) = Envelope::detect(&json, self.config.strict_envelopes) {
            return match mode {
                Mode::Lenient => Ok(self.decode_value(&envelope.tag, &envelope.payload)),
                Mode::Strict => self.try_decode_value(&envelope.tag, &envelope.payload),
            };
        }

        Ok(match json {
            Json::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.revive_json(item, mode))
                    .collect::<Result<_>>()?,
            ),
            Json::Object(object) => Value::Object(
                object
                    .into_iter()
                    .map(|(key, item)| Ok((key, self.revive_json(item, mode)?)))
                    .collect::<Result<_>>()?,
            ),
            scalar => Value::from(scalar),
        })
    }

    fn revive_envelope(&self, tag: &str, payload: &Json, mode: Mode) -> Result<Value> {
        match TypeName::from_tag(tag) {
            Some(TypeName::Set) => {
                let Json::Array(items) = payload_json(payload)? else {
                    return Err(Error::invalid_payload(TypeName::Set, "an array"));
                };
                items
                    .into_iter()
                    .map(|item| self.revive_json(item, mode))
                    .collect::<Result<ValueSet>>()
                    .map(Value::Set)
            }
            Some(TypeName::Map) => {
                let Json::Object(entries) = payload_json(payload)? else {
                    return Err(Error::invalid_payload(TypeName::Map, "an object"));
                };
                let mut map = ValueMap::new();
                for (key, item) in entries {
                    let key = self.parse_with(&key, mode)?.into_value();
                    let item = match item {
                        Json::String(raw) => self.parse_with(&raw, mode)?.into_value(),
                        other => self.revive_json(other, mode)?,
                    };
                    map.insert(key, item);
                }
                Ok(Value::Map(map))
            }
            _ => Err(Error::UnknownTag(tag.to_owned())),
        }
    }

    fn best_effort(&self, payload: &Json) -> Value {
        match payload {
            Json::String(raw) => match serde_json::from_str::<Json>(raw) {
                Ok(json) => self.decode_json(json),
                Err(_) => Value::String(raw.clone()),
            },
            other => self.decode_json(other.clone()),
        }
    }
}

/// Envelope payloads may arrive still encoded as a JSON string.
fn payload_json(payload: &Json) -> Result<Json> {
    match payload {
        Json::String(raw) => Ok(serde_json::from_str(raw)?),
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn decoder() -> Decoder {
        Config::new().diagnostics(false).decoder()
    }

    #[test]
    fn empty_string_is_kept() {
        assert_eq!(decoder().decode_str(""), Value::from(""));
        assert_eq!(decoder().parse("").into_value(), Value::from(""));
    }

    #[test]
    fn numbers_win_over_strings() {
        assert_eq!(decoder().decode_str("0"), Value::from(0));
        assert_eq!(decoder().decode_str("123"), Value::from(123));
        assert_eq!(decoder().decode_str("-1.5e2"), Value::from(-150));
        assert_eq!(decoder().decode_str("Infinity"), Value::from(f64::INFINITY));
    }

    #[test]
    fn json_scalars_are_returned_as_parsed() {
        assert_eq!(decoder().decode_str("null"), Value::Null);
        assert_eq!(decoder().decode_str(r#""quoted""#), Value::from("quoted"));
    }

    #[test]
    fn malformed_json_is_returned_raw() {
        assert_eq!(decoder().decode_str("{oops"), Value::from("{oops"));
        assert_eq!(decoder().try_decode_str("[1,").unwrap(), Value::from("[1,"));
    }

    #[test]
    fn decode_value_with_string_payloads() {
        let decoder = decoder();
        assert_eq!(decoder.decode_value("String", &json!("test")), Value::from("test"));
        assert_eq!(
            decoder.decode_value("Array", &json!("[123]")),
            Value::from(vec![123])
        );
        assert_eq!(
            decoder.decode_value("Set", &json!("[123]")),
            Value::Set(ValueSet::from_iter([123]))
        );
    }

    #[test]
    fn decode_value_strict_errors() {
        let decoder = decoder();
        assert!(matches!(
            decoder.try_decode_value("RegExp", &json!("x")),
            Err(Error::UnknownTag(tag)) if tag == "RegExp"
        ));
        assert!(matches!(
            decoder.try_decode_value("Set", &json!({})),
            Err(Error::InvalidPayload { tag: TypeName::Set, .. })
        ));
        assert!(matches!(
            decoder.try_decode_value("Map", &json!([])),
            Err(Error::InvalidPayload { tag: TypeName::Map, .. })
        ));
        assert!(matches!(
            decoder.try_decode_value("Set", &json!("[1")),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn malformed_envelopes_fall_back() {
        let decoder = decoder();
        assert_eq!(
            decoder.decode_str(r#"{"$t":"Set","$v":{"a":1}}"#),
            Value::Object([("a".to_owned(), Value::from(1))].into_iter().collect())
        );
        assert_eq!(
            decoder.decode_str(r#"{"$t":"Unknown","$v":"plain"}"#),
            Value::from("plain")
        );
        assert!(decoder.try_decode_str(r#"{"$t":"Unknown","$v":"plain"}"#).is_err());
    }

    #[test]
    fn map_entries_are_revived() {
        let raw = r#"{"$t":"Map","$v":{"name":"Jane","123":"456","true":"false","list":"[1,2]"}}"#;
        let mut expected = ValueMap::new();
        expected.insert("name", "Jane");
        expected.insert(123, 456);
        expected.insert(true, false);
        expected.insert("list", vec![1, 2]);
        assert_eq!(decoder().decode_str(raw), Value::Map(expected));
    }

    #[test]
    fn split_only_when_decoded_as_string() {
        let decoder = decoder();
        assert_eq!(
            decoder.parse("a|2|true|"),
            Decoded::Multi(vec![
                Value::from("a"),
                Value::from(2),
                Value::from(true),
                Value::from(""),
            ])
        );
        // JSON holding the separator stays whole
        assert_eq!(
            decoder.parse(r#"{"a":"x|y"}"#),
            Decoded::Single(Value::Object(
                [("a".to_owned(), Value::from("x|y"))].into_iter().collect()
            ))
        );
    }

    #[test]
    fn nested_envelopes_are_revived() {
        let raw = r#"[{"$t":"Set","$v":[1]},{"inner":{"$t":"Map","$v":{"k":"v"}}}]"#;
        let value = decoder().decode_str(raw);
        let items = value.as_array().unwrap();
        assert_eq!(items[0], Value::Set(ValueSet::from_iter([1])));
        let inner = items[1].as_object().unwrap().get("inner").unwrap();
        assert_eq!(
            inner,
            &Value::Map(ValueMap::from_iter([("k", "v")]))
        );
    }
}
