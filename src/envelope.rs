//! The tag envelope wrapping values that JSON alone would flatten.
//!
//! An envelope is the JSON record `{"$t":"<TypeName>","$v":<payload>}`.
//! Sets carry an array payload, maps an object payload whose keys and
//! values are both encoded strings.
//!
//! Note that detection is purely structural: in the default (lenient) mode
//! any object holding both `$t` and `$v` is taken to be an envelope, so user
//! data of that shape cannot be stored as a plain object. The strict mode
//! narrows detection to exact two-key records tagged `Set` or `Map`.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::types::TypeName;

pub const TAG_KEY: &str = "$t";
pub const PAYLOAD_KEY: &str = "$v";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    #[serde(rename = "$t")]
    pub tag: String,
    #[serde(rename = "$v")]
    pub payload: Json,
}

impl Envelope {
    pub fn new(tag: TypeName, payload: Json) -> Self {
        Envelope {
            tag: tag.to_string(),
            payload,
        }
    }

    /// The tag as a known type name, if it is one.
    pub fn type_name(&self) -> Option<TypeName> {
        TypeName::from_tag(&self.tag)
    }

    /// Checks whether a decoded JSON value is an envelope.
    pub fn detect(json: &Json, strict: bool) -> Option<Envelope> {
        if strict {
            let envelope = Envelope::deserialize(json).ok()?;
            return matches!(envelope.type_name(), Some(TypeName::Set | TypeName::Map))
                .then_some(envelope);
        }

        let object = json.as_object()?;
        let tag = match object.get(TAG_KEY)? {
            Json::String(tag) => tag.clone(),
            other => other.to_string(),
        };
        let payload = object.get(PAYLOAD_KEY)?.clone();
        Some(Envelope { tag, payload })
    }
}
