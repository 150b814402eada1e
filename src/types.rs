//! Canonical type names and the classifier that derives them from a [`Value`].

use std::fmt;

use crate::value::Value;

/// The canonical name of a runtime value's type.
///
/// The same names are used as the `$t` tag of an envelope, so the
/// `Display` form of a variant is part of the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
    Set,
    Map,
    Date,
}

impl TypeName {
    /// Returns the tag used on the wire for this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeName::String => "String",
            TypeName::Number => "Number",
            TypeName::Boolean => "Boolean",
            TypeName::Null => "Null",
            TypeName::Array => "Array",
            TypeName::Object => "Object",
            TypeName::Set => "Set",
            TypeName::Map => "Map",
            TypeName::Date => "Date",
        }
    }

    /// Parses an envelope tag back into a type name.
    ///
    /// Returns `None` for tags this crate does not know about.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "String" => TypeName::String,
            "Number" => TypeName::Number,
            "Boolean" => TypeName::Boolean,
            "Null" => TypeName::Null,
            "Array" => TypeName::Array,
            "Object" => TypeName::Object,
            "Set" => TypeName::Set,
            "Map" => TypeName::Map,
            "Date" => TypeName::Date,
            _ => return None,
        })
    }

    /// Primitive types are written as their plain string coercion.
    pub const fn is_primitive(self) -> bool {
        matches!(self, TypeName::String | TypeName::Number | TypeName::Boolean)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the canonical type name of `value`.
///
/// ```
/// use url_state_params::{classify, TypeName, Value, ValueSet};
///
/// assert_eq!(classify(&Value::from("a")), TypeName::String);
/// assert_eq!(classify(&Value::from(ValueSet::new())), TypeName::Set);
/// assert_eq!(classify(&Value::Null), TypeName::Null);
/// ```
pub fn classify(value: &Value) -> TypeName {
    match value {
        Value::Null => TypeName::Null,
        Value::Bool(_) => TypeName::Boolean,
        Value::Number(_) => TypeName::Number,
        Value::String(_) => TypeName::String,
        Value::Array(_) => TypeName::Array,
        Value::Object(_) => TypeName::Object,
        Value::Set(_) => TypeName::Set,
        Value::Map(_) => TypeName::Map,
        Value::Date(_) => TypeName::Date,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::{ValueMap, ValueSet};

    #[test]
    fn tags_roundtrip() {
        for name in [
            TypeName::String,
            TypeName::Number,
            TypeName::Boolean,
            TypeName::Null,
            TypeName::Array,
            TypeName::Object,
            TypeName::Set,
            TypeName::Map,
            TypeName::Date,
        ] {
            assert_eq!(TypeName::from_tag(&name.to_string()), Some(name));
        }
        assert_eq!(TypeName::from_tag("RegExp"), None);
        assert_eq!(TypeName::from_tag("set"), None);
    }

    #[test]
    fn classifier_agrees_with_predicates() {
        let values = [
            Value::from("text"),
            Value::from(1),
            Value::from(true),
            Value::Null,
            Value::Array(vec![]),
            Value::Object(Default::default()),
            Value::Set(ValueSet::new()),
            Value::Map(ValueMap::new()),
        ];
        for value in &values {
            let name = classify(value);
            assert_eq!(value.is_array(), name == TypeName::Array);
            assert_eq!(value.is_plain_object(), name == TypeName::Object);
            assert_eq!(value.is_set(), name == TypeName::Set);
            assert_eq!(value.is_map(), name == TypeName::Map);
            assert_eq!(value.is_primitive(), name.is_primitive());
        }
    }
}
