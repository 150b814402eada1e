//! Type-preserving state in URL query strings.
//!
//! Query strings only carry strings. This crate stores richer values in
//! them (numbers, booleans, arrays, objects, sets and maps, nested in each
//! other) and reads them back with their type intact.
//!
//! ## Stored form
//!
//! Every value is encoded to a single string when it is stored:
//!
//! | Value | Stored as |
//! |---|---|
//! | string, number, boolean | the value itself: `name`, `123`, `true` |
//! | array, object | JSON: `[1,2]`, `{"a":1}` |
//! | set | tagged JSON: `{"$t":"Set","$v":[1,2]}` |
//! | map | tagged JSON with encoded entries: `{"$t":"Map","$v":{"1":"true"}}` |
//!
//! Values appended to an existing key are joined with `|` into one stored
//! string and read back as an array.
//!
//! Decoding is permissive. A stored string that looks like a number or a
//! boolean is read back as one (so the string `"123"` comes back as the
//! number `123`), and anything that is not valid JSON comes back as the
//! string itself.
//!
//! ## Usage
//!
//! ```
//! use url_state_params::{UrlStateParams, Value, ValueMap};
//!
//! let mut state = UrlStateParams::new();
//! state.set("text", "name");
//! state.set("number", 123);
//! state.set("object", Value::Object(Default::default()));
//! state.set("map", ValueMap::new());
//!
//! assert_eq!(
//!     state.to_string(),
//!     "text=name&number=123&object=%7B%7D&map=%7B%22%24t%22%3A%22Map%22%2C%22%24v%22%3A%7B%7D%7D"
//! );
//! assert_eq!(
//!     state.to_readable_string(),
//!     r#"text=name&number=123&object={}&map={"$t":"Map","$v":{}}"#
//! );
//! assert_eq!(state.get("number"), Some(Value::from(123)));
//! ```
//!
//! ## Limitations
//!
//! * A plain object with both `$t` and `$v` keys is read back as an
//!   envelope. [`Config::strict_envelopes`] narrows this to exact set and
//!   map records.
//! * The `|` separator is not escaped: a stored string containing it is
//!   read back as several values.

macro_rules! diagnostic {
    ($config:expr, $($arg:tt)+) => {
        if $config.diagnostics {
            tracing::warn!(target: "url_state_params", $($arg)+);
        }
    };
}

mod config;
mod de;
mod envelope;
mod error;
mod number;
mod params;
mod ser;
mod state;
mod types;
mod utils;
mod value;

#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use de::{Decoded, Decoder};
#[doc(inline)]
pub use envelope::Envelope;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use params::{MultiMap, Pairs, SearchParams};
#[doc(inline)]
pub use ser::Encoder;
#[doc(inline)]
pub use state::{Entries, Keys, UrlStateParams, Values};
#[doc(inline)]
pub use types::{TypeName, classify};
#[doc(inline)]
pub use value::{Object, Value, ValueMap, ValueSet};

/// Joins the values appended to one key inside a single stored string.
pub const SEPARATOR: char = '|';

/// Encodes a value to its stored string form with the default [`Config`].
///
/// ```
/// use url_state_params::{Value, ValueSet};
///
/// assert_eq!(url_state_params::to_string(&Value::from(true)), "true");
/// assert_eq!(
///     url_state_params::to_string(&ValueSet::new().into()),
///     r#"{"$t":"Set","$v":[]}"#
/// );
/// ```
pub fn to_string(value: &Value) -> String {
    Config::default().encode(value)
}

/// Decodes a stored string with the default [`Config`].
///
/// ```
/// use url_state_params::Value;
///
/// assert_eq!(url_state_params::from_str("false"), Value::Bool(false));
/// assert_eq!(url_state_params::from_str("[]"), Value::Array(vec![]));
/// ```
pub fn from_str(raw: &str) -> Value {
    Config::default().decode(raw)
}
