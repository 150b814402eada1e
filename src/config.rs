use crate::de::Decoder;
use crate::ser::Encoder;
use crate::value::Value;

/// Configuration for encoding and decoding behavior.
///
/// ## Diagnostics
///
/// Some inputs are accepted but probably not what the caller meant: a value
/// type without an encoder is stored as its string coercion, an envelope tag
/// without a reviver is decoded on a best-effort basis. When `diagnostics`
/// is enabled these cases emit a `tracing` warning under the
/// `url_state_params` target. Nothing is logged when it is disabled.
///
/// Default value: enabled in debug builds, disabled in release builds.
///
/// ## Strict envelopes
///
/// By default any JSON object holding both `$t` and `$v` keys is treated as a
/// tagged envelope, so a plain object of that shape does not survive a round
/// trip. With `strict_envelopes` enabled only objects with exactly those two
/// keys and a `Set` or `Map` tag are treated as envelopes.
///
/// Default value: `false`.
///
/// ```
/// use url_state_params::{Config, Value};
///
/// let user_data = r#"{"$t":"Set","$v":[],"note":"mine"}"#;
///
/// let lenient = Config::new();
/// assert!(lenient.decode(user_data).is_set());
///
/// let strict = Config::new().strict_envelopes(true);
/// assert!(strict.decode(user_data).is_plain_object());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) diagnostics: bool,
    pub(crate) strict_envelopes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates the default configuration: diagnostics in debug builds only,
    /// lenient envelope detection.
    pub const fn new() -> Self {
        Self {
            diagnostics: cfg!(debug_assertions),
            strict_envelopes: false,
        }
    }

    /// Enables or disables development warnings.
    pub const fn diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Restricts envelope detection to exact `Set`/`Map` records.
    pub const fn strict_envelopes(mut self, strict_envelopes: bool) -> Self {
        self.strict_envelopes = strict_envelopes;
        self
    }

    /// An [`Encoder`] using this configuration.
    pub const fn encoder(self) -> Encoder {
        Encoder::new(self)
    }

    /// A [`Decoder`] using this configuration.
    pub const fn decoder(self) -> Decoder {
        Decoder::new(self)
    }

    /// Encodes a value to its stored string form using this `Config`.
    pub fn encode(self, value: &Value) -> String {
        self.encoder().safe_value(value)
    }

    /// Decodes a stored string using this `Config`, splitting
    /// multi-valued strings into an array.
    pub fn decode(self, raw: &str) -> Value {
        self.decoder().parse(raw).into_value()
    }
}

/// Whether a failure is surfaced to the caller or absorbed into a fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Lenient,
    Strict,
}
