use crate::types::TypeName;

/// Error that can occur when encoding or decoding in strict mode.
///
/// The permissive operations (`encode_value`, `decode_str`, `get`, ...) never
/// return these: they log a diagnostic and fall back to the best available
/// value instead. The `try_*` variants surface them to the caller.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An envelope carried a `$t` tag that has no reviver.
    #[error("no reviver set up for type `{0}`")]
    UnknownTag(String),

    /// An envelope payload did not have the JSON shape its tag requires.
    #[error("invalid `{tag}` payload: expected {expected}")]
    InvalidPayload {
        tag: TypeName,
        expected: &'static str,
    },

    /// A value whose type has no encoder.
    #[error("no encoder set up for type `{0}`")]
    Unsupported(TypeName),

    /// A payload string could not be read as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_payload(tag: TypeName, expected: &'static str) -> Self {
        Error::InvalidPayload { tag, expected }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
