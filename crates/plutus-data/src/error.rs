use miette::Diagnostic;
use pallas_codec::minicbor;

/// The three families of failures callers are expected to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Decoded input does not have the structure its schema demands.
    Structure,
    /// Input has the wrong outer kind before any schema-driven decoding happens.
    Shape,
    /// A value handed to an encoder does not fit its declared type.
    TypeMismatch,
}

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum Error {
    #[error("Unknown constructor tag {tag}.")]
    #[diagnostic(help("Constructors are tagged with 121..=127, 1280..=1400 or 102."))]
    UnknownTag { tag: u64 },

    #[error("Malformed general constructor: expected a 2-element array, found {found}.")]
    MalformedGeneralConstr { found: String },

    #[error("Constructor mismatch: expected {expected}, found {found}.")]
    ConstructorMismatch { expected: u64, found: u64 },

    #[error("Constructor {constructor} expects {expected} field(s), found {found}.")]
    ArityMismatch {
        constructor: u64,
        expected: usize,
        found: usize,
    },

    #[error("Expected {expected}, found {found}.")]
    UnexpectedShape { expected: String, found: String },

    #[error(
        "No alternative among constructors {alternatives:?} matches{}.",
        .field.as_ref().map(|field| format!(" field '{field}'")).unwrap_or_default()
    )]
    NoMatchingAlternative {
        field: Option<String>,
        alternatives: Vec<u64>,
    },

    #[error("Missing key '{expected}' in {found}.")]
    #[diagnostic(help(
        "Every JSON value is an object keyed by 'int', 'bytes', 'list', 'map' or 'constructor'."
    ))]
    MissingKey { expected: &'static str, found: String },

    #[error("{0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("A {what} must have {expected} element(s), found {found}.")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Unknown {what} code {code}.")]
    UnknownCode { what: &'static str, code: u64 },

    #[error("Duplicate {what} code {code}.")]
    DuplicateCode { what: &'static str, code: u64 },

    #[error("Malformed CBOR: {0}")]
    Cbor(#[from] minicbor::decode::Error),

    #[error("{remaining} trailing byte(s) after the encoded value.")]
    TrailingBytes { remaining: usize },

    #[error("Expected a JSON object at the top level, found {found}.")]
    Shape { found: &'static str },

    /// Text that does not parse as JSON at all.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Type mismatch: expected {expected}, found {found}.")]
    TypeMismatch { expected: String, found: String },

    #[error("Failed to serialize: {0}")]
    Encoding(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Shape { .. } | Error::Json(..) => ErrorKind::Shape,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::UnknownTag { .. }
            | Error::MalformedGeneralConstr { .. }
            | Error::ConstructorMismatch { .. }
            | Error::ArityMismatch { .. }
            | Error::UnexpectedShape { .. }
            | Error::NoMatchingAlternative { .. }
            | Error::MissingKey { .. }
            | Error::InvalidHex(..)
            | Error::LengthMismatch { .. }
            | Error::UnknownCode { .. }
            | Error::DuplicateCode { .. }
            | Error::Cbor(..)
            | Error::TrailingBytes { .. }
            | Error::Encoding(..) => ErrorKind::Structure,
        }
    }

    pub(crate) fn unexpected(expected: impl ToString, found: impl ToString) -> Self {
        Error::UnexpectedShape {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Attach a field title to an unmatched alternative reported from below.
    pub(crate) fn in_field(self, title: Option<&str>) -> Self {
        match (self, title) {
            (
                Error::NoMatchingAlternative {
                    field: None,
                    alternatives,
                },
                Some(title),
            ) => Error::NoMatchingAlternative {
                field: Some(title.to_string()),
                alternatives,
            },
            (err, _) => err,
        }
    }
}
