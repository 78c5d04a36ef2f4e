use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of signature: {0}")]
    UnexpectedEof(String),
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    #[error("unsupported {what} in signature: {signature}")]
    Unsupported {
        what: &'static str,
        signature: String,
    },
    #[error("invalid type reference `{text}`: {message}")]
    InvalidTypeRef { text: String, message: String },
    #[error("unknown class `{0}`")]
    UnknownClass(String),
    #[error("unknown type variable `{0}`")]
    UnknownTypeVariable(String),
    #[error("`{class}` declares {expected} type parameter(s) but {found} argument(s) were supplied")]
    ArityMismatch {
        class: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid {kind} signature for `{owner}`: {source}")]
    Member {
        kind: &'static str,
        owner: String,
        #[source]
        source: Box<Error>,
    },
    #[error("failed to parse type table: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read type table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn in_member(self, kind: &'static str, owner: impl Into<String>) -> Self {
        Error::Member {
            kind,
            owner: owner.into(),
            source: Box::new(self),
        }
    }
}
