use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Key(#[from] pemrsa_pkcs::Error),

    #[error("failed to encode key: {0}")]
    Encode(#[from] pemrsa_pkcs::DecodeError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
