use thiserror::Error;

#[derive(Error, Debug)]
pub enum SextantError {
    #[error("account '{0}' already exists")]
    AlreadyExists(String),
    #[error("account '{0}' not found")]
    NotFound(String),
    #[error("authentication failed: wrong password or undecryptable key blob")]
    Authentication,
    #[error("no active session")]
    NotLoggedIn,
    #[error("account '{handle}' has no signing key for network '{network}'")]
    NoMatchingKey { handle: String, network: String },
    #[error("identity generation failed: {0}")]
    IdentityGeneration(String),
    #[error("cipher error: {0}")]
    Cipher(String),
    #[error("keeper error: {0}")]
    Keeper(String),
    #[error("client error: {0}")]
    Client(String),
    #[error("session teardown failed: {0}")]
    Teardown(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SextantError {
    fn from(err: serde_json::Error) -> Self {
        SextantError::Serialization(err.to_string())
    }
}
