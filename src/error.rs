#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RandomError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("{0}")]
    ParseError(#[from] crate::parse::ParseError),
}

impl RandomError {
    pub fn invalid_configuration(msg: impl ToString) -> Self {
        Self::InvalidConfiguration(msg.to_string())
    }
}
