use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
    #[error("Invalid TOTP secret: {0}")]
    InvalidSecret(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("API request failed: {0}")]
    ApiRequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidApiResponse(String),
}

impl From<reqwest::Error> for BrokerError {
    fn from(e: reqwest::Error) -> Self {
        BrokerError::ApiRequestFailed(e.to_string())
    }
}

impl From<serde_json::Error> for BrokerError {
    fn from(e: serde_json::Error) -> Self {
        BrokerError::InvalidApiResponse(e.to_string())
    }
}

impl From<BrokerError> for stockdesk_core::Error {
    fn from(e: BrokerError) -> Self {
        stockdesk_core::Error::Broker(e.to_string())
    }
}
