use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;

use aws_sdk_lightsail::error::DisplayErrorContext;
use aws_sdk_lightsail::error::ProvideErrorMetadata;
use aws_sdk_lightsail::error::SdkError;
use thiserror::Error;

pub const NOT_FOUND_CODE: &str = "NotFoundException";

/// Error returned by the Lightsail service, reduced to its code and message.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    #[cfg(test)]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(NOT_FOUND_CODE, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some(NOT_FOUND_CODE)
    }
}

impl<E, R> From<SdkError<E, R>> for ApiError
where
    E: ProvideErrorMetadata + Error + 'static,
    R: Debug + 'static,
{
    fn from(value: SdkError<E, R>) -> Self {
        ApiError {
            code: value.code().map(String::from),
            message: value
                .message()
                .map(String::from)
                .unwrap_or_else(|| DisplayErrorContext(&value).to_string()),
        }
    }
}

impl Error for ApiError {}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("region must be specified")]
    MissingRegion,
    #[error("invalid AWS configuration: {0}")]
    Config(String),
    #[error("invalid arguments: {0}")]
    InvalidArgument(String),
    #[error("state '{state}' is not supported by the {module} module")]
    UnsupportedState {
        module: &'static str,
        state: crate::types::State,
    },
    #[error("{kind} with name {name} already exists")]
    AlreadyExists { kind: &'static str, name: String },
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },
    #[error("{context}, error {source}")]
    Api {
        context: String,
        #[source]
        source: ApiError,
    },
    #[error("Timed out waiting for instance {name} to reach state {target} after {seconds} seconds")]
    WaitTimeout {
        name: String,
        target: &'static str,
        seconds: u64,
    },
    #[error("could not render the module result: {0}")]
    Render(#[from] serde_json::Error),
}

impl ModuleError {
    pub fn api(context: impl Into<String>, source: ApiError) -> Self {
        ModuleError::Api {
            context: context.into(),
            source,
        }
    }
}
