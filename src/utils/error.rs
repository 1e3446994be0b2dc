use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Response body is not valid UTF-8: {0}")]
    DecodeError(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Image load failed: {message}")]
    ImageLoadError { message: String },

    #[error("Link service is no longer running")]
    ServiceClosed,
}

impl ViewerError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ViewerError::HttpError(_) | ViewerError::HttpStatusError { .. } => {
                format!("Could not reach the link server: {}", self)
            }
            ViewerError::DecodeError(_) => "The link list is not valid UTF-8 text".to_string(),
            ViewerError::ConfigError { .. } | ViewerError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ViewerError::HttpError(_) | ViewerError::HttpStatusError { .. } => {
                "Check the network connection and the --links-url value"
            }
            ViewerError::DecodeError(_) => "Make sure the endpoint serves plain text, one URL per line",
            ViewerError::IoError(_) => "Check file paths and permissions",
            ViewerError::ConfigError { .. } | ViewerError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or CLI flags"
            }
            ViewerError::ImageLoadError { .. } => "The image host may be down; the item stays marked as failed",
            ViewerError::ServiceClosed => "Restart the viewer",
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
