//! Error types for the logging core

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Level setter given an unrecognized level name
    #[error("unknown level '{value}': expected a numeric level or a recognized level name")]
    InvalidLevel { value: String },

    /// Parent directory creation failed during file handler construction
    #[error("cannot create directory for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Opening the target file failed during file handler construction
    #[error("cannot open file '{path}': {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Sink write failure during handle
    #[error("write failed for handler '{handler}': {source}")]
    Write {
        handler: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("cannot parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file extension is not supported
    #[error("unknown config file type '{extension}': only json is supported")]
    UnsupportedConfigType { extension: String },

    /// Handler entry references an undeclared formatter
    #[error("formatter '{formatter}' referenced by handler '{handler}' is not declared")]
    UnknownFormatter { formatter: String, handler: String },

    /// Logger entry references an undeclared handler
    #[error("handler '{handler}' referenced by logger '{logger}' is not declared")]
    UnknownHandler { handler: String, logger: String },

    /// Handler entry is missing a required property
    #[error("handler '{handler}' is missing required property '{property}'")]
    MissingProperty { handler: String, property: String },

    /// StreamHandler entry names a stream that is neither stdout nor stderr
    #[error("unknown stream '{stream}' for handler '{handler}': expected 'stdout' or 'stderr'")]
    UnknownStream { stream: String, handler: String },
}

impl LogError {
    pub fn invalid_level(value: impl Into<String>) -> Self {
        LogError::InvalidLevel {
            value: value.into(),
        }
    }

    pub fn create_directory(path: impl Into<String>, source: std::io::Error) -> Self {
        LogError::CreateDirectory {
            path: path.into(),
            source,
        }
    }

    pub fn open_file(path: impl Into<String>, source: std::io::Error) -> Self {
        LogError::OpenFile {
            path: path.into(),
            source,
        }
    }

    pub fn write(handler: impl Into<String>, source: std::io::Error) -> Self {
        LogError::Write {
            handler: handler.into(),
            source,
        }
    }

    pub fn unknown_formatter(formatter: impl Into<String>, handler: impl Into<String>) -> Self {
        LogError::UnknownFormatter {
            formatter: formatter.into(),
            handler: handler.into(),
        }
    }

    pub fn unknown_handler(handler: impl Into<String>, logger: impl Into<String>) -> Self {
        LogError::UnknownHandler {
            handler: handler.into(),
            logger: logger.into(),
        }
    }

    pub fn missing_property(handler: impl Into<String>, property: impl Into<String>) -> Self {
        LogError::MissingProperty {
            handler: handler.into(),
            property: property.into(),
        }
    }

    pub fn unknown_stream(stream: impl Into<String>, handler: impl Into<String>) -> Self {
        LogError::UnknownStream {
            stream: stream.into(),
            handler: handler.into(),
        }
    }
}
