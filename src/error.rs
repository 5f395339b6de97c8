use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("could not decode `{command}` response: {source}")]
    JsonParse {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode `{command}` arguments: {source}")]
    JsonEncode {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{0}` returned an empty response")]
    EmptyResponse(&'static str),

    #[error("`{command}` returned malformed hex: {source}")]
    InvalidHex {
        command: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("signature incomplete: {0}")]
    IncompleteSignature(String),

    #[error("amount arithmetic out of range: {0}")]
    AmountOutOfRange(String),
}
