use std::path::PathBuf;

/// Combines all error types in one enum to ease
/// error propagation. Every variant is fatal to
/// the invocation and ends the program with exit
/// status 1.
#[derive(Debug)]
pub enum RemindrError {
    /// The configuration file could not be read or is not
    /// a well formed configuration document.
    ConfigParse { path: PathBuf, reason: String },
    /// No (or an empty) from address has been configured.
    MissingFromAddress,
    /// Not a single recipient has been configured.
    MissingRecipients,
    /// No (or an empty) SMTP host has been configured.
    MissingHost,
    /// The mail could not be handed over to the SMTP relay.
    Transport(String),
}

impl std::fmt::Display for RemindrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemindrError::ConfigParse { path, reason } => {
                write!(f, "cannot load config file {}: {}", path.display(), reason)
            }
            RemindrError::MissingFromAddress => {
                write!(f, "a valid from address must be provided")
            }
            RemindrError::MissingRecipients => {
                write!(f, "at least 1 to address must be provided")
            }
            RemindrError::MissingHost => write!(f, "a valid SMTP host must be provided"),
            RemindrError::Transport(e) => write!(f, "cannot send email: {}", e),
        }
    }
}

// Make it an error!
impl std::error::Error for RemindrError {}

impl From<lettre::transport::smtp::Error> for RemindrError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        RemindrError::Transport(err.to_string())
    }
}

impl From<lettre::error::Error> for RemindrError {
    fn from(err: lettre::error::Error) -> Self {
        RemindrError::Transport(err.to_string())
    }
}
