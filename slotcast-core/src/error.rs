#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    UserError(String),
    #[error("Show has no programs: {0}")]
    ShowHasNoPrograms(String),
    #[error("Unable to find slot for time of day {time} {day_time}")]
    SlotNotFound { time: i64, day_time: i64 },
    #[error("Unknown redirect target: {0}")]
    RedirectChannelUnknown(String),
    #[error("Generation cancelled")]
    Cancelled,
    #[error("Channel not found")]
    ChannelNotFound,
    #[error("std::io error: {0}")]
    IoError(std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(serde_yaml::Error),
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn user<S: Into<String>>(msg: S) -> Self {
        Self::UserError(msg.into())
    }

    /// Returns `true` if the error was caused by a malformed schedule.
    ///
    /// Such errors are reported back to the user and no lineup is produced.
    /// Every other error indicates inconsistent input data or an aborted run.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::UserError(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err)
    }
}
