use integration_core::IntegrationError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the azdo-connect CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// The integration refused an action or a discovery failed.
    ///
    /// The message is the one shown to the user on the current screen.
    #[error("{0}")]
    Integration(#[from] IntegrationError),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl Error {
    /// Process exit code for the error.
    ///
    /// Usage errors exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArguments(_) => 2,
            Error::Integration(_) => 1,
        }
    }
}
