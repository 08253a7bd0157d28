use thiserror::Error;

/// Main error type for Messenger
#[derive(Error, Debug)]
pub enum MessengerError {
    #[error("Not signed in. Run `messenger login <email>` first.")]
    NotSignedIn,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}
