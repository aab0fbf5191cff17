//! Error types for expense splitting

use thiserror::Error;

/// Result type for splitting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Splitting errors
///
/// The balance engine and the optimizer never fail; every variant here is
/// raised by input validation or configuration loading.
#[derive(Error, Debug)]
pub enum Error {
    /// Participant name empty after trimming
    #[error("Participant name must not be empty")]
    EmptyName,

    /// Participant already present in the session
    #[error("Participant already exists: {0}")]
    DuplicateParticipant(String),

    /// Expense description empty after trimming
    #[error("Please fill out the description of the expense")]
    MissingDescription,

    /// No payer selected
    #[error("Please select who paid for the expense")]
    MissingPayer,

    /// Expenses need somebody to split with
    #[error("At least 2 participants are required, found {count}")]
    NotEnoughParticipants {
        /// Current participant count
        count: usize,
    },

    /// Payer is not a participant of the session
    #[error("Unknown payer: {0}")]
    UnknownPayer(String),

    /// Amount non-numeric, not greater than zero or too large for the session
    #[error("Please enter a valid expense amount: {0}")]
    InvalidAmount(String),

    /// Optimizer invoked before any expense was recorded
    #[error("Add some expenses first!")]
    NoExpenses,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by rejected user input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyName
                | Error::DuplicateParticipant(_)
                | Error::MissingDescription
                | Error::MissingPayer
                | Error::NotEnoughParticipants { .. }
                | Error::UnknownPayer(_)
                | Error::InvalidAmount(_)
                | Error::NoExpenses
        )
    }
}
