use displaydoc::Display;
use ikimina::ContractError;
use thiserror::Error;

/// Failures surfaced by a [`Ledger`](crate::Ledger) backend.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// {0}
    Rejected(ContractError),
    /// no wallet available
    NoWallet,
    /// request rejected by user
    UserRejected,
    /// ledger unreachable: {0}
    Unreachable(String),
    /// {0}
    Host(String),
}

impl LedgerError {
    /// The ledger's rejection kind, if the request reached the ledger and failed validation.
    pub fn rejection(&self) -> Option<ContractError> {
        match self {
            LedgerError::Rejected(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<ContractError> for LedgerError {
    fn from(err: ContractError) -> Self {
        LedgerError::Rejected(err)
    }
}

/// Failures raised by [`Mirror`](crate::Mirror) actions.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum MirrorError {
    /// wallet not connected
    NotConnected,
    /// no group selected
    NoGroupSelected,
    /// Contract does not have enough balance for the max withdraw amount
    BalanceTooLow,
    /// {0}
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Config error: {0}
    Figment(Box<figment::Error>),
    /// Contract `{0}` is missing from the address book
    MissingContract(String),
    /// Contract interface has no `{0}` function
    MissingFunction(String),
    /// Deployment points at `{expected}` but the ledger runs `{actual}`
    ContractMismatch { expected: String, actual: String },
    /// JSON Error: {0}
    Json(#[from] serde_json::Error),
    /// IO Error: {0}
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}
