//! Client-side mirror of the ikimina ledger.
//!
//! The [`Mirror`] reads group state through a [`Ledger`] backend, submits
//! requests on behalf of the connected account and rebuilds each group's
//! history from the ledger's event log.

pub mod config;
pub mod error;
pub mod history;
pub mod ledger;
pub mod messages;
pub mod mirror;
#[cfg(feature = "sandbox")]
pub mod sandbox;

pub use config::{Deployment, InterfaceEntry, MirrorConfig, Param};
pub use error::{ConfigError, LedgerError, MirrorError};
pub use history::{EventLog, History, HistoryEntry};
pub use ledger::{EventKind, GroupInfo, Ledger, LedgerEvent, NewGroup};
pub use messages::Action;
pub use mirror::{Controls, GroupView, Mirror, View};
#[cfg(feature = "sandbox")]
pub use sandbox::SandboxLedger;
