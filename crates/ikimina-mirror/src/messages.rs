use std::fmt;

use ikimina::ContractError;

use crate::error::LedgerError;

/// User actions that submit a ledger request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    CreateGroup,
    Join,
    Contribute,
    Withdraw,
    DeleteGroup,
}

impl Action {
    pub fn success_message(&self) -> &'static str {
        match self {
            Action::CreateGroup => "Group info created and saved to blockchain!",
            Action::Join => "Joined group successfully!",
            Action::Contribute => "Contribution successful!",
            Action::Withdraw => "Withdrawal successful!",
            Action::DeleteGroup => "Group deleted!",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::CreateGroup => "create group",
            Action::Join => "join",
            Action::Contribute => "contribute",
            Action::Withdraw => "withdraw",
            Action::DeleteGroup => "delete group",
        };
        f.write_str(name)
    }
}

pub const TOO_SOON: &str =
    "You can only contribute once every 30 days. Please wait before making another contribution.";
pub const NOT_ELIGIBLE: &str =
    "Withdrawal is not allowed yet. Please wait until you are eligible to withdraw.";
pub const LOW_BALANCE: &str =
    "Withdrawal failed: Contract does not have enough balance for the max withdraw amount.";
pub const LOAD_FAILED: &str = "Failed to load contract data. Please try again.";

/// Message shown to the user when `action` fails with `err`.
pub fn describe(action: Action, err: &LedgerError) -> String {
    match (action, err.rejection()) {
        (Action::Contribute, Some(ContractError::ContributionTooSoon)) => TOO_SOON.to_string(),
        (Action::Contribute | Action::Withdraw, Some(ContractError::NotEligible)) => {
            NOT_ELIGIBLE.to_string()
        }
        (Action::Withdraw, Some(ContractError::InsufficientBalance)) => LOW_BALANCE.to_string(),
        (Action::Join | Action::Contribute | Action::Withdraw, Some(kind)) => {
            format!("Opps: {}", kind.reason())
        }
        (Action::Join, None) => format!("Error joining group: {err}"),
        (Action::Contribute, None) => format!("Error making contribution: {err}"),
        (Action::Withdraw, None) => format!("Error withdrawing: {err}"),
        (Action::DeleteGroup, _) => format!("Error deleting group: {err}"),
        (Action::CreateGroup, _) => format!("Error: {err}"),
    }
}
