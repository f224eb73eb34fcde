use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Host-side copy of a ledger group record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub goal: i128,
    pub contribution_amount: i128,
    pub max_withdraw_amount: i128,
    pub current_round: u32,
    pub last_withdrawal: u64,
    pub member_count: u32,
    pub balance: i128,
}

impl GroupInfo {
    /// Deleted or never-created records carry a zero owner and an empty name;
    /// those never show up in a listing.
    pub fn is_listed(&self) -> bool {
        !is_zero_address(&self.owner) && !self.name.trim().is_empty()
    }
}

fn is_zero_address(address: &str) -> bool {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    digits.chars().all(|c| c == '0')
}

/// Addresses compare case-insensitively.
pub fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Parameters of a group creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub goal: i128,
    pub contribution_amount: i128,
    pub max_withdraw_amount: i128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    ContributionMade,
    FundsWithdrawn,
}

/// One entry of the ledger's event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub kind: EventKind,
    pub group_id: u64,
    pub member: String,
    pub amount: i128,
    pub timestamp: u64,
}

/// Everything the mirror needs from a ledger deployment.
///
/// Queries never change ledger state. Requests are signed by `caller` and
/// return once the ledger has finalized them; a returned error means the
/// request left no trace on the ledger.
pub trait Ledger {
    /// Id of the deployed contract this backend talks to.
    fn contract_id(&self) -> String;

    fn group_count(&self) -> Result<u64, LedgerError>;

    fn group(&self, group_id: u64) -> Result<GroupInfo, LedgerError>;

    fn members(&self, group_id: u64) -> Result<Vec<String>, LedgerError>;

    fn current_eligible_member(&self, group_id: u64) -> Result<String, LedgerError>;

    fn member_contribution(&self, group_id: u64, member: &str) -> Result<i128, LedgerError>;

    fn last_contribution(&self, group_id: u64, member: &str) -> Result<Option<u64>, LedgerError>;

    /// Value held by the ledger over all groups.
    fn contract_balance(&self) -> Result<i128, LedgerError>;

    /// The ledger administrator.
    fn admin(&self) -> Result<String, LedgerError>;

    /// Events at positions `from..` of the log, oldest first.
    fn events(&self, from: usize) -> Result<Vec<LedgerEvent>, LedgerError>;

    fn create_group(
        &mut self,
        caller: &str,
        group: &NewGroup,
        amount: i128,
    ) -> Result<u64, LedgerError>;

    fn join_group(&mut self, caller: &str, group_id: u64, amount: i128) -> Result<(), LedgerError>;

    fn make_contribution(
        &mut self,
        caller: &str,
        group_id: u64,
        amount: i128,
    ) -> Result<(), LedgerError>;

    fn withdraw(&mut self, caller: &str, group_id: u64) -> Result<(), LedgerError>;

    fn delete_group(&mut self, caller: &str, group_id: u64) -> Result<(), LedgerError>;
}
