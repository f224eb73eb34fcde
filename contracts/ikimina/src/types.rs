use soroban_sdk::{contracttype, Address, String};

/// Seconds a member must wait between two contributions to the same group.
pub const CONTRIBUTION_WINDOW: u64 = 30 * 24 * 60 * 60;

/// A savings group. Field order after `id` is the public record layout:
/// owner, name, description, goal, contribution amount, max withdrawal,
/// round, last withdrawal, member count, balance.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub id: u64,
    pub owner: Address,
    pub name: String,
    pub description: String,
    pub goal: i128,
    /// Exact amount every join and contribution must carry.
    pub contribution_amount: i128,
    /// Exact amount paid out to the eligible member on withdrawal.
    pub max_withdraw_amount: i128,
    pub current_round: u32,
    /// Ledger timestamp of the most recent withdrawal, 0 if none yet.
    pub last_withdrawal: u64,
    pub member_count: u32,
    /// Value held by the contract on behalf of this group.
    pub balance: i128,
}

impl Group {
    /// Roster position allowed to withdraw in the current round.
    pub fn rotation_position(&self) -> u32 {
        self.current_round % self.member_count
    }
}

/// Per-group record of one member's contributions.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub address: Address,
    pub total_contributed: i128,
    pub last_contribution: Option<u64>,
}

impl Member {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            total_contributed: 0,
            last_contribution: None,
        }
    }

    /// Whether a contribution at `now` falls inside the rolling window of the
    /// previous one.
    pub fn contributed_within_window(&self, now: u64) -> bool {
        match self.last_contribution {
            Some(last) => now < last.saturating_add(CONTRIBUTION_WINDOW),
            None => false,
        }
    }
}

/// Storage keys for all contract data.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Token,
    GroupCounter,
    Group(u64),
    Members(u64),
    Member(u64, Address),
    MemberGroups(Address),
}
