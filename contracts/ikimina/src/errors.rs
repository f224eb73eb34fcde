use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    Unauthorized = 2,
    EmptyName = 3,
    GroupNotFound = 4,
    InvalidAmount = 5,
    AlreadyMember = 6,
    NotMember = 7,
    ContributionTooSoon = 8,
    NotEligible = 9,
    InsufficientBalance = 10,
    GroupNotEmpty = 11,
}

impl ContractError {
    /// Human-readable rejection reason. These strings are matched by existing
    /// clients and must not change.
    pub fn reason(&self) -> &'static str {
        match self {
            ContractError::AlreadyInitialized => "Already initialized",
            ContractError::Unauthorized => "Only the group owner or contract owner can delete",
            ContractError::EmptyName => "Group name cannot be empty",
            ContractError::GroupNotFound => "Group does not exist",
            ContractError::InvalidAmount => "Incorrect contribution amount",
            ContractError::AlreadyMember => "Already a member",
            ContractError::NotMember => "Not a member of this group",
            ContractError::ContributionTooSoon => "You can only contribute once every 30 days",
            ContractError::NotEligible => "Withdrawal not allowed yet",
            ContractError::InsufficientBalance => {
                "Not enough contract balance to withdraw max amount"
            }
            ContractError::GroupNotEmpty => "Group still has members",
        }
    }

    /// Looks an error up by its on-chain code.
    pub fn from_code(code: u32) -> Option<Self> {
        let err = match code {
            1 => ContractError::AlreadyInitialized,
            2 => ContractError::Unauthorized,
            3 => ContractError::EmptyName,
            4 => ContractError::GroupNotFound,
            5 => ContractError::InvalidAmount,
            6 => ContractError::AlreadyMember,
            7 => ContractError::NotMember,
            8 => ContractError::ContributionTooSoon,
            9 => ContractError::NotEligible,
            10 => ContractError::InsufficientBalance,
            11 => ContractError::GroupNotEmpty,
            _ => return None,
        };
        Some(err)
    }
}

impl core::fmt::Display for ContractError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.reason())
    }
}
