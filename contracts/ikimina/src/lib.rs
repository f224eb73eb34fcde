#![no_std]

use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env, String, Vec};

mod admin;
mod contribution;
mod errors;
mod group;
mod payout;
mod storage;
mod types;

pub use errors::ContractError;
pub use types::*;

#[contract]
pub struct IkiminaContract;

#[contractimpl]
impl IkiminaContract {
    /// Deploy the ledger with its administrator and the token all value moves in.
    pub fn __constructor(env: Env, admin: Address, token: Address) {
        if let Err(err) = admin::initialize(&env, admin, token) {
            panic_with_error!(&env, err);
        }
    }

    // ─── Groups ─────────────────────────────────────────────────────

    /// Create a new group. The caller becomes owner and first member; a
    /// non-zero `amount` is booked as the owner's first contribution.
    pub fn create_group(
        env: Env,
        owner: Address,
        name: String,
        description: String,
        goal: i128,
        contribution_amount: i128,
        max_withdraw_amount: i128,
        amount: i128,
    ) -> Result<u64, ContractError> {
        group::create_group(
            &env,
            owner,
            name,
            description,
            goal,
            contribution_amount,
            max_withdraw_amount,
            amount,
        )
    }

    /// Join a group, paying exactly its contribution amount.
    pub fn join_group(
        env: Env,
        member: Address,
        group_id: u64,
        amount: i128,
    ) -> Result<(), ContractError> {
        group::join_group(&env, member, group_id, amount)
    }

    /// Delete a group that only its owner is left in. Group owner or ledger admin.
    pub fn delete_group(env: Env, caller: Address, group_id: u64) -> Result<(), ContractError> {
        admin::delete_group(&env, caller, group_id)
    }

    /// Number of group ids issued, including deleted ones.
    pub fn group_count(env: Env) -> u64 {
        group::group_count(&env)
    }

    pub fn get_group(env: Env, group_id: u64) -> Result<Group, ContractError> {
        group::get_group(&env, group_id)
    }

    pub fn get_members(env: Env, group_id: u64) -> Result<Vec<Address>, ContractError> {
        group::get_members(&env, group_id)
    }

    pub fn is_member(env: Env, group_id: u64, member: Address) -> Result<bool, ContractError> {
        group::is_member(&env, group_id, member)
    }

    /// Ids of every live group `member` belongs to.
    pub fn get_member_groups(env: Env, member: Address) -> Vec<u64> {
        group::get_member_groups(&env, member)
    }

    // ─── Contributions ──────────────────────────────────────────────

    /// Contribute to a group. At most once per member every 30 days.
    pub fn make_contribution(
        env: Env,
        member: Address,
        group_id: u64,
        amount: i128,
    ) -> Result<(), ContractError> {
        contribution::make_contribution(&env, member, group_id, amount)
    }

    pub fn get_member_contribution(
        env: Env,
        group_id: u64,
        member: Address,
    ) -> Result<i128, ContractError> {
        contribution::get_member_contribution(&env, group_id, member)
    }

    pub fn get_last_contribution(
        env: Env,
        group_id: u64,
        member: Address,
    ) -> Result<Option<u64>, ContractError> {
        contribution::get_last_contribution(&env, group_id, member)
    }

    // ─── Withdrawals ────────────────────────────────────────────────

    /// Pay the group's max withdrawal amount to the member whose turn it is
    /// and move the rotation forward.
    pub fn withdraw(env: Env, member: Address, group_id: u64) -> Result<(), ContractError> {
        payout::withdraw(&env, member, group_id)
    }

    pub fn get_current_eligible_member(env: Env, group_id: u64) -> Result<Address, ContractError> {
        payout::get_current_eligible_member(&env, group_id)
    }

    /// Token balance held by the ledger over all groups.
    pub fn get_contract_balance(env: Env) -> i128 {
        payout::get_contract_balance(&env)
    }

    // ─── Protocol ───────────────────────────────────────────────────

    pub fn get_admin(env: Env) -> Address {
        admin::get_admin(&env)
    }

    pub fn get_token(env: Env) -> Address {
        admin::get_token(&env)
    }
}
