use soroban_sdk::{symbol_short, token, Address, Env};

use crate::errors::ContractError;
use crate::storage;
use crate::types::{Group, Member};

pub fn make_contribution(
    env: &Env,
    member: Address,
    group_id: u64,
    amount: i128,
) -> Result<(), ContractError> {
    member.require_auth();

    let mut group = storage::get_group(env, group_id).ok_or(ContractError::GroupNotFound)?;
    let mut record =
        storage::get_member(env, group_id, &member).ok_or(ContractError::NotMember)?;

    if amount != group.contribution_amount {
        return Err(ContractError::InvalidAmount);
    }
    if record.contributed_within_window(env.ledger().timestamp()) {
        return Err(ContractError::ContributionTooSoon);
    }

    collect(env, &mut group, &mut record, amount);
    storage::set_member(env, group_id, &record);
    storage::set_group(env, &group);

    Ok(())
}

/// Pulls `amount` from the member into the contract and books it against the
/// group. Callers persist both records afterwards.
pub(crate) fn collect(env: &Env, group: &mut Group, member: &mut Member, amount: i128) {
    let token_client = token::Client::new(env, &storage::get_token(env));
    token_client.transfer(&member.address, &env.current_contract_address(), &amount);

    let now = env.ledger().timestamp();
    member.total_contributed += amount;
    member.last_contribution = Some(now);
    group.balance += amount;

    env.events().publish(
        (symbol_short!("contrib"), group.id),
        (member.address.clone(), amount, now),
    );
}

/// Cumulative amount `member` has put into the group; 0 for non-members.
pub fn get_member_contribution(
    env: &Env,
    group_id: u64,
    member: Address,
) -> Result<i128, ContractError> {
    if storage::get_group(env, group_id).is_none() {
        return Err(ContractError::GroupNotFound);
    }
    Ok(storage::get_member(env, group_id, &member)
        .map(|m| m.total_contributed)
        .unwrap_or(0))
}

pub fn get_last_contribution(
    env: &Env,
    group_id: u64,
    member: Address,
) -> Result<Option<u64>, ContractError> {
    if storage::get_group(env, group_id).is_none() {
        return Err(ContractError::GroupNotFound);
    }
    Ok(storage::get_member(env, group_id, &member).and_then(|m| m.last_contribution))
}
