use soroban_sdk::{symbol_short, token, Address, Env};

use crate::errors::ContractError;
use crate::storage;

pub fn withdraw(env: &Env, member: Address, group_id: u64) -> Result<(), ContractError> {
    member.require_auth();

    let mut group = storage::get_group(env, group_id).ok_or(ContractError::GroupNotFound)?;

    let eligible = get_current_eligible_member(env, group_id)?;
    if member != eligible {
        return Err(ContractError::NotEligible);
    }
    if group.balance < group.max_withdraw_amount {
        return Err(ContractError::InsufficientBalance);
    }

    let amount = group.max_withdraw_amount;
    let token_client = token::Client::new(env, &storage::get_token(env));
    token_client.transfer(&env.current_contract_address(), &member, &amount);

    let now = env.ledger().timestamp();
    group.balance -= amount;
    group.current_round += 1;
    group.last_withdrawal = now;
    storage::set_group(env, &group);

    env.events().publish(
        (symbol_short!("withdraw"), group_id),
        (member, amount, now),
    );

    Ok(())
}

/// The roster entry whose position matches the current round.
pub fn get_current_eligible_member(env: &Env, group_id: u64) -> Result<Address, ContractError> {
    let group = storage::get_group(env, group_id).ok_or(ContractError::GroupNotFound)?;
    let members = storage::get_members(env, group_id);
    members
        .get(group.rotation_position())
        .ok_or(ContractError::GroupNotFound)
}

/// Total value held by the contract across every group.
pub fn get_contract_balance(env: &Env) -> i128 {
    let token_client = token::Client::new(env, &storage::get_token(env));
    token_client.balance(&env.current_contract_address())
}
