use soroban_sdk::{symbol_short, Address, Env, String, Vec};

use crate::contribution;
use crate::errors::ContractError;
use crate::storage;
use crate::types::{Group, Member};

pub fn create_group(
    env: &Env,
    owner: Address,
    name: String,
    description: String,
    goal: i128,
    contribution_amount: i128,
    max_withdraw_amount: i128,
    amount: i128,
) -> Result<u64, ContractError> {
    owner.require_auth();

    if name.len() == 0 {
        return Err(ContractError::EmptyName);
    }
    if contribution_amount <= 0 || max_withdraw_amount <= 0 || goal < 0 {
        return Err(ContractError::InvalidAmount);
    }
    // An opening deposit is optional, but when present it is a regular contribution.
    if amount != 0 && amount != contribution_amount {
        return Err(ContractError::InvalidAmount);
    }

    let group_id = storage::get_group_counter(env);
    storage::set_group_counter(env, group_id + 1);

    let mut group = Group {
        id: group_id,
        owner: owner.clone(),
        name,
        description,
        goal,
        contribution_amount,
        max_withdraw_amount,
        current_round: 0,
        last_withdrawal: 0,
        member_count: 1,
        balance: 0,
    };

    let mut members = Vec::new(env);
    members.push_back(owner.clone());
    storage::set_members(env, group_id, &members);
    storage::add_member_group(env, &owner, group_id);

    env.events()
        .publish((symbol_short!("grp_new"), group_id), owner.clone());

    let mut member = Member::new(owner);
    if amount > 0 {
        contribution::collect(env, &mut group, &mut member, amount);
    }
    storage::set_member(env, group_id, &member);
    storage::set_group(env, &group);

    Ok(group_id)
}

pub fn join_group(
    env: &Env,
    member: Address,
    group_id: u64,
    amount: i128,
) -> Result<(), ContractError> {
    member.require_auth();

    let mut group = storage::get_group(env, group_id).ok_or(ContractError::GroupNotFound)?;

    if amount != group.contribution_amount {
        return Err(ContractError::InvalidAmount);
    }
    if storage::get_member(env, group_id, &member).is_some() {
        return Err(ContractError::AlreadyMember);
    }

    let mut members = storage::get_members(env, group_id);
    members.push_back(member.clone());
    group.member_count = members.len();
    storage::set_members(env, group_id, &members);
    storage::add_member_group(env, &member, group_id);

    env.events()
        .publish((symbol_short!("grp_join"), group_id), member.clone());

    let mut record = Member::new(member);
    contribution::collect(env, &mut group, &mut record, amount);
    storage::set_member(env, group_id, &record);
    storage::set_group(env, &group);

    Ok(())
}

pub fn group_count(env: &Env) -> u64 {
    storage::get_group_counter(env)
}

pub fn get_group(env: &Env, group_id: u64) -> Result<Group, ContractError> {
    storage::get_group(env, group_id).ok_or(ContractError::GroupNotFound)
}

/// Roster in join order; the owner is always first.
pub fn get_members(env: &Env, group_id: u64) -> Result<Vec<Address>, ContractError> {
    if storage::get_group(env, group_id).is_none() {
        return Err(ContractError::GroupNotFound);
    }
    Ok(storage::get_members(env, group_id))
}

pub fn is_member(env: &Env, group_id: u64, address: Address) -> Result<bool, ContractError> {
    if storage::get_group(env, group_id).is_none() {
        return Err(ContractError::GroupNotFound);
    }
    Ok(storage::get_member(env, group_id, &address).is_some())
}

pub fn get_member_groups(env: &Env, member: Address) -> Vec<u64> {
    storage::get_member_groups(env, &member)
}
