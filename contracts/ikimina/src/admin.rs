use soroban_sdk::{log, symbol_short, token, Address, Env};

use crate::errors::ContractError;
use crate::storage;

pub fn initialize(env: &Env, admin: Address, token: Address) -> Result<(), ContractError> {
    if storage::has_admin(env) {
        return Err(ContractError::AlreadyInitialized);
    }
    storage::set_admin(env, &admin);
    storage::set_token(env, &token);
    log!(env, "ikimina initialized", admin, token);
    Ok(())
}

/// Removes a group whose roster is down to its owner. Whatever balance the
/// group still holds goes back to the owner.
pub fn delete_group(env: &Env, caller: Address, group_id: u64) -> Result<(), ContractError> {
    caller.require_auth();

    let group = storage::get_group(env, group_id).ok_or(ContractError::GroupNotFound)?;

    if caller != group.owner && caller != storage::get_admin(env) {
        return Err(ContractError::Unauthorized);
    }
    if group.member_count != 1 {
        return Err(ContractError::GroupNotEmpty);
    }

    if group.balance > 0 {
        let token_client = token::Client::new(env, &storage::get_token(env));
        token_client.transfer(&env.current_contract_address(), &group.owner, &group.balance);
        log!(env, "refunded remaining group balance", group_id, group.balance);
    }

    storage::remove_member(env, group_id, &group.owner);
    storage::remove_member_group(env, &group.owner, group_id);
    storage::remove_group(env, group_id);

    env.events()
        .publish((symbol_short!("grp_del"), group_id), caller);

    Ok(())
}

pub fn get_admin(env: &Env) -> Address {
    storage::get_admin(env)
}

pub fn get_token(env: &Env) -> Address {
    storage::get_token(env)
}
