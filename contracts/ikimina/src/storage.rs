use soroban_sdk::{Address, Env, Vec};

use crate::types::{DataKey, Group, Member};

const INSTANCE_TTL_THRESHOLD: u32 = 100;
const INSTANCE_TTL_EXTEND: u32 = 500;
const PERSISTENT_TTL_THRESHOLD: u32 = 100;
const PERSISTENT_TTL_EXTEND: u32 = 1000;

// --- Protocol config ---

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Address {
    env.storage().instance().get(&DataKey::Admin).unwrap()
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

pub fn get_token(env: &Env) -> Address {
    env.storage().instance().get(&DataKey::Token).unwrap()
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    extend_instance_ttl(env);
}

// --- Group Counter ---

/// Number of ids handed out so far. Deleted groups keep their id.
pub fn get_group_counter(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::GroupCounter)
        .unwrap_or(0)
}

pub fn set_group_counter(env: &Env, counter: u64) {
    env.storage()
        .instance()
        .set(&DataKey::GroupCounter, &counter);
    extend_instance_ttl(env);
}

// --- Group ---

pub fn get_group(env: &Env, group_id: u64) -> Option<Group> {
    let key = DataKey::Group(group_id);
    let result = env.storage().persistent().get(&key);
    if result.is_some() {
        extend_persistent_ttl(env, &key);
    }
    result
}

pub fn set_group(env: &Env, group: &Group) {
    let key = DataKey::Group(group.id);
    env.storage().persistent().set(&key, group);
    extend_persistent_ttl(env, &key);
}

pub fn remove_group(env: &Env, group_id: u64) {
    env.storage().persistent().remove(&DataKey::Group(group_id));
    env.storage().persistent().remove(&DataKey::Members(group_id));
}

// --- Roster ---

pub fn get_members(env: &Env, group_id: u64) -> Vec<Address> {
    let key = DataKey::Members(group_id);
    let result = env.storage().persistent().get(&key);
    if result.is_some() {
        extend_persistent_ttl(env, &key);
    }
    result.unwrap_or(Vec::new(env))
}

pub fn set_members(env: &Env, group_id: u64, members: &Vec<Address>) {
    let key = DataKey::Members(group_id);
    env.storage().persistent().set(&key, members);
    extend_persistent_ttl(env, &key);
}

// --- Member records ---

pub fn get_member(env: &Env, group_id: u64, address: &Address) -> Option<Member> {
    let key = DataKey::Member(group_id, address.clone());
    let result = env.storage().persistent().get(&key);
    if result.is_some() {
        extend_persistent_ttl(env, &key);
    }
    result
}

pub fn set_member(env: &Env, group_id: u64, member: &Member) {
    let key = DataKey::Member(group_id, member.address.clone());
    env.storage().persistent().set(&key, member);
    extend_persistent_ttl(env, &key);
}

pub fn remove_member(env: &Env, group_id: u64, address: &Address) {
    let key = DataKey::Member(group_id, address.clone());
    env.storage().persistent().remove(&key);
}

// --- Member Groups ---

pub fn get_member_groups(env: &Env, member: &Address) -> Vec<u64> {
    let key = DataKey::MemberGroups(member.clone());
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env))
}

pub fn add_member_group(env: &Env, member: &Address, group_id: u64) {
    let key = DataKey::MemberGroups(member.clone());
    let mut groups = get_member_groups(env, member);
    groups.push_back(group_id);
    env.storage().persistent().set(&key, &groups);
    extend_persistent_ttl(env, &key);
}

pub fn remove_member_group(env: &Env, member: &Address, group_id: u64) {
    let key = DataKey::MemberGroups(member.clone());
    let groups = get_member_groups(env, member);
    let mut new_groups = Vec::new(env);
    for g in groups.iter() {
        if g != group_id {
            new_groups.push_back(g);
        }
    }
    if new_groups.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &new_groups);
    extend_persistent_ttl(env, &key);
}

// --- TTL Management ---

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
