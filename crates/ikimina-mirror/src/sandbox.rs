//! A [`Ledger`] that runs the ikimina contract inside an in-process Soroban
//! environment, with a Stellar asset contract standing in for the value
//! token. Authorization is mocked: every request is signed by whichever
//! account it names.

use std::fmt::Debug;

use ikimina::{ContractError, Group, IkiminaContract, IkiminaContractClient};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger as _},
    token::{StellarAssetClient, TokenClient},
    Address, Env, Symbol, TryFromVal,
};
use tracing::debug;

use crate::config::{Deployment, InterfaceEntry, Param, REQUIRED_FUNCTIONS};
use crate::error::LedgerError;
use crate::ledger::{EventKind, GroupInfo, Ledger, LedgerEvent, NewGroup};

pub struct SandboxLedger {
    env: Env,
    contract: Address,
    token: Address,
    admin: Address,
    log: Vec<LedgerEvent>,
}

impl Default for SandboxLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxLedger {
    /// Deploys a fresh token and ledger contract.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let token_admin = Address::generate(&env);
        let token = env
            .register_stellar_asset_contract_v2(token_admin)
            .address();
        let contract = env.register(IkiminaContract, (&admin, &token));
        debug!(contract = %strkey(&contract), "sandbox ledger deployed");

        Self {
            env,
            contract,
            token,
            admin,
            log: Vec::new(),
        }
    }

    fn client(&self) -> IkiminaContractClient<'_> {
        IkiminaContractClient::new(&self.env, &self.contract)
    }

    fn address(&self, account: &str) -> Address {
        Address::from_string(&soroban_sdk::String::from_str(&self.env, account))
    }

    pub fn admin_account(&self) -> String {
        strkey(&self.admin)
    }

    /// A new account holding `funds` units of the value token. The test
    /// environment generates contract addresses, so accounts are `C...`
    /// strkeys.
    pub fn new_account(&self, funds: i128) -> String {
        let account = Address::generate(&self.env);
        if funds > 0 {
            StellarAssetClient::new(&self.env, &self.token).mint(&account, &funds);
        }
        strkey(&account)
    }

    pub fn balance_of(&self, account: &str) -> i128 {
        TokenClient::new(&self.env, &self.token).balance(&self.address(account))
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn set_time(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }

    pub fn advance_time(&self, seconds: u64) {
        self.set_time(self.now() + seconds);
    }

    /// The artifacts a deployment step would publish for this ledger.
    pub fn deployment(&self) -> Deployment {
        let interface = REQUIRED_FUNCTIONS
            .iter()
            .map(|name| InterfaceEntry {
                kind: "function".to_string(),
                name: name.to_string(),
                inputs: inputs_of(name)
                    .iter()
                    .map(|(name, kind)| Param {
                        name: name.to_string(),
                        kind: kind.to_string(),
                    })
                    .collect(),
            })
            .collect();
        Deployment {
            contract_id: self.contract_id(),
            interface,
        }
    }

    /// Appends the ledger events raised by the last invocation to the log.
    fn record_events(&mut self) {
        let contrib = symbol_short!("contrib");
        let withdraw = symbol_short!("withdraw");

        for (contract, topics, data) in self.env.events().all().iter() {
            if contract != self.contract {
                continue;
            }
            let Some(Ok(tag)) = topics.get(0).map(|v| Symbol::try_from_val(&self.env, &v)) else {
                continue;
            };
            let kind = if tag == contrib {
                EventKind::ContributionMade
            } else if tag == withdraw {
                EventKind::FundsWithdrawn
            } else {
                continue;
            };
            let Some(Ok(group_id)) = topics.get(1).map(|v| u64::try_from_val(&self.env, &v)) else {
                continue;
            };
            let Ok((member, amount, timestamp)) =
                <(Address, i128, u64)>::try_from_val(&self.env, &data)
            else {
                continue;
            };
            self.log.push(LedgerEvent {
                kind,
                group_id,
                member: strkey(&member),
                amount,
                timestamp,
            });
        }
    }

    fn submit<T>(&mut self, result: Result<T, LedgerError>) -> Result<T, LedgerError> {
        if result.is_ok() {
            self.record_events();
        }
        result
    }
}

impl Ledger for SandboxLedger {
    fn contract_id(&self) -> String {
        strkey(&self.contract)
    }

    fn group_count(&self) -> Result<u64, LedgerError> {
        settle_query(self.client().try_group_count())
    }

    fn group(&self, group_id: u64) -> Result<GroupInfo, LedgerError> {
        settle(self.client().try_get_group(&group_id)).map(|group| group_info(&group))
    }

    fn members(&self, group_id: u64) -> Result<Vec<String>, LedgerError> {
        let members = settle(self.client().try_get_members(&group_id))?;
        Ok(members.iter().map(|m| strkey(&m)).collect())
    }

    fn current_eligible_member(&self, group_id: u64) -> Result<String, LedgerError> {
        settle(self.client().try_get_current_eligible_member(&group_id)).map(|m| strkey(&m))
    }

    fn member_contribution(&self, group_id: u64, member: &str) -> Result<i128, LedgerError> {
        settle(
            self.client()
                .try_get_member_contribution(&group_id, &self.address(member)),
        )
    }

    fn last_contribution(&self, group_id: u64, member: &str) -> Result<Option<u64>, LedgerError> {
        settle(
            self.client()
                .try_get_last_contribution(&group_id, &self.address(member)),
        )
    }

    fn contract_balance(&self) -> Result<i128, LedgerError> {
        settle_query(self.client().try_get_contract_balance())
    }

    fn admin(&self) -> Result<String, LedgerError> {
        settle_query(self.client().try_get_admin()).map(|a| strkey(&a))
    }

    fn events(&self, from: usize) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self.log.get(from..).unwrap_or_default().to_vec())
    }

    fn create_group(
        &mut self,
        caller: &str,
        group: &NewGroup,
        amount: i128,
    ) -> Result<u64, LedgerError> {
        let result = settle(self.client().try_create_group(
            &self.address(caller),
            &soroban_sdk::String::from_str(&self.env, &group.name),
            &soroban_sdk::String::from_str(&self.env, &group.description),
            &group.goal,
            &group.contribution_amount,
            &group.max_withdraw_amount,
            &amount,
        ));
        self.submit(result)
    }

    fn join_group(&mut self, caller: &str, group_id: u64, amount: i128) -> Result<(), LedgerError> {
        let result = settle(
            self.client()
                .try_join_group(&self.address(caller), &group_id, &amount),
        );
        self.submit(result)
    }

    fn make_contribution(
        &mut self,
        caller: &str,
        group_id: u64,
        amount: i128,
    ) -> Result<(), LedgerError> {
        let result = settle(
            self.client()
                .try_make_contribution(&self.address(caller), &group_id, &amount),
        );
        self.submit(result)
    }

    fn withdraw(&mut self, caller: &str, group_id: u64) -> Result<(), LedgerError> {
        let result = settle(self.client().try_withdraw(&self.address(caller), &group_id));
        self.submit(result)
    }

    fn delete_group(&mut self, caller: &str, group_id: u64) -> Result<(), LedgerError> {
        let result = settle(
            self.client()
                .try_delete_group(&self.address(caller), &group_id),
        );
        self.submit(result)
    }
}

/// Flattens the nested result of a `try_` contract call. `rejected` maps the
/// error the contract itself returned.
fn flatten<T, C, E, I>(
    result: Result<Result<T, C>, Result<E, I>>,
    rejected: impl FnOnce(E) -> LedgerError,
) -> Result<T, LedgerError>
where
    C: Debug,
    I: Debug,
{
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(LedgerError::Host(format!("{err:?}"))),
        Err(Ok(err)) => Err(rejected(err)),
        Err(Err(err)) => Err(LedgerError::Host(format!("{err:?}"))),
    }
}

/// For entry points returning `Result<_, ContractError>`.
fn settle<T, C, I>(result: Result<Result<T, C>, Result<ContractError, I>>) -> Result<T, LedgerError>
where
    C: Debug,
    I: Debug,
{
    flatten(result, LedgerError::Rejected)
}

/// For entry points that cannot reject; any error came from the host.
fn settle_query<T, C, E, I>(result: Result<Result<T, C>, Result<E, I>>) -> Result<T, LedgerError>
where
    C: Debug,
    E: Debug,
    I: Debug,
{
    flatten(result, |err| LedgerError::Host(format!("{err:?}")))
}

fn text(s: &soroban_sdk::String) -> String {
    let mut buf = vec![0u8; s.len() as usize];
    s.copy_into_slice(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn strkey(address: &Address) -> String {
    text(&address.to_string())
}

fn group_info(group: &Group) -> GroupInfo {
    GroupInfo {
        id: group.id,
        owner: strkey(&group.owner),
        name: text(&group.name),
        description: text(&group.description),
        goal: group.goal,
        contribution_amount: group.contribution_amount,
        max_withdraw_amount: group.max_withdraw_amount,
        current_round: group.current_round,
        last_withdrawal: group.last_withdrawal,
        member_count: group.member_count,
        balance: group.balance,
    }
}

fn inputs_of(function: &str) -> &'static [(&'static str, &'static str)] {
    match function {
        "get_group" | "get_members" | "get_current_eligible_member" => &[("group_id", "u64")],
        "get_member_contribution" | "get_last_contribution" => {
            &[("group_id", "u64"), ("member", "address")]
        }
        "create_group" => &[
            ("owner", "address"),
            ("name", "string"),
            ("description", "string"),
            ("goal", "i128"),
            ("contribution_amount", "i128"),
            ("max_withdraw_amount", "i128"),
            ("amount", "i128"),
        ],
        "join_group" | "make_contribution" => {
            &[("member", "address"), ("group_id", "u64"), ("amount", "i128")]
        }
        "withdraw" => &[("member", "address"), ("group_id", "u64")],
        "delete_group" => &[("caller", "address"), ("group_id", "u64")],
        _ => &[],
    }
}
