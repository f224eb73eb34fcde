//! Client-side view of one account's interaction with the ledger.
//!
//! The mirror holds no authoritative state. Every action submits a request,
//! waits for it to be finalized and then re-reads everything it shows. Each
//! action borrows the mirror mutably until it has finished, so a control
//! cannot be triggered twice while its request is in flight.

use tracing::{debug, error, info, warn};

use crate::config::Deployment;
use crate::error::{ConfigError, LedgerError, MirrorError};
use crate::history::{EventLog, History};
use crate::ledger::{same_address, GroupInfo, Ledger, NewGroup};
use crate::messages::{self, Action};
use ikimina::ContractError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Disconnected,
    /// Wallet connected, no group chosen.
    Connected,
    GroupLoaded,
    /// A group was chosen but reading it failed.
    LoadFailed,
}

/// Everything shown for the selected group, as read in one load pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupView {
    pub group: GroupInfo,
    pub members: Vec<String>,
    pub eligible_member: String,
    pub contract_balance: i128,
    pub my_contribution: i128,
    pub last_contribution: Option<u64>,
    pub is_member: bool,
    pub is_eligible: bool,
}

/// Which action controls are enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub join: bool,
    pub contribute: bool,
    pub withdraw: bool,
    pub delete: bool,
}

pub struct Mirror<L> {
    ledger: L,
    account: Option<String>,
    admin: Option<String>,
    groups: Vec<GroupInfo>,
    selected: Option<u64>,
    loaded: Option<GroupView>,
    log: EventLog,
    history: History,
    error: Option<String>,
    notice: Option<String>,
}

impl<L: Ledger> Mirror<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            account: None,
            admin: None,
            groups: Vec::new(),
            selected: None,
            loaded: None,
            log: EventLog::default(),
            history: History::default(),
            error: None,
            notice: None,
        }
    }

    /// Builds a mirror after checking that `ledger` serves the contract the
    /// deployment artifacts describe.
    pub fn with_deployment(ledger: L, deployment: &Deployment) -> Result<Self, ConfigError> {
        let actual = ledger.contract_id();
        if actual != deployment.contract_id {
            return Err(ConfigError::ContractMismatch {
                expected: deployment.contract_id.clone(),
                actual,
            });
        }
        Ok(Self::new(ledger))
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn view(&self) -> View {
        match (&self.account, self.selected, &self.loaded) {
            (None, _, _) => View::Disconnected,
            (Some(_), None, _) => View::Connected,
            (Some(_), Some(_), Some(_)) => View::GroupLoaded,
            (Some(_), Some(_), None) => View::LoadFailed,
        }
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Listed groups, in id order.
    pub fn groups(&self) -> &[GroupInfo] {
        &self.groups
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    pub fn group_view(&self) -> Option<&GroupView> {
        self.loaded.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Message for the last failure, cleared when a new action starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message for the last success, cleared when a new action starts.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn connect(&mut self, account: impl Into<String>) {
        let account = account.into();
        info!(%account, "wallet connected");
        self.account = Some(account);
        self.selected = None;
        self.loaded = None;

        if let Err(err) = self.refresh_groups() {
            error!(%err, "error fetching groups");
        }
        match self.ledger.admin() {
            Ok(admin) => self.admin = Some(admin),
            Err(err) => warn!(%err, "could not read ledger administrator"),
        }
    }

    pub fn disconnect(&mut self) {
        self.account = None;
        self.selected = None;
        self.loaded = None;
        self.history = History::default();
        self.error = None;
        self.notice = None;
    }

    /// Re-reads the group listing: ids `0..group_count` that are still live.
    pub fn refresh_groups(&mut self) -> Result<(), LedgerError> {
        let listed = self.read_groups();
        match listed {
            Ok(groups) => {
                debug!(count = groups.len(), "fetched groups");
                self.groups = groups;
                Ok(())
            }
            Err(err) => {
                self.groups.clear();
                Err(err)
            }
        }
    }

    fn read_groups(&self) -> Result<Vec<GroupInfo>, LedgerError> {
        let mut groups = Vec::new();
        for id in 0..self.ledger.group_count()? {
            match self.ledger.group(id) {
                Ok(group) if group.is_listed() => groups.push(group),
                Ok(_) | Err(LedgerError::Rejected(ContractError::GroupNotFound)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(groups)
    }

    pub fn select_group(&mut self, group_id: u64) -> Result<(), MirrorError> {
        if self.account.is_none() {
            return Err(MirrorError::NotConnected);
        }
        self.selected = Some(group_id);
        self.history = History::default();
        self.reload();
        Ok(())
    }

    /// Runs the full load sequence for the selected group, then replays its
    /// history. Read failures leave the view in [`View::LoadFailed`].
    pub fn reload(&mut self) {
        let (Some(account), Some(group_id)) = (self.account.clone(), self.selected) else {
            return;
        };

        match self.load(&account, group_id) {
            Ok(view) => self.loaded = Some(view),
            Err(err) => {
                error!(group_id, %err, "error loading contract data");
                self.loaded = None;
                self.error = Some(messages::LOAD_FAILED.to_string());
            }
        }

        match self.log.sync(&self.ledger) {
            Ok(_) => self.history = self.log.history(group_id),
            Err(err) => error!(group_id, %err, "error fetching event history"),
        }
    }

    fn load(&self, account: &str, group_id: u64) -> Result<GroupView, LedgerError> {
        let group = self.ledger.group(group_id)?;
        let members = self.ledger.members(group_id)?;
        let eligible_member = self.ledger.current_eligible_member(group_id)?;
        let contract_balance = self.ledger.contract_balance()?;
        let my_contribution = self.ledger.member_contribution(group_id, account)?;
        let last_contribution = self.ledger.last_contribution(group_id, account)?;

        let is_member = members.iter().any(|m| same_address(m, account));
        let is_eligible = same_address(&eligible_member, account);

        Ok(GroupView {
            group,
            members,
            eligible_member,
            contract_balance,
            my_contribution,
            last_contribution,
            is_member,
            is_eligible,
        })
    }

    pub fn controls(&self) -> Controls {
        let (Some(account), Some(view)) = (self.account.as_deref(), self.loaded.as_ref()) else {
            return Controls::default();
        };
        let privileged = same_address(account, &view.group.owner)
            || self
                .admin
                .as_deref()
                .is_some_and(|admin| same_address(account, admin));
        Controls {
            join: !view.is_member,
            contribute: view.is_member,
            withdraw: view.is_eligible,
            delete: privileged && view.members.len() == 1,
        }
    }

    /// Creates a group with the connected account as owner and its first
    /// contribution attached.
    pub fn create_group(&mut self, group: NewGroup) -> Result<u64, MirrorError> {
        let account = self.account.clone().ok_or(MirrorError::NotConnected)?;
        self.begin(Action::CreateGroup);

        let result = self
            .ledger
            .create_group(&account, &group, group.contribution_amount);
        match result {
            Ok(group_id) => {
                self.notice = Some(Action::CreateGroup.success_message().to_string());
                if let Err(err) = self.refresh_groups() {
                    error!(%err, "error fetching groups");
                }
                Ok(group_id)
            }
            Err(err) => Err(self.fail(Action::CreateGroup, err)),
        }
    }

    pub fn join(&mut self) -> Result<(), MirrorError> {
        let (account, view) = self.target()?;
        self.begin(Action::Join);
        let result = self
            .ledger
            .join_group(&account, view.group.id, view.group.contribution_amount);
        self.finish(Action::Join, result)
    }

    pub fn contribute(&mut self) -> Result<(), MirrorError> {
        let (account, view) = self.target()?;
        self.begin(Action::Contribute);
        let result = self.ledger.make_contribution(
            &account,
            view.group.id,
            view.group.contribution_amount,
        );
        self.finish(Action::Contribute, result)
    }

    pub fn withdraw(&mut self) -> Result<(), MirrorError> {
        let (account, view) = self.target()?;
        self.begin(Action::Withdraw);
        if view.group.balance < view.group.max_withdraw_amount {
            self.error = Some(messages::LOW_BALANCE.to_string());
            return Err(MirrorError::BalanceTooLow);
        }
        let result = self.ledger.withdraw(&account, view.group.id);
        self.finish(Action::Withdraw, result)
    }

    /// Deletes the selected group and returns to the group picker.
    pub fn delete_group(&mut self) -> Result<(), MirrorError> {
        let (account, view) = self.target()?;
        self.begin(Action::DeleteGroup);
        match self.ledger.delete_group(&account, view.group.id) {
            Ok(()) => {
                info!(group_id = view.group.id, "group deleted");
                self.notice = Some(Action::DeleteGroup.success_message().to_string());
                self.selected = None;
                self.loaded = None;
                self.history = History::default();
                if let Err(err) = self.refresh_groups() {
                    error!(%err, "error fetching groups");
                }
                Ok(())
            }
            Err(err) => Err(self.fail(Action::DeleteGroup, err)),
        }
    }

    fn target(&self) -> Result<(String, GroupView), MirrorError> {
        let account = self.account.clone().ok_or(MirrorError::NotConnected)?;
        let view = self.loaded.clone().ok_or(MirrorError::NoGroupSelected)?;
        Ok((account, view))
    }

    fn begin(&mut self, action: Action) {
        debug!(%action, "submitting request");
        self.error = None;
        self.notice = None;
    }

    fn finish(
        &mut self,
        action: Action,
        result: Result<(), LedgerError>,
    ) -> Result<(), MirrorError> {
        match result {
            Ok(()) => {
                info!(%action, "request finalized");
                self.notice = Some(action.success_message().to_string());
                self.reload();
                Ok(())
            }
            Err(err) => Err(self.fail(action, err)),
        }
    }

    fn fail(&mut self, action: Action, err: LedgerError) -> MirrorError {
        let message = messages::describe(action, &err);
        warn!(%action, %err, "request failed");
        self.error = Some(message);
        MirrorError::Ledger(err)
    }
}
