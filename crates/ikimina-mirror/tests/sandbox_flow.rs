use ikimina::CONTRIBUTION_WINDOW;
use ikimina_mirror::{
    messages, ConfigError, Deployment, Ledger, LedgerError, Mirror, MirrorConfig, MirrorError, NewGroup,
    SandboxLedger, View,
};

fn family_group() -> NewGroup {
    NewGroup {
        name: "Test".to_string(),
        description: "Family savings".to_string(),
        goal: 10,
        contribution_amount: 1,
        max_withdraw_amount: 2,
    }
}

/// A mirror wired up through deployment artifacts on disk.
fn deployed(ledger: SandboxLedger) -> Mirror<SandboxLedger> {
    let dir = tempfile::tempdir().unwrap();
    let config = MirrorConfig {
        artifacts_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    ledger.deployment().store(&config).unwrap();

    let deployment = Deployment::load(&config).unwrap();
    Mirror::with_deployment(ledger, &deployment).unwrap()
}

#[test]
fn members_take_turns_withdrawing() {
    let ledger = SandboxLedger::new();
    let owner = ledger.new_account(100);
    let friend = ledger.new_account(100);
    let mut mirror = deployed(ledger);

    mirror.connect(&owner);
    assert_eq!(mirror.view(), View::Connected);
    let group_id = mirror.create_group(family_group()).unwrap();
    assert_eq!(group_id, 0);
    assert_eq!(
        mirror.notice(),
        Some("Group info created and saved to blockchain!")
    );
    assert_eq!(mirror.groups().len(), 1);
    assert_eq!(mirror.groups()[0].name, "Test");

    mirror.select_group(group_id).unwrap();
    assert_eq!(mirror.view(), View::GroupLoaded);
    let view = mirror.group_view().unwrap();
    assert!(view.is_member);
    assert!(view.is_eligible);
    assert!(mirror.controls().delete);

    mirror.connect(&friend);
    mirror.select_group(group_id).unwrap();
    assert!(mirror.controls().join);
    mirror.join().unwrap();
    assert_eq!(mirror.notice(), Some("Joined group successfully!"));

    let view = mirror.group_view().unwrap();
    assert!(view.is_member);
    assert!(!view.is_eligible);
    assert_eq!(view.members, [owner.clone(), friend.clone()]);
    assert_eq!(view.group.balance, 2);
    assert_eq!(view.contract_balance, 2);
    assert_eq!(view.my_contribution, 1);

    // joining counted as this window's contribution
    assert!(mirror.contribute().is_err());
    assert_eq!(mirror.error(), Some(messages::TOO_SOON));

    assert_eq!(
        mirror.withdraw(),
        Err(MirrorError::Ledger(LedgerError::Rejected(
            ikimina::ContractError::NotEligible
        )))
    );
    assert_eq!(mirror.error(), Some(messages::NOT_ELIGIBLE));

    mirror.connect(&owner);
    mirror.select_group(group_id).unwrap();
    mirror.withdraw().unwrap();
    assert_eq!(mirror.notice(), Some("Withdrawal successful!"));
    assert_eq!(mirror.ledger().balance_of(&owner), 101);

    let view = mirror.group_view().unwrap();
    assert_eq!(view.group.current_round, 1);
    assert_eq!(view.group.balance, 0);
    assert_eq!(view.eligible_member, friend);
    assert!(!view.is_eligible);

    let history = mirror.history();
    let contributors: Vec<_> = history
        .contributions
        .iter()
        .map(|e| e.member.as_str())
        .collect();
    assert_eq!(contributors, [friend.as_str(), owner.as_str()]);
    assert_eq!(history.withdrawals.len(), 1);
    assert_eq!(history.withdrawals[0].member, owner);
    assert_eq!(history.withdrawals[0].amount, 2);

    mirror.connect(&friend);
    mirror.select_group(group_id).unwrap();
    assert_eq!(mirror.withdraw(), Err(MirrorError::BalanceTooLow));
    assert_eq!(mirror.error(), Some(messages::LOW_BALANCE));
}

#[test]
fn contributions_reopen_after_the_window() {
    let ledger = SandboxLedger::new();
    let owner = ledger.new_account(100);
    let mut mirror = deployed(ledger);

    mirror.connect(&owner);
    let group_id = mirror.create_group(family_group()).unwrap();
    mirror.select_group(group_id).unwrap();

    mirror.ledger().advance_time(CONTRIBUTION_WINDOW - 1);
    assert!(mirror.contribute().is_err());
    assert_eq!(mirror.error(), Some(messages::TOO_SOON));

    mirror.ledger().advance_time(1);
    mirror.contribute().unwrap();
    assert_eq!(mirror.notice(), Some("Contribution successful!"));

    let view = mirror.group_view().unwrap();
    assert_eq!(view.my_contribution, 2);
    assert_eq!(view.last_contribution, Some(CONTRIBUTION_WINDOW));
    assert_eq!(mirror.history().contributions.len(), 2);
    assert_eq!(
        mirror.history().contributions[0].timestamp,
        CONTRIBUTION_WINDOW
    );
}

#[test]
fn deleted_groups_drop_out_of_the_listing() {
    let ledger = SandboxLedger::new();
    let owner = ledger.new_account(100);
    let friend = ledger.new_account(100);
    let solo = ledger.new_account(100);
    let mut mirror = deployed(ledger);

    mirror.connect(&owner);
    let shared = mirror.create_group(family_group()).unwrap();
    mirror.connect(&friend);
    mirror.select_group(shared).unwrap();
    mirror.join().unwrap();

    mirror.connect(&solo);
    let lonely = mirror
        .create_group(NewGroup {
            name: "Solo".to_string(),
            ..family_group()
        })
        .unwrap();
    assert_eq!(lonely, 1);
    assert_eq!(mirror.groups().len(), 2);
    assert_eq!(mirror.ledger().balance_of(&solo), 99);

    mirror.connect(&owner);
    mirror.select_group(shared).unwrap();
    assert!(!mirror.controls().delete);
    assert!(mirror.delete_group().is_err());
    assert_eq!(
        mirror.error(),
        Some("Error deleting group: Group still has members")
    );

    mirror.connect(&solo);
    mirror.select_group(lonely).unwrap();
    assert!(mirror.controls().delete);
    mirror.delete_group().unwrap();
    assert_eq!(mirror.notice(), Some("Group deleted!"));
    assert_eq!(mirror.view(), View::Connected);
    assert_eq!(mirror.ledger().balance_of(&solo), 100);

    let ids: Vec<_> = mirror.groups().iter().map(|g| g.id).collect();
    assert_eq!(ids, [shared]);

    mirror.select_group(lonely).unwrap();
    assert_eq!(mirror.view(), View::LoadFailed);
    assert_eq!(mirror.error(), Some(messages::LOAD_FAILED));
}

#[test]
fn rejected_creation_leaves_no_group() {
    let ledger = SandboxLedger::new();
    let owner = ledger.new_account(100);
    let mut mirror = deployed(ledger);

    mirror.connect(&owner);
    let result = mirror.create_group(NewGroup {
        name: String::new(),
        ..family_group()
    });
    assert!(result.is_err());
    assert_eq!(mirror.error(), Some("Error: Group name cannot be empty"));
    assert!(mirror.groups().is_empty());
    assert_eq!(mirror.ledger().balance_of(&owner), 100);
}

#[test]
fn administrator_deletes_a_single_member_group() {
    let ledger = SandboxLedger::new();
    let owner = ledger.new_account(100);
    let admin = ledger.admin_account();
    let mut mirror = deployed(ledger);

    mirror.connect(&owner);
    let group_id = mirror.create_group(family_group()).unwrap();
    assert_eq!(mirror.ledger().balance_of(&owner), 99);

    mirror.connect(&admin);
    mirror.select_group(group_id).unwrap();
    let view = mirror.group_view().unwrap();
    assert!(!view.is_member);
    let controls = mirror.controls();
    assert!(controls.join);
    assert!(controls.delete);

    mirror.delete_group().unwrap();
    assert_eq!(mirror.notice(), Some("Group deleted!"));
    assert!(mirror.groups().is_empty());
    assert_eq!(mirror.ledger().balance_of(&owner), 100);
    assert_eq!(mirror.ledger().balance_of(&admin), 0);
}

#[test]
fn foreign_deployment_is_refused() {
    let ledger = SandboxLedger::new();
    let mut foreign = ledger.deployment();
    foreign.contract_id = ledger.new_account(0);
    assert_ne!(foreign.contract_id, ledger.contract_id());

    let result = Mirror::with_deployment(ledger, &foreign);
    assert!(matches!(
        result,
        Err(ConfigError::ContractMismatch { expected, .. }) if expected == foreign.contract_id
    ));
}
