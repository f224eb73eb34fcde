//! Contribution and withdrawal history rebuilt from the ledger's event log.
//!
//! The log is append-only and immutable, so replaying it is idempotent. The
//! [`EventLog`] keeps every event it has already seen and only asks the ledger
//! for newer ones; the history it derives is the same as a replay from genesis.

use tracing::debug;

use crate::error::LedgerError;
use crate::ledger::{EventKind, Ledger, LedgerEvent};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub member: String,
    pub amount: i128,
    pub timestamp: u64,
}

impl From<&LedgerEvent> for HistoryEntry {
    fn from(event: &LedgerEvent) -> Self {
        Self {
            member: event.member.clone(),
            amount: event.amount,
            timestamp: event.timestamp,
        }
    }
}

/// One group's history, newest entry first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    pub contributions: Vec<HistoryEntry>,
    pub withdrawals: Vec<HistoryEntry>,
}

/// Builds the history of `group_id` from a slice of the log.
pub fn replay(events: &[LedgerEvent], group_id: u64) -> History {
    let mut history = History::default();
    for event in events.iter().rev().filter(|e| e.group_id == group_id) {
        match event.kind {
            EventKind::ContributionMade => history.contributions.push(event.into()),
            EventKind::FundsWithdrawn => history.withdrawals.push(event.into()),
        }
    }
    history
}

/// Local copy of the ledger's event log with a fetch cursor.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    /// Position of the next event to fetch.
    pub fn cursor(&self) -> usize {
        self.events.len()
    }

    /// Pulls every event past the cursor. Returns how many were new.
    pub fn sync<L: Ledger>(&mut self, ledger: &L) -> Result<usize, LedgerError> {
        let fresh = ledger.events(self.cursor())?;
        let count = fresh.len();
        self.events.extend(fresh);
        debug!(count, cursor = self.cursor(), "synced event log");
        Ok(count)
    }

    pub fn history(&self, group_id: u64) -> History {
        replay(&self.events, group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, group_id: u64, member: &str, timestamp: u64) -> LedgerEvent {
        LedgerEvent {
            kind,
            group_id,
            member: member.to_string(),
            amount: 1,
            timestamp,
        }
    }

    #[test]
    fn replay_filters_by_group_newest_first() {
        let log = vec![
            event(EventKind::ContributionMade, 0, "a", 1),
            event(EventKind::ContributionMade, 1, "x", 2),
            event(EventKind::ContributionMade, 0, "b", 3),
            event(EventKind::FundsWithdrawn, 0, "a", 4),
            event(EventKind::FundsWithdrawn, 1, "x", 5),
        ];

        let history = replay(&log, 0);
        let contributors: Vec<_> = history
            .contributions
            .iter()
            .map(|e| e.member.as_str())
            .collect();
        assert_eq!(contributors, ["b", "a"]);
        assert_eq!(history.withdrawals.len(), 1);
        assert_eq!(history.withdrawals[0].timestamp, 4);

        assert_eq!(replay(&log, 7), History::default());
    }

    #[test]
    fn replay_is_idempotent() {
        let log = vec![
            event(EventKind::ContributionMade, 0, "a", 1),
            event(EventKind::FundsWithdrawn, 0, "a", 2),
        ];
        assert_eq!(replay(&log, 0), replay(&log, 0));
    }
}
