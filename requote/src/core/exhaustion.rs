//! Per-account exhaustion bookkeeping.
//!
//! This is the only code that writes `consecutive_empty_runs` and
//! `exhausted_accounts`. Exhaustion is one-way: nothing here removes an
//! account from the exhausted set.

use crate::core::types::AccountId;
use crate::state::RunState;

/// Effect of one [`record`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustionUpdate {
    /// Counter value after the update.
    pub consecutive_empty: u32,
    /// The account entered the exhausted set during this call.
    pub newly_exhausted: bool,
}

/// Record whether a probe of `account` found a candidate.
pub fn record(
    state: &mut RunState,
    account: &AccountId,
    found: bool,
    threshold: u32,
) -> ExhaustionUpdate {
    if found {
        state.consecutive_empty_runs.insert(account.clone(), 0);
        return ExhaustionUpdate {
            consecutive_empty: 0,
            newly_exhausted: false,
        };
    }

    let count = state.empty_runs(account).saturating_add(1);
    state.consecutive_empty_runs.insert(account.clone(), count);

    let newly_exhausted = count >= threshold && state.exhausted_accounts.insert(account.clone());
    ExhaustionUpdate {
        consecutive_empty: count,
        newly_exhausted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_runs_accumulate_until_threshold() {
        let mut state = RunState::default();
        let account = AccountId::new("b");
        for expected in 1..5 {
            let update = record(&mut state, &account, false, 5);
            assert_eq!(update.consecutive_empty, expected);
            assert!(!update.newly_exhausted);
        }
        let update = record(&mut state, &account, false, 5);
        assert_eq!(update.consecutive_empty, 5);
        assert!(update.newly_exhausted);
        assert!(state.is_exhausted(&account));
    }

    #[test]
    fn find_resets_counter() {
        let mut state = RunState::default();
        let account = AccountId::new("a");
        record(&mut state, &account, false, 5);
        record(&mut state, &account, false, 5);
        let update = record(&mut state, &account, true, 5);
        assert_eq!(update.consecutive_empty, 0);
        assert_eq!(state.empty_runs(&account), 0);
        assert!(state.consecutive_empty_runs.contains_key(&account));
    }

    #[test]
    fn find_does_not_rehabilitate_exhausted_account() {
        let mut state = RunState::default();
        let account = AccountId::new("a");
        record(&mut state, &account, false, 1);
        assert!(state.is_exhausted(&account));
        record(&mut state, &account, true, 1);
        assert!(state.is_exhausted(&account));
    }

    #[test]
    fn already_exhausted_account_is_not_reported_again() {
        let mut state = RunState::default();
        let account = AccountId::new("a");
        assert!(record(&mut state, &account, false, 1).newly_exhausted);
        let again = record(&mut state, &account, false, 1);
        assert_eq!(again.consecutive_empty, 2);
        assert!(!again.newly_exhausted);
    }
}
