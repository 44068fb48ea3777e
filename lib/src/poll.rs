// SPDX-License-Identifier: MPL-2.0

//! Poll-loop policy, kept free of any rendering so it stays testable: how
//! long to wait until the next observation, and which user-visible event a
//! state change amounts to.

use crate::status::SyncState;
use std::time::Duration;

/// Poll quickly while a sync is running so progress stays fresh.
pub const SYNCING_DELAY: Duration = Duration::from_millis(1500);
/// Lazy cadence while nothing is happening.
pub const IDLE_DELAY: Duration = Duration::from_secs(10);

/// Delay before the next poll, a pure function of the just-observed state.
pub fn next_delay(state: &SyncState) -> Duration {
    if state.is_syncing() {
        SYNCING_DELAY
    } else {
        IDLE_DELAY
    }
}

/// A state change worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Completed,
    Failed,
}

/// Derive the event of moving from the prior observed state to the current
/// one. Only the end of a running sync produces an event; the prior state
/// is threaded through the loop explicitly by the caller.
pub fn transition(prev: &SyncState, next: &SyncState) -> Option<SyncEvent> {
    if !prev.is_syncing() || next.is_syncing() {
        return None;
    }
    match next {
        SyncState::Failed => Some(SyncEvent::Failed),
        // Idle, Init or an unknown token: the job is no longer running.
        _ => Some(SyncEvent::Completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_delay_is_short_while_syncing() {
        assert_eq!(next_delay(&SyncState::Syncing), SYNCING_DELAY);
        assert_eq!(next_delay(&SyncState::Idle), IDLE_DELAY);
        assert_eq!(next_delay(&SyncState::Failed), IDLE_DELAY);
        assert_eq!(
            next_delay(&SyncState::Unknown("PAUSED".to_string())),
            IDLE_DELAY
        );
    }

    #[test]
    fn test_transition_fires_only_when_a_sync_ends() {
        assert_eq!(
            transition(&SyncState::Syncing, &SyncState::Idle),
            Some(SyncEvent::Completed)
        );
        assert_eq!(
            transition(&SyncState::Syncing, &SyncState::Failed),
            Some(SyncEvent::Failed)
        );
        assert_eq!(
            transition(&SyncState::Syncing, &SyncState::Unknown("X".to_string())),
            Some(SyncEvent::Completed)
        );
        assert_eq!(transition(&SyncState::Syncing, &SyncState::Syncing), None);
        assert_eq!(transition(&SyncState::Idle, &SyncState::Failed), None);
        assert_eq!(transition(&SyncState::Failed, &SyncState::Idle), None);
        assert_eq!(transition(&SyncState::Init, &SyncState::Syncing), None);
    }
}
