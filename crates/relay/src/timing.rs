// Path: crates/relay/src/timing.rs
//! Round and reward-epoch time arithmetic.
//!
//! The relay consumes this interface but does not implement the deployed
//! schedule: wall-clock mapping is an external concern, and the relay's own
//! decisions only ever use the starting rounds captured in installed
//! policies. [`FixedSchedule`] is a deterministic implementation for tests
//! and embedders running a uniform schedule.

/// Pure time arithmetic mapping wall-clock seconds to rounds and epochs.
pub trait RoundTiming {
    /// The voting round in progress at `unix_secs`.
    fn round_for_time(&self, unix_secs: u64) -> u32;
    /// The reward epoch a round belongs to.
    fn epoch_for_round(&self, round_id: u32) -> u32;
    /// The first round of a reward epoch.
    fn starting_round_id(&self, reward_epoch_id: u32) -> u32;
}

/// A uniform schedule: fixed-duration rounds, a fixed number of rounds per
/// reward epoch, counted from a genesis timestamp.
///
/// Both duration fields are treated as at least 1; a zero-configured
/// schedule collapses to one-second rounds / one-round epochs instead of
/// dividing by zero.
#[derive(Debug, Clone, Copy)]
pub struct FixedSchedule {
    /// Unix timestamp of the start of round 0.
    pub genesis_unix_secs: u64,
    /// Duration of one voting round in seconds.
    pub round_duration_secs: u64,
    /// Number of rounds per reward epoch.
    pub rounds_per_epoch: u32,
}

impl RoundTiming for FixedSchedule {
    fn round_for_time(&self, unix_secs: u64) -> u32 {
        let elapsed = unix_secs.saturating_sub(self.genesis_unix_secs);
        u32::try_from(elapsed / self.round_duration_secs.max(1)).unwrap_or(u32::MAX)
    }

    fn epoch_for_round(&self, round_id: u32) -> u32 {
        round_id / self.rounds_per_epoch.max(1)
    }

    fn starting_round_id(&self, reward_epoch_id: u32) -> u32 {
        reward_epoch_id.saturating_mul(self.rounds_per_epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: FixedSchedule = FixedSchedule {
        genesis_unix_secs: 1_700_000_000,
        round_duration_secs: 90,
        rounds_per_epoch: 240,
    };

    #[test]
    fn rounds_advance_with_time() {
        assert_eq!(SCHEDULE.round_for_time(1_700_000_000), 0);
        assert_eq!(SCHEDULE.round_for_time(1_700_000_089), 0);
        assert_eq!(SCHEDULE.round_for_time(1_700_000_090), 1);
        assert_eq!(SCHEDULE.round_for_time(1_700_000_000 + 90 * 1000), 1000);
    }

    #[test]
    fn time_before_genesis_is_round_zero() {
        assert_eq!(SCHEDULE.round_for_time(0), 0);
    }

    #[test]
    fn zero_configured_schedule_does_not_panic() {
        let degenerate = FixedSchedule {
            genesis_unix_secs: 0,
            round_duration_secs: 0,
            rounds_per_epoch: 0,
        };
        // Collapses to one-second rounds and one-round epochs.
        assert_eq!(degenerate.round_for_time(17), 17);
        assert_eq!(degenerate.epoch_for_round(17), 17);
        assert_eq!(degenerate.starting_round_id(3), 0);
    }

    #[test]
    fn epoch_and_starting_round_are_inverse() {
        for epoch in [0u32, 1, 5, 77] {
            let start = SCHEDULE.starting_round_id(epoch);
            assert_eq!(SCHEDULE.epoch_for_round(start), epoch);
            if epoch > 0 {
                assert_eq!(SCHEDULE.epoch_for_round(start - 1), epoch - 1);
            }
        }
    }
}
