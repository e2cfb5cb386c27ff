use alloy_primitives::{Address, U256, U64, U8};
use stylus_sdk::{
    prelude::*,
    storage::{
        StorageAddress, StorageBool, StorageMap, StorageString, StorageU256, StorageU64, StorageU8,
        StorageVec,
    },
};

use crate::types::{
    errors::{
        ensure, require_valid_input, AlreadyClaimed, AlreadyFlagged, EventNotEnded,
        FlaggingPeriodEnded, NothingToClaim, Result, ReviewAlreadyRequested, TicketingError,
    },
    Event, Flag, FlagReason, FlagThresholdInfo, ReviewRequest, PERCENTAGE_BASE,
};

#[storage]
pub struct StoredFlag {
    reason: StorageU8,
    evidence: StorageString,
    timestamp: StorageU64,
    weight: StorageU64,
    stake: StorageU256,
    stake_claimed: StorageBool,
}

#[storage]
pub struct StoredReview {
    requested: StorageBool,
    explanation: StorageString,
    requested_at: StorageU64,
}

/// Per-account flags, cached weight totals and organizer review requests.
#[storage]
pub struct FlagAggregator {
    flags: StorageMap<U256, StorageMap<Address, StoredFlag>>,
    flaggers: StorageMap<U256, StorageVec<StorageAddress>>,
    total_weight: StorageMap<U256, StorageU64>,
    reviews: StorageMap<U256, StoredReview>,
}

impl FlagAggregator {
    /// Flagging opens when the event ends and closes `flagging_period` later.
    pub fn ensure_window_open(event: &Event, now: u64, flagging_period: u64) -> Result<()> {
        ensure(event.has_ended(now), || {
            TicketingError::EventNotEnded(EventNotEnded {
                event_id: event.id,
                end_time: event.end_time,
            })
        })?;
        let closed_at = event.end_time.saturating_add(flagging_period);
        ensure(now <= closed_at, || {
            TicketingError::FlaggingPeriodEnded(FlaggingPeriodEnded {
                event_id: event.id,
                closed_at,
            })
        })
    }

    /// Records a flag and returns the event's new total weight.
    pub fn record(
        &mut self,
        event_id: U256,
        account: Address,
        reason: FlagReason,
        evidence: &str,
        weight: u64,
        stake: U256,
        now: u64,
    ) -> Result<u64> {
        ensure(!self.has_flagged(event_id, account), || {
            TicketingError::AlreadyFlagged(AlreadyFlagged { account, event_id })
        })?;
        require_valid_input(weight > 0, "Flag weight must be positive")?;

        let mut by_event = self.flags.setter(event_id);
        let mut stored = by_event.setter(account);
        stored.reason.set(U8::from(reason.as_u8()));
        stored.evidence.set_str(evidence);
        stored.timestamp.set(U64::from(now));
        stored.weight.set(U64::from(weight));
        stored.stake.set(stake);

        self.flaggers.setter(event_id).push(account);

        let total = self.total_weight(event_id).saturating_add(weight);
        self.total_weight.insert(event_id, U64::from(total));
        Ok(total)
    }

    /// Marks a flagger's stake as returned and yields the amount owed.
    pub fn take_stake(&mut self, event_id: U256, account: Address) -> Result<U256> {
        let mut by_event = self.flags.setter(event_id);
        let mut stored = by_event.setter(account);
        let stake = stored.stake.get();
        ensure(stake > U256::ZERO, || {
            TicketingError::NothingToClaim(NothingToClaim { account, event_id })
        })?;
        ensure(!stored.stake_claimed.get(), || {
            TicketingError::AlreadyClaimed(AlreadyClaimed { account, event_id })
        })?;
        stored.stake_claimed.set(true);
        Ok(stake)
    }

    /// Closes out every unclaimed flag stake on the event, returning the sum.
    pub fn forfeit_stakes(&mut self, event_id: U256) -> U256 {
        let accounts: Vec<Address> = {
            let flaggers = self.flaggers.getter(event_id);
            (0..flaggers.len()).filter_map(|i| flaggers.get(i)).collect()
        };
        let mut by_event = self.flags.setter(event_id);
        accounts.into_iter().fold(U256::ZERO, |sum, account| {
            let mut stored = by_event.setter(account);
            let stake = stored.stake.get();
            if stored.stake_claimed.get() || stake.is_zero() {
                return sum;
            }
            stored.stake_claimed.set(true);
            sum.saturating_add(stake)
        })
    }

    pub fn request_review(&mut self, event_id: U256, explanation: &str, now: u64) -> Result<()> {
        ensure(self.review(event_id).is_none(), || {
            TicketingError::ReviewAlreadyRequested(ReviewAlreadyRequested { event_id })
        })?;
        let mut stored = self.reviews.setter(event_id);
        stored.requested.set(true);
        stored.explanation.set_str(explanation);
        stored.requested_at.set(U64::from(now));
        Ok(())
    }

    // View functions

    pub fn has_flagged(&self, event_id: U256, account: Address) -> bool {
        self.flags.getter(event_id).getter(account).weight.get() > U64::ZERO
    }

    pub fn flag(&self, event_id: U256, account: Address) -> Option<Flag> {
        if !self.has_flagged(event_id, account) {
            return None;
        }
        let by_event = self.flags.getter(event_id);
        let stored = by_event.getter(account);
        Some(Flag {
            reason: stored.reason.get().to(),
            evidence: stored.evidence.get_string(),
            timestamp: stored.timestamp.get().to(),
            weight: stored.weight.get().to(),
            stake: stored.stake.get(),
            stake_claimed: stored.stake_claimed.get(),
        })
    }

    pub fn total_weight(&self, event_id: U256) -> u64 {
        self.total_weight.get(event_id).to()
    }

    pub fn review(&self, event_id: U256) -> Option<ReviewRequest> {
        let stored = self.reviews.getter(event_id);
        stored.requested.get().then(|| ReviewRequest {
            explanation: stored.explanation.get_string(),
            requested_at: stored.requested_at.get().to(),
        })
    }

    /// Flag weight as a percentage of non-verified registrants, `None` when
    /// every registrant verified.
    pub fn flag_percentage(&self, event: &Event) -> Option<u64> {
        let non_verified = event.non_verified_count();
        if non_verified == 0 {
            return None;
        }
        Some(self.total_weight(event.id).saturating_mul(PERCENTAGE_BASE) / non_verified)
    }

    pub fn threshold_met(&self, event: &Event, threshold_percentage: u64) -> bool {
        self.flag_percentage(event)
            .map(|pct| pct >= threshold_percentage)
            .unwrap_or(false)
    }

    pub fn threshold_info(&self, event: &Event, threshold_percentage: u64) -> FlagThresholdInfo {
        FlagThresholdInfo {
            event_id: event.id,
            total_flag_weight: U256::from(self.total_weight(event.id)),
            non_verified_count: event.non_verified_count(),
            threshold_percentage: U256::from(threshold_percentage),
            current_percentage: U256::from(self.flag_percentage(event).unwrap_or(0)),
            threshold_met: self.threshold_met(event, threshold_percentage),
        }
    }
}
