use alloy_primitives::{U256, U64};
use stylus_sdk::{
    prelude::*,
    storage::{StorageBool, StorageMap, StorageString, StorageU256, StorageU64},
};

use crate::types::{ReleaseRecord, ScamRecord};

#[storage]
pub struct StoredRelease {
    recorded: StorageBool,
    released_at: StorageU64,
    organizer_amount: StorageU256,
    platform_fee: StorageU256,
    stake_returned: StorageU256,
    flag_stakes_forfeited: StorageU256,
    manually_released: StorageBool,
}

#[storage]
pub struct StoredScam {
    recorded: StorageBool,
    confirmed_at: StorageU64,
    details: StorageString,
    stake_at_confirmation: StorageU256,
    platform_share: StorageU256,
    refund_pool: StorageU256,
    registered_at_confirmation: StorageU64,
    stake_share: StorageU256,
    refunds_claimed: StorageU64,
}

/// Terminal outcomes per event. Each event gets at most one entry, in one of
/// the two tables.
#[storage]
pub struct SettlementBook {
    releases: StorageMap<U256, StoredRelease>,
    scams: StorageMap<U256, StoredScam>,
}

impl SettlementBook {
    pub fn record_release(&mut self, record: &ReleaseRecord) {
        let mut stored = self.releases.setter(record.event_id);
        stored.recorded.set(true);
        stored.released_at.set(U64::from(record.released_at));
        stored.organizer_amount.set(record.organizer_amount);
        stored.platform_fee.set(record.platform_fee);
        stored.stake_returned.set(record.stake_returned);
        stored.flag_stakes_forfeited.set(record.flag_stakes_forfeited);
        stored.manually_released.set(record.manually_released);
    }

    pub fn record_scam(&mut self, record: &ScamRecord) {
        let mut stored = self.scams.setter(record.event_id);
        stored.recorded.set(true);
        stored.confirmed_at.set(U64::from(record.confirmed_at));
        stored.details.set_str(&record.details);
        stored.stake_at_confirmation.set(record.stake_at_confirmation);
        stored.platform_share.set(record.platform_share);
        stored.refund_pool.set(record.refund_pool);
        stored
            .registered_at_confirmation
            .set(U64::from(record.registered_at_confirmation));
        stored.stake_share.set(record.stake_share);
        stored.refunds_claimed.set(U64::from(record.refunds_claimed));
    }

    /// Counts one more paid-out refund and returns the running total.
    pub fn note_refund_claimed(&mut self, event_id: U256) -> u64 {
        let mut stored = self.scams.setter(event_id);
        let claimed = stored.refunds_claimed.get().to::<u64>().saturating_add(1);
        stored.refunds_claimed.set(U64::from(claimed));
        claimed
    }

    pub fn release(&self, event_id: U256) -> Option<ReleaseRecord> {
        let stored = self.releases.getter(event_id);
        stored.recorded.get().then(|| ReleaseRecord {
            event_id,
            released_at: stored.released_at.get().to(),
            organizer_amount: stored.organizer_amount.get(),
            platform_fee: stored.platform_fee.get(),
            stake_returned: stored.stake_returned.get(),
            flag_stakes_forfeited: stored.flag_stakes_forfeited.get(),
            manually_released: stored.manually_released.get(),
        })
    }

    pub fn scam(&self, event_id: U256) -> Option<ScamRecord> {
        let stored = self.scams.getter(event_id);
        stored.recorded.get().then(|| ScamRecord {
            event_id,
            confirmed_at: stored.confirmed_at.get().to(),
            details: stored.details.get_string(),
            stake_at_confirmation: stored.stake_at_confirmation.get(),
            platform_share: stored.platform_share.get(),
            refund_pool: stored.refund_pool.get(),
            registered_at_confirmation: stored.registered_at_confirmation.get().to(),
            stake_share: stored.stake_share.get(),
            refunds_claimed: stored.refunds_claimed.get().to(),
        })
    }
}
