use alloy_primitives::{Address, U64};
use stylus_sdk::{
    prelude::*,
    storage::{StorageBool, StorageMap, StorageU64},
};

use crate::types::ReputationRecord;

#[storage]
pub struct StoredReputation {
    successful_events: StorageU64,
    scam_events: StorageU64,
    blacklisted: StorageBool,
}

/// Per-organizer track record. Only settlement outcomes write here.
#[storage]
pub struct ReputationStore {
    records: StorageMap<Address, StoredReputation>,
}

impl ReputationStore {
    pub fn get(&self, organizer: Address) -> ReputationRecord {
        let stored = self.records.getter(organizer);
        ReputationRecord {
            successful_events: stored.successful_events.get().to(),
            scam_events: stored.scam_events.get().to(),
            blacklisted: stored.blacklisted.get(),
        }
    }

    pub fn is_blacklisted(&self, organizer: Address) -> bool {
        self.records.getter(organizer).blacklisted.get()
    }

    /// Returns the organizer's new successful event count.
    pub fn record_success(&mut self, organizer: Address) -> u64 {
        let successful = self.get(organizer).successful_events.saturating_add(1);
        self.records
            .setter(organizer)
            .successful_events
            .set(U64::from(successful));
        successful
    }

    /// Records a confirmed scam. Returns the new scam count and whether this
    /// outcome pushed the organizer onto the blacklist.
    pub fn record_scam(&mut self, organizer: Address, blacklist_threshold: u64) -> (u64, bool) {
        let record = self.get(organizer);
        let scam_events = record.scam_events.saturating_add(1);
        let newly_blacklisted = !record.blacklisted && scam_events >= blacklist_threshold;

        let mut stored = self.records.setter(organizer);
        stored.scam_events.set(U64::from(scam_events));
        if newly_blacklisted {
            stored.blacklisted.set(true);
        }
        (scam_events, newly_blacklisted)
    }

    /// Blacklisting is one-way. Returns false if already blacklisted.
    pub fn blacklist(&mut self, organizer: Address) -> bool {
        if self.is_blacklisted(organizer) {
            return false;
        }
        self.records.setter(organizer).blacklisted.set(true);
        true
    }
}
