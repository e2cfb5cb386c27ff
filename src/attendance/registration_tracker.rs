use alloy_primitives::{Address, B256, U256, U8};
use stylus_sdk::{
    prelude::*,
    storage::{StorageB256, StorageBool, StorageMap, StorageU256, StorageU8},
};

use crate::types::{
    errors::{
        ensure, AlreadyClaimed, AlreadyRegistered, AlreadyVerified, CapacityReached, EventEnded,
        EventIsScam, NotRegistered, Result, TicketingError,
    },
    Event, Registration, TicketCategory,
};

#[storage]
pub struct StoredRegistration {
    has_ticket: StorageBool,
    category: StorageU8,
    amount_paid: StorageU256,
    token_id: StorageU256,
    verified: StorageBool,
    claimed: StorageBool,
}

/// Registrations keyed by (event, account), plus the per-event attestation
/// anchors organizers publish for verification.
#[storage]
pub struct RegistrationTracker {
    registrations: StorageMap<U256, StorageMap<Address, StoredRegistration>>,
    anchors: StorageMap<U256, StorageB256>,
}

impl RegistrationTracker {
    /// Event-level purchase gates, in the order they are reported.
    pub fn ensure_can_register(&self, event: &Event, account: Address, now: u64) -> Result<()> {
        ensure(!self.is_registered(event.id, account), || {
            TicketingError::AlreadyRegistered(AlreadyRegistered {
                account,
                event_id: event.id,
            })
        })?;
        ensure(!event.has_ended(now), || {
            TicketingError::EventEnded(EventEnded {
                event_id: event.id,
                end_time: event.end_time,
            })
        })?;
        ensure(event.registered_count < event.expected_attendees, || {
            TicketingError::CapacityReached(CapacityReached {
                event_id: event.id,
                capacity: event.expected_attendees,
            })
        })?;
        ensure(!event.scam_confirmed, || {
            TicketingError::EventIsScam(EventIsScam { event_id: event.id })
        })?;
        Ok(())
    }

    pub fn register(
        &mut self,
        event_id: U256,
        account: Address,
        category: TicketCategory,
        amount_paid: U256,
    ) -> Result<()> {
        ensure(!self.is_registered(event_id, account), || {
            TicketingError::AlreadyRegistered(AlreadyRegistered { account, event_id })
        })?;
        let mut by_event = self.registrations.setter(event_id);
        let mut stored = by_event.setter(account);
        stored.has_ticket.set(true);
        stored.category.set(U8::from(category.as_u8()));
        stored.amount_paid.set(amount_paid);
        Ok(())
    }

    pub fn set_token_id(&mut self, event_id: U256, account: Address, token_id: U256) -> Result<()> {
        self.require_registered(event_id, account)?;
        let mut by_event = self.registrations.setter(event_id);
        by_event.setter(account).token_id.set(token_id);
        Ok(())
    }

    /// Registered -> Verified. No way back.
    pub fn mark_verified(&mut self, event_id: U256, account: Address) -> Result<()> {
        let registration = self.require_registered(event_id, account)?;
        ensure(!registration.verified, || {
            TicketingError::AlreadyVerified(AlreadyVerified { account, event_id })
        })?;
        let mut by_event = self.registrations.setter(event_id);
        by_event.setter(account).verified.set(true);
        Ok(())
    }

    pub fn mark_claimed(&mut self, event_id: U256, account: Address) -> Result<()> {
        let registration = self.require_registered(event_id, account)?;
        ensure(!registration.claimed, || {
            TicketingError::AlreadyClaimed(AlreadyClaimed { account, event_id })
        })?;
        let mut by_event = self.registrations.setter(event_id);
        by_event.setter(account).claimed.set(true);
        Ok(())
    }

    // Attestation anchors

    pub fn set_anchor(&mut self, event_id: U256, anchor: B256) {
        self.anchors.insert(event_id, anchor);
    }

    pub fn anchor(&self, event_id: U256) -> B256 {
        self.anchors.get(event_id)
    }

    // View functions

    /// All-zero when the account never registered.
    pub fn registration(&self, event_id: U256, account: Address) -> Registration {
        let by_event = self.registrations.getter(event_id);
        let stored = by_event.getter(account);
        Registration {
            has_ticket: stored.has_ticket.get(),
            category: stored.category.get().to(),
            amount_paid: stored.amount_paid.get(),
            token_id: stored.token_id.get(),
            verified: stored.verified.get(),
            claimed: stored.claimed.get(),
        }
    }

    pub fn require_registered(&self, event_id: U256, account: Address) -> Result<Registration> {
        let registration = self.registration(event_id, account);
        ensure(registration.has_ticket, || {
            TicketingError::NotRegistered(NotRegistered { account, event_id })
        })?;
        Ok(registration)
    }

    pub fn is_registered(&self, event_id: U256, account: Address) -> bool {
        self.registrations.getter(event_id).getter(account).has_ticket.get()
    }

    pub fn is_verified(&self, event_id: U256, account: Address) -> bool {
        self.registrations.getter(event_id).getter(account).verified.get()
    }
}
