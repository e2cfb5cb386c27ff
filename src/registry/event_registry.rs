use alloy_primitives::{Address, U256, U64, U8};
use stylus_sdk::{
    prelude::*,
    storage::{
        StorageAddress, StorageBool, StorageMap, StorageString, StorageU256, StorageU64,
        StorageU8, StorageVec,
    },
};

use crate::{
    config::ProtocolParams,
    types::{
        errors::{
            ensure, require_authorized, require_valid_input, AlreadyExists, CapacityReached,
            EventNotFound, FeeOrderingViolation, InvalidTicketCategory, Result, TicketClassNotFound,
            TicketingError,
        },
        AttestationKind, ClassFilter, Event, EventDetails, TicketCategory, TicketClass, TicketKind,
    },
};

const CATEGORIES: [TicketCategory; 3] =
    [TicketCategory::None, TicketCategory::Regular, TicketCategory::Vip];

#[storage]
pub struct StoredEvent {
    organizer: StorageAddress,
    title: StorageString,
    description: StorageString,
    location: StorageString,
    image_uri: StorageString,
    start_time: StorageU64,
    end_time: StorageU64,
    expected_attendees: StorageU64,
    ticket_kind: StorageU8,
    payment_asset: StorageAddress,
    attestation: StorageU8,
    created_at: StorageU64,

    // Counters, written by the registration tracker
    registered_count: StorageU64,
    verified_count: StorageU64,

    // Terminal flags, written once by the release engine
    revenue_released: StorageBool,
    scam_confirmed: StorageBool,
}

#[storage]
pub struct StoredTicketClass {
    event_id: StorageU256,
    category: StorageU8,
    fee: StorageU256,
    issuance: StorageAddress,
}

/// Owns every Event and TicketClass. Both live in flat tables keyed by
/// integer id; a class refers back to its event by id only.
#[storage]
pub struct EventRegistry {
    // Core event storage
    events: StorageMap<U256, StoredEvent>,
    event_count: StorageU256,
    organizer_events: StorageMap<Address, StorageVec<StorageU256>>,

    // Ticket classes
    classes: StorageMap<U256, StoredTicketClass>,
    class_count: StorageU256,
    class_index: StorageMap<U256, StorageMap<u8, StorageU256>>,
}

impl EventRegistry {
    pub fn validate_details(params: &ProtocolParams, details: &EventDetails, now: u64) -> Result<()> {
        require_valid_input(!details.title.trim().is_empty(), "Title required")?;
        require_valid_input(details.title.len() <= params.max_title_length, "Title too long")?;
        require_valid_input(!details.description.trim().is_empty(), "Description required")?;
        require_valid_input(
            details.description.len() <= params.max_description_length,
            "Description too long",
        )?;
        require_valid_input(
            details.location.len() <= params.max_location_length,
            "Location too long",
        )?;
        require_valid_input(
            details.image_uri.len() <= params.max_image_uri_length,
            "Image URI too long",
        )?;
        require_valid_input(details.start_time >= now, "Start time must not be in the past")?;
        require_valid_input(
            details.start_time < details.end_time,
            "End time must be after start time",
        )?;
        require_valid_input(
            details.expected_attendees >= params.min_expected_attendees,
            "Too few expected attendees",
        )?;
        Ok(())
    }

    /// Persists a validated event and returns its id.
    pub fn insert_event(
        &mut self,
        organizer: Address,
        details: EventDetails,
        ticket_kind: TicketKind,
        payment_asset: Address,
        attestation: AttestationKind,
        now: u64,
    ) -> U256 {
        let event_id = self.event_count.get() + U256::from(1);
        self.event_count.set(event_id);

        let mut stored = self.events.setter(event_id);
        stored.organizer.set(organizer);
        stored.title.set_str(&details.title);
        stored.description.set_str(&details.description);
        stored.location.set_str(&details.location);
        stored.image_uri.set_str(&details.image_uri);
        stored.start_time.set(U64::from(details.start_time));
        stored.end_time.set(U64::from(details.end_time));
        stored.expected_attendees.set(U64::from(details.expected_attendees));
        stored.ticket_kind.set(U8::from(ticket_kind.as_u8()));
        stored.payment_asset.set(payment_asset);
        stored.attestation.set(U8::from(attestation.as_u8()));
        stored.created_at.set(U64::from(now));

        self.organizer_events.setter(organizer).push(event_id);
        event_id
    }

    pub fn create_ticket_class(
        &mut self,
        caller: Address,
        event_id: U256,
        category: TicketCategory,
        fee: U256,
        issuance: Address,
    ) -> Result<U256> {
        let event = self.get(event_id)?;
        require_authorized(caller == event.organizer, caller)?;
        require_valid_input(!issuance.is_zero(), "Invalid issuance handle")?;

        let invalid_category = || {
            TicketingError::InvalidTicketCategory(InvalidTicketCategory {
                event_id,
                category: category.as_u8(),
            })
        };
        match event.ticket_kind {
            TicketKind::Free => {
                ensure(category == TicketCategory::None, invalid_category)?;
                require_valid_input(fee.is_zero(), "Free tickets carry no fee")?;
            }
            TicketKind::Paid => {
                ensure(category != TicketCategory::None, invalid_category)?;
                require_valid_input(fee > U256::ZERO, "Fee must be positive")?;
            }
        }

        ensure(self.class_id(event_id, category).is_zero(), || {
            TicketingError::AlreadyExists(AlreadyExists {
                event_id,
                category: category.as_u8(),
            })
        })?;

        // REGULAR must stay strictly cheaper than VIP
        let (regular_fee, vip_fee) = match category {
            TicketCategory::Regular => (
                Some(fee),
                self.find_class(event_id, TicketCategory::Vip).map(|c| c.fee),
            ),
            TicketCategory::Vip => (
                self.find_class(event_id, TicketCategory::Regular).map(|c| c.fee),
                Some(fee),
            ),
            TicketCategory::None => (None, None),
        };
        if let (Some(regular_fee), Some(vip_fee)) = (regular_fee, vip_fee) {
            ensure(regular_fee < vip_fee, || {
                TicketingError::FeeOrderingViolation(FeeOrderingViolation { regular_fee, vip_fee })
            })?;
        }

        let class_id = self.class_count.get() + U256::from(1);
        self.class_count.set(class_id);

        let mut stored = self.classes.setter(class_id);
        stored.event_id.set(event_id);
        stored.category.set(U8::from(category.as_u8()));
        stored.fee.set(fee);
        stored.issuance.set(issuance);

        self.class_index
            .setter(event_id)
            .insert(category.as_u8(), class_id);
        Ok(class_id)
    }

    // Counter updates

    pub fn record_registration(&mut self, event_id: U256) -> Result<u64> {
        self.require_exists(event_id)?;
        let mut stored = self.events.setter(event_id);
        let registered = stored.registered_count.get().to::<u64>();
        let capacity = stored.expected_attendees.get().to::<u64>();
        ensure(registered < capacity, || {
            TicketingError::CapacityReached(CapacityReached { event_id, capacity })
        })?;
        stored.registered_count.set(U64::from(registered + 1));
        Ok(registered + 1)
    }

    pub fn record_verification(&mut self, event_id: U256) -> Result<u64> {
        self.require_exists(event_id)?;
        let mut stored = self.events.setter(event_id);
        let verified = stored.verified_count.get().to::<u64>();
        require_valid_input(
            verified < stored.registered_count.get().to::<u64>(),
            "Verified count would exceed registrations",
        )?;
        stored.verified_count.set(U64::from(verified + 1));
        Ok(verified + 1)
    }

    // Terminal flags

    pub fn mark_released(&mut self, event_id: U256) -> Result<()> {
        require_valid_input(!self.get(event_id)?.is_settled(), "Event already settled")?;
        self.events.setter(event_id).revenue_released.set(true);
        Ok(())
    }

    pub fn mark_scam_confirmed(&mut self, event_id: U256) -> Result<()> {
        require_valid_input(!self.get(event_id)?.is_settled(), "Event already settled")?;
        self.events.setter(event_id).scam_confirmed.set(true);
        Ok(())
    }

    // View functions

    fn require_exists(&self, event_id: U256) -> Result<()> {
        ensure(
            !event_id.is_zero() && event_id <= self.event_count.get(),
            || TicketingError::EventNotFound(EventNotFound { event_id }),
        )
    }

    pub fn get(&self, event_id: U256) -> Result<Event> {
        self.require_exists(event_id)?;
        let stored = self.events.getter(event_id);
        Ok(Event {
            id: event_id,
            organizer: stored.organizer.get(),
            title: stored.title.get_string(),
            description: stored.description.get_string(),
            location: stored.location.get_string(),
            image_uri: stored.image_uri.get_string(),
            start_time: stored.start_time.get().to(),
            end_time: stored.end_time.get().to(),
            expected_attendees: stored.expected_attendees.get().to(),
            ticket_kind: TicketKind::from_u8(stored.ticket_kind.get().to()).unwrap_or_default(),
            payment_asset: stored.payment_asset.get(),
            attestation: AttestationKind::from_u8(stored.attestation.get().to()).unwrap_or_default(),
            created_at: stored.created_at.get().to(),
            registered_count: stored.registered_count.get().to(),
            verified_count: stored.verified_count.get().to(),
            revenue_released: stored.revenue_released.get(),
            scam_confirmed: stored.scam_confirmed.get(),
        })
    }

    /// Highest event id handed out so far; ids run from 1 without gaps.
    pub fn last_event_id(&self) -> U256 {
        self.event_count.get()
    }

    pub fn ticket_class(&self, event_id: U256, category: TicketCategory) -> Result<TicketClass> {
        self.find_class(event_id, category).ok_or(TicketingError::TicketClassNotFound(
            TicketClassNotFound {
                event_id,
                category: category.as_u8(),
            },
        ))
    }

    fn class_id(&self, event_id: U256, category: TicketCategory) -> U256 {
        self.class_index.getter(event_id).get(category.as_u8())
    }

    fn find_class(&self, event_id: U256, category: TicketCategory) -> Option<TicketClass> {
        let class_id = self.class_id(event_id, category);
        if class_id.is_zero() {
            return None;
        }
        let stored = self.classes.getter(class_id);
        Some(TicketClass {
            id: class_id,
            event_id: stored.event_id.get(),
            category: stored.category.get().to(),
            fee: stored.fee.get(),
            issuance: stored.issuance.get(),
        })
    }

    pub fn ticket_classes(&self, event_id: U256) -> Vec<TicketClass> {
        CATEGORIES
            .iter()
            .filter_map(|category| self.find_class(event_id, *category))
            .collect()
    }

    pub fn has_ticket_classes(&self, event_id: U256) -> bool {
        CATEGORIES
            .iter()
            .any(|category| !self.class_id(event_id, *category).is_zero())
    }

    pub fn events_by_organizer(&self, organizer: Address, filter: ClassFilter) -> Vec<Event> {
        let ids = self.organizer_events.getter(organizer);
        (0..ids.len())
            .filter_map(|i| ids.get(i))
            .filter(|id| match filter {
                ClassFilter::Any => true,
                ClassFilter::WithTickets => self.has_ticket_classes(*id),
                ClassFilter::WithoutTickets => !self.has_ticket_classes(*id),
            })
            .filter_map(|id| self.get(id).ok())
            .collect()
    }

    /// Events that can still sell tickets: at least one class and not ended.
    pub fn valid_events(&self, now: u64) -> Vec<Event> {
        let last = self.last_event_id().to::<u64>();
        (1..=last)
            .map(U256::from)
            .filter(|id| self.has_ticket_classes(*id))
            .filter_map(|id| self.get(id).ok())
            .filter(|event| !event.has_ended(now))
            .collect()
    }
}
