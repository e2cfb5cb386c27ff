use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};
use stylus_sdk::prelude::*;

pub mod errors;
pub mod events;
pub mod interfaces;

sol! {
    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct FlagThresholdInfo {
        uint256 event_id;
        uint256 total_flag_weight;
        uint64 non_verified_count;
        uint256 threshold_percentage;
        uint256 current_percentage;
        bool threshold_met;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct ReleaseStatus {
        uint256 event_id;
        bool can_release;
        uint8 blocker; // ReleaseBlocker as u8
        uint256 attendance_rate;
        uint256 pending_revenue;
        uint256 escrowed_stake;
        uint64 waiting_period_ends_at;
        bool flag_threshold_met;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct RefundEligibility {
        uint256 event_id;
        address account;
        bool eligible;
        uint8 reason; // RefundBlocker as u8
        uint256 ticket_refund;
        uint256 stake_share;
        uint256 total_refund;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct TicketClass {
        uint256 id;
        uint256 event_id;
        uint8 category; // TicketCategory as u8
        uint256 fee;
        address issuance;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct Registration {
        bool has_ticket;
        uint8 category;
        uint256 amount_paid;
        uint256 token_id;
        bool verified;
        bool claimed;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct Flag {
        uint8 reason; // FlagReason as u8
        string evidence;
        uint64 timestamp;
        uint64 weight;
        uint256 stake;
        bool stake_claimed;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct ReputationRecord {
        uint64 successful_events;
        uint64 scam_events;
        bool blacklisted;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct ReviewRequest {
        string explanation;
        uint64 requested_at;
    }

    /// ABI shape of a stored event.
    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct EventView {
        uint256 id;
        address organizer;
        string title;
        string description;
        string location;
        string image_uri;
        uint64 start_time;
        uint64 end_time;
        uint64 expected_attendees;
        uint8 ticket_kind;
        address payment_asset;
        uint8 attestation;
        uint64 created_at;
        uint64 registered_count;
        uint64 verified_count;
        bool revenue_released;
        bool scam_confirmed;
    }

    /// Full read model for a single event, joining registry, escrow and class data.
    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct EventInfo {
        EventView event;
        TicketClass[] ticket_classes;
        uint256 total_staked;
        uint256 pending_revenue;
        uint256 flag_stakes;
        uint256 refund_pool;
        bytes32 attestation_anchor;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct PurchaseReceipt {
        uint256 event_id;
        address buyer;
        uint8 category;
        uint256 amount_paid;
        uint256 token_id;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct BatchReceipt {
        uint256 event_id;
        address[] registered;
        address[] skipped;
        uint256 amount_charged;
    }

    /// Outcome of a successful revenue release, kept for audit.
    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct ReleaseRecord {
        uint256 event_id;
        uint64 released_at;
        uint256 organizer_amount;
        uint256 platform_fee;
        uint256 stake_returned;
        uint256 flag_stakes_forfeited;
        bool manually_released;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct ScamRecord {
        uint256 event_id;
        uint64 confirmed_at;
        string details;
        uint256 stake_at_confirmation;
        uint256 platform_share;
        uint256 refund_pool;
        uint64 registered_at_confirmation;
        // Equal collateral share owed to every registrant
        uint256 stake_share;
        uint64 refunds_claimed;
    }

    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct RefundPayout {
        uint256 ticket_refund;
        uint256 stake_share;
    }

    /// Balances moved to platform revenue once an event's refund window is over.
    #[derive(Debug, Default, PartialEq, Eq, AbiType)]
    struct SweepRecord {
        uint256 event_id;
        uint256 revenue;
        uint256 refund_pool;
        uint256 flag_stakes;
    }
}

#[cfg(feature = "export-abi")]
macro_rules! abi_structs {
    ($($ty:ident),* $(,)?) => {
        $(impl stylus_sdk::abi::export::internal::InnerTypes for $ty {})*
    };
}

#[cfg(feature = "export-abi")]
abi_structs!(
    FlagThresholdInfo,
    ReleaseStatus,
    RefundEligibility,
    TicketClass,
    Registration,
    Flag,
    ReputationRecord,
    ReviewRequest,
    EventView,
    EventInfo,
    PurchaseReceipt,
    BatchReceipt,
    ReleaseRecord,
    ScamRecord,
    RefundPayout,
    SweepRecord,
);

impl RefundPayout {
    pub fn total(&self) -> U256 {
        self.ticket_refund.saturating_add(self.stake_share)
    }
}

impl SweepRecord {
    pub fn total(&self) -> U256 {
        self.revenue
            .saturating_add(self.refund_pool)
            .saturating_add(self.flag_stakes)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketKind {
    #[default]
    Free,
    Paid,
}

impl TicketKind {
    pub fn as_u8(&self) -> u8 {
        match self {
            TicketKind::Free => 0,
            TicketKind::Paid => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TicketKind::Free),
            1 => Some(TicketKind::Paid),
            _ => None,
        }
    }
}

/// Ticket class category. `None` marks the single synthetic class of a FREE event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketCategory {
    #[default]
    None,
    Regular,
    Vip,
}

impl TicketCategory {
    pub fn as_u8(&self) -> u8 {
        match self {
            TicketCategory::None => 0,
            TicketCategory::Regular => 1,
            TicketCategory::Vip => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TicketCategory::None),
            1 => Some(TicketCategory::Regular),
            2 => Some(TicketCategory::Vip),
            _ => None,
        }
    }
}

/// Which attendance attestation strategy an event accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttestationKind {
    #[default]
    MerkleInclusion,
    SignedCode,
    TicketHolder,
}

impl AttestationKind {
    pub fn as_u8(&self) -> u8 {
        match self {
            AttestationKind::MerkleInclusion => 0,
            AttestationKind::SignedCode => 1,
            AttestationKind::TicketHolder => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(AttestationKind::MerkleInclusion),
            1 => Some(AttestationKind::SignedCode),
            2 => Some(AttestationKind::TicketHolder),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagReason {
    EventDidNotHappen,
    Misrepresented,
    Unsafe,
    Other,
}

impl FlagReason {
    pub fn as_u8(&self) -> u8 {
        match self {
            FlagReason::EventDidNotHappen => 0,
            FlagReason::Misrepresented => 1,
            FlagReason::Unsafe => 2,
            FlagReason::Other => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FlagReason::EventDidNotHappen),
            1 => Some(FlagReason::Misrepresented),
            2 => Some(FlagReason::Unsafe),
            3 => Some(FlagReason::Other),
            _ => None,
        }
    }
}

/// Organizer-supplied descriptive fields and schedule for a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_uri: String,
    pub start_time: u64,
    pub end_time: u64,
    pub expected_attendees: u64,
}

/// Typed in-memory copy of a stored event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub id: U256,
    pub organizer: Address,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_uri: String,
    pub start_time: u64,
    pub end_time: u64,
    pub expected_attendees: u64,
    pub ticket_kind: TicketKind,
    pub payment_asset: Address,
    pub attestation: AttestationKind,
    pub created_at: u64,

    // Counters, written by the registration tracker
    pub registered_count: u64,
    pub verified_count: u64,

    // Terminal flags, written once by the release engine
    pub revenue_released: bool,
    pub scam_confirmed: bool,
}

impl Event {
    pub fn has_ended(&self, now: u64) -> bool {
        now > self.end_time
    }

    pub fn has_started(&self, now: u64) -> bool {
        now >= self.start_time
    }

    pub fn is_settled(&self) -> bool {
        self.revenue_released || self.scam_confirmed
    }

    pub fn non_verified_count(&self) -> u64 {
        self.registered_count.saturating_sub(self.verified_count)
    }

    pub fn view(&self) -> EventView {
        EventView {
            id: self.id,
            organizer: self.organizer,
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            image_uri: self.image_uri.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            expected_attendees: self.expected_attendees,
            ticket_kind: self.ticket_kind.as_u8(),
            payment_asset: self.payment_asset,
            attestation: self.attestation.as_u8(),
            created_at: self.created_at,
            registered_count: self.registered_count,
            verified_count: self.verified_count,
            revenue_released: self.revenue_released,
            scam_confirmed: self.scam_confirmed,
        }
    }
}

/// Filter applied when listing an organizer's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassFilter {
    Any,
    WithTickets,
    WithoutTickets,
}

impl ClassFilter {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ClassFilter::Any),
            1 => Some(ClassFilter::WithTickets),
            2 => Some(ClassFilter::WithoutTickets),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseBlocker {
    None,
    EventNotFound,
    EventNotEnded,
    AlreadyReleased,
    ScamConfirmed,
    NoPendingRevenue,
    WaitingPeriod,
    Flagged,
}

impl ReleaseBlocker {
    pub fn as_u8(&self) -> u8 {
        match self {
            ReleaseBlocker::None => 0,
            ReleaseBlocker::EventNotFound => 1,
            ReleaseBlocker::EventNotEnded => 2,
            ReleaseBlocker::AlreadyReleased => 3,
            ReleaseBlocker::ScamConfirmed => 4,
            ReleaseBlocker::NoPendingRevenue => 5,
            ReleaseBlocker::WaitingPeriod => 6,
            ReleaseBlocker::Flagged => 7,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => ReleaseBlocker::EventNotFound,
            2 => ReleaseBlocker::EventNotEnded,
            3 => ReleaseBlocker::AlreadyReleased,
            4 => ReleaseBlocker::ScamConfirmed,
            5 => ReleaseBlocker::NoPendingRevenue,
            6 => ReleaseBlocker::WaitingPeriod,
            7 => ReleaseBlocker::Flagged,
            _ => ReleaseBlocker::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundBlocker {
    None,
    EventNotFound,
    NotScamConfirmed,
    NotRegistered,
    AlreadyClaimed,
    ClaimPeriodEnded,
    NothingToClaim,
}

impl RefundBlocker {
    pub fn as_u8(&self) -> u8 {
        match self {
            RefundBlocker::None => 0,
            RefundBlocker::EventNotFound => 1,
            RefundBlocker::NotScamConfirmed => 2,
            RefundBlocker::NotRegistered => 3,
            RefundBlocker::AlreadyClaimed => 4,
            RefundBlocker::ClaimPeriodEnded => 5,
            RefundBlocker::NothingToClaim => 6,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => RefundBlocker::EventNotFound,
            2 => RefundBlocker::NotScamConfirmed,
            3 => RefundBlocker::NotRegistered,
            4 => RefundBlocker::AlreadyClaimed,
            5 => RefundBlocker::ClaimPeriodEnded,
            6 => RefundBlocker::NothingToClaim,
            _ => RefundBlocker::None,
        }
    }
}

pub const SECONDS_PER_DAY: u64 = 24 * 3600;
pub const PERCENTAGE_BASE: u64 = 100;
