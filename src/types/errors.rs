use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;
use stylus_sdk::prelude::SolidityError;

sol! {
    // Input validation
    #[derive(Debug, PartialEq, Eq)]
    error InvalidInput(string reason);
    #[derive(Debug, PartialEq, Eq)]
    error FeeOrderingViolation(uint256 regular_fee, uint256 vip_fee);
    #[derive(Debug, PartialEq, Eq)]
    error UnsupportedPaymentAsset(address asset);
    #[derive(Debug, PartialEq, Eq)]
    error InvalidTicketCategory(uint256 event_id, uint8 category);

    // Authorization
    #[derive(Debug, PartialEq, Eq)]
    error NotAuthorized(address caller);
    #[derive(Debug, PartialEq, Eq)]
    error OrganizerBlacklisted(address organizer);
    #[derive(Debug, PartialEq, Eq)]
    error ContractPaused();

    // State preconditions
    #[derive(Debug, PartialEq, Eq)]
    error EventNotFound(uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error TicketClassNotFound(uint256 event_id, uint8 category);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyExists(uint256 event_id, uint8 category);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyRegistered(address account, uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error NotRegistered(address account, uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyVerified(address account, uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyFlagged(address account, uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyReleased(uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyClaimed(address account, uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error ReviewAlreadyRequested(uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error EventNotStarted(uint256 event_id, uint64 start_time);
    #[derive(Debug, PartialEq, Eq)]
    error EventNotEnded(uint256 event_id, uint64 end_time);
    #[derive(Debug, PartialEq, Eq)]
    error EventEnded(uint256 event_id, uint64 end_time);
    #[derive(Debug, PartialEq, Eq)]
    error CapacityReached(uint256 event_id, uint64 capacity);
    #[derive(Debug, PartialEq, Eq)]
    error EventIsScam(uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error NotScamConfirmed(uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error NoPendingRevenue(uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error NothingToClaim(address account, uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error AttestationFailed(address account, uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error WaitingPeriodActive(uint256 event_id, uint256 attendance_rate, uint64 available_at);
    #[derive(Debug, PartialEq, Eq)]
    error EventFlagged(uint256 event_id, uint256 flag_percentage);
    #[derive(Debug, PartialEq, Eq)]
    error ReentrantCall();
    #[derive(Debug, PartialEq, Eq)]
    error NotSettled(uint256 event_id);
    #[derive(Debug, PartialEq, Eq)]
    error NothingToSweep(uint256 event_id);

    // Time windows
    #[derive(Debug, PartialEq, Eq)]
    error FlaggingPeriodEnded(uint256 event_id, uint64 closed_at);
    #[derive(Debug, PartialEq, Eq)]
    error ScamConfirmPeriodEnded(uint256 event_id, uint64 closed_at);
    #[derive(Debug, PartialEq, Eq)]
    error ClaimPeriodEnded(uint256 event_id, uint64 closed_at);
    #[derive(Debug, PartialEq, Eq)]
    error RefundWindowOpen(uint256 event_id, uint64 closes_at);
    #[derive(Debug, PartialEq, Eq)]
    error ScamConfirmPeriodActive(uint256 event_id, uint64 closes_at);

    // Value transfer
    #[derive(Debug, PartialEq, Eq)]
    error IncorrectPayment(uint256 expected, uint256 provided);
    #[derive(Debug, PartialEq, Eq)]
    error InsufficientFunds(address account, uint256 required, uint256 available);
    #[derive(Debug, PartialEq, Eq)]
    error TransferFailed(address account, uint256 amount);
    #[derive(Debug, PartialEq, Eq)]
    error IssuanceFailed(address issuance, address owner);
}

#[derive(SolidityError, Debug)]
pub enum TicketingError {
    InvalidInput(InvalidInput),
    FeeOrderingViolation(FeeOrderingViolation),
    UnsupportedPaymentAsset(UnsupportedPaymentAsset),
    InvalidTicketCategory(InvalidTicketCategory),

    NotAuthorized(NotAuthorized),
    OrganizerBlacklisted(OrganizerBlacklisted),
    ContractPaused(ContractPaused),

    EventNotFound(EventNotFound),
    TicketClassNotFound(TicketClassNotFound),
    AlreadyExists(AlreadyExists),
    AlreadyRegistered(AlreadyRegistered),
    NotRegistered(NotRegistered),
    AlreadyVerified(AlreadyVerified),
    AlreadyFlagged(AlreadyFlagged),
    AlreadyReleased(AlreadyReleased),
    AlreadyClaimed(AlreadyClaimed),
    ReviewAlreadyRequested(ReviewAlreadyRequested),
    EventNotStarted(EventNotStarted),
    EventNotEnded(EventNotEnded),
    EventEnded(EventEnded),
    CapacityReached(CapacityReached),
    EventIsScam(EventIsScam),
    NotScamConfirmed(NotScamConfirmed),
    NoPendingRevenue(NoPendingRevenue),
    NothingToClaim(NothingToClaim),
    AttestationFailed(AttestationFailed),
    WaitingPeriodActive(WaitingPeriodActive),
    EventFlagged(EventFlagged),
    ReentrantCall(ReentrantCall),
    NotSettled(NotSettled),
    NothingToSweep(NothingToSweep),

    FlaggingPeriodEnded(FlaggingPeriodEnded),
    ScamConfirmPeriodEnded(ScamConfirmPeriodEnded),
    ClaimPeriodEnded(ClaimPeriodEnded),
    RefundWindowOpen(RefundWindowOpen),
    ScamConfirmPeriodActive(ScamConfirmPeriodActive),

    IncorrectPayment(IncorrectPayment),
    InsufficientFunds(InsufficientFunds),
    TransferFailed(TransferFailed),
    IssuanceFailed(IssuanceFailed),
}

pub type Result<T, E = TicketingError> = core::result::Result<T, E>;

pub fn invalid_input(reason: &str) -> TicketingError {
    TicketingError::InvalidInput(InvalidInput {
        reason: reason.to_string(),
    })
}

pub fn require_valid_input(condition: bool, message: &str) -> Result<()> {
    if !condition {
        Err(invalid_input(message))
    } else {
        Ok(())
    }
}

pub fn require_authorized(condition: bool, caller: Address) -> Result<()> {
    if !condition {
        Err(TicketingError::NotAuthorized(NotAuthorized { caller }))
    } else {
        Ok(())
    }
}

/// Fails with the lazily built error when `condition` does not hold.
pub fn ensure(condition: bool, error: impl FnOnce() -> TicketingError) -> Result<()> {
    if !condition {
        Err(error())
    } else {
        Ok(())
    }
}

pub fn checked_add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b)
        .ok_or_else(|| invalid_input("Arithmetic overflow"))
}

pub fn checked_mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b)
        .ok_or_else(|| invalid_input("Arithmetic overflow"))
}

pub fn checked_sub(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b)
        .ok_or_else(|| invalid_input("Arithmetic underflow"))
}
