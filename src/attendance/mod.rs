pub mod attestation;
pub mod registration_tracker;

pub use attestation::{
    policy_for, AttestationContext, AttestationEvidence, AttestationPolicy, MerkleInclusionPolicy,
    SignedCodePolicy, TicketHolderPolicy,
};
pub use registration_tracker::RegistrationTracker;
