#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

pub mod types;
pub mod config;
pub mod platform;
pub mod registry;
pub mod attendance;
pub mod flagging;
pub mod reputation;
pub mod revenue;
pub mod treasury;

// Re-export the main building blocks
pub use config::{FeeTier, FlagWeightPolicy, ParamStore, ProtocolParams};
pub use platform::TicketingPlatform;
pub use attendance::{AttestationEvidence, AttestationPolicy};
pub use types::errors::{Result, TicketingError};

#[cfg(feature = "export-abi")]
pub use platform::ticketing_platform::print_from_args;
