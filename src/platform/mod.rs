pub mod guard;
pub mod ticketing_platform;

pub use guard::{GuardedOp, ReentrancyGuard};
pub use ticketing_platform::TicketingPlatform;
