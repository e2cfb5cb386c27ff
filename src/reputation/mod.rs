pub mod reputation_store;
pub mod stake_calculator;

pub use reputation_store::ReputationStore;
pub use stake_calculator::StakeCalculator;
