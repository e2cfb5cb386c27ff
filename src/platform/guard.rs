use stylus_sdk::{
    prelude::*,
    storage::{StorageBool, StorageMap},
};

use crate::types::errors::{ReentrantCall, Result, TicketingError};

/// Operations that move value out of custody and must not be re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GuardedOp {
    Release,
    ManualRelease,
    ConfirmScam,
    ClaimRefund,
    ClaimFlagStake,
    Withdraw,
    SweepRefunds,
}

impl GuardedOp {
    fn slot(self) -> u8 {
        self as u8
    }
}

/// Per-operation lock, so a payee re-entering a different operation is not
/// blocked but re-entering the same one is.
#[storage]
pub struct ReentrancyGuard {
    entered: StorageMap<u8, StorageBool>,
}

impl ReentrancyGuard {
    pub fn enter(&mut self, op: GuardedOp) -> Result<()> {
        if self.is_entered(op) {
            return Err(TicketingError::ReentrantCall(ReentrantCall {}));
        }
        self.entered.insert(op.slot(), true);
        Ok(())
    }

    pub fn exit(&mut self, op: GuardedOp) {
        self.entered.delete(op.slot());
    }

    pub fn is_entered(&self, op: GuardedOp) -> bool {
        self.entered.get(op.slot())
    }
}
