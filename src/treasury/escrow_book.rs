use alloy_primitives::{Address, U256};
use stylus_sdk::{
    prelude::*,
    storage::{StorageAddress, StorageMap, StorageU256, StorageVec},
};

use crate::types::errors::{checked_add, ensure, InsufficientFunds, Result, TicketingError};

/// Sub-accounts the platform keeps for one event. Sale revenue and
/// collateral are tracked apart so refund math never mixes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEscrow {
    pub organizer: Address,
    pub asset: Address,
    pub revenue: U256,
    pub stake: U256,
    pub flag_stakes: U256,
    pub refund_pool: U256,
}

impl EventEscrow {
    pub fn total(&self) -> U256 {
        self.revenue
            .saturating_add(self.stake)
            .saturating_add(self.flag_stakes)
            .saturating_add(self.refund_pool)
    }
}

#[storage]
pub struct StoredEscrow {
    organizer: StorageAddress,
    asset: StorageAddress,
    revenue: StorageU256,
    stake: StorageU256,
    flag_stakes: StorageU256,
    refund_pool: StorageU256,
}

/// Internal accounting for everything the contract holds. The sum over all
/// sub-accounts of an asset must never exceed the contract's balance.
#[storage]
pub struct EscrowBook {
    events: StorageMap<U256, StoredEscrow>,
    opened: StorageVec<StorageU256>,
    platform_revenue: StorageMap<Address, StorageU256>,
}

impl EscrowBook {
    pub fn open(&mut self, event_id: U256, organizer: Address, asset: Address) {
        let mut escrow = self.events.setter(event_id);
        if !escrow.organizer.get().is_zero() {
            return;
        }
        escrow.organizer.set(organizer);
        escrow.asset.set(asset);
        self.opened.push(event_id);
    }

    pub fn escrow(&self, event_id: U256) -> EventEscrow {
        let stored = self.events.getter(event_id);
        EventEscrow {
            organizer: stored.organizer.get(),
            asset: stored.asset.get(),
            revenue: stored.revenue.get(),
            stake: stored.stake.get(),
            flag_stakes: stored.flag_stakes.get(),
            refund_pool: stored.refund_pool.get(),
        }
    }

    pub fn revenue(&self, event_id: U256) -> U256 {
        self.events.getter(event_id).revenue.get()
    }

    pub fn stake(&self, event_id: U256) -> U256 {
        self.events.getter(event_id).stake.get()
    }

    pub fn refund_pool(&self, event_id: U256) -> U256 {
        self.events.getter(event_id).refund_pool.get()
    }

    pub fn flag_stakes(&self, event_id: U256) -> U256 {
        self.events.getter(event_id).flag_stakes.get()
    }

    /// Sale revenue held for `organizer` on `event_id`.
    pub fn organizer_revenue(&self, organizer: Address, event_id: U256) -> U256 {
        let stored = self.events.getter(event_id);
        if stored.organizer.get() != organizer {
            return U256::ZERO;
        }
        stored.revenue.get()
    }

    // Credits

    pub fn credit_revenue(&mut self, event_id: U256, amount: U256) -> Result<U256> {
        let mut escrow = self.events.setter(event_id);
        let revenue = checked_add(escrow.revenue.get(), amount)?;
        escrow.revenue.set(revenue);
        Ok(revenue)
    }

    pub fn add_stake(&mut self, event_id: U256, amount: U256) -> Result<U256> {
        let mut escrow = self.events.setter(event_id);
        let stake = checked_add(escrow.stake.get(), amount)?;
        escrow.stake.set(stake);
        Ok(stake)
    }

    pub fn add_flag_stake(&mut self, event_id: U256, amount: U256) -> Result<U256> {
        let mut escrow = self.events.setter(event_id);
        let flag_stakes = checked_add(escrow.flag_stakes.get(), amount)?;
        escrow.flag_stakes.set(flag_stakes);
        Ok(flag_stakes)
    }

    pub fn credit_platform(&mut self, asset: Address, amount: U256) -> Result<U256> {
        let balance = checked_add(self.platform_revenue.get(asset), amount)?;
        self.platform_revenue.insert(asset, balance);
        Ok(balance)
    }

    // Debits

    /// Empties the revenue sub-account.
    pub fn take_revenue(&mut self, event_id: U256) -> U256 {
        take(&mut self.events.setter(event_id).revenue)
    }

    pub fn take_stake(&mut self, event_id: U256) -> U256 {
        take(&mut self.events.setter(event_id).stake)
    }

    pub fn take_refund_pool(&mut self, event_id: U256) -> U256 {
        take(&mut self.events.setter(event_id).refund_pool)
    }

    /// Moves the event's collateral into its refund pool, skimming
    /// `platform_share` to platform revenue.
    pub fn convert_stake_to_refund_pool(&mut self, event_id: U256, platform_share: U256) -> Result<U256> {
        let escrow = self.escrow(event_id);
        let pool = escrow.stake.checked_sub(platform_share).ok_or_else(|| {
            TicketingError::InsufficientFunds(InsufficientFunds {
                account: escrow.organizer,
                required: platform_share,
                available: escrow.stake,
            })
        })?;
        let refund_pool = checked_add(escrow.refund_pool, pool)?;

        let mut stored = self.events.setter(event_id);
        stored.stake.set(U256::ZERO);
        stored.refund_pool.set(refund_pool);
        self.credit_platform(escrow.asset, platform_share)?;
        Ok(pool)
    }

    pub fn debit_revenue(&mut self, event_id: U256, amount: U256) -> Result<()> {
        let mut escrow = self.events.setter(event_id);
        let revenue = debit(escrow.organizer.get(), escrow.revenue.get(), amount)?;
        escrow.revenue.set(revenue);
        Ok(())
    }

    pub fn debit_refund_pool(&mut self, event_id: U256, amount: U256) -> Result<()> {
        let mut escrow = self.events.setter(event_id);
        let pool = debit(escrow.organizer.get(), escrow.refund_pool.get(), amount)?;
        escrow.refund_pool.set(pool);
        Ok(())
    }

    pub fn debit_flag_stakes(&mut self, event_id: U256, amount: U256) -> Result<()> {
        let mut escrow = self.events.setter(event_id);
        let flag_stakes = debit(escrow.organizer.get(), escrow.flag_stakes.get(), amount)?;
        escrow.flag_stakes.set(flag_stakes);
        Ok(())
    }

    pub fn debit_platform(&mut self, asset: Address, amount: U256) -> Result<()> {
        let balance = debit(asset, self.platform_revenue.get(asset), amount)?;
        self.platform_revenue.insert(asset, balance);
        Ok(())
    }

    // View functions

    pub fn platform_revenue(&self, asset: Address) -> U256 {
        self.platform_revenue.get(asset)
    }

    /// Everything the book says the contract owes for `asset`.
    pub fn totals(&self, asset: Address) -> U256 {
        (0..self.opened.len())
            .filter_map(|i| self.opened.get(i))
            .map(|event_id| self.escrow(event_id))
            .filter(|e| e.asset == asset)
            .fold(self.platform_revenue(asset), |sum, e| sum.saturating_add(e.total()))
    }
}

fn take(slot: &mut StorageU256) -> U256 {
    let amount = slot.get();
    slot.set(U256::ZERO);
    amount
}

fn debit(account: Address, balance: U256, amount: U256) -> Result<U256> {
    ensure(amount <= balance, || {
        TicketingError::InsufficientFunds(InsufficientFunds {
            account,
            required: amount,
            available: balance,
        })
    })?;
    Ok(balance - amount)
}
