use alloy_primitives::{Address, U256};

use crate::{
    config::ProtocolParams,
    types::{
        errors::{checked_mul, OrganizerBlacklisted, Result, TicketingError},
        ReputationRecord, TicketKind, PERCENTAGE_BASE,
    },
};

/// Sizes organizer collateral from expected revenue and track record.
pub struct StakeCalculator<'a> {
    params: &'a ProtocolParams,
}

impl<'a> StakeCalculator<'a> {
    pub fn new(params: &'a ProtocolParams) -> Self {
        Self { params }
    }

    /// Percentage of expected revenue to lock, after the newcomer premium and
    /// the bounded reputation discount. Never below the configured floor.
    pub fn stake_percentage(&self, record: &ReputationRecord) -> u64 {
        let mut percentage = self.params.stake_percentage;
        if record.successful_events == 0 {
            percentage += self.params.new_organizer_penalty;
        }

        let discount = record
            .successful_events
            .saturating_mul(self.params.discount_per_success)
            .min(self.params.max_discount);

        percentage
            .saturating_sub(discount)
            .max(self.params.min_stake_percentage)
    }

    pub fn required_stake(
        &self,
        organizer: Address,
        record: &ReputationRecord,
        expected_attendees: u64,
        ticket_kind: TicketKind,
        ticket_fee: U256,
    ) -> Result<U256> {
        if record.blacklisted {
            return Err(TicketingError::OrganizerBlacklisted(OrganizerBlacklisted {
                organizer,
            }));
        }
        if ticket_kind == TicketKind::Free {
            return Ok(U256::ZERO);
        }

        let expected_revenue = checked_mul(U256::from(expected_attendees), ticket_fee)?;
        let stake = checked_mul(expected_revenue, U256::from(self.stake_percentage(record)))?;
        Ok(stake / U256::from(PERCENTAGE_BASE))
    }
}
