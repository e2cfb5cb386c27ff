//! Protocol parameters.
//!
//! Every tunable constant of the staking, flagging and release rules lives
//! here. Defaults match the production deployment; the owner may replace them
//! at runtime through `TicketingPlatform::update_params`, which takes the
//! JSON form. On chain they live in [`ParamStore`].

use alloy_primitives::{U256, U64, U8};
use serde::{Deserialize, Serialize};
use stylus_sdk::{
    prelude::*,
    storage::{StorageU256, StorageU64, StorageU8, StorageVec},
};

use crate::types::{
    errors::{invalid_input, require_valid_input, Result},
    TicketCategory, SECONDS_PER_DAY,
};

/// Flat service fee charged at creation for FREE events with more than
/// `above_attendees` expected attendees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    pub above_attendees: u64,
    pub fee: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagWeightPolicy {
    /// Every flag counts once.
    Uniform,
    /// VIP ticket holders' flags count double.
    TierWeighted,
}

impl FlagWeightPolicy {
    pub fn as_u8(&self) -> u8 {
        match self {
            FlagWeightPolicy::Uniform => 0,
            FlagWeightPolicy::TierWeighted => 1,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FlagWeightPolicy::TierWeighted,
            _ => FlagWeightPolicy::Uniform,
        }
    }

    pub fn weight_for(&self, category: Option<TicketCategory>) -> u64 {
        match (self, category) {
            (FlagWeightPolicy::TierWeighted, Some(TicketCategory::Vip)) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    // Stake sizing (percent of expected revenue)
    pub stake_percentage: u64,
    pub new_organizer_penalty: u64,
    pub discount_per_success: u64,
    pub max_discount: u64,
    pub min_stake_percentage: u64,
    pub initial_event_stake: U256,

    // Event validation
    pub min_expected_attendees: u64,
    pub max_title_length: usize,
    pub max_description_length: usize,
    pub max_location_length: usize,
    pub max_image_uri_length: usize,
    pub max_evidence_length: usize,
    pub max_explanation_length: usize,
    pub max_scam_details_length: usize,

    // Release gates
    pub minimum_attendance_rate: u64,
    pub flag_threshold_percentage: u64,
    pub flagging_period: u64,
    pub scam_confirm_period: u64,
    pub claim_period: Option<u64>,

    // Fees
    pub release_fee_percentage: u64,
    pub scam_stake_fee_percentage: u64,
    pub free_event_fee_tiers: Vec<FeeTier>,

    // Flagging and reputation
    pub scam_blacklist_threshold: u64,
    pub flag_stake: U256,
    pub flag_weight_policy: FlagWeightPolicy,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            stake_percentage: 20,
            new_organizer_penalty: 10,
            discount_per_success: 5,
            max_discount: 15,
            min_stake_percentage: 5,
            initial_event_stake: U256::from(50),

            min_expected_attendees: 5,
            max_title_length: 100,
            max_description_length: 1000,
            max_location_length: 200,
            max_image_uri_length: 300,
            max_evidence_length: 500,
            max_explanation_length: 1000,
            max_scam_details_length: 1000,

            minimum_attendance_rate: 60,
            flag_threshold_percentage: 70,
            flagging_period: 4 * SECONDS_PER_DAY,
            scam_confirm_period: 30 * SECONDS_PER_DAY,
            claim_period: None,

            release_fee_percentage: 5,
            scam_stake_fee_percentage: 10,
            free_event_fee_tiers: vec![
                FeeTier { above_attendees: 100, fee: U256::from(10) },
                FeeTier { above_attendees: 500, fee: U256::from(40) },
                FeeTier { above_attendees: 1000, fee: U256::from(100) },
            ],

            scam_blacklist_threshold: 2,
            flag_stake: U256::ZERO,
            flag_weight_policy: FlagWeightPolicy::Uniform,
        }
    }
}

impl ProtocolParams {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: ProtocolParams = serde_json::from_str(json)
            .map_err(|e| invalid_input(&format!("Invalid params JSON: {}", e)))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        for pct in [
            self.stake_percentage,
            self.new_organizer_penalty,
            self.max_discount,
            self.minimum_attendance_rate,
            self.scam_stake_fee_percentage,
        ] {
            require_valid_input(pct <= 100, "Percentage above 100")?;
        }
        require_valid_input(self.release_fee_percentage <= 10, "Fee too high")?; // Max 10%
        require_valid_input(
            self.flag_threshold_percentage > 0 && self.flag_threshold_percentage <= 100,
            "Flag threshold must be within 1-100",
        )?;
        require_valid_input(self.min_stake_percentage > 0, "Minimum stake must be positive")?;
        require_valid_input(
            self.min_stake_percentage <= self.stake_percentage + self.new_organizer_penalty,
            "Minimum stake above maximum stake",
        )?;
        require_valid_input(self.min_expected_attendees > 0, "Attendee minimum must be positive")?;
        require_valid_input(self.flagging_period > 0, "Flagging period must be positive")?;
        require_valid_input(self.scam_confirm_period > 0, "Scam confirm period must be positive")?;
        require_valid_input(self.claim_period != Some(0), "Claim period must be positive")?;
        require_valid_input(
            self.scam_blacklist_threshold > 0,
            "Blacklist threshold must be positive",
        )?;
        require_valid_input(
            self.free_event_fee_tiers
                .windows(2)
                .all(|pair| pair[0].above_attendees < pair[1].above_attendees),
            "Fee tiers must be strictly ascending",
        )?;
        Ok(())
    }

    /// The flat fee owed by a FREE event of the given size, if any.
    pub fn free_event_fee(&self, expected_attendees: u64) -> U256 {
        self.free_event_fee_tiers
            .iter()
            .rev()
            .find(|tier| expected_attendees > tier.above_attendees)
            .map(|tier| tier.fee)
            .unwrap_or(U256::ZERO)
    }
}

/// Storage layout of [`ProtocolParams`].
#[storage]
pub struct ParamStore {
    stake_percentage: StorageU64,
    new_organizer_penalty: StorageU64,
    discount_per_success: StorageU64,
    max_discount: StorageU64,
    min_stake_percentage: StorageU64,
    initial_event_stake: StorageU256,

    min_expected_attendees: StorageU64,
    max_title_length: StorageU64,
    max_description_length: StorageU64,
    max_location_length: StorageU64,
    max_image_uri_length: StorageU64,
    max_evidence_length: StorageU64,
    max_explanation_length: StorageU64,
    max_scam_details_length: StorageU64,

    minimum_attendance_rate: StorageU64,
    flag_threshold_percentage: StorageU64,
    flagging_period: StorageU64,
    scam_confirm_period: StorageU64,
    claim_period: StorageU64, // zero means unlimited

    release_fee_percentage: StorageU64,
    scam_stake_fee_percentage: StorageU64,
    fee_tier_thresholds: StorageVec<StorageU64>,
    fee_tier_fees: StorageVec<StorageU256>,

    scam_blacklist_threshold: StorageU64,
    flag_stake: StorageU256,
    flag_weight_policy: StorageU8,
}

fn word(value: u64) -> U64 {
    U64::from(value)
}

fn length(value: usize) -> U64 {
    U64::from(value as u64)
}

impl ParamStore {
    pub fn load(&self) -> ProtocolParams {
        let free_event_fee_tiers = (0..self.fee_tier_thresholds.len())
            .filter_map(|i| {
                let above_attendees = self.fee_tier_thresholds.get(i)?;
                let fee = self.fee_tier_fees.get(i)?;
                Some(FeeTier {
                    above_attendees: above_attendees.to::<u64>(),
                    fee,
                })
            })
            .collect();
        let claim_period = self.claim_period.get().to::<u64>();

        ProtocolParams {
            stake_percentage: self.stake_percentage.get().to(),
            new_organizer_penalty: self.new_organizer_penalty.get().to(),
            discount_per_success: self.discount_per_success.get().to(),
            max_discount: self.max_discount.get().to(),
            min_stake_percentage: self.min_stake_percentage.get().to(),
            initial_event_stake: self.initial_event_stake.get(),

            min_expected_attendees: self.min_expected_attendees.get().to(),
            max_title_length: self.max_title_length.get().to::<u64>() as usize,
            max_description_length: self.max_description_length.get().to::<u64>() as usize,
            max_location_length: self.max_location_length.get().to::<u64>() as usize,
            max_image_uri_length: self.max_image_uri_length.get().to::<u64>() as usize,
            max_evidence_length: self.max_evidence_length.get().to::<u64>() as usize,
            max_explanation_length: self.max_explanation_length.get().to::<u64>() as usize,
            max_scam_details_length: self.max_scam_details_length.get().to::<u64>() as usize,

            minimum_attendance_rate: self.minimum_attendance_rate.get().to(),
            flag_threshold_percentage: self.flag_threshold_percentage.get().to(),
            flagging_period: self.flagging_period.get().to(),
            scam_confirm_period: self.scam_confirm_period.get().to(),
            claim_period: (claim_period > 0).then_some(claim_period),

            release_fee_percentage: self.release_fee_percentage.get().to(),
            scam_stake_fee_percentage: self.scam_stake_fee_percentage.get().to(),
            free_event_fee_tiers,

            scam_blacklist_threshold: self.scam_blacklist_threshold.get().to(),
            flag_stake: self.flag_stake.get(),
            flag_weight_policy: FlagWeightPolicy::from_u8(self.flag_weight_policy.get().to()),
        }
    }

    /// Overwrites every stored parameter. Callers validate first.
    pub fn save(&mut self, params: &ProtocolParams) {
        self.stake_percentage.set(word(params.stake_percentage));
        self.new_organizer_penalty.set(word(params.new_organizer_penalty));
        self.discount_per_success.set(word(params.discount_per_success));
        self.max_discount.set(word(params.max_discount));
        self.min_stake_percentage.set(word(params.min_stake_percentage));
        self.initial_event_stake.set(params.initial_event_stake);

        self.min_expected_attendees.set(word(params.min_expected_attendees));
        self.max_title_length.set(length(params.max_title_length));
        self.max_description_length.set(length(params.max_description_length));
        self.max_location_length.set(length(params.max_location_length));
        self.max_image_uri_length.set(length(params.max_image_uri_length));
        self.max_evidence_length.set(length(params.max_evidence_length));
        self.max_explanation_length.set(length(params.max_explanation_length));
        self.max_scam_details_length.set(length(params.max_scam_details_length));

        self.minimum_attendance_rate.set(word(params.minimum_attendance_rate));
        self.flag_threshold_percentage.set(word(params.flag_threshold_percentage));
        self.flagging_period.set(word(params.flagging_period));
        self.scam_confirm_period.set(word(params.scam_confirm_period));
        self.claim_period.set(word(params.claim_period.unwrap_or(0)));

        self.release_fee_percentage.set(word(params.release_fee_percentage));
        self.scam_stake_fee_percentage.set(word(params.scam_stake_fee_percentage));
        self.fee_tier_thresholds.truncate(0);
        self.fee_tier_fees.truncate(0);
        for tier in &params.free_event_fee_tiers {
            self.fee_tier_thresholds.push(word(tier.above_attendees));
            self.fee_tier_fees.push(tier.fee);
        }

        self.scam_blacklist_threshold.set(word(params.scam_blacklist_threshold));
        self.flag_stake.set(params.flag_stake);
        self.flag_weight_policy.set(U8::from(params.flag_weight_policy.as_u8()));
    }
}
