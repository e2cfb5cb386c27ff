//! Revenue release, scam confirmation, refund claims and sweeps.
//!
//! Per event: `Active -> Ended -> {Released | ScamConfirmed}`. The two
//! terminal states are exclusive and each is entered at most once; after a
//! scam confirmation the only money that moves is registrants pulling their
//! refunds, flaggers reclaiming their stakes, and the owner sweeping what is
//! left once the claim window has closed.

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::{
    config::ProtocolParams,
    platform::TicketingPlatform,
    types::{
        errors::{
            checked_add, checked_mul, checked_sub, ensure, require_valid_input, AlreadyClaimed,
            AlreadyReleased, ClaimPeriodEnded, EventFlagged, EventIsScam, EventNotEnded,
            NoPendingRevenue, NotAuthorized, NotScamConfirmed, NothingToClaim, NothingToSweep,
            RefundWindowOpen, Result, ScamConfirmPeriodActive, ScamConfirmPeriodEnded,
            TicketingError, WaitingPeriodActive,
        },
        events::{
            EventConfirmedScam, FlagStakeClaimed, OrganizerBanned, RefundClaimed, RefundsSwept,
            RevenueReleased,
        },
        Event, RefundBlocker, RefundEligibility, RefundPayout, Registration, ReleaseBlocker,
        ReleaseRecord, ReleaseStatus, ScamRecord, SweepRecord, PERCENTAGE_BASE,
    },
};

/// `verified * 100 / registered`, or 0 with no registrations.
pub fn attendance_rate(event: &Event) -> u64 {
    if event.registered_count == 0 {
        return 0;
    }
    event.verified_count.saturating_mul(PERCENTAGE_BASE) / event.registered_count
}

fn percent_of(amount: U256, percentage: u64) -> Result<U256> {
    Ok(checked_mul(amount, U256::from(percentage))? / U256::from(PERCENTAGE_BASE))
}

/// Last moment the owner may confirm `event` as a scam. A review request
/// pushes the deadline out.
fn scam_confirm_deadline(params: &ProtocolParams, event: &Event, review_requested_at: Option<u64>) -> u64 {
    review_requested_at
        .map(|requested_at| requested_at.max(event.end_time))
        .unwrap_or(event.end_time)
        .saturating_add(params.scam_confirm_period)
}

fn claim_deadline(params: &ProtocolParams, record: &ScamRecord) -> Option<u64> {
    params
        .claim_period
        .map(|period| record.confirmed_at.saturating_add(period))
}

impl TicketingPlatform {
    /// Organizer self-service payout once attendance and flag gates pass.
    pub(crate) fn release(&mut self, event_id: U256) -> Result<ReleaseRecord> {
        self.require_not_paused()?;
        let caller = self.sender();
        let event = self.event(event_id)?;
        let now = self.now();
        let params = self.protocol_params();
        self.ensure_releasable(&event, now)?;
        ensure(caller == event.organizer, || {
            TicketingError::NotAuthorized(NotAuthorized { caller })
        })?;

        // Low attendance only delays payment until the flagging period closes
        let rate = attendance_rate(&event);
        let waiting_ends = event.end_time.saturating_add(params.flagging_period);
        debug!(%event_id, rate, waiting_ends, "evaluating release gates");
        ensure(rate >= params.minimum_attendance_rate || now > waiting_ends, || {
            TicketingError::WaitingPeriodActive(WaitingPeriodActive {
                event_id,
                attendance_rate: U256::from(rate),
                available_at: waiting_ends.saturating_add(1),
            })
        })?;

        if self.flags.threshold_met(&event, params.flag_threshold_percentage) {
            let pct = self.flags.flag_percentage(&event).unwrap_or_default();
            warn!(%event_id, flag_percentage = pct, "release withheld by flags");
            return Err(TicketingError::EventFlagged(EventFlagged {
                event_id,
                flag_percentage: U256::from(pct),
            }));
        }

        self.settle_release(&event, &params, false)
    }

    /// Owner override for adjudicated disputes. Skips the attendance and flag
    /// gates but keeps every terminal guard.
    pub(crate) fn release_manually(&mut self, event_id: U256) -> Result<ReleaseRecord> {
        self.require_owner()?;
        let event = self.event(event_id)?;
        let params = self.protocol_params();
        self.ensure_releasable(&event, self.now())?;
        self.settle_release(&event, &params, true)
    }

    pub(crate) fn confirm_scam(&mut self, event_id: U256, details: String) -> Result<ScamRecord> {
        self.require_owner()?;
        let event = self.event(event_id)?;
        let params = self.protocol_params();
        ensure(!event.revenue_released, || {
            TicketingError::AlreadyReleased(AlreadyReleased { event_id })
        })?;
        ensure(!event.scam_confirmed, || {
            TicketingError::EventIsScam(EventIsScam { event_id })
        })?;
        require_valid_input(
            details.len() <= params.max_scam_details_length,
            "Details too long",
        )?;

        let now = self.now();
        let review_requested_at = self.flags.review(event_id).map(|review| review.requested_at);
        let closed_at = scam_confirm_deadline(&params, &event, review_requested_at);
        ensure(now <= closed_at, || {
            TicketingError::ScamConfirmPeriodEnded(ScamConfirmPeriodEnded { event_id, closed_at })
        })?;

        // With nobody to refund the whole stake goes to the platform
        let stake_at_confirmation = self.escrow.stake(event_id);
        let platform_share = if event.registered_count == 0 {
            stake_at_confirmation
        } else {
            percent_of(stake_at_confirmation, params.scam_stake_fee_percentage)?
        };
        let refund_pool = self
            .escrow
            .convert_stake_to_refund_pool(event_id, platform_share)?;

        // Equal share for every registrant; rounding dust stays in the pool
        let stake_share = if event.registered_count == 0 {
            U256::ZERO
        } else {
            checked_mul(
                stake_at_confirmation,
                U256::from(PERCENTAGE_BASE - params.scam_stake_fee_percentage),
            )? / checked_mul(
                U256::from(event.registered_count),
                U256::from(PERCENTAGE_BASE),
            )?
        };

        self.registry.mark_scam_confirmed(event_id)?;
        let (scam_events, banned) = self
            .reputation
            .record_scam(event.organizer, params.scam_blacklist_threshold);

        let record = ScamRecord {
            event_id,
            confirmed_at: now,
            details,
            stake_at_confirmation,
            platform_share,
            refund_pool,
            registered_at_confirmation: event.registered_count,
            stake_share,
            refunds_claimed: 0,
        };
        self.settlements.record_scam(&record);

        self.emit(EventConfirmedScam {
            event_id,
            organizer: event.organizer,
            details: record.details.clone(),
            platform_share,
            refund_pool,
        });
        if banned {
            self.emit(OrganizerBanned {
                organizer: event.organizer,
                scam_events,
            });
            warn!(organizer = %event.organizer, scam_events, "organizer blacklisted");
        }

        warn!(%event_id, %stake_at_confirmation, %refund_pool, %stake_share, "event confirmed as scam");
        Ok(record)
    }

    /// Pull-style refund for a registrant of a scam-confirmed event: the
    /// ticket price (while sale revenue covers it) plus an equal stake share.
    pub(crate) fn claim_refund(&mut self, event_id: U256) -> Result<RefundPayout> {
        let claimant = self.sender();
        let event = self.event(event_id)?;
        ensure(event.scam_confirmed, || {
            TicketingError::NotScamConfirmed(NotScamConfirmed { event_id })
        })?;
        let registration = self.tracker.require_registered(event_id, claimant)?;
        ensure(!registration.claimed, || {
            TicketingError::AlreadyClaimed(AlreadyClaimed {
                account: claimant,
                event_id,
            })
        })?;
        let record = self
            .settlements
            .scam(event_id)
            .ok_or(TicketingError::NotScamConfirmed(NotScamConfirmed { event_id }))?;

        if let Some(closed_at) = claim_deadline(&self.protocol_params(), &record) {
            ensure(self.now() <= closed_at, || {
                TicketingError::ClaimPeriodEnded(ClaimPeriodEnded { event_id, closed_at })
            })?;
        }

        let payout = self.refund_payout(event_id, &registration, &record);
        ensure(!payout.total().is_zero(), || {
            TicketingError::NothingToClaim(NothingToClaim {
                account: claimant,
                event_id,
            })
        })?;

        // Effects before the transfer
        self.tracker.mark_claimed(event_id, claimant)?;
        self.escrow.debit_revenue(event_id, payout.ticket_refund)?;
        self.escrow.debit_refund_pool(event_id, payout.stake_share)?;
        let refunds_claimed = self.settlements.note_refund_claimed(event_id);
        self.emit(RefundClaimed {
            event_id,
            account: claimant,
            ticket_refund: payout.ticket_refund,
            stake_share: payout.stake_share,
        });

        self.pay(event.payment_asset, claimant, payout.total())?;
        info!(
            %event_id,
            %claimant,
            ticket_refund = %payout.ticket_refund,
            stake_share = %payout.stake_share,
            refunds_claimed,
            "refund claimed"
        );
        Ok(payout)
    }

    /// Returns a flagger's stake once the event is confirmed a scam, within
    /// the claim window when one is configured.
    pub(crate) fn return_flag_stake(&mut self, event_id: U256) -> Result<U256> {
        let account = self.sender();
        let event = self.event(event_id)?;
        ensure(event.scam_confirmed, || {
            TicketingError::NotScamConfirmed(NotScamConfirmed { event_id })
        })?;
        if let Some(closed_at) = self
            .settlements
            .scam(event_id)
            .and_then(|record| claim_deadline(&self.protocol_params(), &record))
        {
            ensure(self.now() <= closed_at, || {
                TicketingError::ClaimPeriodEnded(ClaimPeriodEnded { event_id, closed_at })
            })?;
        }

        let amount = self.flags.take_stake(event_id, account)?;
        self.escrow.debit_flag_stakes(event_id, amount)?;
        self.emit(FlagStakeClaimed {
            event_id,
            account,
            amount,
        });

        self.pay(event.payment_asset, account, amount)?;
        info!(%event_id, %account, %amount, "flag stake returned");
        Ok(amount)
    }

    /// Moves balances nobody can claim any more into platform revenue.
    ///
    /// Scam-confirmed events are swept once the claim window has closed, or
    /// earlier once every registrant has been refunded (flag stakes then stay
    /// claimable). Unsettled events give up their flag stakes once the scam
    /// confirmation window has closed.
    pub(crate) fn sweep(&mut self, event_id: U256) -> Result<SweepRecord> {
        self.require_owner()?;
        let event = self.event(event_id)?;
        let params = self.protocol_params();
        let now = self.now();
        let mut record = SweepRecord {
            event_id,
            ..SweepRecord::default()
        };

        if event.scam_confirmed {
            let scam = self
                .settlements
                .scam(event_id)
                .ok_or(TicketingError::NotScamConfirmed(NotScamConfirmed { event_id }))?;
            let closes_at = claim_deadline(&params, &scam);
            let window_closed = closes_at.map(|closed_at| now > closed_at).unwrap_or(false);
            let all_refunded = scam.refunds_claimed >= scam.registered_at_confirmation;
            ensure(window_closed || all_refunded, || {
                TicketingError::RefundWindowOpen(RefundWindowOpen {
                    event_id,
                    closes_at: closes_at.unwrap_or_default(),
                })
            })?;

            record.revenue = self.escrow.take_revenue(event_id);
            record.refund_pool = self.escrow.take_refund_pool(event_id);
            if window_closed {
                record.flag_stakes = self.forfeit_flag_stakes(event_id)?;
            }
        } else if !event.revenue_released {
            let review_requested_at = self.flags.review(event_id).map(|review| review.requested_at);
            let closes_at = scam_confirm_deadline(&params, &event, review_requested_at);
            ensure(now > closes_at, || {
                TicketingError::ScamConfirmPeriodActive(ScamConfirmPeriodActive { event_id, closes_at })
            })?;
            record.flag_stakes = self.forfeit_flag_stakes(event_id)?;
        }

        ensure(!record.total().is_zero(), || {
            TicketingError::NothingToSweep(NothingToSweep { event_id })
        })?;
        self.escrow.credit_platform(event.payment_asset, record.total())?;
        self.emit(RefundsSwept {
            event_id,
            revenue: record.revenue,
            refund_pool: record.refund_pool,
            flag_stakes: record.flag_stakes,
        });
        info!(
            %event_id,
            revenue = %record.revenue,
            refund_pool = %record.refund_pool,
            flag_stakes = %record.flag_stakes,
            "expired balances swept"
        );
        Ok(record)
    }

    // View functions

    pub(crate) fn release_status(&self, event_id: U256) -> ReleaseStatus {
        let mut status = ReleaseStatus {
            event_id,
            can_release: false,
            blocker: ReleaseBlocker::EventNotFound.as_u8(),
            ..ReleaseStatus::default()
        };
        let Ok(event) = self.event(event_id) else {
            return status;
        };

        let params = self.protocol_params();
        let blocker = self.release_blocker(&event, &params, self.now());
        status.can_release = blocker == ReleaseBlocker::None;
        status.blocker = blocker.as_u8();
        status.attendance_rate = U256::from(attendance_rate(&event));
        status.pending_revenue = self.escrow.revenue(event_id);
        status.escrowed_stake = self.escrow.stake(event_id);
        status.waiting_period_ends_at = event.end_time.saturating_add(params.flagging_period);
        status.flag_threshold_met = self
            .flags
            .threshold_met(&event, params.flag_threshold_percentage);
        status
    }

    pub(crate) fn refund_eligibility(&self, event_id: U256, account: Address) -> RefundEligibility {
        let mut eligibility = RefundEligibility {
            event_id,
            account,
            eligible: false,
            reason: RefundBlocker::EventNotFound.as_u8(),
            ..RefundEligibility::default()
        };
        let Ok(event) = self.event(event_id) else {
            return eligibility;
        };

        let registration = self.tracker.registration(event_id, account);
        let blocker = match self.settlements.scam(event_id) {
            None => RefundBlocker::NotScamConfirmed,
            Some(_) if !event.scam_confirmed => RefundBlocker::NotScamConfirmed,
            Some(_) if !registration.has_ticket => RefundBlocker::NotRegistered,
            Some(_) if registration.claimed => RefundBlocker::AlreadyClaimed,
            Some(record) => {
                let expired = claim_deadline(&self.protocol_params(), &record)
                    .map(|closed_at| self.now() > closed_at)
                    .unwrap_or(false);
                let payout = self.refund_payout(event_id, &registration, &record);
                eligibility.ticket_refund = payout.ticket_refund;
                eligibility.stake_share = payout.stake_share;
                eligibility.total_refund = payout.total();
                if expired {
                    RefundBlocker::ClaimPeriodEnded
                } else if payout.total().is_zero() {
                    RefundBlocker::NothingToClaim
                } else {
                    RefundBlocker::None
                }
            }
        };
        eligibility.eligible = blocker == RefundBlocker::None;
        eligibility.reason = blocker.as_u8();
        eligibility
    }

    // Internal helper functions

    /// Terminal guards shared by both release paths, in reporting order.
    fn ensure_releasable(&self, event: &Event, now: u64) -> Result<()> {
        let event_id = event.id;
        ensure(event.has_ended(now), || {
            TicketingError::EventNotEnded(EventNotEnded {
                event_id,
                end_time: event.end_time,
            })
        })?;
        ensure(!event.revenue_released, || {
            TicketingError::AlreadyReleased(AlreadyReleased { event_id })
        })?;
        ensure(!event.scam_confirmed, || {
            TicketingError::EventIsScam(EventIsScam { event_id })
        })?;
        ensure(!self.escrow.revenue(event_id).is_zero(), || {
            TicketingError::NoPendingRevenue(NoPendingRevenue { event_id })
        })
    }

    fn release_blocker(&self, event: &Event, params: &ProtocolParams, now: u64) -> ReleaseBlocker {
        let waiting_ends = event.end_time.saturating_add(params.flagging_period);

        if !event.has_ended(now) {
            ReleaseBlocker::EventNotEnded
        } else if event.revenue_released {
            ReleaseBlocker::AlreadyReleased
        } else if event.scam_confirmed {
            ReleaseBlocker::ScamConfirmed
        } else if self.escrow.revenue(event.id).is_zero() {
            ReleaseBlocker::NoPendingRevenue
        } else if attendance_rate(event) < params.minimum_attendance_rate && now <= waiting_ends {
            ReleaseBlocker::WaitingPeriod
        } else if self.flags.threshold_met(event, params.flag_threshold_percentage) {
            ReleaseBlocker::Flagged
        } else {
            ReleaseBlocker::None
        }
    }

    /// The single egress point of the happy path. Pays the organizer sale
    /// revenue minus the platform fee, plus the returned stake.
    fn settle_release(
        &mut self,
        event: &Event,
        params: &ProtocolParams,
        manually_released: bool,
    ) -> Result<ReleaseRecord> {
        let event_id = event.id;
        let now = self.now();

        let revenue = self.escrow.take_revenue(event_id);
        let platform_fee = percent_of(revenue, params.release_fee_percentage)?;
        let stake_returned = self.escrow.take_stake(event_id);

        // Unreturned flag stakes are forfeited to the platform
        let flag_stakes_forfeited = self.forfeit_flag_stakes(event_id)?;
        self.escrow.credit_platform(
            event.payment_asset,
            checked_add(platform_fee, flag_stakes_forfeited)?,
        )?;

        let organizer_amount = checked_add(checked_sub(revenue, platform_fee)?, stake_returned)?;
        self.registry.mark_released(event_id)?;
        let successful_events = self.reputation.record_success(event.organizer);

        let record = ReleaseRecord {
            event_id,
            released_at: now,
            organizer_amount,
            platform_fee,
            stake_returned,
            flag_stakes_forfeited,
            manually_released,
        };
        self.settlements.record_release(&record);
        self.emit(RevenueReleased {
            event_id,
            organizer: event.organizer,
            organizer_amount,
            platform_fee,
            stake_returned,
            manually_released,
        });

        self.pay(event.payment_asset, event.organizer, organizer_amount)?;
        info!(
            %event_id,
            organizer = %event.organizer,
            %organizer_amount,
            %platform_fee,
            manually_released,
            successful_events,
            "revenue released"
        );
        Ok(record)
    }

    /// Closes out unclaimed flag stakes and takes them off the event's books.
    /// The caller credits them wherever they go.
    fn forfeit_flag_stakes(&mut self, event_id: U256) -> Result<U256> {
        let forfeited = self.flags.forfeit_stakes(event_id);
        if !forfeited.is_zero() {
            self.escrow.debit_flag_stakes(event_id, forfeited)?;
        }
        Ok(forfeited)
    }

    fn refund_payout(&self, event_id: U256, registration: &Registration, record: &ScamRecord) -> RefundPayout {
        // Ticket price only while sale revenue still covers it in full
        let ticket_refund = if self.escrow.revenue(event_id) >= registration.amount_paid {
            registration.amount_paid
        } else {
            U256::ZERO
        };
        let stake_share = record.stake_share.min(self.escrow.refund_pool(event_id));
        RefundPayout {
            ticket_refund,
            stake_share,
        }
    }
}
