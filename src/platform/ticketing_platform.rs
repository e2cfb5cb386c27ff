use alloy_primitives::{Address, FixedBytes, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use stylus_sdk::{
    abi::Bytes,
    prelude::*,
    storage::{StorageAddress, StorageBool, StorageMap},
    stylus_core::calls::{context::Call, CallAccess, ValueTransfer},
};
use tracing::{debug, info, warn};

use crate::{
    attendance::{policy_for, AttestationContext, AttestationEvidence, RegistrationTracker},
    config::{ParamStore, ProtocolParams},
    flagging::FlagAggregator,
    platform::guard::{GuardedOp, ReentrancyGuard},
    registry::EventRegistry,
    reputation::{ReputationStore, StakeCalculator},
    revenue::SettlementBook,
    treasury::EscrowBook,
    types::{
        errors::{
            checked_add, checked_mul, ensure, invalid_input, require_authorized,
            require_valid_input, AlreadyReleased, AlreadyVerified, AttestationFailed,
            ContractPaused, EventEnded, EventIsScam, EventNotEnded, EventNotStarted,
            IncorrectPayment, InvalidTicketCategory, IssuanceFailed, NoPendingRevenue,
            NotScamConfirmed, NotSettled, OrganizerBlacklisted, Result, TicketingError,
            TransferFailed, UnsupportedPaymentAsset,
        },
        events::*,
        interfaces::{ITicketIssuance, IERC20},
        AttestationKind, BatchReceipt, ClassFilter, Event, EventDetails, EventInfo, EventView,
        Flag, FlagReason, FlagThresholdInfo, PurchaseReceipt, RefundEligibility, RefundPayout,
        Registration, ReleaseRecord, ReleaseStatus, ReputationRecord, ReviewRequest, ScamRecord,
        SweepRecord, TicketCategory, TicketClass, TicketKind,
    },
};

/// The ticketing engine. Every component store lives under this one storage
/// root; the native currency is addressed as `Address::ZERO`, any other
/// accepted asset is an ERC-20 the platform pulls with `transferFrom`.
#[storage]
#[entrypoint]
pub struct TicketingPlatform {
    // Access control
    pub(crate) owner: StorageAddress,
    pub(crate) paused: StorageBool,

    // Platform settings
    pub(crate) params: ParamStore,
    pub(crate) accepted_assets: StorageMap<Address, StorageBool>,

    // Component stores
    pub(crate) registry: EventRegistry,
    pub(crate) tracker: RegistrationTracker,
    pub(crate) flags: FlagAggregator,
    pub(crate) reputation: ReputationStore,
    pub(crate) escrow: EscrowBook,
    pub(crate) settlements: SettlementBook,

    // Reentrancy guard
    pub(crate) guard: ReentrancyGuard,
}

#[public]
impl TicketingPlatform {
    pub fn initialize(&mut self) -> Result<()> {
        require_valid_input(self.owner.get().is_zero(), "Already initialized")?;

        let owner = self.sender();
        self.owner.set(owner);
        self.params.save(&ProtocolParams::default());
        self.accepted_assets.insert(Address::ZERO, true);
        self.emit(OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: owner,
        });
        info!(%owner, "platform initialized");
        Ok(())
    }

    #[payable]
    pub fn create_event(
        &mut self,
        title: String,
        description: String,
        location: String,
        image_uri: String,
        start_time: u64,
        end_time: u64,
        expected_attendees: u64,
        ticket_kind: u8,
        payment_asset: Address,
        attestation: u8,
    ) -> Result<U256> {
        self.require_not_paused()?;
        let caller = self.sender();
        let now = self.now();
        let params = self.protocol_params();
        let ticket_kind =
            TicketKind::from_u8(ticket_kind).ok_or_else(|| invalid_input("Invalid ticket kind"))?;
        let attestation = AttestationKind::from_u8(attestation)
            .ok_or_else(|| invalid_input("Invalid attestation kind"))?;
        let details = EventDetails {
            title,
            description,
            location,
            image_uri,
            start_time,
            end_time,
            expected_attendees,
        };
        EventRegistry::validate_details(&params, &details, now)?;
        self.require_not_blacklisted(caller)?;

        let (initial_stake, service_fee) = match ticket_kind {
            TicketKind::Paid => (params.initial_event_stake, U256::ZERO),
            TicketKind::Free => (U256::ZERO, params.free_event_fee(details.expected_attendees)),
        };
        if ticket_kind == TicketKind::Paid || !service_fee.is_zero() {
            self.require_accepted_asset(payment_asset)?;
        }

        let created = EventCreated {
            event_id: U256::ZERO,
            organizer: caller,
            title: details.title.clone(),
            ticket_kind: ticket_kind.as_u8(),
            payment_asset,
            start_time: details.start_time,
            end_time: details.end_time,
            expected_attendees: details.expected_attendees,
        };
        let event_id = self
            .registry
            .insert_event(caller, details, ticket_kind, payment_asset, attestation, now);
        self.escrow.open(event_id, caller, payment_asset);
        self.emit(EventCreated { event_id, ..created });

        if !initial_stake.is_zero() {
            let total_staked = self.escrow.add_stake(event_id, initial_stake)?;
            self.emit(StakeDeposited {
                event_id,
                organizer: caller,
                amount: initial_stake,
                total_staked,
            });
        }
        if !service_fee.is_zero() {
            self.escrow.credit_platform(payment_asset, service_fee)?;
            self.emit(ServiceFeeCharged {
                event_id,
                organizer: caller,
                asset: payment_asset,
                amount: service_fee,
            });
        }

        self.charge(payment_asset, caller, checked_add(initial_stake, service_fee)?)?;
        info!(%event_id, organizer = %caller, ?ticket_kind, "event created");
        Ok(event_id)
    }

    #[payable]
    pub fn create_ticket_class(
        &mut self,
        event_id: U256,
        category: u8,
        fee: U256,
        issuance: Address,
    ) -> Result<U256> {
        self.require_not_paused()?;
        let caller = self.sender();
        let event = self.event(event_id)?;
        let category = Self::category(event_id, category)?;
        ensure(!event.has_ended(self.now()), || {
            TicketingError::EventEnded(EventEnded {
                event_id,
                end_time: event.end_time,
            })
        })?;

        let first_class = !self.registry.has_ticket_classes(event_id);
        let class_id = self
            .registry
            .create_ticket_class(caller, event_id, category, fee, issuance)?;
        self.require_not_blacklisted(event.organizer)?;
        self.emit(TicketClassCreated {
            event_id,
            class_id,
            category: category.as_u8(),
            fee,
            issuance,
        });

        // Collateral is sized once, from the first class's price
        let mut top_up = U256::ZERO;
        if first_class && event.ticket_kind == TicketKind::Paid {
            let params = self.protocol_params();
            let record = self.reputation.get(event.organizer);
            let required = StakeCalculator::new(&params).required_stake(
                event.organizer,
                &record,
                event.expected_attendees,
                TicketKind::Paid,
                fee,
            )?;
            top_up = required.saturating_sub(self.escrow.stake(event_id));
            debug!(%event_id, %required, %top_up, "stake sized");

            if !top_up.is_zero() {
                let total_staked = self.escrow.add_stake(event_id, top_up)?;
                self.emit(StakeDeposited {
                    event_id,
                    organizer: event.organizer,
                    amount: top_up,
                    total_staked,
                });
            }
        }

        self.charge(event.payment_asset, caller, top_up)?;
        info!(%event_id, %class_id, ?category, %fee, "ticket class created");
        Ok(class_id)
    }

    /// Buys one ticket. The attached payment must equal the class fee exactly.
    #[payable]
    pub fn purchase(&mut self, event_id: U256, category: u8) -> Result<PurchaseReceipt> {
        self.require_not_paused()?;
        let buyer = self.sender();
        require_valid_input(!buyer.is_zero(), "Invalid buyer")?;
        let event = self.event(event_id)?;
        let category = Self::category(event_id, category)?;
        self.tracker.ensure_can_register(&event, buyer, self.now())?;
        self.require_not_blacklisted(event.organizer)?;

        let class = self.registry.ticket_class(event_id, category)?;
        self.require_offer(event.payment_asset, class.fee)?;

        self.tracker.register(event_id, buyer, category, class.fee)?;
        self.registry.record_registration(event_id)?;
        if !class.fee.is_zero() {
            self.escrow.credit_revenue(event_id, class.fee)?;
        }

        self.take_payment(event.payment_asset, buyer, class.fee, class.fee)?;
        let token_id = self.mint_ticket(class.issuance, buyer)?;
        self.tracker.set_token_id(event_id, buyer, token_id)?;
        self.emit(TicketPurchased {
            event_id,
            buyer,
            category: category.as_u8(),
            amount_paid: class.fee,
            token_id,
        });

        info!(%event_id, %buyer, ?category, %token_id, "ticket purchased");
        Ok(PurchaseReceipt {
            event_id,
            buyer,
            category: category.as_u8(),
            amount_paid: class.fee,
            token_id,
        })
    }

    /// Buys tickets for several recipients in one payment. The payer offers
    /// `fee * recipients.len()` but is only charged for recipients that end up
    /// registered; already-registered and repeated recipients are skipped and
    /// their share of a native payment is sent back.
    #[payable]
    pub fn purchase_batch(
        &mut self,
        event_id: U256,
        category: u8,
        recipients: Vec<Address>,
    ) -> Result<BatchReceipt> {
        self.require_not_paused()?;
        let payer = self.sender();
        require_valid_input(!recipients.is_empty(), "No recipients")?;
        let event = self.event(event_id)?;
        let category = Self::category(event_id, category)?;
        ensure(!event.has_ended(self.now()), || {
            TicketingError::EventEnded(EventEnded {
                event_id,
                end_time: event.end_time,
            })
        })?;
        ensure(!event.scam_confirmed, || {
            TicketingError::EventIsScam(EventIsScam { event_id })
        })?;
        self.require_not_blacklisted(event.organizer)?;

        let class = self.registry.ticket_class(event_id, category)?;
        let offered = checked_mul(class.fee, U256::from(recipients.len()))?;
        self.require_offer(event.payment_asset, offered)?;

        let mut receipt = BatchReceipt {
            event_id,
            ..BatchReceipt::default()
        };
        for recipient in recipients {
            require_valid_input(!recipient.is_zero(), "Invalid recipient")?;
            if self.tracker.is_registered(event_id, recipient) {
                receipt.skipped.push(recipient);
                continue;
            }
            self.tracker.register(event_id, recipient, category, class.fee)?;
            self.registry.record_registration(event_id)?;
            receipt.registered.push(recipient);
        }
        require_valid_input(
            !receipt.registered.is_empty(),
            "All recipients already registered",
        )?;

        receipt.amount_charged = checked_mul(class.fee, U256::from(receipt.registered.len()))?;
        if !receipt.amount_charged.is_zero() {
            self.escrow.credit_revenue(event_id, receipt.amount_charged)?;
        }
        self.take_payment(event.payment_asset, payer, offered, receipt.amount_charged)?;

        for recipient in receipt.registered.clone() {
            let token_id = self.mint_ticket(class.issuance, recipient)?;
            self.tracker.set_token_id(event_id, recipient, token_id)?;
            self.emit(TicketPurchased {
                event_id,
                buyer: recipient,
                category: category.as_u8(),
                amount_paid: class.fee,
                token_id,
            });
        }
        self.emit(BatchPurchaseCompleted {
            event_id,
            payer,
            registered_count: U256::from(receipt.registered.len()),
            skipped_count: U256::from(receipt.skipped.len()),
            amount_charged: receipt.amount_charged,
        });

        info!(
            %event_id,
            %payer,
            registered = receipt.registered.len(),
            skipped = receipt.skipped.len(),
            "batch purchase completed"
        );
        Ok(receipt)
    }

    /// Publishes the Merkle root or code hash attendance claims are checked against.
    pub fn set_attestation_anchor(&mut self, event_id: U256, anchor: FixedBytes<32>) -> Result<()> {
        let caller = self.sender();
        let event = self.event(event_id)?;
        require_authorized(caller == event.organizer, caller)?;
        ensure(!event.has_ended(self.now()), || {
            TicketingError::EventEnded(EventEnded {
                event_id,
                end_time: event.end_time,
            })
        })?;
        require_valid_input(!anchor.is_zero(), "Anchor must be non-zero")?;

        self.tracker.set_anchor(event_id, anchor);
        self.emit(AttestationAnchorSet { event_id, anchor });
        info!(%event_id, %anchor, "attestation anchor set");
        Ok(())
    }

    /// Attendance claim for ticket-holder events. Returns the new verified count.
    pub fn verify_attendance(&mut self, event_id: U256) -> Result<u64> {
        self.verify_with(event_id, AttestationEvidence::None)
    }

    pub fn verify_attendance_with_proof(
        &mut self,
        event_id: U256,
        proof: Vec<FixedBytes<32>>,
    ) -> Result<u64> {
        self.verify_with(event_id, AttestationEvidence::MerkleProof(proof))
    }

    pub fn verify_attendance_with_code(
        &mut self,
        event_id: U256,
        code: String,
        signature: Bytes,
    ) -> Result<u64> {
        let signature = alloy_primitives::Bytes::from(Vec::<u8>::from(signature));
        self.verify_with(event_id, AttestationEvidence::SignedCode { code, signature })
    }

    /// Organizer bulk check-in. Unregistered and already verified accounts
    /// are skipped; returns the accounts newly verified.
    pub fn verify_group_attendance(
        &mut self,
        event_id: U256,
        accounts: Vec<Address>,
    ) -> Result<Vec<Address>> {
        self.require_not_paused()?;
        let caller = self.sender();
        let event = self.event(event_id)?;
        require_authorized(caller == event.organizer, caller)?;
        ensure(event.has_started(self.now()), || {
            TicketingError::EventNotStarted(EventNotStarted {
                event_id,
                start_time: event.start_time,
            })
        })?;

        let mut verified = Vec::new();
        let mut skipped = 0usize;
        for account in accounts {
            if !self.tracker.is_registered(event_id, account)
                || self.tracker.is_verified(event_id, account)
            {
                skipped += 1;
                continue;
            }
            self.tracker.mark_verified(event_id, account)?;
            let verified_count = self.registry.record_verification(event_id)?;
            self.emit(AttendanceVerified {
                event_id,
                account,
                verified_count,
            });
            verified.push(account);
        }

        self.emit(GroupAttendanceVerified {
            event_id,
            organizer: caller,
            newly_verified: U256::from(verified.len()),
            skipped: U256::from(skipped),
        });
        info!(%event_id, verified = verified.len(), skipped, "group attendance verified");
        Ok(verified)
    }

    /// Raises a flag against an ended event. Returns the new total flag weight.
    #[payable]
    pub fn flag(&mut self, event_id: U256, reason: u8, evidence: String) -> Result<u64> {
        self.require_not_paused()?;
        let account = self.sender();
        let now = self.now();
        let params = self.protocol_params();
        let reason = FlagReason::from_u8(reason).ok_or_else(|| invalid_input("Invalid flag reason"))?;
        let event = self.event(event_id)?;
        FlagAggregator::ensure_window_open(&event, now, params.flagging_period)?;
        ensure(!event.revenue_released, || {
            TicketingError::AlreadyReleased(AlreadyReleased { event_id })
        })?;
        ensure(!event.scam_confirmed, || {
            TicketingError::EventIsScam(EventIsScam { event_id })
        })?;
        let registration = self.tracker.require_registered(event_id, account)?;
        require_valid_input(
            evidence.len() <= params.max_evidence_length,
            "Evidence too long",
        )?;

        let weight = params
            .flag_weight_policy
            .weight_for(TicketCategory::from_u8(registration.category));
        let stake = match event.ticket_kind {
            TicketKind::Paid => params.flag_stake,
            TicketKind::Free => U256::ZERO,
        };
        let total_weight = self
            .flags
            .record(event_id, account, reason, &evidence, weight, stake, now)?;
        if !stake.is_zero() {
            self.escrow.add_flag_stake(event_id, stake)?;
        }
        self.emit(FlagRaised {
            event_id,
            account,
            reason: reason.as_u8(),
            weight: U256::from(weight),
            total_flag_weight: U256::from(total_weight),
        });

        self.charge(event.payment_asset, account, stake)?;
        info!(%event_id, %account, ?reason, weight, total_weight, "event flagged");
        Ok(total_weight)
    }

    /// Organizer's dispute of a withheld release. Extends the window in which
    /// the owner may still confirm the event as a scam.
    pub fn request_manual_review(&mut self, event_id: U256, explanation: String) -> Result<()> {
        let caller = self.sender();
        let now = self.now();
        let event = self.event(event_id)?;
        require_authorized(caller == event.organizer, caller)?;
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
        })?;
        require_valid_input(!explanation.trim().is_empty(), "Explanation required")?;
        require_valid_input(
            explanation.len() <= self.protocol_params().max_explanation_length,
            "Explanation too long",
        )?;

        self.flags.request_review(event_id, &explanation, now)?;
        self.emit(ManualReviewRequested {
            event_id,
            organizer: caller,
            explanation,
            requested_at: now,
        });
        info!(%event_id, "manual review requested");
        Ok(())
    }

    // Settlement

    pub fn release_revenue(&mut self, event_id: U256) -> Result<ReleaseRecord> {
        self.guarded(GuardedOp::Release, |p| p.release(event_id))
    }

    pub fn manual_release_revenue(&mut self, event_id: U256) -> Result<ReleaseRecord> {
        self.guarded(GuardedOp::ManualRelease, |p| p.release_manually(event_id))
    }

    pub fn confirm_event_as_scam(&mut self, event_id: U256, details: String) -> Result<ScamRecord> {
        self.guarded(GuardedOp::ConfirmScam, move |p| p.confirm_scam(event_id, details))
    }

    pub fn claim_scam_event_refund(&mut self, event_id: U256) -> Result<RefundPayout> {
        self.guarded(GuardedOp::ClaimRefund, |p| p.claim_refund(event_id))
    }

    pub fn claim_flag_stake(&mut self, event_id: U256) -> Result<U256> {
        self.guarded(GuardedOp::ClaimFlagStake, |p| p.return_flag_stake(event_id))
    }

    pub fn sweep_expired_refunds(&mut self, event_id: U256) -> Result<SweepRecord> {
        self.guarded(GuardedOp::SweepRefunds, |p| p.sweep(event_id))
    }

    // Admin functions

    pub fn set_payment_asset_accepted(&mut self, asset: Address, accepted: bool) -> Result<()> {
        self.require_owner()?;
        self.accepted_assets.insert(asset, accepted);
        self.emit(PaymentAssetUpdated { asset, accepted });
        info!(%asset, accepted, "payment asset updated");
        Ok(())
    }

    /// Replaces every protocol parameter with the JSON-encoded set.
    pub fn update_params(&mut self, params_json: String) -> Result<()> {
        self.require_owner()?;
        let params = ProtocolParams::from_json_str(&params_json)?;
        self.params.save(&params);
        let timestamp = self.now();
        self.emit(ProtocolParamsUpdated { timestamp });
        info!("protocol params updated");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.require_owner()?;
        require_valid_input(!self.paused.get(), "Already paused")?;
        self.paused.set(true);
        let timestamp = self.now();
        self.emit(PlatformPaused { timestamp });
        warn!("platform paused");
        Ok(())
    }

    pub fn unpause(&mut self) -> Result<()> {
        self.require_owner()?;
        require_valid_input(self.paused.get(), "Not paused")?;
        self.paused.set(false);
        let timestamp = self.now();
        self.emit(PlatformUnpaused { timestamp });
        info!("platform unpaused");
        Ok(())
    }

    pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<()> {
        self.require_owner()?;
        require_valid_input(!new_owner.is_zero(), "Invalid owner")?;
        let previous_owner = self.owner.get();
        self.owner.set(new_owner);
        self.emit(OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        info!(%previous_owner, %new_owner, "ownership transferred");
        Ok(())
    }

    pub fn blacklist_organizer(&mut self, organizer: Address) -> Result<()> {
        self.require_owner()?;
        require_valid_input(self.reputation.blacklist(organizer), "Already blacklisted")?;
        let scam_events = self.reputation.get(organizer).scam_events;
        self.emit(OrganizerBanned {
            organizer,
            scam_events,
        });
        warn!(%organizer, "organizer blacklisted by owner");
        Ok(())
    }

    pub fn withdraw_platform_revenue(
        &mut self,
        asset: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<()> {
        self.guarded(GuardedOp::Withdraw, |p| {
            p.require_owner()?;
            require_valid_input(!recipient.is_zero(), "Invalid recipient")?;
            require_valid_input(amount > U256::ZERO, "Amount must be positive")?;

            p.escrow.debit_platform(asset, amount)?;
            p.emit(PlatformRevenueWithdrawn {
                asset,
                recipient,
                amount,
            });
            p.pay(asset, recipient, amount)?;
            info!(%asset, %recipient, %amount, "platform revenue withdrawn");
            Ok(())
        })
    }

    // View functions

    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    pub fn params_json(&self) -> Result<String> {
        serde_json::to_string(&self.protocol_params())
            .map_err(|e| invalid_input(&format!("Params not serializable: {}", e)))
    }

    pub fn is_payment_asset_accepted(&self, asset: Address) -> bool {
        self.accepted_assets.get(asset)
    }

    pub fn get_event(&self, event_id: U256) -> Result<EventInfo> {
        let event = self.event(event_id)?;
        let escrow = self.escrow.escrow(event_id);
        Ok(EventInfo {
            event: event.view(),
            ticket_classes: self.registry.ticket_classes(event_id),
            total_staked: escrow.stake,
            pending_revenue: escrow.revenue,
            flag_stakes: escrow.flag_stakes,
            refund_pool: escrow.refund_pool,
            attestation_anchor: self.tracker.anchor(event_id),
        })
    }

    pub fn list_events_by_organizer(&self, organizer: Address, filter: u8) -> Result<Vec<EventView>> {
        let filter = ClassFilter::from_u8(filter).ok_or_else(|| invalid_input("Invalid filter"))?;
        Ok(self
            .registry
            .events_by_organizer(organizer, filter)
            .iter()
            .map(Event::view)
            .collect())
    }

    pub fn list_valid_events(&self) -> Vec<EventView> {
        self.registry
            .valid_events(self.now())
            .iter()
            .map(Event::view)
            .collect()
    }

    pub fn get_ticket_class(&self, event_id: U256, category: u8) -> Result<TicketClass> {
        let category = Self::category(event_id, category)?;
        self.registry.ticket_class(event_id, category)
    }

    pub fn get_registration(&self, event_id: U256, account: Address) -> Registration {
        self.tracker.registration(event_id, account)
    }

    /// All-zero when `account` has not flagged the event.
    pub fn get_flag(&self, event_id: U256, account: Address) -> Flag {
        self.flags.flag(event_id, account).unwrap_or_default()
    }

    pub fn get_review_request(&self, event_id: U256) -> ReviewRequest {
        self.flags.review(event_id).unwrap_or_default()
    }

    pub fn total_flag_weight(&self, event_id: U256) -> u64 {
        self.flags.total_weight(event_id)
    }

    pub fn get_reputation(&self, organizer: Address) -> ReputationRecord {
        self.reputation.get(organizer)
    }

    pub fn preview_required_stake(
        &self,
        organizer: Address,
        expected_attendees: u64,
        ticket_kind: u8,
        ticket_fee: U256,
    ) -> Result<U256> {
        let ticket_kind =
            TicketKind::from_u8(ticket_kind).ok_or_else(|| invalid_input("Invalid ticket kind"))?;
        let params = self.protocol_params();
        let record = self.reputation.get(organizer);
        StakeCalculator::new(&params).required_stake(
            organizer,
            &record,
            expected_attendees,
            ticket_kind,
            ticket_fee,
        )
    }

    /// Sale revenue still held for `organizer` on `event_id`.
    pub fn organizer_revenue_balance(&self, organizer: Address, event_id: U256) -> U256 {
        self.escrow.organizer_revenue(organizer, event_id)
    }

    pub fn platform_revenue(&self, asset: Address) -> U256 {
        self.escrow.platform_revenue(asset)
    }

    pub fn attestation_anchor(&self, event_id: U256) -> FixedBytes<32> {
        self.tracker.anchor(event_id)
    }

    /// Everything the platform owes in `asset`: revenue, stakes, flag stakes,
    /// refund pools and platform revenue. Never above the contract's balance.
    pub fn escrow_totals(&self, asset: Address) -> U256 {
        self.escrow.totals(asset)
    }

    pub fn check_release_status(&self, event_id: U256) -> ReleaseStatus {
        self.release_status(event_id)
    }

    pub fn check_refund_eligibility(&self, event_id: U256, account: Address) -> RefundEligibility {
        self.refund_eligibility(event_id, account)
    }

    pub fn get_flag_threshold_info(&self, event_id: U256) -> Result<FlagThresholdInfo> {
        let event = self.event(event_id)?;
        Ok(self
            .flags
            .threshold_info(&event, self.protocol_params().flag_threshold_percentage))
    }

    pub fn get_release_record(&self, event_id: U256) -> Result<ReleaseRecord> {
        self.settlements
            .release(event_id)
            .ok_or(TicketingError::NotSettled(NotSettled { event_id }))
    }

    pub fn get_scam_record(&self, event_id: U256) -> Result<ScamRecord> {
        self.settlements
            .scam(event_id)
            .ok_or(TicketingError::NotScamConfirmed(NotScamConfirmed { event_id }))
    }
}

// Internal helper functions
impl TicketingPlatform {
    pub(crate) fn now(&self) -> u64 {
        self.vm().block_timestamp()
    }

    pub(crate) fn sender(&self) -> Address {
        self.vm().msg_sender()
    }

    pub(crate) fn emit<E: SolEvent>(&self, event: E) {
        log(self.vm(), event);
    }

    pub(crate) fn protocol_params(&self) -> ProtocolParams {
        ParamStore::load(&self.params)
    }

    pub(crate) fn event(&self, event_id: U256) -> Result<Event> {
        self.registry.get(event_id)
    }

    fn category(event_id: U256, category: u8) -> Result<TicketCategory> {
        TicketCategory::from_u8(category).ok_or(TicketingError::InvalidTicketCategory(
            InvalidTicketCategory { event_id, category },
        ))
    }

    /// Runs `body` behind the per-operation reentrancy lock. A failed call
    /// reverts, so the lock is only cleared for the caller's own bookkeeping.
    pub(crate) fn guarded<T>(
        &mut self,
        op: GuardedOp,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.guard.enter(op)?;
        let result = body(self);
        self.guard.exit(op);
        if let Err(e) = &result {
            debug!(error = ?e, ?op, "call reverted");
        }
        result
    }

    pub(crate) fn require_owner(&self) -> Result<()> {
        let caller = self.sender();
        require_authorized(caller == self.owner.get(), caller)
    }

    pub(crate) fn require_not_paused(&self) -> Result<()> {
        ensure(!self.paused.get(), || TicketingError::ContractPaused(ContractPaused {}))
    }

    pub(crate) fn require_not_blacklisted(&self, organizer: Address) -> Result<()> {
        ensure(!self.reputation.is_blacklisted(organizer), || {
            TicketingError::OrganizerBlacklisted(OrganizerBlacklisted { organizer })
        })
    }

    fn require_accepted_asset(&self, asset: Address) -> Result<()> {
        ensure(self.accepted_assets.get(asset), || {
            TicketingError::UnsupportedPaymentAsset(UnsupportedPaymentAsset { asset })
        })
    }

    fn verify_with(&mut self, event_id: U256, evidence: AttestationEvidence) -> Result<u64> {
        self.require_not_paused()?;
        let account = self.sender();
        let event = self.event(event_id)?;
        ensure(event.has_started(self.now()), || {
            TicketingError::EventNotStarted(EventNotStarted {
                event_id,
                start_time: event.start_time,
            })
        })?;
        let registration = self.tracker.require_registered(event_id, account)?;
        ensure(!registration.verified, || {
            TicketingError::AlreadyVerified(AlreadyVerified { account, event_id })
        })?;

        let ticket_balance = TicketCategory::from_u8(registration.category)
            .and_then(|category| self.registry.ticket_class(event_id, category).ok())
            .map(|class| self.ticket_balance(class.issuance, account))
            .unwrap_or_default();
        let context = AttestationContext {
            anchor: self.tracker.anchor(event_id),
            ticket_balance,
        };
        if !policy_for(event.attestation).verify(&event, account, &evidence, &context) {
            debug!(%event_id, %account, kind = ?event.attestation, "attestation rejected");
            return Err(TicketingError::AttestationFailed(AttestationFailed {
                account,
                event_id,
            }));
        }

        self.tracker.mark_verified(event_id, account)?;
        let verified_count = self.registry.record_verification(event_id)?;
        self.emit(AttendanceVerified {
            event_id,
            account,
            verified_count,
        });
        info!(%event_id, %account, verified_count, "attendance verified");
        Ok(verified_count)
    }

    // Value movement

    /// Checks the value attached to the call. Native payments must carry
    /// exactly `offered`; ERC-20 payments must carry none.
    pub(crate) fn require_offer(&self, asset: Address, offered: U256) -> Result<()> {
        let provided = self.vm().msg_value();
        let expected = if asset.is_zero() { offered } else { U256::ZERO };
        ensure(provided == expected, || {
            TicketingError::IncorrectPayment(IncorrectPayment { expected, provided })
        })
    }

    /// Settles a checked offer: keeps `charged` in custody. Native excess is
    /// sent back to the payer; ERC-20 amounts are pulled from the payer.
    pub(crate) fn take_payment(
        &mut self,
        asset: Address,
        payer: Address,
        offered: U256,
        charged: U256,
    ) -> Result<()> {
        if asset.is_zero() {
            return self.pay(asset, payer, offered.saturating_sub(charged));
        }
        if charged.is_zero() {
            return Ok(());
        }
        let call = IERC20::transferFromCall {
            from: payer,
            to: self.vm().contract_address(),
            amount: charged,
        };
        let accepted = self
            .vm()
            .call(&Call::new(), asset, &call.abi_encode())
            .map(|data| transfer_succeeded(&data))
            .unwrap_or(false);
        if !accepted {
            warn!(%asset, %payer, amount = %charged, "payment rejected");
            return Err(TicketingError::TransferFailed(TransferFailed {
                account: payer,
                amount: charged,
            }));
        }
        Ok(())
    }

    /// Pulls exactly `amount` into custody.
    pub(crate) fn charge(&mut self, asset: Address, payer: Address, amount: U256) -> Result<()> {
        self.require_offer(asset, amount)?;
        self.take_payment(asset, payer, amount, amount)
    }

    /// Pays `amount` out of custody. Zero is a no-op.
    pub(crate) fn pay(&mut self, asset: Address, payee: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let sent = if asset.is_zero() {
            self.vm().transfer_eth(payee, amount).is_ok()
        } else {
            let call = IERC20::transferCall { to: payee, amount };
            self.vm()
                .call(&Call::new(), asset, &call.abi_encode())
                .map(|data| transfer_succeeded(&data))
                .unwrap_or(false)
        };
        if !sent {
            warn!(%asset, %payee, %amount, "payout rejected");
            return Err(TicketingError::TransferFailed(TransferFailed {
                account: payee,
                amount,
            }));
        }
        Ok(())
    }

    // Ticket collection

    fn mint_ticket(&mut self, issuance: Address, owner: Address) -> Result<U256> {
        let call = ITicketIssuance::mintCall { owner };
        self.vm()
            .call(&Call::new(), issuance, &call.abi_encode())
            .ok()
            .and_then(|data| ITicketIssuance::mintCall::abi_decode_returns(&data, true).ok())
            .map(|returns| returns._0)
            .ok_or_else(|| {
                warn!(%issuance, %owner, "ticket mint failed");
                TicketingError::IssuanceFailed(IssuanceFailed { issuance, owner })
            })
    }

    fn ticket_balance(&self, issuance: Address, owner: Address) -> U256 {
        let call = ITicketIssuance::balanceOfCall { owner };
        self.vm()
            .static_call(&Call::new(), issuance, &call.abi_encode())
            .ok()
            .and_then(|data| ITicketIssuance::balanceOfCall::abi_decode_returns(&data, true).ok())
            .map(|returns| returns._0)
            .unwrap_or_default()
    }
}

/// ERC-20 tokens that return nothing are treated as successful.
fn transfer_succeeded(data: &[u8]) -> bool {
    data.is_empty() || bool::abi_decode(data, true).unwrap_or(false)
}
