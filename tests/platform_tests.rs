use alloy_primitives::U256;
use ticketchain_contracts::types::{
    errors::TicketingError,
    events::{EventConfirmedScam, FlagRaised, RefundClaimed, RevenueReleased, TicketPurchased},
    AttestationKind, FlagReason, RefundBlocker, ReleaseBlocker, TicketCategory, TicketKind,
    SECONDS_PER_DAY,
};

use test_utils::*;

#[cfg(test)]
mod platform_tests {
    use super::*;

    #[test]
    fn test_happy_path_release() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let organizer = ctx.organizer();
        // 50 on creation, topped up to 30% of 10 * 100
        assert_eq!(ctx.balance(organizer), U256::from(STARTING_BALANCE - 300));

        let buyers = ctx.buy_tickets(event_id, 8);
        assert_eq!(ctx.custody_balance(), U256::from(300 + 800));
        assert_eq!(ctx.decoded::<TicketPurchased>().len(), 8);
        assert_eq!(
            ctx.platform.get_registration(event_id, buyers[0]).token_id,
            ctx.token_id_for(buyers[0])
        );

        ctx.start_event(event_id);
        ctx.verify(event_id, &buyers[..6]);
        ctx.end_event(event_id);

        assert_eq!(
            ctx.platform.organizer_revenue_balance(organizer, event_id),
            U256::from(800)
        );
        assert_eq!(ctx.platform.organizer_revenue_balance(buyers[0], event_id), U256::ZERO);

        let status = ctx.platform.check_release_status(event_id);
        assert!(status.can_release);
        assert_eq!(status.attendance_rate, U256::from(75));
        assert_eq!(status.pending_revenue, U256::from(800));

        let record = ctx.call(organizer, |p| p.release_revenue(event_id)).unwrap();
        assert_eq!(record.platform_fee, U256::from(40));
        assert_eq!(record.stake_returned, U256::from(300));
        assert_eq!(record.organizer_amount, U256::from(760 + 300));
        assert!(!record.manually_released);

        assert_eq!(ctx.balance(organizer), U256::from(STARTING_BALANCE + 760));
        assert_eq!(ctx.platform.platform_revenue(ASSET), U256::from(40));
        assert_eq!(ctx.custody_balance(), U256::from(40));

        let event = ctx.event(event_id);
        assert!(event.revenue_released);
        assert_eq!(ctx.platform.get_event(event_id).unwrap().total_staked, U256::ZERO);
        assert_eq!(ctx.platform.get_reputation(organizer).successful_events, 1);
        assert_eq!(ctx.platform.get_release_record(event_id).unwrap(), record);
        assert_eq!(ctx.platform.organizer_revenue_balance(organizer, event_id), U256::ZERO);

        let released = ctx.decoded::<RevenueReleased>();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].organizer_amount, U256::from(1060));
        ctx.assert_only_platform_revenue_left();
    }

    #[test]
    fn test_low_attendance_waits_for_flagging_period() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let organizer = ctx.organizer();
        let buyers = ctx.buy_tickets(event_id, 8);
        ctx.start_event(event_id);
        ctx.verify(event_id, &buyers[..3]);
        ctx.end_event(event_id);

        let end_time = ctx.event(event_id).end_time;
        let waiting_ends = end_time + 4 * SECONDS_PER_DAY;
        match ctx.call(organizer, |p| p.release_revenue(event_id)) {
            Err(TicketingError::WaitingPeriodActive(e)) => {
                assert_eq!(e.attendance_rate, U256::from(37));
                assert_eq!(e.available_at, waiting_ends + 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            ctx.platform.check_release_status(event_id).blocker,
            ReleaseBlocker::WaitingPeriod.as_u8()
        );

        // Still inside the window on its last second
        ctx.set_time(waiting_ends);
        expect_error(ctx.call(organizer, |p| p.release_revenue(event_id)), |e| {
            matches!(e, TicketingError::WaitingPeriodActive(_))
        });

        ctx.set_time(waiting_ends + 1);
        let record = ctx.call(organizer, |p| p.release_revenue(event_id)).unwrap();
        assert_eq!(record.organizer_amount, U256::from(1060));
        ctx.assert_conserved();
    }

    #[test]
    fn test_flags_block_release_until_manual_resolution() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let organizer = ctx.organizer();
        let owner = ctx.owner();
        let buyers = ctx.buy_tickets(event_id, 8);
        ctx.start_event(event_id);
        ctx.verify(event_id, &buyers[..2]);
        ctx.end_event(event_id);

        for buyer in &buyers[2..7] {
            ctx.call(*buyer, |p| {
                p.flag(
                    event_id,
                    FlagReason::EventDidNotHappen.as_u8(),
                    "Venue was empty".to_string(),
                )
            })
            .unwrap();
        }
        assert_eq!(ctx.platform.total_flag_weight(event_id), 5);
        assert_eq!(ctx.decoded::<FlagRaised>().len(), 5);

        let info = ctx.platform.get_flag_threshold_info(event_id).unwrap();
        assert_eq!(info.non_verified_count, 6);
        assert_eq!(info.current_percentage, U256::from(83));
        assert!(info.threshold_met);

        ctx.close_flagging(event_id);
        match ctx.call(organizer, |p| p.release_revenue(event_id)) {
            Err(TicketingError::EventFlagged(e)) => assert_eq!(e.flag_percentage, U256::from(83)),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            ctx.platform.check_release_status(event_id).blocker,
            ReleaseBlocker::Flagged.as_u8()
        );

        // Only the owner may override
        expect_error(ctx.call(organizer, |p| p.manual_release_revenue(event_id)), |e| {
            matches!(e, TicketingError::NotAuthorized(_))
        });
        let record = ctx.call(owner, |p| p.manual_release_revenue(event_id)).unwrap();
        assert!(record.manually_released);
        assert_eq!(record.organizer_amount, U256::from(1060));
        assert!(ctx.decoded::<RevenueReleased>()[0].manually_released);
        assert!(ctx.event(event_id).revenue_released);
    }

    #[test]
    fn test_scam_confirmation_and_refunds() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let organizer = ctx.organizer();
        let owner = ctx.owner();
        let buyers = ctx.buy_tickets(event_id, 8);
        ctx.end_event(event_id);

        let record = ctx
            .call(owner, |p| {
                p.confirm_event_as_scam(event_id, "Organizer never showed up".to_string())
            })
            .unwrap();
        assert_eq!(record.stake_at_confirmation, U256::from(300));
        assert_eq!(record.platform_share, U256::from(30));
        assert_eq!(record.refund_pool, U256::from(270));
        // 300 * 90 / 800, rounded down
        assert_eq!(record.stake_share, U256::from(33));
        assert_eq!(record.registered_at_confirmation, 8);
        assert_eq!(ctx.decoded::<EventConfirmedScam>().len(), 1);
        assert_eq!(ctx.platform.get_reputation(organizer).scam_events, 1);

        for buyer in &buyers[..2] {
            let payout = ctx.call(*buyer, |p| p.claim_scam_event_refund(event_id)).unwrap();
            assert_eq!(payout.ticket_refund, U256::from(TICKET_FEE));
            assert_eq!(payout.stake_share, U256::from(33));
            assert_eq!(ctx.balance(*buyer), U256::from(STARTING_BALANCE + 33));
        }
        assert_eq!(ctx.decoded::<RefundClaimed>().len(), 2);
        assert_eq!(ctx.platform.get_scam_record(event_id).unwrap().refunds_claimed, 2);

        let outsider = ctx.outsider();
        expect_error(ctx.call(outsider, |p| p.claim_scam_event_refund(event_id)), |e| {
            matches!(e, TicketingError::NotRegistered(_))
        });
        let eligibility = ctx.platform.check_refund_eligibility(event_id, outsider);
        assert!(!eligibility.eligible);
        assert_eq!(eligibility.reason, RefundBlocker::NotRegistered.as_u8());

        // Revenue can never follow a scam confirmation
        expect_error(ctx.call(organizer, |p| p.release_revenue(event_id)), |e| {
            matches!(e, TicketingError::EventIsScam(_))
        });
        ctx.assert_conserved();
    }

    #[test]
    fn test_every_registrant_can_be_refunded() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let owner = ctx.owner();
        let buyers = ctx.buy_tickets(event_id, 8);
        ctx.end_event(event_id);
        ctx.call(owner, |p| {
            p.confirm_event_as_scam(event_id, "Cancelled without notice".to_string())
        })
        .unwrap();

        for buyer in &buyers {
            let eligibility = ctx.platform.check_refund_eligibility(event_id, *buyer);
            assert!(eligibility.eligible);
            assert_eq!(eligibility.total_refund, U256::from(133));
            ctx.call(*buyer, |p| p.claim_scam_event_refund(event_id)).unwrap();
        }

        // Rounding dust stays behind in the pool
        let escrow_left = ctx.platform.escrow_totals(ASSET) - ctx.platform.platform_revenue(ASSET);
        assert_eq!(escrow_left, U256::from(270 - 8 * 33));
        ctx.assert_conserved();
    }

    #[test]
    fn test_double_flag_rejected() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let buyers = ctx.buy_tickets(event_id, 4);
        ctx.end_event(event_id);

        ctx.call(buyers[0], |p| {
            p.flag(event_id, FlagReason::Misrepresented.as_u8(), String::new())
        })
        .unwrap();
        expect_error(
            ctx.call(buyers[0], |p| p.flag(event_id, FlagReason::Other.as_u8(), String::new())),
            |e| matches!(e, TicketingError::AlreadyFlagged(_)),
        );
        assert_eq!(ctx.platform.total_flag_weight(event_id), 1);
        assert_eq!(
            ctx.platform.get_flag(event_id, buyers[0]).reason,
            FlagReason::Misrepresented.as_u8()
        );
        // Accounts that never flagged read back as empty
        assert_eq!(ctx.platform.get_flag(event_id, buyers[1]).timestamp, 0);
    }

    #[test]
    fn test_flagging_window() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let buyers = ctx.buy_tickets(event_id, 3);
        let unsafe_reason = FlagReason::Unsafe.as_u8();

        ctx.start_event(event_id);
        expect_error(
            ctx.call(buyers[0], |p| p.flag(event_id, unsafe_reason, String::new())),
            |e| matches!(e, TicketingError::EventNotEnded(_)),
        );

        ctx.close_flagging(event_id);
        expect_error(
            ctx.call(buyers[0], |p| p.flag(event_id, unsafe_reason, String::new())),
            |e| matches!(e, TicketingError::FlaggingPeriodEnded(_)),
        );

        let outsider = ctx.outsider();
        ctx.end_event(event_id);
        expect_error(
            ctx.call(outsider, |p| p.flag(event_id, unsafe_reason, String::new())),
            |e| matches!(e, TicketingError::NotRegistered(_)),
        );
        expect_invalid_input(
            ctx.call(buyers[0], |p| p.flag(event_id, 9, String::new())),
            "Invalid flag reason",
        );
    }

    #[test]
    fn test_tier_weighted_flags() {
        let mut params = ticketchain_contracts::ProtocolParams::default();
        params.flag_weight_policy = ticketchain_contracts::FlagWeightPolicy::TierWeighted;
        let mut ctx = TestContext::with_params(params);
        let event_id = ctx.create_paid_event();
        ctx.create_ticket_class(event_id, TicketCategory::Vip, 250, VIP_TICKETS)
            .unwrap();

        let regular = ctx.buy_tickets(event_id, 1)[0];
        let vip = ctx.outsider();
        ctx.purchase(vip, event_id, TicketCategory::Vip).unwrap();
        assert_eq!(ctx.platform.get_registration(event_id, vip).amount_paid, U256::from(250));
        ctx.end_event(event_id);

        let other = FlagReason::Other.as_u8();
        assert_eq!(
            ctx.call(regular, |p| p.flag(event_id, other, String::new())).unwrap(),
            1
        );
        assert_eq!(ctx.call(vip, |p| p.flag(event_id, other, String::new())).unwrap(), 3);
    }

    #[test]
    fn test_batch_purchase_skips_registered_recipients() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let attendees = ctx.attendees(4);
        let payer = ctx.outsider();
        let regular = TicketCategory::Regular.as_u8();

        ctx.purchase(attendees[0], event_id, TicketCategory::Regular).unwrap();

        let recipients = vec![attendees[0], attendees[1], attendees[2], attendees[2]];
        let receipt = ctx
            .call_with_value(payer, U256::from(400), |p| {
                p.purchase_batch(event_id, regular, recipients)
            })
            .unwrap();
        assert_eq!(receipt.registered, vec![attendees[1], attendees[2]]);
        assert_eq!(receipt.skipped, vec![attendees[0], attendees[2]]);
        assert_eq!(receipt.amount_charged, U256::from(200));
        // The unused half of the payment came back
        assert_eq!(ctx.balance(payer), U256::from(STARTING_BALANCE - 200));
        assert_eq!(ctx.event(event_id).registered_count, 3);
        assert!(ctx.platform.get_registration(event_id, attendees[2]).has_ticket);

        expect_invalid_input(
            ctx.call_with_value(payer, U256::from(TICKET_FEE), |p| {
                p.purchase_batch(event_id, regular, vec![attendees[1]])
            }),
            "All recipients already registered",
        );
        expect_error(
            ctx.call_with_value(payer, U256::from(50), |p| {
                p.purchase_batch(event_id, regular, vec![attendees[3]])
            }),
            |e| matches!(e, TicketingError::IncorrectPayment(_)),
        );
        // Failed calls hand the attached value back
        assert_eq!(ctx.balance(payer), U256::from(STARTING_BALANCE - 200));
        ctx.assert_conserved();
    }

    #[test]
    fn test_failed_mint_reverts_purchase() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let buyer = ctx.attendees(1)[0];
        let held = ctx.custody_balance();
        ctx.reject_mint(TICKETS, buyer);

        expect_error(ctx.purchase(buyer, event_id, TicketCategory::Regular), |e| {
            matches!(e, TicketingError::IssuanceFailed(_))
        });
        assert!(!ctx.platform.get_registration(event_id, buyer).has_ticket);
        assert_eq!(ctx.event(event_id).registered_count, 0);
        assert_eq!(ctx.balance(buyer), U256::from(STARTING_BALANCE));
        assert_eq!(ctx.custody_balance(), held);
        assert!(ctx.decoded::<TicketPurchased>().is_empty());
    }

    #[test]
    fn test_free_event_flow() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        let event_id = ctx.create_free_event(50);
        // No stake, no service fee below the first tier
        assert_eq!(ctx.balance(organizer), U256::from(STARTING_BALANCE));

        let attendee = ctx.attendees(1)[0];
        let receipt = ctx.purchase(attendee, event_id, TicketCategory::None).unwrap();
        assert_eq!(receipt.amount_paid, U256::ZERO);
        assert_eq!(receipt.token_id, ctx.token_id_for(attendee));

        expect_error(
            ctx.create_ticket_class(event_id, TicketCategory::Regular, 10, TICKETS),
            |e| matches!(e, TicketingError::InvalidTicketCategory(_)),
        );

        ctx.end_event(event_id);
        expect_error(ctx.call(organizer, |p| p.release_revenue(event_id)), |e| {
            matches!(e, TicketingError::NoPendingRevenue(_))
        });
    }

    #[test]
    fn test_free_event_service_fee_tiers() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        ctx.create_event(TicketKind::Free, AttestationKind::TicketHolder, 600);
        assert_eq!(ctx.balance(organizer), U256::from(STARTING_BALANCE - 40));
        assert_eq!(ctx.platform.platform_revenue(ASSET), U256::from(40));
        ctx.assert_only_platform_revenue_left();
    }

    #[test]
    fn test_ticket_class_rules() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();

        expect_error(
            ctx.create_ticket_class(event_id, TicketCategory::Regular, 120, TICKETS),
            |e| matches!(e, TicketingError::AlreadyExists(_)),
        );
        expect_error(
            ctx.create_ticket_class(event_id, TicketCategory::Vip, TICKET_FEE, VIP_TICKETS),
            |e| matches!(e, TicketingError::FeeOrderingViolation(_)),
        );
        expect_error(
            ctx.create_ticket_class(event_id, TicketCategory::None, 0, TICKETS),
            |e| matches!(e, TicketingError::InvalidTicketCategory(_)),
        );
        expect_error(
            ctx.call(ctx.organizer(), |p| p.create_ticket_class(event_id, 7, U256::from(500), VIP_TICKETS)),
            |e| matches!(e, TicketingError::InvalidTicketCategory(_)),
        );

        let outsider = ctx.outsider();
        expect_error(
            ctx.call(outsider, |p| {
                p.create_ticket_class(event_id, TicketCategory::Vip.as_u8(), U256::from(500), VIP_TICKETS)
            }),
            |e| matches!(e, TicketingError::NotAuthorized(_)),
        );

        ctx.create_ticket_class(event_id, TicketCategory::Vip, 500, VIP_TICKETS)
            .unwrap();
        assert_eq!(ctx.platform.get_event(event_id).unwrap().ticket_classes.len(), 2);
    }

    #[test]
    fn test_capacity_and_duplicate_purchase() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let buyers = ctx.buy_tickets(event_id, 10);

        expect_error(ctx.purchase(buyers[0], event_id, TicketCategory::Regular), |e| {
            matches!(e, TicketingError::AlreadyRegistered(_))
        });
        let late = ctx.outsider();
        expect_error(ctx.purchase(late, event_id, TicketCategory::Regular), |e| {
            matches!(e, TicketingError::CapacityReached(_))
        });
        assert_eq!(ctx.event(event_id).registered_count, 10);
    }

    #[test]
    fn test_purchase_after_end_rejected() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        ctx.end_event(event_id);
        let buyer = ctx.attendees(1)[0];
        expect_error(ctx.purchase(buyer, event_id, TicketCategory::Regular), |e| {
            matches!(e, TicketingError::EventEnded(_))
        });
        assert!(ctx.platform.list_valid_events().is_empty());
    }

    #[test]
    fn test_group_attendance_verification() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let organizer = ctx.organizer();
        let buyers = ctx.buy_tickets(event_id, 4);
        let outsider = ctx.outsider();

        let everyone = buyers.clone();
        expect_error(
            ctx.call(organizer, |p| p.verify_group_attendance(event_id, everyone)),
            |e| matches!(e, TicketingError::EventNotStarted(_)),
        );

        ctx.start_event(event_id);
        ctx.verify(event_id, &buyers[..1]);
        let group = vec![buyers[0], buyers[1], buyers[2], outsider];
        let verified = ctx
            .call(organizer, |p| p.verify_group_attendance(event_id, group))
            .unwrap();
        assert_eq!(verified, vec![buyers[1], buyers[2]]);
        assert_eq!(ctx.event(event_id).verified_count, 3);

        let last = vec![buyers[3]];
        expect_error(
            ctx.call(outsider, |p| p.verify_group_attendance(event_id, last)),
            |e| matches!(e, TicketingError::NotAuthorized(_)),
        );
    }

    #[test]
    fn test_manual_review_extends_scam_window() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let organizer = ctx.organizer();
        let owner = ctx.owner();
        ctx.buy_tickets(event_id, 5);
        ctx.end_event(event_id);

        ctx.advance_time(20 * SECONDS_PER_DAY);
        ctx.call(organizer, |p| {
            p.request_manual_review(event_id, "Attendees forgot to check in".to_string())
        })
        .unwrap();
        expect_error(
            ctx.call(organizer, |p| p.request_manual_review(event_id, "Again".to_string())),
            |e| matches!(e, TicketingError::ReviewAlreadyRequested(_)),
        );
        let review = ctx.platform.get_review_request(event_id);
        assert_eq!(review.requested_at, ctx.now());

        // Past end + 30 days but within 30 days of the review request
        ctx.advance_time(15 * SECONDS_PER_DAY);
        ctx.call(owner, |p| p.confirm_event_as_scam(event_id, "Review rejected".to_string()))
            .unwrap();
        assert!(ctx.event(event_id).scam_confirmed);
    }

    #[test]
    fn test_scam_window_closes() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let owner = ctx.owner();
        ctx.buy_tickets(event_id, 5);
        let end_time = ctx.event(event_id).end_time;
        ctx.set_time(end_time + 30 * SECONDS_PER_DAY + 1);

        match ctx.call(owner, |p| p.confirm_event_as_scam(event_id, String::new())) {
            Err(TicketingError::ScamConfirmPeriodEnded(e)) => {
                assert_eq!(e.closed_at, end_time + 30 * SECONDS_PER_DAY)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_repeat_scams_blacklist_organizer() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        let owner = ctx.owner();

        for _ in 0..2 {
            let event_id = ctx.create_paid_event();
            ctx.buy_tickets(event_id, 2);
            ctx.end_event(event_id);
            ctx.call(owner, |p| p.confirm_event_as_scam(event_id, "Fraud".to_string()))
                .unwrap();
        }

        let reputation = ctx.platform.get_reputation(organizer);
        assert_eq!(reputation.scam_events, 2);
        assert!(reputation.blacklisted);

        let balance = ctx.balance(organizer);
        expect_error(
            ctx.try_create_event(organizer, TicketKind::Paid, AttestationKind::TicketHolder, 10),
            |e| matches!(e, TicketingError::OrganizerBlacklisted(_)),
        );
        // The attached stake was not kept
        assert_eq!(ctx.balance(organizer), balance);
        expect_error(
            ctx.platform.preview_required_stake(
                organizer,
                10,
                TicketKind::Paid.as_u8(),
                U256::from(TICKET_FEE),
            ),
            |e| matches!(e, TicketingError::OrganizerBlacklisted(_)),
        );
    }

    #[test]
    fn test_reputation_discounts_next_stake() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        let preview = |ctx: &TestContext| {
            ctx.platform
                .preview_required_stake(organizer, 10, TicketKind::Paid.as_u8(), U256::from(TICKET_FEE))
                .unwrap()
        };
        assert_eq!(preview(&ctx), U256::from(300));

        let event_id = ctx.create_paid_event();
        let buyers = ctx.buy_tickets(event_id, 5);
        ctx.start_event(event_id);
        ctx.verify(event_id, &buyers);
        ctx.end_event(event_id);
        ctx.call(organizer, |p| p.release_revenue(event_id)).unwrap();

        // 20% base minus one 5% discount, no newcomer penalty
        assert_eq!(preview(&ctx), U256::from(150));
    }

    #[test]
    fn test_event_listings() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        let with_class = ctx.create_paid_event();
        let without_class = ctx.create_event(TicketKind::Paid, AttestationKind::TicketHolder, 20);

        let all = ctx.platform.list_events_by_organizer(organizer, 0).unwrap();
        assert_eq!(all.len(), 2);
        let ticketed = ctx.platform.list_events_by_organizer(organizer, 1).unwrap();
        assert_eq!(ticketed.len(), 1);
        assert_eq!(ticketed[0].id, with_class);
        let bare = ctx.platform.list_events_by_organizer(organizer, 2).unwrap();
        assert_eq!(bare[0].id, without_class);
        expect_invalid_input(ctx.platform.list_events_by_organizer(organizer, 3), "Invalid filter");

        let valid = ctx.platform.list_valid_events();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].id, with_class);

        expect_error(ctx.platform.get_event(U256::from(99)), |e| {
            matches!(e, TicketingError::EventNotFound(_))
        });
        assert_eq!(
            ctx.platform.check_release_status(U256::from(99)).blocker,
            ReleaseBlocker::EventNotFound.as_u8()
        );
    }
}
