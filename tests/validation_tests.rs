use alloy_primitives::U256;
use ticketchain_contracts::{
    types::{
        errors::{Result, TicketingError},
        events::EventCreated,
        AttestationKind, EventDetails, FlagReason, TicketCategory, TicketKind, SECONDS_PER_DAY,
    },
    FlagWeightPolicy, ProtocolParams,
};

use test_utils::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn details(ctx: &TestContext, expected_attendees: u64) -> EventDetails {
        let start_time = ctx.now() + SECONDS_PER_DAY;
        EventDetails {
            title: "Highlife Festival".to_string(),
            description: "Two stages of live highlife music".to_string(),
            location: "Kumasi".to_string(),
            image_uri: "ipfs://QmFestivalPoster".to_string(),
            start_time,
            end_time: start_time + 6 * 3600,
            expected_attendees,
        }
    }

    fn try_create(ctx: &mut TestContext, edit: impl FnOnce(&mut EventDetails)) -> Result<U256> {
        let mut d = details(ctx, 10);
        edit(&mut d);
        let organizer = ctx.organizer();
        let stake = ctx.params.initial_event_stake;
        ctx.call_with_value(organizer, stake, move |p| {
            p.create_event(
                d.title,
                d.description,
                d.location,
                d.image_uri,
                d.start_time,
                d.end_time,
                d.expected_attendees,
                TicketKind::Paid.as_u8(),
                ASSET,
                AttestationKind::TicketHolder.as_u8(),
            )
        })
    }

    fn update_params(ctx: &mut TestContext, params: &ProtocolParams) -> Result<()> {
        let owner = ctx.owner();
        let json = serde_json::to_string(params).unwrap();
        ctx.call(owner, move |p| p.update_params(json))?;
        ctx.params = params.clone();
        Ok(())
    }

    #[test]
    fn test_event_details_validation() {
        let mut ctx = TestContext::new();
        let now = ctx.now();

        expect_invalid_input(try_create(&mut ctx, |d| d.title = "  ".to_string()), "Title required");
        expect_invalid_input(try_create(&mut ctx, |d| d.title = "t".repeat(101)), "Title too long");
        expect_invalid_input(
            try_create(&mut ctx, |d| d.description = String::new()),
            "Description required",
        );
        expect_invalid_input(
            try_create(&mut ctx, |d| d.description = "d".repeat(1001)),
            "Description too long",
        );
        expect_invalid_input(
            try_create(&mut ctx, |d| d.location = "l".repeat(201)),
            "Location too long",
        );
        expect_invalid_input(
            try_create(&mut ctx, |d| d.image_uri = "i".repeat(301)),
            "Image URI too long",
        );
        expect_invalid_input(
            try_create(&mut ctx, |d| d.start_time = now - 1),
            "Start time must not be in the past",
        );
        expect_invalid_input(
            try_create(&mut ctx, |d| d.end_time = d.start_time),
            "End time must be after start time",
        );
        expect_invalid_input(
            try_create(&mut ctx, |d| d.expected_attendees = 4),
            "Too few expected attendees",
        );

        // Boundaries are inclusive
        let event_id = try_create(&mut ctx, |d| {
            d.title = "t".repeat(100);
            d.expected_attendees = 5;
            d.start_time = now;
        })
        .unwrap();
        assert_eq!(ctx.event(event_id).expected_attendees, 5);
    }

    #[test]
    fn test_enum_arguments_validated() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        let d = details(&ctx, 10);
        let create = |kind: u8, attestation: u8, d: EventDetails| {
            move |p: &mut ticketchain_contracts::TicketingPlatform| {
                p.create_event(
                    d.title,
                    d.description,
                    d.location,
                    d.image_uri,
                    d.start_time,
                    d.end_time,
                    d.expected_attendees,
                    kind,
                    ASSET,
                    attestation,
                )
            }
        };

        expect_invalid_input(
            ctx.call(organizer, create(2, AttestationKind::TicketHolder.as_u8(), d.clone())),
            "Invalid ticket kind",
        );
        expect_invalid_input(
            ctx.call(organizer, create(TicketKind::Free.as_u8(), 3, d)),
            "Invalid attestation kind",
        );
        expect_invalid_input(
            ctx.platform.preview_required_stake(organizer, 10, 5, U256::from(TICKET_FEE)),
            "Invalid ticket kind",
        );
    }

    #[test]
    fn test_rejected_creation_charges_nothing() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        expect_invalid_input(try_create(&mut ctx, |d| d.title = String::new()), "Title required");
        assert_eq!(ctx.balance(organizer), U256::from(STARTING_BALANCE));
        assert_eq!(ctx.custody_balance(), U256::ZERO);
        assert!(ctx.decoded::<EventCreated>().is_empty());
    }

    #[test]
    fn test_creation_requires_exact_stake() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();
        let start_time = ctx.now() + SECONDS_PER_DAY;
        let result = ctx.call_with_value(organizer, U256::from(49), |p| {
            p.create_event(
                "Highlife Festival".to_string(),
                "Two stages of live highlife music".to_string(),
                String::new(),
                String::new(),
                start_time,
                start_time + 3600,
                10,
                TicketKind::Paid.as_u8(),
                ASSET,
                AttestationKind::TicketHolder.as_u8(),
            )
        });
        match result {
            Err(TicketingError::IncorrectPayment(e)) => {
                assert_eq!(e.expected, U256::from(50));
                assert_eq!(e.provided, U256::from(49));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(ctx.balance(organizer), U256::from(STARTING_BALANCE));
    }

    #[test]
    fn test_purchase_requires_exact_payment() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let buyer = ctx.attendees(1)[0];
        let regular = TicketCategory::Regular.as_u8();

        for payment in [99u64, 101, 0] {
            match ctx.call_with_value(buyer, U256::from(payment), |p| p.purchase(event_id, regular)) {
                Err(TicketingError::IncorrectPayment(e)) => {
                    assert_eq!(e.expected, U256::from(TICKET_FEE));
                    assert_eq!(e.provided, U256::from(payment));
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
        expect_error(
            ctx.call_with_value(buyer, U256::from(TICKET_FEE), |p| {
                p.purchase(event_id, TicketCategory::Vip.as_u8())
            }),
            |e| matches!(e, TicketingError::TicketClassNotFound(_)),
        );
        assert_eq!(ctx.balance(buyer), U256::from(STARTING_BALANCE));
    }

    #[test]
    fn test_text_length_limits() {
        let mut ctx = TestContext::new();
        let event_id = ctx.create_paid_event();
        let organizer = ctx.organizer();
        let owner = ctx.owner();
        let buyer = ctx.buy_tickets(event_id, 1)[0];
        ctx.end_event(event_id);

        expect_invalid_input(
            ctx.call(buyer, |p| p.flag(event_id, FlagReason::Other.as_u8(), "e".repeat(501))),
            "Evidence too long",
        );
        expect_invalid_input(
            ctx.call(organizer, |p| p.request_manual_review(event_id, " ".to_string())),
            "Explanation required",
        );
        expect_invalid_input(
            ctx.call(organizer, |p| p.request_manual_review(event_id, "x".repeat(1001))),
            "Explanation too long",
        );
        expect_invalid_input(
            ctx.call(owner, |p| p.confirm_event_as_scam(event_id, "s".repeat(1001))),
            "Details too long",
        );
    }

    #[test]
    fn test_params_validation() {
        let base = ProtocolParams::default();
        base.validate().unwrap();

        let mut params = base.clone();
        params.release_fee_percentage = 11;
        match params.validate() {
            Err(TicketingError::InvalidInput(e)) => assert_eq!(e.reason, "Fee too high"),
            other => panic!("unexpected result: {:?}", other),
        }

        let mut params = base.clone();
        params.min_stake_percentage = 0;
        assert!(params.validate().is_err());

        let mut params = base.clone();
        params.flag_threshold_percentage = 101;
        assert!(params.validate().is_err());

        let mut params = base.clone();
        params.flagging_period = 0;
        assert!(params.validate().is_err());

        let mut params = base.clone();
        params.claim_period = Some(0);
        assert!(params.validate().is_err());

        let mut params = base;
        params.free_event_fee_tiers.reverse();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_from_json() {
        let params = ProtocolParams::from_json_str(
            r#"{
                "release_fee_percentage": 3,
                "flag_weight_policy": "tier_weighted",
                "claim_period": 604800
            }"#,
        )
        .unwrap();
        assert_eq!(params.release_fee_percentage, 3);
        assert_eq!(params.flag_weight_policy, FlagWeightPolicy::TierWeighted);
        assert_eq!(params.claim_period, Some(604_800));
        // Unspecified fields keep their defaults
        assert_eq!(params.minimum_attendance_rate, 60);

        let json = serde_json::to_string(&ProtocolParams::default()).unwrap();
        assert_eq!(ProtocolParams::from_json_str(&json).unwrap(), ProtocolParams::default());

        assert!(ProtocolParams::from_json_str(r#"{"release_fee_percentage": 50}"#).is_err());
        assert!(ProtocolParams::from_json_str("not json").is_err());
    }

    #[test]
    fn test_update_params_applies_to_new_calls() {
        let mut ctx = TestContext::new();
        let organizer = ctx.organizer();

        let mut params = ctx.params.clone();
        params.release_fee_percentage = 12;
        expect_invalid_input(update_params(&mut ctx, &params), "Fee too high");

        let mut params = ctx.params.clone();
        params.release_fee_percentage = 10;
        params.minimum_attendance_rate = 0;
        params.claim_period = Some(7 * SECONDS_PER_DAY);
        update_params(&mut ctx, &params).unwrap();

        // Stored params read back unchanged
        let stored = ProtocolParams::from_json_str(&ctx.platform.params_json().unwrap()).unwrap();
        assert_eq!(stored, params);

        let event_id = ctx.create_paid_event();
        ctx.buy_tickets(event_id, 4);
        ctx.end_event(event_id);
        let record = ctx.call(organizer, |p| p.release_revenue(event_id)).unwrap();
        assert_eq!(record.platform_fee, U256::from(40));
    }
}
