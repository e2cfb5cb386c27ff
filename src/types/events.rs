use alloy_sol_types::sol;

sol! {
    // Registry Events
    #[derive(Debug)]
    event EventCreated(
        uint256 indexed event_id,
        address indexed organizer,
        string title,
        uint8 ticket_kind,
        address payment_asset,
        uint64 start_time,
        uint64 end_time,
        uint64 expected_attendees
    );

    #[derive(Debug)]
    event TicketClassCreated(
        uint256 indexed event_id,
        uint256 indexed class_id,
        uint8 category,
        uint256 fee,
        address issuance
    );

    #[derive(Debug)]
    event StakeDeposited(
        uint256 indexed event_id,
        address indexed organizer,
        uint256 amount,
        uint256 total_staked
    );

    #[derive(Debug)]
    event ServiceFeeCharged(
        uint256 indexed event_id,
        address indexed organizer,
        address asset,
        uint256 amount
    );

    // Registration Events
    #[derive(Debug)]
    event TicketPurchased(
        uint256 indexed event_id,
        address indexed buyer,
        uint8 category,
        uint256 amount_paid,
        uint256 token_id
    );

    #[derive(Debug)]
    event BatchPurchaseCompleted(
        uint256 indexed event_id,
        address indexed payer,
        uint256 registered_count,
        uint256 skipped_count,
        uint256 amount_charged
    );

    #[derive(Debug)]
    event AttestationAnchorSet(
        uint256 indexed event_id,
        bytes32 anchor
    );

    #[derive(Debug)]
    event AttendanceVerified(
        uint256 indexed event_id,
        address indexed account,
        uint64 verified_count
    );

    #[derive(Debug)]
    event GroupAttendanceVerified(
        uint256 indexed event_id,
        address indexed organizer,
        uint256 newly_verified,
        uint256 skipped
    );

    // Flag Events
    #[derive(Debug)]
    event FlagRaised(
        uint256 indexed event_id,
        address indexed account,
        uint8 reason,
        uint256 weight,
        uint256 total_flag_weight
    );

    #[derive(Debug)]
    event ManualReviewRequested(
        uint256 indexed event_id,
        address indexed organizer,
        string explanation,
        uint64 requested_at
    );

    // Settlement Events
    #[derive(Debug)]
    event RevenueReleased(
        uint256 indexed event_id,
        address indexed organizer,
        uint256 organizer_amount,
        uint256 platform_fee,
        uint256 stake_returned,
        bool manually_released
    );

    #[derive(Debug)]
    event EventConfirmedScam(
        uint256 indexed event_id,
        address indexed organizer,
        string details,
        uint256 platform_share,
        uint256 refund_pool
    );

    #[derive(Debug)]
    event RefundClaimed(
        uint256 indexed event_id,
        address indexed account,
        uint256 ticket_refund,
        uint256 stake_share
    );

    #[derive(Debug)]
    event RefundsSwept(
        uint256 indexed event_id,
        uint256 revenue,
        uint256 refund_pool,
        uint256 flag_stakes
    );

    #[derive(Debug)]
    event FlagStakeClaimed(
        uint256 indexed event_id,
        address indexed account,
        uint256 amount
    );

    #[derive(Debug)]
    event OrganizerBanned(
        address indexed organizer,
        uint64 scam_events
    );

    // Platform Management Events
    #[derive(Debug)]
    event PaymentAssetUpdated(address indexed asset, bool accepted);

    #[derive(Debug)]
    event PlatformRevenueWithdrawn(
        address indexed asset,
        address indexed recipient,
        uint256 amount
    );

    #[derive(Debug)]
    event PlatformPaused(uint64 timestamp);

    #[derive(Debug)]
    event PlatformUnpaused(uint64 timestamp);

    #[derive(Debug)]
    event OwnershipTransferred(address indexed previous_owner, address indexed new_owner);

    #[derive(Debug)]
    event ProtocolParamsUpdated(uint64 timestamp);
}
