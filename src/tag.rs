/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! FIX tag number constants and the built-in name/enum tables.
//!
//! The constants cover the tags the crate itself inspects (framing, message
//! type, and the party group used throughout the tests). The default tables
//! seed every [`crate::dictionary::Dictionary`] so that messages remain
//! readable before any QuickFIX dictionary has been loaded.

// ---------------------------------------------------------------------------
// Standard header tags
// ---------------------------------------------------------------------------

/// Tag 8 — BeginString: identifies the FIX version (e.g., "FIX.4.4").
pub const BEGIN_STRING: u32 = 8;

/// Tag 9 — BodyLength.
pub const BODY_LENGTH: u32 = 9;

/// Tag 35 — MsgType: selects the per-message-type group schemas.
pub const MSG_TYPE: u32 = 35;

/// Tag 10 — CheckSum.
pub const CHECKSUM: u32 = 10;

// ---------------------------------------------------------------------------
// Body tags
// ---------------------------------------------------------------------------

/// Tag 11 — ClOrdID.
pub const CL_ORD_ID: u32 = 11;

/// Tag 54 — Side.
pub const SIDE: u32 = 54;

/// Tag 55 — Symbol.
pub const SYMBOL: u32 = 55;

/// Tag 58 — Text.
pub const TEXT: u32 = 58;

// ---------------------------------------------------------------------------
// Parties repeating group
// ---------------------------------------------------------------------------

/// Tag 453 — NoPartyIDs: count field of the Parties group.
pub const NO_PARTY_IDS: u32 = 453;

/// Tag 448 — PartyID: delimiter of each Parties instance.
pub const PARTY_ID: u32 = 448;

/// Tag 447 — PartyIDSource.
pub const PARTY_ID_SOURCE: u32 = 447;

/// Tag 452 — PartyRole.
pub const PARTY_ROLE: u32 = 452;

/// Tag 802 — NoPartySubIDs: count field of the group nested in Parties.
pub const NO_PARTY_SUB_IDS: u32 = 802;

/// Tag 523 — PartySubID: delimiter of each PartySubIDs instance.
pub const PARTY_SUB_ID: u32 = 523;

/// Tag 803 — PartySubIDType.
pub const PARTY_SUB_ID_TYPE: u32 = 803;

// ---------------------------------------------------------------------------
// Default tables
// ---------------------------------------------------------------------------

/// Tag names known without any dictionary loaded.
///
/// Group count tags are listed for naming only; the built-in dictionary
/// carries no group schemas.
pub const DEFAULT_TAG_NAMES: &[(u32, &str)] = &[
    (8, "BeginString"),
    (9, "BodyLength"),
    (35, "MsgType"),
    (34, "MsgSeqNum"),
    (49, "SenderCompID"),
    (56, "TargetCompID"),
    (52, "SendingTime"),
    (10, "CheckSum"),
    (11, "ClOrdID"),
    (37, "OrderID"),
    (38, "OrderQty"),
    (40, "OrdType"),
    (44, "Price"),
    (54, "Side"),
    (55, "Symbol"),
    (60, "TransactTime"),
    (150, "ExecType"),
    (39, "OrdStatus"),
    (151, "LeavesQty"),
    (14, "CumQty"),
    (6, "AvgPx"),
    (453, "NoPartyIDs"),
    (448, "PartyID"),
    (447, "PartyIDSource"),
    (452, "PartyRole"),
    (1, "Account"),
    (59, "TimeInForce"),
    (64, "SettlDate"),
    (41, "OrigClOrdID"),
    (128, "DeliverToCompID"),
    (58, "Text"),
    (526, "SecondaryClOrdID"),
    (30, "LastMkt"),
    (31, "LastPx"),
    (32, "LastQty"),
    (15, "Currency"),
    (552, "NoSides"),
    (555, "NoLegs"),
    (146, "NoRelatedSym"),
    (802, "NoPartySubIDs"),
    (600, "LegSymbol"),
    (623, "LegRatioQty"),
    (654, "LegRefID"),
    (602, "LegSecurityID"),
    (603, "LegSecurityIDSource"),
    (556, "LegCurrency"),
    (685, "LegOrderQty"),
    (624, "LegSide"),
    (588, "LegSettlDate"),
    (609, "LegSecurityType"),
    (523, "PartySubID"),
    (803, "PartySubIDType"),
    (537, "QuoteType"),
    (131, "QuoteReqID"),
    (75, "TradeDate"),
];

/// Enumerated value descriptions known without any dictionary loaded.
pub const DEFAULT_ENUMS: &[(u32, &[(&str, &str)])] = &[
    (
        35,
        &[
            ("D", "NewOrderSingle"),
            ("8", "ExecutionReport"),
            ("0", "Heartbeat"),
            ("A", "Logon"),
            ("F", "OrderCancelRequest"),
            ("R", "QuoteRequest"),
            ("G", "OrderCancelReplaceRequest"),
        ],
    ),
    (
        54,
        &[
            ("1", "Buy"),
            ("2", "Sell"),
            ("5", "Sell Short"),
            ("6", "Sell Short Exempt"),
        ],
    ),
    (
        39,
        &[
            ("0", "New"),
            ("1", "PartiallyFilled"),
            ("2", "Filled"),
            ("4", "Canceled"),
            ("8", "Rejected"),
        ],
    ),
    (
        40,
        &[
            ("1", "Market"),
            ("2", "Limit"),
            ("3", "Stop"),
            ("4", "Stop Limit"),
        ],
    ),
    (59, &[("0", "Day"), ("1", "GTC"), ("3", "IOC"), ("4", "FOK")]),
    (
        452,
        &[
            ("1", "ExecutingFirm"),
            ("2", "BrokerOfCredit"),
            ("3", "ClientId"),
            ("11", "OrderOriginationTrader"),
            ("12", "ExecutingTrader"),
            ("13", "OrderOriginationFirm"),
        ],
    ),
    (63, &[("0", "Settlement"), ("1", "Trade"), ("2", "WhenIssued")]),
    (537, &[("1", "Tradeable"), ("0", "Indicative")]),
];
