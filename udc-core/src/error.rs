//! Error types for document parsing and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rejected document: one tagged code plus a human-readable diagnostic.
///
/// Code `0` marks a structural parse failure; semantic rules report the
/// per-document codes listed in [`codes`]. A `verify` call surfaces at most
/// one of these, chosen by the fixed rule order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct DocumentError {
    /// Tagged error code (`0` for structural failures).
    pub code: u16,
    /// Diagnostic message.
    pub message: String,
}

impl DocumentError {
    pub(crate) fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Wrap a structural parse failure under the reserved code `0`.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }

    /// Whether this failure came from parsing rather than validation.
    pub fn is_structural(&self) -> bool {
        self.code == 0
    }
}

/// Structural failure raised while splitting a document into fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The document does not end with a line terminator.
    #[error("Bad document structure: no new line character at the end of the document.")]
    MissingFinalNewline,
    /// A block field contains a line violating its grammar.
    #[error("Wrong structure for line: '{0}'")]
    MalformedLine(String),
}

/// Tagged validation codes, kept separate per document kind.
///
/// The two tables intentionally overlap in value but not in meaning; a code
/// is only interpretable next to the document kind that produced it.
pub mod codes {
    /// Amendment validation codes.
    ///
    /// `VOTERS_ROOT`/`MEMBERS_ROOT` and `VOTERS_COUNT`/`MEMBERS_COUNT`
    /// share values; the rule order decides which one a given failure
    /// means.
    pub mod amendment {
        /// Version is not the supported `1`.
        pub const VERSION: u16 = 150;
        /// Currency does not match the expected network currency.
        pub const CURRENCY: u16 = 151;
        /// Number field missing or not a non-negative integer.
        pub const NUMBER: u16 = 152;
        /// GeneratedOn field missing or not a non-negative integer.
        pub const GENERATED_ON: u16 = 153;
        /// UniversalDividend present but not a non-negative integer.
        pub const UNIVERSAL_DIVIDEND: u16 = 154;
        /// NextRequiredVotes present but not a non-negative integer.
        pub const NEXT_VOTES: u16 = 156;
        /// PreviousHash breaks the root/non-root presence rule.
        pub const PREVIOUS_HASH: u16 = 157;
        /// VotersRoot missing or malformed on a non-root amendment.
        pub const VOTERS_ROOT: u16 = 160;
        /// VotersCount missing or malformed on a non-root amendment.
        pub const VOTERS_COUNT: u16 = 161;
        /// MembersRoot missing or malformed.
        pub const MEMBERS_ROOT: u16 = 160;
        /// MembersCount missing or malformed.
        pub const MEMBERS_COUNT: u16 = 161;
        /// CoinBase missing or malformed while a dividend is declared.
        pub const COIN_BASE: u16 = 173;
        /// CoinList missing or malformed while a dividend is declared.
        pub const COIN_LIST: u16 = 174;
        /// CoinList weighted sum does not equal the dividend.
        pub const COIN_SUM: u16 = 175;
    }

    /// Transaction validation codes.
    pub mod transaction {
        /// Version is not the supported `1`.
        pub const VERSION: u16 = 150;
        /// Currency does not match the expected network currency.
        pub const CURRENCY: u16 = 151;
        /// Number field missing or not a non-negative integer.
        pub const NUMBER: u16 = 152;
        /// Sender missing or not a 40-hex fingerprint.
        pub const SENDER: u16 = 153;
        /// Recipient missing or not a 40-hex fingerprint.
        pub const RECIPIENT: u16 = 154;
        /// PreviousHash present on a root transaction.
        pub const PREVIOUS_HASH_PRESENT: u16 = 156;
        /// PreviousHash missing or malformed on a non-root transaction.
        pub const PREVIOUS_HASH_ABSENT: u16 = 157;
        /// Coin list is empty.
        pub const NEED_ONE_COIN: u16 = 159;
    }
}
