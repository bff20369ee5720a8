//! Document formats of a universal-dividend currency ledger.
//!
//! This crate parses, validates, and canonically re-serializes the two
//! line-oriented text documents the ledger is built from: [`Amendment`]s
//! (voted snapshots of the member and voter sets, optionally minting a
//! universal dividend as discrete coins) and [`Transaction`]s (transfers of
//! previously issued coins between identities). Each document is hashed
//! over its CRLF form; the hash chains documents together and makes the
//! ledger tamper-evident.
//!
//! Parsing never fails outright: a document constructed from malformed
//! text records the failure and reports it through
//! [`verify`](Amendment::verify), which also runs the ordered semantic
//! rule set. Canonical re-serialization via [`raw`](Amendment::raw)
//! reproduces the hashed bytes exactly for any validly parsed document.
//!
//! ```
//! use udc_core::Amendment;
//!
//! let text = "Version: 1\r\n\
//!             Currency: open_brousouf\r\n\
//!             Number: 0\r\n\
//!             GeneratedOn: 1380397288\r\n\
//!             MembersRoot: F5ACFD67FC908D28C0CFDAD886249AC260515C90\r\n\
//!             MembersCount: 1\r\n\
//!             MembersChanges:\r\n\
//!             +2E69197FAB029D8669EF85E82457A1587CA0ED9C\r\n\
//!             VotersRoot: F5ACFD67FC908D28C0CFDAD886249AC260515C90\r\n\
//!             VotersCount: 1\r\n\
//!             VotersChanges:\r\n\
//!             +2E69197FAB029D8669EF85E82457A1587CA0ED9C\r\n";
//! let mut amendment = Amendment::parse(text);
//! assert!(amendment.verify("open_brousouf"));
//! assert_eq!(amendment.new_members().len(), 1);
//! ```

pub mod amendment;
pub mod credential;
pub mod error;
mod extract;
pub mod text;
pub mod transaction;
mod validation;

pub use amendment::{Amendment, Issuance};
pub use credential::{Credential, CredentialResolver};
pub use error::{codes, DocumentError, ExtractError};
pub use transaction::{Coin, CoinTransfer, Transaction};

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// The single supported document format version.
pub const DOCUMENT_VERSION: &str = "1";
