//! Boundary to the external credential resolver.
//!
//! Resolving a public-key credential block into a human identity happens
//! outside this crate; the document engine only ever consumes fingerprints
//! as opaque 40-hex strings already embedded in documents. This module
//! pins down the seam: the value record a resolver produces, the trait it
//! implements, and the identity-line splitter the known credential formats
//! share.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `Name (Comment) <email>`
static FULL_UID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*) \((.*)\) <(.*)>$").expect("valid regex"));

/// `Name <email>`
static BARE_UID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*) <(.*)>$").expect("valid regex"));

/// Identity details extracted from a public-key credential block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Key fingerprint, 40 uppercase hex characters.
    pub fingerprint: String,
    /// Holder name from the primary identity line.
    pub name: String,
    /// Optional comment from the primary identity line.
    pub comment: String,
    /// Email address from the primary identity line.
    pub email: String,
}

/// Resolves a human identity from an ASCII-armored credential block.
pub trait CredentialResolver {
    /// Resolver-specific failure type.
    type Error;

    /// Extract the fingerprint and primary identity of `armored`.
    fn resolve(&self, armored: &str) -> Result<Credential, Self::Error>;
}

/// Split a primary identity line into `(name, comment, email)`.
///
/// Accepts the `Name (Comment) <email>` and `Name <email>` forms; the
/// comment is empty in the latter.
pub fn split_identity(uid: &str) -> Option<(String, String, String)> {
    if let Some(caps) = FULL_UID.captures(uid) {
        return Some((caps[1].to_string(), caps[2].to_string(), caps[3].to_string()));
    }
    BARE_UID
        .captures(uid)
        .map(|caps| (caps[1].to_string(), String::new(), caps[2].to_string()))
}
