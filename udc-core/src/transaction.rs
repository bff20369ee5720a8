//! Transaction documents: transfers of previously issued coins between
//! identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{codes::transaction as codes, DocumentError, ExtractError};
use crate::extract::{extract, BlockGrammar, FieldSpec, COIN_LINE};
use crate::text::{content_hash, dos2unix, push_block, push_single, unix2dos};
use crate::validation::{digit_field, first_failure, hash_field, Rule};

/// Field grammar of a transaction document, in canonical order.
const FIELDS: &[FieldSpec] = &[
    FieldSpec::single("Version"),
    FieldSpec::single("Currency"),
    FieldSpec::single("Sender"),
    FieldSpec::single("Number"),
    FieldSpec::single("PreviousHash"),
    FieldSpec::single("Recipient"),
    FieldSpec::block("Coins", BlockGrammar::CoinReference),
    FieldSpec::block("Comment", BlockGrammar::FreeText),
];

/// The transfer a coin was last received through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTransfer {
    /// Sender of the prior transaction.
    pub sender: String,
    /// Number of the prior transaction in the sender's chain.
    pub number: u64,
}

/// A coin reference, identified by its issuing identity, issuing amendment
/// and coin index.
///
/// `transfer` is `None` when the coin was issued directly by a dividend
/// rather than received via a prior transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Fingerprint of the issuing identity.
    pub issuer: String,
    /// Amendment that minted the coin.
    pub amendment_number: u64,
    /// Index of the coin within that amendment's issuance.
    pub coin_number: u64,
    /// Prior transfer, when the coin did not come straight from a dividend.
    pub transfer: Option<CoinTransfer>,
}

impl FromStr for Coin {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ExtractError::MalformedLine(s.to_string());
        let caps = COIN_LINE.captures(s).ok_or_else(malformed)?;
        let number = |i: usize| caps[i].parse::<u64>().map_err(|_| malformed());
        let transfer = match caps.get(4) {
            Some(sender) => Some(CoinTransfer {
                sender: sender.as_str().to_string(),
                number: number(5)?,
            }),
            None => None,
        };
        Ok(Self {
            issuer: caps[1].to_string(),
            amendment_number: number(2)?,
            coin_number: number(3)?,
            transfer,
        })
    }
}

impl fmt::Display for Coin {
    /// Canonical coin line form, suffixed with the prior transfer when any.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.issuer, self.amendment_number, self.coin_number
        )?;
        if let Some(transfer) = &self.transfer {
            write!(f, ":{}-{}", transfer.sender, transfer.number)?;
        }
        Ok(())
    }
}

/// A parsed transaction document.
///
/// As with amendments, scalar fields keep their raw captures for byte-exact
/// re-serialization, and block fields are `None` when their label never
/// appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Document format version (must render `1`).
    pub version: Option<String>,
    /// Currency this transaction belongs to.
    pub currency: Option<String>,
    /// Fingerprint of the sending identity.
    pub sender: Option<String>,
    /// Position in the sender's transaction chain; `0` marks the root.
    pub number: Option<String>,
    /// Content hash of the sender's preceding transaction.
    pub previous_hash: Option<String>,
    /// Fingerprint of the receiving identity.
    pub recipient: Option<String>,
    /// Raw coin reference lines, in document order.
    pub coins: Option<Vec<String>>,
    /// Free-text comment lines.
    pub comment: Option<Vec<String>>,
    /// SHA-1 content hash of the as-received text.
    pub hash: String,
    error: Option<DocumentError>,
}

impl Transaction {
    /// Parse `raw` into a transaction.
    ///
    /// Never fails outright: structural problems are recorded on the
    /// document and reported by [`error`](Self::error) and
    /// [`verify`](Self::verify) under code `0`.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self {
                error: Some(DocumentError::structural("No transaction given")),
                ..Self::default()
            };
        }
        let mut doc = Self {
            hash: content_hash(raw),
            ..Self::default()
        };
        match extract(&dos2unix(raw), FIELDS) {
            Ok(mut fields) => {
                doc.version = fields.single("Version");
                doc.currency = fields.single("Currency");
                doc.sender = fields.single("Sender");
                doc.number = fields.single("Number");
                doc.previous_hash = fields.single("PreviousHash");
                doc.recipient = fields.single("Recipient");
                doc.coins = fields.block("Coins");
                doc.comment = fields.block("Comment");
            }
            Err(err) => doc.error = Some(DocumentError::structural(err.to_string())),
        }
        tracing::debug!("Parsed transaction {}", doc.hash);
        doc
    }

    /// Check the document's self-consistency against the expected
    /// `currency`, without touching its state.
    pub fn validate(&self, currency: &str) -> crate::Result<()> {
        if let Some(err) = self.error.as_ref().filter(|e| e.is_structural()) {
            return Err(err.clone());
        }
        let rules = [
            Rule::new(codes::VERSION, || match self.version.as_deref() {
                Some(crate::DOCUMENT_VERSION) => None,
                _ => Some("Version unknown".to_string()),
            }),
            Rule::new(codes::CURRENCY, || match self.currency.as_deref() {
                Some(c) if c == currency => None,
                other => Some(format!(
                    "Currency '{}' not managed",
                    other.unwrap_or_default()
                )),
            }),
            Rule::new(codes::NUMBER, || {
                (!digit_field(&self.number)).then(|| "Incorrect Number field".to_string())
            }),
            Rule::new(codes::SENDER, || {
                (!hash_field(&self.sender)).then(|| {
                    "Sender must be provided and match an uppercase SHA1 hash".to_string()
                })
            }),
            Rule::new(codes::RECIPIENT, || {
                (!hash_field(&self.recipient)).then(|| {
                    "Recipient must be provided and match an uppercase SHA1 hash".to_string()
                })
            }),
            Rule::new(codes::PREVIOUS_HASH_PRESENT, || {
                (self.is_root() && self.previous_hash.is_some()).then(|| {
                    "PreviousHash must not be provided for root transactions".to_string()
                })
            }),
            Rule::new(codes::PREVIOUS_HASH_ABSENT, || {
                (!self.is_root() && !hash_field(&self.previous_hash)).then(|| {
                    "PreviousHash must be provided for non-root transactions and match an \
                     uppercase SHA1 hash"
                        .to_string()
                })
            }),
            Rule::new(codes::NEED_ONE_COIN, || {
                self.coins()
                    .is_empty()
                    .then(|| "Transaction requires at least one coin".to_string())
            }),
        ];
        match first_failure(&rules) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Run the validation rules and store the outcome on the document.
    ///
    /// Returns `true` and clears any prior validation error on success.
    pub fn verify(&mut self, currency: &str) -> bool {
        match self.validate(currency) {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(err) => {
                tracing::debug!("Transaction rejected with code {}: {}", err.code, err.message);
                self.error = Some(err);
                false
            }
        }
    }

    /// Last recorded parse or validation failure.
    pub fn error(&self) -> Option<&DocumentError> {
        self.error.as_ref()
    }

    /// Code of the last recorded failure; `0` marks a structural one.
    pub fn error_code(&self) -> Option<u16> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Chain position, when the Number field parses.
    pub fn sequence_number(&self) -> Option<u64> {
        self.number.as_deref().and_then(|n| n.parse().ok())
    }

    /// Whether this transaction is the root of its sender's chain.
    pub fn is_root(&self) -> bool {
        self.sequence_number() == Some(0)
    }

    /// Typed view of the coin reference lines, in document order.
    ///
    /// Lines that fail to parse (possible only through out-of-range
    /// numbers, since extraction already vetted the grammar) are skipped.
    pub fn coins(&self) -> Vec<Coin> {
        self.coins
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|line| line.parse().ok())
            .collect()
    }

    /// Canonical CRLF text of the document.
    ///
    /// For a validly parsed document this reproduces the hashed bytes:
    /// `content_hash(&self.raw()) == self.hash`.
    pub fn raw(&self) -> String {
        let mut out = String::new();
        push_single(&mut out, "Version", &self.version);
        push_single(&mut out, "Currency", &self.currency);
        push_single(&mut out, "Sender", &self.sender);
        push_single(&mut out, "Number", &self.number);
        push_single(&mut out, "PreviousHash", &self.previous_hash);
        push_single(&mut out, "Recipient", &self.recipient);
        push_block(&mut out, "Coins", &self.coins);
        push_block(&mut out, "Comment", &self.comment);
        unix2dos(&out)
    }
}
