//! Amendment documents: periodic, voted snapshots of the member and voter
//! sets, optionally minting a universal dividend as discrete coins.

use serde::{Deserialize, Serialize};

use crate::error::{codes::amendment as codes, DocumentError};
use crate::extract::{extract, BlockGrammar, FieldSpec};
use crate::text::{content_hash, dos2unix, push_block, push_single, unix2dos};
use crate::validation::{digit_field, first_failure, hash_field, is_digits, Rule};

/// Field grammar of an amendment document, in canonical order.
const FIELDS: &[FieldSpec] = &[
    FieldSpec::single("Version"),
    FieldSpec::single("Currency"),
    FieldSpec::single("Number"),
    FieldSpec::single("GeneratedOn"),
    FieldSpec::single("UniversalDividend"),
    FieldSpec::single("CoinAlgo"),
    FieldSpec::single("CoinBase"),
    FieldSpec::single("CoinList"),
    FieldSpec::single("NextRequiredVotes"),
    FieldSpec::single("PreviousHash"),
    FieldSpec::single("MembersRoot"),
    FieldSpec::single("MembersCount"),
    FieldSpec::block("MembersChanges", BlockGrammar::IdentityChange),
    FieldSpec::single("VotersRoot"),
    FieldSpec::single("VotersCount"),
    FieldSpec::block("VotersChanges", BlockGrammar::IdentityChange),
];

/// Currency issuance carried by an amendment.
///
/// The dividend cluster is all-or-nothing: a declared dividend requires a
/// coin base and a coin list whose weighted sum equals it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issuance {
    /// No universal dividend this period.
    None,
    /// A universal dividend minted as one coin count per consecutive power
    /// of two starting at `coin_base`.
    Dividend {
        /// Total issued amount.
        amount: u64,
        /// Exponent of the smallest coin denomination.
        coin_base: u32,
        /// Coin counts, one per power of two.
        coin_list: Vec<u64>,
        /// Issuance algorithm label.
        algo: Option<String>,
    },
}

/// A parsed amendment document.
///
/// Scalar fields keep their raw textual captures so that [`raw`](Self::raw)
/// reproduces the hashed bytes exactly; shape violations surface as tagged
/// codes from [`verify`](Self::verify) rather than parse failures. Block
/// fields are `None` when their label never appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amendment {
    /// Document format version (must render `1`).
    pub version: Option<String>,
    /// Currency this amendment belongs to.
    pub currency: Option<String>,
    /// Position in the amendment chain; `0` marks the root.
    pub number: Option<String>,
    /// Generation timestamp, seconds.
    pub generated: Option<String>,
    /// Universal dividend minted by this amendment, when any.
    pub dividend: Option<String>,
    /// Issuance algorithm label, meaningful only with a dividend.
    pub coin_algo: Option<String>,
    /// Exponent of the smallest coin denomination.
    pub coin_base: Option<String>,
    /// Space-separated coin counts, one per power of two.
    pub coin_list: Option<String>,
    /// Vote count required by the next amendment.
    pub next_votes: Option<String>,
    /// Content hash of the preceding amendment; absent on the root.
    pub previous_hash: Option<String>,
    /// Merkle root of the resulting member set.
    pub members_root: Option<String>,
    /// Size of the resulting member set.
    pub members_count: Option<String>,
    /// Ordered `+`/`-` member delta lines.
    pub members_changes: Option<Vec<String>>,
    /// Merkle root of the resulting voter set.
    pub voters_root: Option<String>,
    /// Size of the resulting voter set.
    pub voters_count: Option<String>,
    /// Ordered `+`/`-` voter delta lines.
    pub voters_changes: Option<Vec<String>>,
    /// SHA-1 content hash of the as-received text.
    pub hash: String,
    error: Option<DocumentError>,
}

impl Amendment {
    /// Parse `raw` into an amendment.
    ///
    /// Never fails outright: structural problems are recorded on the
    /// document and reported by [`error`](Self::error) and
    /// [`verify`](Self::verify) under code `0`.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self {
                error: Some(DocumentError::structural("No amendment given")),
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
                doc.number = fields.single("Number");
                doc.generated = fields.single("GeneratedOn");
                doc.dividend = fields.single("UniversalDividend");
                doc.coin_algo = fields.single("CoinAlgo");
                doc.coin_base = fields.single("CoinBase");
                doc.coin_list = fields.single("CoinList");
                doc.next_votes = fields.single("NextRequiredVotes");
                doc.previous_hash = fields.single("PreviousHash");
                doc.members_root = fields.single("MembersRoot");
                doc.members_count = fields.single("MembersCount");
                doc.members_changes = fields.block("MembersChanges");
                doc.voters_root = fields.single("VotersRoot");
                doc.voters_count = fields.single("VotersCount");
                doc.voters_changes = fields.block("VotersChanges");
            }
            Err(err) => doc.error = Some(DocumentError::structural(err.to_string())),
        }
        tracing::debug!("Parsed amendment {}", doc.hash);
        doc
    }

    /// Check the document's self-consistency against the expected
    /// `currency`, without touching its state.
    ///
    /// Rules run in a fixed order and stop at the first failure, so exactly
    /// one code comes back even when several fields are wrong at once.
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
            Rule::new(codes::GENERATED_ON, || {
                (!digit_field(&self.generated))
                    .then(|| "GeneratedOn field must be a positive or zero integer".to_string())
            }),
            Rule::new(codes::UNIVERSAL_DIVIDEND, || {
                match self.dividend.as_deref() {
                    Some(d) if !is_digits(d) => {
                        Some("UniversalDividend must be a positive or zero integer".to_string())
                    }
                    _ => None,
                }
            }),
            Rule::new(codes::COIN_BASE, || {
                (self.dividend.is_some() && !digit_field(&self.coin_base))
                    .then(|| "CoinBase must be a positive or zero integer".to_string())
            }),
            Rule::new(codes::COIN_LIST, || {
                (self.dividend.is_some() && !coin_list_shaped(&self.coin_list)).then(|| {
                    "CoinList must be a space separated list of positive or zero integers"
                        .to_string()
                })
            }),
            Rule::new(codes::COIN_SUM, || {
                let dividend = self.dividend.as_deref()?;
                let expected = dividend.parse::<u128>().ok();
                let sum = self.coin_sum();
                if sum.is_some() && sum == expected {
                    None
                } else {
                    Some(format!(
                        "CoinList sum '{}' does not match UniversalDividend '{}'",
                        sum.map(|s| s.to_string()).unwrap_or_default(),
                        dividend
                    ))
                }
            }),
            Rule::new(codes::NEXT_VOTES, || match self.next_votes.as_deref() {
                Some(v) if !is_digits(v) => {
                    Some("NextRequiredVotes must be a positive or zero integer".to_string())
                }
                _ => None,
            }),
            Rule::new(codes::PREVIOUS_HASH, || {
                if self.is_root() {
                    self.previous_hash.as_ref().map(|_| {
                        "PreviousHash must not be provided for root amendment".to_string()
                    })
                } else {
                    (!hash_field(&self.previous_hash)).then(|| {
                        "PreviousHash must be provided for non-root amendment and match an \
                         uppercase SHA1 hash"
                            .to_string()
                    })
                }
            }),
            Rule::new(codes::VOTERS_ROOT, || {
                (self.previous_hash.is_some() && !hash_field(&self.voters_root)).then(|| {
                    "VotersRoot must be provided and match an uppercase SHA1 hash".to_string()
                })
            }),
            Rule::new(codes::VOTERS_COUNT, || {
                (self.previous_hash.is_some() && !digit_field(&self.voters_count))
                    .then(|| "VotersCount must be a positive or zero integer".to_string())
            }),
            Rule::new(codes::MEMBERS_ROOT, || {
                (!hash_field(&self.members_root)).then(|| {
                    "MembersRoot must be provided and match an uppercase SHA1 hash".to_string()
                })
            }),
            Rule::new(codes::MEMBERS_COUNT, || {
                (!digit_field(&self.members_count))
                    .then(|| "MembersCount must be a positive or zero integer".to_string())
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
                tracing::debug!("Amendment rejected with code {}: {}", err.code, err.message);
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

    /// Whether this amendment is the root of its chain.
    pub fn is_root(&self) -> bool {
        self.sequence_number() == Some(0)
    }

    /// Generation timestamp, when the GeneratedOn field parses.
    pub fn generated_on(&self) -> Option<u64> {
        self.generated.as_deref().and_then(|g| g.parse().ok())
    }

    /// Vote count required of the successor, when present and numeric.
    pub fn next_required_votes(&self) -> Option<u64> {
        self.next_votes.as_deref().and_then(|v| v.parse().ok())
    }

    /// Typed view of the dividend cluster.
    ///
    /// Yields [`Issuance::None`] when no dividend is declared or the
    /// cluster is not numerically well-formed; run
    /// [`validate`](Self::validate) first to tell the two apart.
    pub fn issuance(&self) -> Issuance {
        let (Some(dividend), Some(base), Some(list)) = (
            self.dividend.as_deref(),
            self.coin_base.as_deref(),
            self.coin_list.as_deref(),
        ) else {
            return Issuance::None;
        };
        let (Ok(amount), Ok(coin_base)) = (dividend.parse(), base.parse()) else {
            return Issuance::None;
        };
        let mut coin_list = Vec::new();
        for count in list.split(' ') {
            match count.parse() {
                Ok(count) => coin_list.push(count),
                Err(_) => return Issuance::None,
            }
        }
        Issuance::Dividend {
            amount,
            coin_base,
            coin_list,
            algo: self.coin_algo.clone(),
        }
    }

    /// Fingerprints joining the member set, in document order.
    pub fn new_members(&self) -> Vec<String> {
        sigil_filter(self.members_changes.as_deref(), '+')
    }

    /// Fingerprints leaving the member set, in document order.
    pub fn leaving_members(&self) -> Vec<String> {
        sigil_filter(self.members_changes.as_deref(), '-')
    }

    /// Fingerprints joining the voter set, in document order.
    pub fn new_voters(&self) -> Vec<String> {
        sigil_filter(self.voters_changes.as_deref(), '+')
    }

    /// Fingerprints leaving the voter set, in document order.
    pub fn leaving_voters(&self) -> Vec<String> {
        sigil_filter(self.voters_changes.as_deref(), '-')
    }

    /// Canonical CRLF text of the document.
    ///
    /// For a validly parsed document this reproduces the hashed bytes:
    /// `content_hash(&self.raw()) == self.hash`.
    pub fn raw(&self) -> String {
        let mut out = String::new();
        push_single(&mut out, "Version", &self.version);
        push_single(&mut out, "Currency", &self.currency);
        push_single(&mut out, "Number", &self.number);
        push_single(&mut out, "GeneratedOn", &self.generated);
        if self.dividend.is_some() {
            push_single(&mut out, "UniversalDividend", &self.dividend);
            push_single(&mut out, "CoinAlgo", &self.coin_algo);
            push_single(&mut out, "CoinBase", &self.coin_base);
            push_single(&mut out, "CoinList", &self.coin_list);
        }
        push_single(&mut out, "NextRequiredVotes", &self.next_votes);
        push_single(&mut out, "PreviousHash", &self.previous_hash);
        push_single(&mut out, "MembersRoot", &self.members_root);
        push_single(&mut out, "MembersCount", &self.members_count);
        push_block(&mut out, "MembersChanges", &self.members_changes);
        push_single(&mut out, "VotersRoot", &self.voters_root);
        push_single(&mut out, "VotersCount", &self.voters_count);
        push_block(&mut out, "VotersChanges", &self.voters_changes);
        unix2dos(&out)
    }

    /// Weighted coin sum `Σ coin[i] * 2^(coin_base + i)`.
    ///
    /// `None` when a component is missing, non-numeric, or the sum
    /// overflows.
    fn coin_sum(&self) -> Option<u128> {
        let base: u32 = self.coin_base.as_deref()?.parse().ok()?;
        let list = self.coin_list.as_deref()?;
        let mut sum: u128 = 0;
        for (i, count) in list.split(' ').enumerate() {
            let count: u128 = count.parse().ok()?;
            let power = base.checked_add(u32::try_from(i).ok()?)?;
            let weight = 1u128.checked_shl(power)?;
            sum = sum.checked_add(count.checked_mul(weight)?)?;
        }
        Some(sum)
    }
}

/// Space-separated list of non-negative integers (`^(\d+ )*\d+$`).
fn coin_list_shaped(field: &Option<String>) -> bool {
    field
        .as_deref()
        .map_or(false, |list| list.split(' ').all(is_digits))
}

fn sigil_filter(changes: Option<&[String]>, sigil: char) -> Vec<String> {
    changes
        .unwrap_or_default()
        .iter()
        .filter_map(|line| line.strip_prefix(sigil).map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENCY: &str = "beta_brousouf";
    const FPR_A: &str = "2E69197FAB029D8669EF85E82457A1587CA0ED9C";
    const FPR_B: &str = "33BBFC0C67078D72AF128B5BA296CC530126F372";
    const ROOT: &str = "F5ACFD67FC908D28C0CFDAD886249AC260515C90";
    const PREV: &str = "58A2700B6CE56E112238FDCD81C8DACE2F2D06DC";

    fn doc(lines: &[&str]) -> String {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn minimal_root() -> String {
        doc(&[
            "Version: 1",
            "Currency: beta_brousouf",
            "Number: 0",
            "GeneratedOn: 1380397288",
            "NextRequiredVotes: 2",
            &format!("MembersRoot: {ROOT}"),
            "MembersCount: 2",
            "MembersChanges:",
            &format!("+{FPR_A}"),
            &format!("+{FPR_B}"),
            &format!("VotersRoot: {ROOT}"),
            "VotersCount: 2",
            "VotersChanges:",
            &format!("+{FPR_A}"),
            &format!("+{FPR_B}"),
        ])
    }

    #[test]
    fn test_root_amendment_verifies() {
        let mut am = Amendment::parse(&minimal_root());
        assert!(am.error().is_none());
        assert!(am.verify(CURRENCY));
        assert!(am.error().is_none());
        assert!(am.is_root());
        assert_eq!(am.sequence_number(), Some(0));
        assert_eq!(am.generated_on(), Some(1_380_397_288));
        assert_eq!(am.next_required_votes(), Some(2));
        assert_eq!(am.issuance(), Issuance::None);
    }

    #[test]
    fn test_membership_queries_preserve_order() {
        let am = Amendment::parse(&minimal_root());
        assert_eq!(am.new_members(), vec![FPR_A, FPR_B]);
        assert!(am.leaving_members().is_empty());
        assert_eq!(am.new_voters(), vec![FPR_A, FPR_B]);
        assert!(am.leaving_voters().is_empty());
    }

    #[test]
    fn test_round_trip_reproduces_hash() {
        let am = Amendment::parse(&minimal_root());
        assert_eq!(content_hash(&am.raw()), am.hash);
    }

    #[test]
    fn test_empty_input_is_structural() {
        let mut am = Amendment::parse("");
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(0));
        assert_eq!(am.error().unwrap().message, "No amendment given");
    }

    #[test]
    fn test_missing_final_newline_is_structural() {
        let mut text = minimal_root();
        text.pop();
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(0));
        assert!(am.error().unwrap().message.starts_with("Bad document structure"));
    }

    #[test]
    fn test_malformed_change_line_is_structural() {
        let text = minimal_root().replace(&format!("+{FPR_B}"), "member without sigil");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(0));
        assert_eq!(
            am.error().unwrap().message,
            "Wrong structure for line: 'member without sigil'"
        );
    }

    #[test]
    fn test_unknown_version_code() {
        let text = minimal_root().replace("Version: 1", "Version: 2");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::VERSION));
    }

    #[test]
    fn test_foreign_currency_code() {
        let mut am = Amendment::parse(&minimal_root());
        assert!(!am.verify("other_currency"));
        assert_eq!(am.error_code(), Some(codes::CURRENCY));
        assert_eq!(
            am.error().unwrap().message,
            "Currency 'beta_brousouf' not managed"
        );
    }

    #[test]
    fn test_rule_order_reports_earliest_failure() {
        // both version and currency are wrong; version wins
        let text = minimal_root().replace("Version: 1", "Version: nope");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify("other_currency"));
        assert_eq!(am.error_code(), Some(codes::VERSION));
    }

    #[test]
    fn test_non_numeric_number_code() {
        let text = minimal_root().replace("Number: 0", "Number: zero");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::NUMBER));
        assert_eq!(am.error().unwrap().message, "Incorrect Number field");
    }

    #[test]
    fn test_missing_generated_on_code() {
        let text = minimal_root().replace("GeneratedOn: 1380397288\n", "");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::GENERATED_ON));
    }

    #[test]
    fn test_non_numeric_next_votes_code() {
        let text = minimal_root().replace("NextRequiredVotes: 2", "NextRequiredVotes: two");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::NEXT_VOTES));
    }

    #[test]
    fn test_next_votes_is_optional() {
        let text = minimal_root().replace("NextRequiredVotes: 2\n", "");
        let mut am = Amendment::parse(&text);
        assert!(am.verify(CURRENCY), "{:?}", am.error());
        assert_eq!(am.next_required_votes(), None);
    }

    #[test]
    fn test_root_with_previous_hash_rejected() {
        let text = minimal_root().replace(
            "GeneratedOn: 1380397288",
            &format!("GeneratedOn: 1380397288\nPreviousHash: {PREV}"),
        );
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::PREVIOUS_HASH));
        assert_eq!(
            am.error().unwrap().message,
            "PreviousHash must not be provided for root amendment"
        );
    }

    #[test]
    fn test_non_root_without_previous_hash_rejected() {
        let text = minimal_root().replace("Number: 0", "Number: 4");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::PREVIOUS_HASH));
    }

    #[test]
    fn test_voters_root_required_on_non_root() {
        let text = minimal_root()
            .replace("Number: 0", "Number: 4")
            .replace(
                "GeneratedOn: 1380397288",
                &format!("GeneratedOn: 1380397288\nPreviousHash: {PREV}"),
            )
            .replace(&format!("VotersRoot: {ROOT}\n"), "");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::VOTERS_ROOT));
    }

    #[test]
    fn test_members_root_always_required() {
        let text = minimal_root().replace(&format!("MembersRoot: {ROOT}\n"), "");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::MEMBERS_ROOT));
    }

    fn dividend_doc(dividend: &str, base: &str, list: &str) -> String {
        doc(&[
            "Version: 1",
            "Currency: beta_brousouf",
            "Number: 2",
            "GeneratedOn: 1380400542",
            &format!("UniversalDividend: {dividend}"),
            "CoinAlgo: Base2Draft",
            &format!("CoinBase: {base}"),
            &format!("CoinList: {list}"),
            "NextRequiredVotes: 2",
            &format!("PreviousHash: {PREV}"),
            &format!("MembersRoot: {ROOT}"),
            "MembersCount: 3",
            "MembersChanges:",
            &format!("VotersRoot: {ROOT}"),
            "VotersCount: 3",
            "VotersChanges:",
        ])
    }

    #[test]
    fn test_dividend_sum_accepted() {
        // 1*4 + 1*32 + 1*64 = 100
        let mut am = Amendment::parse(&dividend_doc("100", "0", "0 0 1 0 0 1 1"));
        assert!(am.verify(CURRENCY), "{:?}", am.error());
        assert_eq!(
            am.issuance(),
            Issuance::Dividend {
                amount: 100,
                coin_base: 0,
                coin_list: vec![0, 0, 1, 0, 0, 1, 1],
                algo: Some("Base2Draft".to_string()),
            }
        );
    }

    #[test]
    fn test_dividend_sum_respects_coin_base() {
        // base 2 shifts every weight by 4: 1*4 + 1*8 = 12
        let mut am = Amendment::parse(&dividend_doc("12", "2", "1 1"));
        assert!(am.verify(CURRENCY), "{:?}", am.error());
    }

    #[test]
    fn test_dividend_mismatch_keeps_fields_populated() {
        let mut am = Amendment::parse(&dividend_doc("122", "0", "0 0 1 0 0 1 1"));
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::COIN_SUM));
        assert_eq!(
            am.error().unwrap().message,
            "CoinList sum '100' does not match UniversalDividend '122'"
        );
        // the failure does not damage what was parsed
        assert_eq!(am.version.as_deref(), Some("1"));
        assert_eq!(am.currency.as_deref(), Some(CURRENCY));
        assert_eq!(am.number.as_deref(), Some("2"));
        assert_eq!(am.dividend.as_deref(), Some("122"));
    }

    #[test]
    fn test_dividend_requires_coin_base() {
        let text = dividend_doc("100", "0", "0 0 1 0 0 1 1").replace("CoinBase: 0\n", "");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::COIN_BASE));
    }

    #[test]
    fn test_dividend_requires_coin_list() {
        let text =
            dividend_doc("100", "0", "0 0 1 0 0 1 1").replace("CoinList: 0 0 1 0 0 1 1\n", "");
        let mut am = Amendment::parse(&text);
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::COIN_LIST));
    }

    #[test]
    fn test_malformed_coin_list_shape() {
        let mut am = Amendment::parse(&dividend_doc("100", "0", "0 0 one"));
        assert!(!am.verify(CURRENCY));
        assert_eq!(am.error_code(), Some(codes::COIN_LIST));
    }

    #[test]
    fn test_dividend_round_trip_includes_coin_cluster() {
        let am = Amendment::parse(&dividend_doc("100", "0", "0 0 1 0 0 1 1"));
        assert_eq!(content_hash(&am.raw()), am.hash);
        assert!(am.raw().contains("UniversalDividend: 100\r\n"));
        assert!(am.raw().contains("CoinAlgo: Base2Draft\r\n"));
    }

    #[test]
    fn test_reverify_after_failure_recovers() {
        let mut am = Amendment::parse(&minimal_root());
        assert!(!am.verify("other_currency"));
        assert_eq!(am.error_code(), Some(codes::CURRENCY));
        // same document, right currency: the stored error is re-derived
        assert!(am.verify(CURRENCY));
        assert!(am.error().is_none());
    }
}
