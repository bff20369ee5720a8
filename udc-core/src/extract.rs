//! Declarative, line-oriented field extraction.
//!
//! Each document kind declares its grammar as a flat table of
//! [`FieldSpec`]s; [`extract`] consumes LF-normalized text in one pass and
//! returns the raw captures. All line grammars are anchored, so matching is
//! linear in the input length even for adversarial documents.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;

/// 40-character uppercase hex digest or fingerprint.
pub(crate) static HASH40: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-F]{40}$").expect("valid regex"));

/// `+`/`-` sigil followed by a 40-hex fingerprint.
static IDENTITY_CHANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-][0-9A-F]{40}$").expect("valid regex"));

/// Coin reference with optional transfer suffix:
/// `<issuer>-<amendment>-<coin>[:<sender>-<transaction>]`.
pub(crate) static COIN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-F]{40})-(\d+)-(\d+)(?::([0-9A-F]{40})-(\d+))?$").expect("valid regex")
});

/// Constraint applied to every content line of a block field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockGrammar {
    /// Membership or voter delta lines.
    IdentityChange,
    /// Coin reference lines.
    CoinReference,
    /// Unconstrained lines (comment block).
    FreeText,
}

impl BlockGrammar {
    fn matches(self, line: &str) -> bool {
        match self {
            BlockGrammar::IdentityChange => IDENTITY_CHANGE.is_match(line),
            BlockGrammar::CoinReference => COIN_LINE.is_match(line),
            BlockGrammar::FreeText => true,
        }
    }
}

/// Shape of one labeled field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldKind {
    /// `Label: value` on a single line.
    Single,
    /// A bare `Label:` line followed by zero or more content lines.
    Block(BlockGrammar),
}

/// One entry of a document's field-grammar table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn single(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Single,
        }
    }

    pub const fn block(label: &'static str, grammar: BlockGrammar) -> Self {
        Self {
            label,
            kind: FieldKind::Block(grammar),
        }
    }
}

/// Raw captures pulled out of one document.
///
/// Scalar fields that never appeared stay unset; block fields whose label
/// never appeared yield `None`, which callers treat as an empty sequence.
/// Materiality of an absent field is judged at validation time, not here.
#[derive(Debug, Default)]
pub(crate) struct RawFields {
    singles: HashMap<&'static str, String>,
    blocks: HashMap<&'static str, Vec<String>>,
}

impl RawFields {
    pub fn single(&mut self, label: &str) -> Option<String> {
        self.singles.remove(label)
    }

    pub fn block(&mut self, label: &str) -> Option<Vec<String>> {
        self.blocks.remove(label)
    }
}

/// Split LF-normalized `text` into the fields described by `specs`.
///
/// The text must end with a line terminator, otherwise nothing is extracted
/// and the whole document is structurally invalid. Single fields take the
/// first `Label: value` occurrence; block fields run from their `Label:`
/// line to the next recognized label or end of input, and every content
/// line must satisfy the block grammar.
pub(crate) fn extract(text: &str, specs: &[FieldSpec]) -> Result<RawFields, ExtractError> {
    if !text.ends_with('\n') {
        return Err(ExtractError::MissingFinalNewline);
    }
    // the trailing terminator yields one empty fragment we drop
    let mut lines: Vec<&str> = text.split('\n').collect();
    lines.pop();

    let mut fields = RawFields::default();
    for spec in specs {
        match spec.kind {
            FieldKind::Single => {
                if let Some(value) = find_single(&lines, spec.label) {
                    fields.singles.insert(spec.label, value);
                }
            }
            FieldKind::Block(grammar) => {
                if let Some(block) = find_block(&lines, spec.label, grammar, specs)? {
                    fields.blocks.insert(spec.label, block);
                }
            }
        }
    }
    Ok(fields)
}

/// First `Label: value` occurrence anywhere in the document.
fn find_single(lines: &[&str], label: &str) -> Option<String> {
    let needle = format!("{label}: ");
    lines.iter().copied().find_map(|line| {
        line.find(needle.as_str())
            .map(|at| line[at + needle.len()..].to_string())
    })
}

/// Content lines between a `Label:` line and the next recognized label.
fn find_block(
    lines: &[&str],
    label: &str,
    grammar: BlockGrammar,
    specs: &[FieldSpec],
) -> Result<Option<Vec<String>>, ExtractError> {
    let header = format!("{label}:");
    let Some(start) = lines.iter().position(|line| **line == header) else {
        return Ok(None);
    };
    let mut block = Vec::new();
    for &line in &lines[start + 1..] {
        if is_label_line(line, specs) {
            break;
        }
        if !grammar.matches(line) {
            return Err(ExtractError::MalformedLine(line.to_string()));
        }
        block.push(line.to_string());
    }
    Ok(Some(block))
}

/// Whether `line` introduces any field of the document grammar.
fn is_label_line(line: &str, specs: &[FieldSpec]) -> bool {
    specs.iter().any(|spec| match spec.kind {
        FieldKind::Single => line
            .strip_prefix(spec.label)
            .is_some_and(|rest| rest.starts_with(": ")),
        FieldKind::Block(_) => line.len() == spec.label.len() + 1
            && line.ends_with(':')
            && line.starts_with(spec.label),
    })
}
