//! Ordered, short-circuiting validation rules.
//!
//! Each document kind lists its rules as `(code, predicate)` pairs;
//! [`first_failure`] evaluates them in order and stops at the first one
//! that fails. The ordering is an observable contract: it decides which
//! single code is reported when several fields are wrong at once.

use crate::error::DocumentError;
use crate::extract::HASH40;

/// One validation rule: a tagged code plus a predicate yielding a
/// diagnostic message when the rule fails.
pub(crate) struct Rule<'a> {
    code: u16,
    check: Box<dyn Fn() -> Option<String> + 'a>,
}

impl<'a> Rule<'a> {
    pub fn new(code: u16, check: impl Fn() -> Option<String> + 'a) -> Self {
        Self {
            code,
            check: Box::new(check),
        }
    }
}

/// Run `rules` in order, returning the first failure, if any.
pub(crate) fn first_failure(rules: &[Rule<'_>]) -> Option<DocumentError> {
    rules
        .iter()
        .find_map(|rule| (rule.check)().map(|message| DocumentError::new(rule.code, message)))
}

/// Non-empty all-ASCII-digit string (`^\d+$`).
pub(crate) fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Field present and shaped like a non-negative integer.
pub(crate) fn digit_field(field: &Option<String>) -> bool {
    field.as_deref().map_or(false, is_digits)
}

/// Field present and shaped like a 40-hex digest.
pub(crate) fn hash_field(field: &Option<String>) -> bool {
    field.as_deref().map_or(false, |value| HASH40.is_match(value))
}
