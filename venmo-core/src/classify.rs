//! Turns a raw feed story into a uniform export row.
//!
//! Transfers keep their amount in the note and export a zero amount.
//! Payments get a signed decimal amount and a `To ...`/`From ...` note
//! depending on whether the account holder was the sender. Anything else is
//! passed through as an empty, zero-amount row.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::RecordError;
use crate::types::{Classification, ExportRow, RawTransaction};

/// How the feed names the account holder on their own stories.
const SELF_DISPLAY_NAME: &str = "you";

pub fn classification_of(tx: &RawTransaction) -> Classification {
    if tx.kind.to_lowercase().contains("transfer") {
        Classification::Transfer
    } else if tx.kind == "payment" {
        Classification::Payment
    } else {
        Classification::Unclassified
    }
}

pub fn classify(tx: &RawTransaction) -> Result<ExportRow, RecordError> {
    let kind = classification_of(tx);

    let (amount, note) = match kind {
        Classification::Transfer => (
            Decimal::ZERO,
            format!("Transfer {} | {}", tx.note.name, tx.amount),
        ),
        Classification::Payment => (parse_amount(&tx.amount)?, payment_note(tx)),
        Classification::Unclassified => (Decimal::ZERO, String::new()),
    };

    Ok(ExportRow {
        amount,
        date: tx.date.clone(),
        kind,
        note,
    })
}

/// `"-$1,234.56"` -> `-1234.56`. Any `-` anywhere makes the result negative.
///
/// After stripping, only digits and a single `.` are accepted; exponents,
/// underscores and words like `inf` are rejected.
pub fn parse_amount(raw: &str) -> Result<Decimal, RecordError> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '+' | '-'))
        .collect();
    let digits = digits.trim();

    if !is_plain_decimal(digits) {
        return Err(RecordError::AmountFormat {
            raw: raw.to_string(),
        });
    }

    let value = Decimal::from_str(digits).map_err(|source| RecordError::Amount {
        raw: raw.to_string(),
        source,
    })?;

    Ok(if raw.contains('-') { -value } else { value })
}

fn is_plain_decimal(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.matches('.').count() <= 1
}

fn payment_note(tx: &RawTransaction) -> String {
    let title = &tx.title;
    if title.sender.display_name == SELF_DISPLAY_NAME {
        format!("To {} | {}", title.receiver.label(), tx.note.content)
    } else {
        format!("From {} | {}", title.sender.label(), tx.note.content)
    }
}
