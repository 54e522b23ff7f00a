use thiserror::Error;

/// A problem with a single story. The record is skipped and the export continues.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to parse transaction date {raw:?} (tried {})", tried.join(", "))]
    Date { raw: String, tried: Vec<&'static str> },

    #[error("amount {raw:?} is not a plain decimal")]
    AmountFormat { raw: String },

    #[error("failed to parse amount {raw:?}: {source}")]
    Amount {
        raw: String,
        #[source]
        source: rust_decimal::Error,
    },
}
