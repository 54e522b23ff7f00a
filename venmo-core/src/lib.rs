//! venmo-core: the fetch-paginate-classify-emit pipeline behind `venmo-export`.

pub mod classify;
pub mod dates;
pub mod driver;
pub mod error;
pub mod policy;
pub mod sink;
pub mod types;

pub use classify::{classify, parse_amount};
pub use dates::{TimestampFormat, TimestampParser};
pub use driver::{ExportDriver, ExportSummary, PageSource, StopReason};
pub use error::RecordError;
pub use policy::{Cutoff, Verdict};
pub use sink::{CsvSink, RowSink, CORRECTED_HEADER, LEGACY_HEADER};
pub use types::{Classification, Cursor, ExportRow, Page, RawTransaction};
