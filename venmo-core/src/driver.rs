//! Export driver: fetch a page, walk its stories newest-first, emit rows,
//! follow the cursor until the cutoff or the end of the feed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::dates::TimestampParser;
use crate::policy::{continuation, Cutoff, Verdict};
use crate::sink::RowSink;
use crate::types::{Cursor, Page};

/// Anything that can hand out feed pages in cursor order.
#[async_trait]
pub trait PageSource {
    /// Fetch the page at `cursor`. Any error ends the export.
    async fn fetch_page(&mut self, cursor: &Cursor) -> Result<Page>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A story older than the cutoff was reached.
    CutoffReached,
    /// The last page had no continuation.
    FeedExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DriverState {
    Fetching(Cursor),
    Stopped(StopReason),
}

/// What happened during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub rows: usize,
    pub skipped: usize,
    pub stop: StopReason,
}

pub struct ExportDriver {
    parser: TimestampParser,
    cutoff: Cutoff,
}

impl ExportDriver {
    pub fn new(parser: TimestampParser, cutoff: Cutoff) -> Self {
        Self { parser, cutoff }
    }

    /// Run until the cutoff or the end of the feed. Fetch and sink errors
    /// abort the run; rows already written stay written.
    pub async fn run<S, K>(&self, source: &mut S, sink: &mut K) -> Result<ExportSummary>
    where
        S: PageSource + Send,
        K: RowSink,
    {
        let mut summary = ExportSummary {
            pages: 0,
            rows: 0,
            skipped: 0,
            stop: StopReason::FeedExhausted,
        };

        let mut state = DriverState::Fetching(Cursor::first());
        loop {
            match state {
                DriverState::Fetching(cursor) => {
                    let page = source
                        .fetch_page(&cursor)
                        .await
                        .with_context(|| format!("fetch page {}", summary.pages + 1))?;
                    summary.pages += 1;
                    debug!(
                        page = summary.pages,
                        stories = page.stories.len(),
                        has_next = !page.next_id.is_empty(),
                        "Fetched page"
                    );

                    state = self.process_page(&page, sink, &mut summary)?;
                }
                DriverState::Stopped(reason) => {
                    summary.stop = reason;
                    return Ok(summary);
                }
            }
        }
    }

    fn process_page<K: RowSink>(
        &self,
        page: &Page,
        sink: &mut K,
        summary: &mut ExportSummary,
    ) -> Result<DriverState> {
        for story in &page.stories {
            let at = match self.parser.parse(&story.date) {
                Ok(at) => at,
                Err(e) => {
                    warn!(id = %story.id, error = %e, "Skipping story");
                    summary.skipped += 1;
                    continue;
                }
            };

            if self.cutoff.verdict(at) == Verdict::Stop {
                info!(cutoff = %self.cutoff.date(), date = %story.date, "Reached end date, stopping");
                return Ok(DriverState::Stopped(StopReason::CutoffReached));
            }

            let row = match classify(story) {
                Ok(row) => row,
                Err(e) => {
                    warn!(id = %story.id, error = %e, "Skipping story");
                    summary.skipped += 1;
                    continue;
                }
            };

            sink.write_row(&row)?;
            summary.rows += 1;
        }

        match continuation(page) {
            Some(next) => Ok(DriverState::Fetching(next)),
            None => {
                info!("No more transactions to fetch");
                Ok(DriverState::Stopped(StopReason::FeedExhausted))
            }
        }
    }
}
