//! Crawl pipeline - stage orchestration
//!
//! Wires the stages of a run together:
//! - Probing the site root (reported, never fatal)
//! - Discovering categories (fatal on failure)
//! - Collecting listings concurrently (per-category failures skipped)
//! - Harvesting item records (per-item failures skipped)
//! - Handing the records to the sink

use crate::config::Config;
use crate::crawler::context::RunContext;
use crate::crawler::discover::discover_categories;
use crate::crawler::fetcher::{build_http_client, check_liveness};
use crate::crawler::harvest::harvest_items;
use crate::crawler::listing::{collect_listings, ListingBatch};
use crate::output::CrawlReport;
use crate::state::PipelineStage;
use crate::storage::RecordSink;
use crate::ShelfError;
use reqwest::Client;
use std::sync::Arc;

/// Drives one crawl run through its stages
pub struct Pipeline {
    context: Arc<RunContext>,
    client: Client,
    stage: PipelineStage,
}

impl Pipeline {
    /// Creates a pipeline from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Context built and HTTP client ready
    /// * `Err(ShelfError)` - Bad base URL, bad selector or client failure
    pub fn new(config: &Config) -> Result<Self, ShelfError> {
        let context = RunContext::from_config(config)?;
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::with_client(context, client))
    }

    /// Creates a pipeline around an existing context and client
    pub fn with_client(context: RunContext, client: Client) -> Self {
        Self {
            context: Arc::new(context),
            client,
            stage: PipelineStage::Init,
        }
    }

    /// Current stage of the run
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// The run context shared by every stage
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Runs every stage and hands the harvested records to `sink`
    ///
    /// The run reaches `Done` once the sink has accepted the records. A fatal
    /// error moves it to `Failed` and is returned; the sink is then never
    /// called.
    ///
    /// # Errors
    ///
    /// * Discovery failures (unreachable root, empty root, no navigation, no categories)
    /// * A harvest task failing outside its per-item scope
    /// * The sink rejecting the records
    /// * `ShelfError::InvalidTransition` when called on a pipeline that already ran
    pub async fn run(&mut self, sink: &mut dyn RecordSink) -> Result<CrawlReport, ShelfError> {
        if self.stage != PipelineStage::Init {
            return Err(ShelfError::InvalidTransition {
                from: self.stage,
                to: PipelineStage::Discover,
            });
        }

        let mut report = CrawlReport::new();
        let root = self.context.base_url.to_string();

        report.root_reachable =
            check_liveness(&self.client, &root, self.context.timeouts.liveness).await;

        // Discover
        self.advance(PipelineStage::Discover)?;
        let categories = match discover_categories(&self.client, &self.context).await {
            Ok(categories) => categories,
            Err(e) => return Err(self.fail(&mut report, e)),
        };
        report.categories_discovered = categories.len();

        // Collect
        self.advance(PipelineStage::Collect)?;
        let outcome = collect_listings(&self.client, &self.context, &categories).await;
        let listing = listing_or_empty(outcome, &mut report);

        // Harvest
        self.advance(PipelineStage::Harvest)?;
        let harvest = match harvest_items(&self.client, &self.context, &listing.listings).await {
            Ok(batch) => batch,
            Err(e) => return Err(self.fail(&mut report, e)),
        };
        report.record_harvest(&harvest);
        tracing::info!("[SUCCESS] Parsed {} books.", harvest.records.len());

        if let Err(e) = sink.accept(&harvest.records) {
            return Err(self.fail(&mut report, e.into()));
        }

        self.advance(PipelineStage::Done)?;
        report.finish(self.stage);

        tracing::info!(
            "Crawl completed: {} records from {} categories in {}s",
            report.records_harvested,
            report.categories_collected,
            report.duration_seconds().unwrap_or(0)
        );

        Ok(report)
    }

    fn advance(&mut self, to: PipelineStage) -> Result<(), ShelfError> {
        if !self.stage.can_transition_to(to) {
            return Err(ShelfError::InvalidTransition {
                from: self.stage,
                to,
            });
        }
        tracing::debug!("Stage {} -> {}", self.stage, to);
        self.stage = to;
        Ok(())
    }

    fn fail(&mut self, report: &mut CrawlReport, error: ShelfError) -> ShelfError {
        tracing::error!("Crawl failed during {} stage: {}", self.stage, error);
        if self.stage.can_transition_to(PipelineStage::Failed) {
            self.stage = PipelineStage::Failed;
        }
        report.finish(self.stage);
        error
    }
}

/// Records the listing stage outcome, turning a batch failure into no listings
///
/// A failed listing batch is logged and kept in the report; the run goes on
/// to harvest nothing instead of failing.
fn listing_or_empty(
    outcome: Result<ListingBatch, ShelfError>,
    report: &mut CrawlReport,
) -> ListingBatch {
    let listing = match outcome {
        Ok(batch) => batch,
        Err(e) => {
            tracing::error!("[ERROR] Books data is not extracted! ({})", e);
            report.batch_errors.push(e.to_string());
            ListingBatch::default()
        }
    };
    report.record_listing(&listing);
    listing
}
