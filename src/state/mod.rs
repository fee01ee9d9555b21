//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PipelineStage`: Tracks which stage a run is in (discover, collect, harvest, ...)

mod stage;

// Re-export main types
pub use stage::PipelineStage;
