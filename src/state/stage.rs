/// Pipeline stage definitions for tracking crawl progress
///
/// A run moves `Init -> Discover -> Collect -> Harvest -> Done`. Fatal errors
/// move it to `Failed`; no stage is ever revisited.
use std::fmt;

/// Represents the current stage of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Run context built, nothing fetched yet
    Init,

    /// Fetching the root page and parsing the category navigation
    Discover,

    /// Fetching every category listing page concurrently
    Collect,

    /// Fetching and extracting item detail pages
    Harvest,

    /// All records handed to the sink
    Done,

    /// Aborted by a fatal error
    Failed,
}

impl PipelineStage {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if the run finished successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the stage that follows this one on the success path
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::Discover),
            Self::Discover => Some(Self::Collect),
            Self::Collect => Some(Self::Harvest),
            Self::Harvest => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Checks whether moving from this stage to `to` is allowed
    ///
    /// Only forward steps on the success path, or a move to `Failed` from a
    /// non-terminal stage, are valid.
    pub fn can_transition_to(&self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Discover => "discover",
            Self::Collect => "collect",
            Self::Harvest => "harvest",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all stages in run order
    pub fn all_stages() -> Vec<Self> {
        vec![
            Self::Init,
            Self::Discover,
            Self::Collect,
            Self::Harvest,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
