//! Published artifacts: chart PNG, static HTML page, README, git push.
//!
//! Chart, page and README are fully regenerated each run from the
//! current table contents. The git step is best-effort; everything else
//! here is fatal on failure like the rest of the pipeline.

mod chart;
mod git;
mod site;

pub use chart::render_chart;
pub use git::{commit_and_push, PublishOutcome};
pub use site::{cache_bust, write_html, write_readme};

/// Errors from publish operations.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("no samples to publish")]
    NoData,

    #[error("git {command} failed: {detail}")]
    Git {
        command: &'static str,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, PublishError>;
