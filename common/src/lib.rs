//! # Subwatch Common
//!
//! Types shared by every crate in the workspace:
//!
//! * **[`domain`]**: the `Domain` and `SubdomainSet` model plus the set arithmetic
//!   the orchestrator relies on.
//! * **[`targets`]**: parsing of the newline-delimited target list.
//! * **[`config`]**: the runtime knobs of a batch run.

pub mod config;
pub mod domain;
pub mod targets;

#[doc(hidden)]
pub use tracing;

/// Logs a positive outcome. Rendered with a dedicated symbol by the CLI formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "subwatch::success", $($arg)*)
    };
}
