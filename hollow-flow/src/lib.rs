//! Interaction and moderation view-state for Hollow.
//!
//! - [`InteractionMachine`]: the visitor's path through the page, from the
//!   first reveal to a sent message or offering
//! - [`VisualDelay`]: the single cancellable timer behind every fade-in
//! - [`Dashboard`]: tab selection, rows and moderation actions for the admin
//!   dashboard
//! - [`SiteConfig`]: sync and timing settings, loadable from JSON

mod config;
mod dashboard;
mod error;
mod machine;
mod timer;

pub use config::{FlowConfig, SiteConfig};
pub use dashboard::{Dashboard, LoadReport, Row, Tab};
pub use error::{ConfigError, ConfigResult, FlowError, FlowResult};
pub use machine::{Action, InteractionMachine, Stage, ViewState};
pub use timer::VisualDelay;
