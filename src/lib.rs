//! Plant telemetry digest and cultivation advice.
//!
//! Readings flow through the crate in one direction:
//! - `store` fetches raw records from the realtime database
//! - `normalize` maps them onto canonical units
//! - `features` rounds a snapshot into the compact prompt line
//! - `history` digests a window of samples into averages, ranges and trends
//! - `prompt` renders the model prompt, `llm` sends it
//! - `pipeline` sequences the above for the HTTP `routes` and the CLI
//!
//! Modules reach each other only through the re-exports below, so routes and
//! binaries never import from sibling internals directly.

pub mod config;
pub mod features;
pub mod history;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod routes;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use features::{build_features, render_compact, round_to, FeatureRecord};
pub use history::{digest, summarize, HistoryDigest, HistoryGap, MetricSummary};
pub use llm::{OllamaClient, TextGenerator};
pub use models::{GrowthStage, LatestSnapshot, NormalizedSample, RawSample};
pub use normalize::{f_to_c, normalize, normalize_latest};
pub use pipeline::{
    advise, load_readings, load_snapshot, prepare, promote_latest, Advice, NodeReadings,
    PreparedPrompt,
};
pub use routes::AppState;
pub use store::{is_valid_uid, RtdbClient, TelemetryStore};
pub use telemetry::init_tracing;
