pub mod classify;
pub mod config;
pub mod error;
pub mod model;

pub use classify::{Classifier, LookupError};
pub use model::{Edge, EdgeRecord, Identifier, Record, SegmentLabel, SegmentedEdge, SegmentedRecord, VertexRecord, Weightedness};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Output goes to stderr; stdout carries results.
pub fn init_tracing(default_level: &str, json: bool) {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(text_layer)
        .with(json_layer)
        .try_init();
}
