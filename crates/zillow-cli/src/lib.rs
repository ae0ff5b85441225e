//! Library side of the `zillow` binary: logging setup and stage orchestration.

pub mod logging;
pub mod pipeline;
pub mod types;
