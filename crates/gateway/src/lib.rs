pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod routes;
pub mod startup;
pub mod state;

pub use error::{ErrorBody, PipelineError};
pub use pipeline::Pipeline;
pub use routes::router;
