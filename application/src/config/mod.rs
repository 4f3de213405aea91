//! Application-level configuration.
//!
//! - [`PipelineParams`]: retrieval sizing and cycle limits
//! - [`CallPolicy`]: timeout and retry rules for external calls

pub mod call_policy;
pub mod pipeline_params;

pub use call_policy::CallPolicy;
pub use pipeline_params::PipelineParams;
