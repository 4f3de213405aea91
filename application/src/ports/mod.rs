//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit;
pub mod evidence_store;
pub mod external_call;
pub mod llm_gateway;
pub mod progress;
