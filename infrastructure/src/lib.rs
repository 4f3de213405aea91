//! Infrastructure layer for planqa
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod openai;
pub mod pinecone;

// Re-export commonly used types
pub use adapters::Adapters;
pub use config::{ConfigLoader, ConfigValidationError, Credentials, FileConfig, MissingCredentials};
pub use logging::JsonlCycleAuditLogger;
pub use openai::{OpenAiChatGateway, OpenAiEmbeddings, OpenAiError};
pub use pinecone::{MetadataFields, PineconeEvidenceStore};
