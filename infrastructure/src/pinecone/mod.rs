//! Pinecone evidence store adapter

mod store;
mod types;

pub use store::PineconeEvidenceStore;
pub use types::MetadataFields;
