//! OpenAI adapters: chat completions and query embeddings

mod chat;
mod embeddings;
mod error;

pub use chat::OpenAiChatGateway;
pub use embeddings::OpenAiEmbeddings;
pub use error::OpenAiError;
