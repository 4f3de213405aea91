//! Configuration file loading for planqa
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PLANQA_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./planqa.toml` or `./.planqa.toml`
//! 4. Global: `~/.config/planqa/config.toml`
//! 5. Default values
//!
//! Credentials are resolved separately by [`Credentials`].

mod credentials;
mod file_config;
mod loader;

pub use credentials::{Credentials, MissingCredentials};
pub use file_config::{
    ConfigValidationError, FileConfig, FileEmbeddingsConfig, FileLlmConfig, FileLoggingConfig,
    FilePineconeConfig, FileResilienceConfig, FileRetrievalConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
