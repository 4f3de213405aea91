//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for `ask` results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Plan, retrieved context and answer
    Full,
    /// The `POST /qa` response body
    Json,
}

/// CLI arguments for planqa
#[derive(Parser, Debug)]
#[command(name = "planqa")]
#[command(author, version, about = "Plan, retrieve, answer, verify - question answering over indexed documents")]
#[command(long_about = r#"
planqa answers questions from an indexed document collection.

Each question runs through four stages:
1. Planning: the question is rephrased and split into sub-questions
2. Retrieval: each sub-question is searched in the document index
3. Answering: a draft answer is written from the retrieved passages only
4. Verification: the draft is checked against the passages and corrected

Configuration files are loaded from (in priority order):
1. PLANQA_<SECTION>__<KEY>          Environment variables
2. --config <path>                  Explicit config file
3. ./planqa.toml                    Project-level config
4. ~/.config/planqa/config.toml     Global config

Credentials are read from OPENAI_API_KEY, PINECONE_API_KEY and PINECONE_INDEX_HOST.

Example:
  planqa ask "How does the retriever rank passages?"
  planqa ask -o full "What does chapter 3 say about indexing?"
  planqa serve --port 8080
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer one question and exit
    Ask {
        /// The question to answer
        question: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "answer")]
        output: OutputFormat,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run the HTTP service
    Serve {
        /// Bind host (overrides [server] host)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
