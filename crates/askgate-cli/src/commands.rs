//! Control commands.

use clap::{Args, Subcommand};

use askgate_core::DEFAULT_MODEL;

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gateway in the foreground until killed or interrupted
    Start(StartArgs),

    /// Ask a running gateway to shut down
    Kill,

    /// Report whether a gateway answers on the port
    Status,
}

/// Options for `askgate start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Shared secret clients send as `Authorization: Bearer <key>`
    #[arg(long, env = "ASKGATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Command that answers one prompt, e.g. "llm -m {model} {prompt}"
    #[arg(long, env = "ASKGATE_ASK_COMMAND")]
    pub ask_command: Option<String>,

    /// Comma-separated model ids advertised on /v1/models
    #[arg(long, env = "ASKGATE_MODELS", value_delimiter = ',')]
    pub models: Vec<String>,

    /// Model used when a request names none
    #[arg(long, env = "ASKGATE_DEFAULT_MODEL", default_value = DEFAULT_MODEL)]
    pub default_model: String,
}
