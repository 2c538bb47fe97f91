//! Building library configuration from parsed arguments.

use askgate_core::{ConfigError, GatewayConfig, ModelDescriptor};
use askgate_runtime::CommandAsk;

use crate::commands::StartArgs;
use crate::error::CliError;
use crate::parser::Cli;

/// Where `kill` and `status` find the gateway. No credential needed.
pub fn target_config(cli: &Cli) -> Result<GatewayConfig, CliError> {
    if cli.port == 0 {
        return Err(ConfigError::InvalidPort.into());
    }
    Ok(GatewayConfig::with_defaults(String::new())
        .with_host(cli.host.clone())
        .with_port(cli.port))
}

/// Full configuration for `start`.
pub fn serve_config(cli: &Cli, args: &StartArgs) -> Result<GatewayConfig, CliError> {
    let api_key = args.api_key.clone().unwrap_or_default();
    let mut config = GatewayConfig::with_defaults(api_key)
        .with_host(cli.host.clone())
        .with_port(cli.port);
    config.default_model.clone_from(&args.default_model);
    config.validate()?;
    Ok(config)
}

/// The command-backed capability for `start`.
pub fn ask_adapter(args: &StartArgs) -> Result<CommandAsk, CliError> {
    let line = args.ask_command.as_deref().unwrap_or_default();
    let ask = CommandAsk::from_command_line(line).map_err(|e| {
        CliError::Config(format!("{e}. Set --ask-command or ASKGATE_ASK_COMMAND."))
    })?;

    let mut models: Vec<ModelDescriptor> = args
        .models
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(ModelDescriptor::from_id)
        .collect();
    // Advertise the default model when no list was given
    if models.is_empty() {
        models.push(ModelDescriptor::from_id(&args.default_model));
    }
    Ok(ask.with_models(models))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Commands;
    use askgate_core::AskPort;
    use clap::Parser;

    fn start(argv: &[&str]) -> (Cli, StartArgs) {
        let mut full = vec!["askgate"];
        full.extend_from_slice(argv);
        let mut cli = Cli::parse_from(full);
        let args = match std::mem::replace(&mut cli.command, Commands::Status) {
            Commands::Start(args) => args,
            other => panic!("expected start, got {other:?}"),
        };
        (cli, args)
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let (cli, args) = start(&["--port", "0", "start", "--api-key", "k"]);
        let err = serve_config(&cli, &args).unwrap_err();
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().starts_with("The port is not defined"));
        assert!(target_config(&cli).is_err());
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let (cli, args) = start(&["start", "--api-key", ""]);
        assert!(matches!(
            serve_config(&cli, &args),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_serve_config_carries_arguments() {
        let (cli, args) = start(&[
            "--host",
            "0.0.0.0",
            "--port",
            "4100",
            "start",
            "--api-key",
            "k",
            "--default-model",
            "house",
        ]);
        let config = serve_config(&cli, &args).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:4100");
        assert_eq!(config.base_url(), "http://127.0.0.1:4100");
        assert_eq!(config.default_model, "house");
    }

    #[test]
    fn test_ask_adapter_models() {
        let (_, args) = start(&["start", "--ask-command", "cat", "--models", "a, b,"]);
        let ask = ask_adapter(&args).unwrap();
        let ids: Vec<_> = ask.models().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_default_model_is_advertised_without_list() {
        let (_, args) = start(&["start", "--ask-command", "cat", "--default-model", "house"]);
        let ids: Vec<_> = ask_adapter(&args)
            .unwrap()
            .models()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["house"]);

        let (_, args) = start(&["start", "--ask-command", "cat"]);
        assert_eq!(ask_adapter(&args).unwrap().models()[0].id, "default");
    }

    #[test]
    fn test_missing_ask_command() {
        let (_, args) = start(&["start"]);
        assert!(matches!(ask_adapter(&args), Err(CliError::Config(_))));
    }
}
