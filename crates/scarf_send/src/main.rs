//! # Scarf Send
//!
//! Envia um único evento de telemetria ao Scarf.
//! Respeita `DO_NOT_TRACK` / `SCARF_NO_ANALYTICS`.
//!
//! ## Uso
//! ```bash
//! scarf-send --endpoint https://avi.gateway.scarf.sh/test-scarf-rs \
//!     test_field_1="hello from scarf-rs" test_field_2=42
//! SCARF_VERBOSE=1 scarf-send --json '{"event": "install"}'
//! ```

mod args;

use args::CliArgs;
use clap::Parser;
use scarf_core::{ProcessEnv, ScarfConfig, ScarfError, ScarfEventLogger};
use std::process::ExitCode;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Argumentos ──
    let cli = CliArgs::parse();

    // ── Config ──
    let config = resolve_config(&cli).with_env_fallback(&ProcessEnv);
    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    let logger = match ScarfEventLogger::from_config(&config) {
        Ok(logger) => logger,
        Err(e) => {
            error!("Erro de configuração: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   SCARF SEND (Rust)");
    println!("══════════════════════════════════════════════");
    println!("  Endpoint:   {}", logger.endpoint_url());
    println!("  Timeout:    {:.1}s", logger.timeout().as_secs_f64());
    println!("  User-Agent: {}", logger.user_agent());
    println!("══════════════════════════════════════════════");
    println!();

    match send(&logger, &cli) {
        Ok(true) => {
            info!("Evento enviado ao Scarf");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            info!("Analytics desligado via variáveis de ambiente");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Erro ao enviar evento: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Arquivo TOML + overrides da linha de comando.
fn resolve_config(cli: &CliArgs) -> ScarfConfig {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(ScarfConfig::default_path);
    let mut config = ScarfConfig::load(&path);

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint_url = endpoint.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    if let Some(token) = &cli.token {
        config.bearer_token = token.clone();
    }
    if let Some(verbose) = cli.verbose() {
        config.verbose = Some(verbose);
    }

    config
}

fn send(logger: &ScarfEventLogger, cli: &CliArgs) -> Result<bool, ScarfError> {
    match &cli.json {
        Some(map) => logger.log_json_event(map, None),
        None => logger.log_event(&cli.event_properties(), None),
    }
}
