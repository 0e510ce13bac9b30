//! Argumentos de linha de comando.

use clap::Parser;
use scarf_core::{EventProperties, PropertyValue};
use std::path::PathBuf;

/// Objeto JSON passado em `--json`.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Envia um único evento de telemetria ao Scarf.
#[derive(Debug, Parser)]
#[command(name = "scarf-send", version)]
pub struct CliArgs {
    /// URL do endpoint (ou SCARF_ENDPOINT_URL)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Timeout da requisição em segundos (padrão 3.0)
    #[arg(long, value_name = "SEGS")]
    pub timeout: Option<f64>,

    /// Envia `Authorization: Bearer <TOKEN>`
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Arquivo TOML (padrão: scarf.toml ao lado do executável)
    #[arg(long, value_name = "ARQUIVO")]
    pub config: Option<PathBuf>,

    /// Propriedades como objeto JSON
    #[arg(long, value_name = "OBJETO", value_parser = parse_json_object, conflicts_with = "properties")]
    pub json: Option<JsonObject>,

    /// Força modo verbose
    #[arg(long, overrides_with = "quiet")]
    verbose: bool,

    /// Desliga modo verbose
    #[arg(long, overrides_with = "verbose")]
    quiet: bool,

    /// Propriedades no formato chave=valor
    #[arg(value_name = "CHAVE=VALOR", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,
}

impl CliArgs {
    /// `Some` só quando `--verbose`/`--quiet` foi passado (o último vence).
    pub fn verbose(&self) -> Option<bool> {
        match (self.verbose, self.quiet) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Propriedades `chave=valor` com tipo inferido.
    pub fn event_properties(&self) -> EventProperties {
        self.properties
            .iter()
            .map(|(k, v)| (k.clone(), PropertyValue::parse_loose(v)))
            .collect()
    }
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("propriedade inválida '{raw}' (esperado chave=valor)")),
    }
}

fn parse_json_object(raw: &str) -> Result<JsonObject, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("esperado objeto JSON, recebido {other}")),
        Err(e) => Err(format!("JSON inválido: {e}")),
    }
}
