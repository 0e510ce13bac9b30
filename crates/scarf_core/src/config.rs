//! Configuração do cliente via TOML.
//!
//! Todos os campos são opcionais; o que faltar usa o padrão.

use crate::env::{EnvReader, SCARF_ENDPOINT_URL};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Timeout padrão de uma requisição (segundos).
pub const DEFAULT_TIMEOUT_SECS: f64 = 3.0;

/// Configuração do [`ScarfEventLogger`](crate::logger::ScarfEventLogger).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScarfConfig {
    /// URL do endpoint (ex: `https://<org>.gateway.scarf.sh/<pacote>`)
    pub endpoint_url: String,
    /// Timeout por requisição em segundos
    pub timeout_secs: f64,
    /// Modo verbose (ausente = `SCARF_VERBOSE`)
    pub verbose: Option<bool>,
    /// Token enviado como `Authorization: Bearer` (vazio = sem header)
    pub bearer_token: String,
    /// Acrescenta plataforma/arquitetura ao User-Agent
    pub host_details: bool,
    /// Token `runtime=` do User-Agent (vazio = omitido)
    pub runtime: String,
}

impl Default for ScarfConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verbose: None,
            bearer_token: String::new(),
            host_details: false,
            runtime: String::new(),
        }
    }
}

impl ScarfConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<ScarfConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        ScarfConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do `scarf.toml` (ao lado do executável).
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("scarf.toml")
    }

    /// Preenche `endpoint_url` com `SCARF_ENDPOINT_URL` se estiver vazio.
    pub fn with_env_fallback(mut self, env: &dyn EnvReader) -> Self {
        if self.endpoint_url.trim().is_empty() {
            if let Some(url) = env.var(SCARF_ENDPOINT_URL) {
                self.endpoint_url = url;
            }
        }
        self
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.endpoint_url.trim().is_empty() {
            errors.push("endpoint_url não pode ser vazio".into());
        }
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            errors.push(format!("Timeout inválido: {} (deve ser > 0)", self.timeout_secs));
        }

        errors
    }
}
