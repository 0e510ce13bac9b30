//! Erros do cliente de eventos.

use std::time::Duration;

/// Conjunto de tipos aceitos como valor de propriedade.
pub const ALLOWED_TYPES: &str = "str, int, float, bool, None";

/// Propriedade com valor não-simples (lista, objeto…).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Property '{key}' has invalid type {kind}. Only simple types are allowed: {ALLOWED_TYPES}")]
pub struct ValidationError {
    pub key: String,
    pub kind: &'static str,
}

/// Erros do [`ScarfEventLogger`](crate::logger::ScarfEventLogger).
///
/// Nenhum erro é tratado internamente: tudo sobe para quem chamou,
/// sem retry.
#[derive(Debug, thiserror::Error)]
pub enum ScarfError {
    // ── Configuração (construção) ──
    #[error("endpoint_url é obrigatório e não pode ser vazio")]
    MissingEndpoint,

    #[error("endpoint_url inválido '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Timeout inválido: {0} (deve ser finito e > 0)")]
    InvalidTimeout(f64),

    #[error("Header inválido '{name}': {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    #[error("Falha ao criar cliente HTTP: {0}")]
    ClientBuild(#[source] reqwest::Error),

    // ── Payload ──
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Transporte ──
    #[error("Requisição excedeu o timeout de {timeout:?}")]
    Timeout {
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("Erro de transporte: {0}")]
    Transport(#[source] reqwest::Error),

    // ── Resposta ──
    #[error("HTTP {status} em {url}")]
    Status { status: u16, url: String },
}

impl ScarfError {
    /// `true` para erros levantados na construção do cliente.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ScarfError::MissingEndpoint
                | ScarfError::InvalidEndpoint { .. }
                | ScarfError::InvalidTimeout(_)
                | ScarfError::InvalidHeader { .. }
                | ScarfError::ClientBuild(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ScarfError::Timeout { .. })
    }
}

/// Erros de persistência do `config.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de serialização TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),
}
