//! Leitura de variáveis de ambiente.
//!
//! O acesso ao ambiente passa pelo trait [`EnvReader`] para que os testes
//! simulem combinações de variáveis sem mexer no processo.

use std::collections::HashMap;

/// Opt-out universal (<https://consoledonottrack.com>).
pub const DO_NOT_TRACK: &str = "DO_NOT_TRACK";
/// Opt-out específico do Scarf.
pub const SCARF_NO_ANALYTICS: &str = "SCARF_NO_ANALYTICS";
/// Liga o modo verbose quando não informado explicitamente.
pub const SCARF_VERBOSE: &str = "SCARF_VERBOSE";
/// Fallback para o endpoint quando nenhum é passado.
pub const SCARF_ENDPOINT_URL: &str = "SCARF_ENDPOINT_URL";

/// Fonte de variáveis de ambiente.
pub trait EnvReader: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// Ambiente real do processo.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvReader for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Ambiente em memória.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: adiciona uma variável.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvReader for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// `"1"` ou `"true"` (case-insensitive). Qualquer outro valor é falso.
pub fn is_truthy(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.to_lowercase();
            v == "1" || v == "true"
        }
        None => false,
    }
}

/// Analytics desligado por `DO_NOT_TRACK` ou `SCARF_NO_ANALYTICS`.
///
/// Avaliado a cada chamada, nunca cacheado.
pub fn tracking_disabled(env: &dyn EnvReader) -> bool {
    is_truthy(env.var(DO_NOT_TRACK).as_deref()) || is_truthy(env.var(SCARF_NO_ANALYTICS).as_deref())
}

pub fn verbose_from_env(env: &dyn EnvReader) -> bool {
    is_truthy(env.var(SCARF_VERBOSE).as_deref())
}
