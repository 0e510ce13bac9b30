//! Montagem do header `User-Agent`.
//!
//! Formato: `scarf-rs/<versão>` e, opcionalmente,
//! `scarf-rs/<versão> (platform=<p>; arch=<a>, runtime=<r>)`.

use std::fmt;

/// Nome do cliente no User-Agent.
pub const CLIENT_NAME: &str = "scarf-rs";

/// Versão do crate, fixada em tempo de compilação.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normaliza o nome da plataforma.
///
/// `Darwin`/`macos` → `macOS`, `Linux` → `linux`, `Windows` → `windows`,
/// qualquer outro nome em minúsculas.
pub fn normalize_platform(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "darwin" | "macos" => "macOS".to_string(),
        "linux" => "linux".to_string(),
        "windows" => "windows".to_string(),
        other => other.to_string(),
    }
}

/// User-Agent do cliente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    name: String,
    version: String,
    platform: Option<String>,
    arch: Option<String>,
    runtime: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            name: CLIENT_NAME.to_string(),
            version: VERSION.to_string(),
            platform: None,
            arch: None,
            runtime: None,
        }
    }
}

impl UserAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta plataforma e arquitetura do host.
    pub fn with_host_details(self) -> Self {
        self.with_platform(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn with_platform(mut self, platform: &str, arch: &str) -> Self {
        self.platform = Some(normalize_platform(platform));
        self.arch = Some(arch.to_string());
        self
    }

    /// Versão do runtime de quem embute o cliente (ex: `"node-20.1"`).
    pub fn with_runtime(mut self, runtime: &str) -> Self {
        self.runtime = Some(runtime.to_string());
        self
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;

        let mut details = Vec::new();
        if let Some(platform) = &self.platform {
            details.push(format!("platform={platform}"));
        }
        if let Some(arch) = &self.arch {
            details.push(format!("arch={arch}"));
        }
        let mut inner = details.join("; ");
        if let Some(runtime) = &self.runtime {
            if !inner.is_empty() {
                inner.push_str(", ");
            }
            inner.push_str(&format!("runtime={runtime}"));
        }

        if !inner.is_empty() {
            write!(f, " ({inner})")?;
        }
        Ok(())
    }
}
