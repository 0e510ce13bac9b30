//! # Scarf Core
//!
//! Cliente mínimo para enviar eventos de telemetria ao Scarf via HTTP,
//! respeitando `DO_NOT_TRACK` / `SCARF_NO_ANALYTICS`.
//!
//! ## Módulos
//! - [`logger`] – `ScarfEventLogger`: construção e envio de eventos
//! - [`types`] – Propriedades do evento (só tipos simples)
//! - [`env`] – Leitura do ambiente e checagem de opt-out
//! - [`config`] – Configuração via TOML
//! - [`user_agent`] – Header `User-Agent`
//! - [`diagnostics`] – Saída do modo verbose
//! - [`error`] – Tipos de erro
//!
//! ```no_run
//! use scarf_core::{EventProperties, ScarfEventLogger};
//!
//! let logger = ScarfEventLogger::new("https://avi.gateway.scarf.sh/test-scarf-rs")?;
//! let props = EventProperties::new().with("event", "install").with("version", 3);
//! let sent = logger.log_event(&props, None)?;
//! # Ok::<(), scarf_core::ScarfError>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod logger;
pub mod types;
pub mod user_agent;

// Re-exports convenientes
pub use config::ScarfConfig;
pub use env::{EnvReader, MapEnv, ProcessEnv};
pub use error::{ScarfError, ValidationError};
pub use logger::{DEFAULT_TIMEOUT, LoggerBuilder, ScarfEventLogger};
pub use types::{EventProperties, PropertyValue};
pub use user_agent::VERSION;
