//! Cliente de eventos Scarf.
//!
//! Cada chamada de [`ScarfEventLogger::log_event`] faz no máximo um POST:
//!
//! ```text
//! opt-out? ──sim──▶ Ok(false)
//!    │não
//! validação (só JSON) ──▶ POST <endpoint>?k=v… ──▶ 2xx? ──▶ Ok(true)
//! ```
//!
//! Sem retry, sem fila, sem cache. Timeout e status != 2xx sobem como erro.

use crate::config::{DEFAULT_TIMEOUT_SECS, ScarfConfig};
use crate::diagnostics::{
    config_lines, disabled_lines, print_lines, response_lines, sending_lines,
};
use crate::env::{EnvReader, ProcessEnv, SCARF_ENDPOINT_URL, tracking_disabled, verbose_from_env};
use crate::error::ScarfError;
use crate::types::EventProperties;
use crate::user_agent::UserAgent;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Timeout padrão de uma requisição.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

// ──────────────────────────────────────────────
// Builder
// ──────────────────────────────────────────────

/// Builder do [`ScarfEventLogger`].
pub struct LoggerBuilder {
    endpoint_url: Option<String>,
    timeout_secs: Option<f64>,
    verbose: Option<bool>,
    bearer_token: Option<String>,
    host_details: bool,
    runtime: Option<String>,
    env: Arc<dyn EnvReader>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            timeout_secs: None,
            verbose: None,
            bearer_token: None,
            host_details: false,
            runtime: None,
            env: Arc::new(ProcessEnv),
        }
    }
}

impl LoggerBuilder {
    /// URL do endpoint; vazio cai para `SCARF_ENDPOINT_URL`.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Timeout padrão das requisições.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs_f64());
        self
    }

    /// Timeout em segundos; validado em [`build`](Self::build).
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Sobrescreve `SCARF_VERBOSE` nos dois sentidos.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Token enviado como `Authorization: Bearer`. Vazio = sem header.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Acrescenta plataforma/arquitetura do host ao User-Agent.
    pub fn host_details(mut self, enabled: bool) -> Self {
        self.host_details = enabled;
        self
    }

    /// Token `runtime=` do User-Agent.
    pub fn runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    /// Fonte das variáveis de ambiente (padrão: o processo).
    pub fn env(mut self, env: impl EnvReader + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Resolve a configuração e monta o cliente. Não faz I/O de rede.
    pub fn build(self) -> Result<ScarfEventLogger, ScarfError> {
        let endpoint_url = resolve_endpoint(self.endpoint_url, self.env.as_ref())?;

        let secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or(ScarfError::InvalidTimeout(secs))?;

        let verbose = self
            .verbose
            .unwrap_or_else(|| verbose_from_env(self.env.as_ref()));

        let mut user_agent = UserAgent::new();
        if self.host_details {
            user_agent = user_agent.with_host_details();
        }
        if let Some(runtime) = &self.runtime {
            user_agent = user_agent.with_runtime(runtime);
        }
        let user_agent = user_agent.to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(|e| ScarfError::InvalidHeader {
                name: "User-Agent",
                reason: e.to_string(),
            })?,
        );
        if let Some(token) = self.bearer_token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                ScarfError::InvalidHeader {
                    name: "Authorization",
                    reason: e.to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(ScarfError::ClientBuild)?;

        debug!("Scarf logger → {endpoint_url} (timeout {timeout:?}, verbose {verbose})");
        if verbose {
            print_lines(&config_lines(&endpoint_url, timeout, &user_agent));
        }

        Ok(ScarfEventLogger {
            endpoint_url,
            timeout,
            verbose,
            user_agent,
            client,
            env: self.env,
        })
    }
}

/// Endpoint explícito ou `SCARF_ENDPOINT_URL`, sem `/` no final.
fn resolve_endpoint(explicit: Option<String>, env: &dyn EnvReader) -> Result<String, ScarfError> {
    let raw = explicit
        .filter(|u| !u.trim().is_empty())
        .or_else(|| env.var(SCARF_ENDPOINT_URL).filter(|u| !u.trim().is_empty()))
        .ok_or(ScarfError::MissingEndpoint)?;

    let url = raw.trim().trim_end_matches('/').to_string();
    if url.is_empty() {
        return Err(ScarfError::MissingEndpoint);
    }

    let parsed = reqwest::Url::parse(&url).map_err(|e| ScarfError::InvalidEndpoint {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScarfError::InvalidEndpoint {
            reason: format!("esquema '{}' não suportado", parsed.scheme()),
            url,
        });
    }

    Ok(url)
}

// ──────────────────────────────────────────────
// Logger
// ──────────────────────────────────────────────

/// Cliente de eventos de telemetria.
///
/// Imutável após a construção; pode ser compartilhado entre threads.
pub struct ScarfEventLogger {
    endpoint_url: String,
    timeout: Duration,
    verbose: bool,
    user_agent: String,
    client: Client,
    env: Arc<dyn EnvReader>,
}

impl std::fmt::Debug for ScarfEventLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScarfEventLogger")
            .field("endpoint_url", &self.endpoint_url)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl ScarfEventLogger {
    /// Cliente com o endpoint dado e o resto padrão.
    pub fn new(endpoint_url: impl Into<String>) -> Result<Self, ScarfError> {
        Self::builder().endpoint_url(endpoint_url).build()
    }

    /// Builder com endpoint, timeout e verbose configuráveis.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Cliente a partir de um [`ScarfConfig`], lendo o ambiente do processo.
    pub fn from_config(config: &ScarfConfig) -> Result<Self, ScarfError> {
        Self::from_config_with_env(config, ProcessEnv)
    }

    /// Como [`from_config`](Self::from_config), com ambiente injetado.
    pub fn from_config_with_env(
        config: &ScarfConfig,
        env: impl EnvReader + 'static,
    ) -> Result<Self, ScarfError> {
        let mut builder = Self::builder()
            .endpoint_url(config.endpoint_url.clone())
            .timeout_secs(config.timeout_secs)
            .bearer_token(config.bearer_token.clone())
            .host_details(config.host_details)
            .env(env);
        if let Some(verbose) = config.verbose {
            builder = builder.verbose(verbose);
        }
        if !config.runtime.is_empty() {
            builder = builder.runtime(config.runtime.clone());
        }
        builder.build()
    }

    /// Endpoint resolvido, sem `/` no final.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Timeout padrão (sobrescrito por chamada em `log_event`).
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Modo verbose resolvido na construção.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Valor do header `User-Agent` enviado em toda requisição.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// `DO_NOT_TRACK` / `SCARF_NO_ANALYTICS`, lidos agora.
    pub fn tracking_disabled(&self) -> bool {
        tracking_disabled(self.env.as_ref())
    }

    /// Envia um evento.
    ///
    /// Retorna `Ok(true)` se enviado e `Ok(false)` se o analytics está
    /// desligado (nenhuma requisição é feita). `timeout` sobrescreve o
    /// padrão do cliente só nesta chamada.
    pub fn log_event(
        &self,
        properties: &EventProperties,
        timeout: Option<Duration>,
    ) -> Result<bool, ScarfError> {
        if self.suppressed() {
            return Ok(false);
        }
        self.dispatch(properties, timeout)
    }

    /// Envia um evento a partir de um objeto JSON.
    ///
    /// O opt-out é checado antes da validação: com analytics desligado um
    /// payload inválido não gera erro.
    pub fn log_json_event(
        &self,
        properties: &serde_json::Map<String, serde_json::Value>,
        timeout: Option<Duration>,
    ) -> Result<bool, ScarfError> {
        if self.suppressed() {
            return Ok(false);
        }
        let properties = EventProperties::from_json_map(properties)?;
        self.dispatch(&properties, timeout)
    }

    fn suppressed(&self) -> bool {
        if !self.tracking_disabled() {
            return false;
        }
        debug!("Analytics desligado, evento descartado");
        if self.verbose {
            print_lines(&disabled_lines());
        }
        true
    }

    fn dispatch(
        &self,
        properties: &EventProperties,
        timeout: Option<Duration>,
    ) -> Result<bool, ScarfError> {
        let timeout = timeout.unwrap_or(self.timeout);
        if self.verbose {
            print_lines(&sending_lines(properties, timeout));
        }

        let start = Instant::now();

        let mut request = self.client.post(&self.endpoint_url).timeout(timeout);
        let pairs = properties.query_pairs();
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }

        let response = request.send().map_err(|e| {
            warn!("Falha ao enviar evento para {}: {e}", self.endpoint_url);
            if e.is_timeout() {
                ScarfError::Timeout { timeout, source: e }
            } else {
                ScarfError::Transport(e)
            }
        })?;

        let elapsed = start.elapsed();
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            warn!("Scarf respondeu HTTP {status} em {url}");
            return Err(ScarfError::Status {
                status: status.as_u16(),
                url,
            });
        }

        debug!("Evento enviado: HTTP {status} em {elapsed:?}");
        if self.verbose {
            let body = response
                .text()
                .unwrap_or_else(|e| format!("<corpo ilegível: {e}>"));
            print_lines(&response_lines(elapsed, status.as_u16(), &url, &body));
        }

        Ok(true)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{DO_NOT_TRACK, MapEnv, SCARF_NO_ANALYTICS, SCARF_VERBOSE};
    use crate::user_agent::{CLIENT_NAME, VERSION};
    use std::thread::JoinHandle;
    use tiny_http::{Response, Server};

    const DEFAULT_ENDPOINT: &str = "https://scarf.sh/api/v1";

    /// Requisição recebida pelo servidor de teste.
    #[derive(Debug)]
    struct Captured {
        method: String,
        url: String,
        user_agent: Option<String>,
        authorization: Option<String>,
    }

    fn header(req: &tiny_http::Request, name: &'static str) -> Option<String> {
        req.headers()
            .iter()
            .find(|h| h.field.equiv(name))
            .map(|h| h.value.to_string())
    }

    /// Servidor local que atende `expected` requisições.
    ///
    /// Cada resposta sai depois de `delay` com o `status` dado.
    fn serve(
        expected: usize,
        delay: Duration,
        status: u16,
    ) -> (Arc<Server>, String, JoinHandle<Vec<Captured>>) {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/api/v1");

        let srv = server.clone();
        let handle = std::thread::spawn(move || {
            let mut captured = Vec::new();
            for _ in 0..expected {
                let req = srv
                    .recv_timeout(Duration::from_secs(10))
                    .unwrap()
                    .expect("nenhuma requisição recebida em 10s");
                captured.push(Captured {
                    method: req.method().to_string(),
                    url: req.url().to_string(),
                    user_agent: header(&req, "User-Agent"),
                    authorization: header(&req, "Authorization"),
                });
                std::thread::sleep(delay);
                // O cliente pode já ter desistido (timeout)
                let _ = req.respond(Response::from_string("Success").with_status_code(status));
            }
            captured
        });

        (server, url, handle)
    }

    fn logger_for(url: &str, env: MapEnv) -> ScarfEventLogger {
        ScarfEventLogger::builder()
            .endpoint_url(url)
            .env(env)
            .build()
            .unwrap()
    }

    fn sample() -> EventProperties {
        EventProperties::new().with("event", "test").with("value", 42)
    }

    // ── Construção ──

    #[test]
    fn initialization_defaults() {
        let logger = logger_for(DEFAULT_ENDPOINT, MapEnv::new());
        assert_eq!(logger.endpoint_url(), DEFAULT_ENDPOINT);
        assert_eq!(logger.timeout(), DEFAULT_TIMEOUT);
        assert!(!logger.verbose());
    }

    #[test]
    fn empty_endpoint_is_config_error() {
        for url in ["", "   ", "///"] {
            let err = ScarfEventLogger::builder()
                .endpoint_url(url)
                .env(MapEnv::new())
                .build()
                .unwrap_err();
            assert!(matches!(err, ScarfError::MissingEndpoint), "url {url:?}: {err}");
        }

        let err = ScarfEventLogger::builder()
            .env(MapEnv::new())
            .build()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn endpoint_falls_back_to_env() {
        let env = MapEnv::new().with(SCARF_ENDPOINT_URL, "https://env.scarf.sh/pkg/");
        let logger = ScarfEventLogger::builder().env(env).build().unwrap();
        assert_eq!(logger.endpoint_url(), "https://env.scarf.sh/pkg");
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        for url in ["not a url", "ftp://scarf.sh/x"] {
            let err = ScarfEventLogger::builder()
                .endpoint_url(url)
                .env(MapEnv::new())
                .build()
                .unwrap_err();
            assert!(matches!(err, ScarfError::InvalidEndpoint { .. }), "{url}: {err}");
        }
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let logger = logger_for("https://custom.scarf.sh/api/v1//", MapEnv::new());
        assert_eq!(logger.endpoint_url(), "https://custom.scarf.sh/api/v1");
    }

    #[test]
    fn custom_timeout() {
        let logger = ScarfEventLogger::builder()
            .endpoint_url(DEFAULT_ENDPOINT)
            .timeout_secs(5.0)
            .env(MapEnv::new())
            .build()
            .unwrap();
        assert_eq!(logger.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeouts_are_rejected() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ScarfEventLogger::builder()
                .endpoint_url(DEFAULT_ENDPOINT)
                .timeout_secs(secs)
                .env(MapEnv::new())
                .build()
                .unwrap_err();
            assert!(matches!(err, ScarfError::InvalidTimeout(_)), "{secs}: {err}");
        }
    }

    #[test]
    fn verbose_from_env() {
        for (value, expected) in [("1", true), ("true", true), ("TRUE", true), ("0", false)] {
            let logger = logger_for(DEFAULT_ENDPOINT, MapEnv::new().with(SCARF_VERBOSE, value));
            assert_eq!(logger.verbose(), expected, "SCARF_VERBOSE={value}");
        }
    }

    #[test]
    fn verbose_override() {
        let logger = ScarfEventLogger::builder()
            .endpoint_url(DEFAULT_ENDPOINT)
            .verbose(false)
            .env(MapEnv::new().with(SCARF_VERBOSE, "1"))
            .build()
            .unwrap();
        assert!(!logger.verbose());

        let logger = ScarfEventLogger::builder()
            .endpoint_url(DEFAULT_ENDPOINT)
            .verbose(true)
            .env(MapEnv::new().with(SCARF_VERBOSE, "0"))
            .build()
            .unwrap();
        assert!(logger.verbose());
    }

    #[test]
    fn user_agent_uses_crate_version() {
        let logger = logger_for(DEFAULT_ENDPOINT, MapEnv::new());
        assert_eq!(logger.user_agent(), format!("{CLIENT_NAME}/{VERSION}"));

        let logger = ScarfEventLogger::builder()
            .endpoint_url(DEFAULT_ENDPOINT)
            .host_details(true)
            .env(MapEnv::new())
            .build()
            .unwrap();
        assert!(logger.user_agent().starts_with(&format!("{CLIENT_NAME}/{VERSION} (")));
    }

    #[test]
    fn from_config_applies_fields() {
        let config = ScarfConfig {
            endpoint_url: "https://scarf.sh/api/v1/".into(),
            timeout_secs: 1.5,
            verbose: Some(false),
            ..Default::default()
        };
        let logger = ScarfEventLogger::from_config_with_env(&config, MapEnv::new()).unwrap();
        assert_eq!(logger.endpoint_url(), DEFAULT_ENDPOINT);
        assert_eq!(logger.timeout(), Duration::from_millis(1500));
        assert!(!logger.verbose());
        assert_eq!(logger.user_agent(), format!("{CLIENT_NAME}/{VERSION}"));

        let with_runtime = ScarfConfig {
            runtime: "node-20.1".into(),
            ..config
        };
        let logger = ScarfEventLogger::from_config_with_env(&with_runtime, MapEnv::new()).unwrap();
        assert!(logger.user_agent().ends_with("(runtime=node-20.1)"));
    }

    #[test]
    fn logger_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScarfEventLogger>();
    }

    // ── Envio ──

    #[test]
    fn empty_properties_post_to_exact_url() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        let logger = logger_for(&url, MapEnv::new());

        assert!(logger.log_event(&EventProperties::new(), None).unwrap());

        let captured = handle.join().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].method, "POST");
        assert_eq!(captured[0].url, "/api/v1");
    }

    #[test]
    fn properties_become_query_parameters() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        let logger = logger_for(&url, MapEnv::new());

        let props = EventProperties::new()
            .with("test_field_1", "hello from scarf")
            .with("test_field_2", 42)
            .with("skipped", None::<i64>);
        assert!(logger.log_event(&props, None).unwrap());

        let captured = handle.join().unwrap();
        assert_eq!(
            captured[0].url,
            "/api/v1?test_field_1=hello+from+scarf&test_field_2=42"
        );
    }

    #[test]
    fn sends_user_agent_and_bearer_token() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        let logger = ScarfEventLogger::builder()
            .endpoint_url(&url)
            .bearer_token("secret")
            .env(MapEnv::new())
            .build()
            .unwrap();

        logger.log_event(&sample(), None).unwrap();

        let captured = handle.join().unwrap();
        assert_eq!(
            captured[0].user_agent.as_deref(),
            Some(format!("scarf-rs/{VERSION}").as_str())
        );
        assert_eq!(captured[0].authorization.as_deref(), Some("Bearer secret"));
    }

    #[test]
    fn runtime_token_reaches_request_header() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        let logger = ScarfEventLogger::builder()
            .endpoint_url(&url)
            .runtime("x")
            .env(MapEnv::new())
            .build()
            .unwrap();
        assert_eq!(logger.user_agent(), format!("scarf-rs/{VERSION} (runtime=x)"));

        logger.log_event(&sample(), None).unwrap();

        let captured = handle.join().unwrap();
        let user_agent = captured[0].user_agent.as_deref().unwrap();
        assert!(user_agent.starts_with(&format!("scarf-rs/{VERSION}")));
        assert!(user_agent.ends_with("runtime=x)"), "{user_agent}");
    }

    #[test]
    fn no_authorization_without_token() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        logger_for(&url, MapEnv::new()).log_event(&sample(), None).unwrap();
        assert!(handle.join().unwrap()[0].authorization.is_none());
    }

    #[test]
    fn opt_out_makes_no_request() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/api/v1");

        let cases = [
            (DO_NOT_TRACK, "1"),
            (DO_NOT_TRACK, "true"),
            (DO_NOT_TRACK, "TRUE"),
            (SCARF_NO_ANALYTICS, "1"),
            (SCARF_NO_ANALYTICS, "true"),
            (SCARF_NO_ANALYTICS, "TRUE"),
        ];
        for (var, value) in cases {
            let logger = logger_for(&url, MapEnv::new().with(var, value));
            assert!(!logger.log_event(&sample(), None).unwrap(), "{var}={value}");
        }

        let both = MapEnv::new()
            .with(DO_NOT_TRACK, "false")
            .with(SCARF_NO_ANALYTICS, "true");
        assert!(!logger_for(&url, both).log_event(&sample(), None).unwrap());

        assert!(server.try_recv().unwrap().is_none());
    }

    #[test]
    fn non_truthy_values_send_once_each() {
        let cases = [
            (DO_NOT_TRACK, "0"),
            (DO_NOT_TRACK, "false"),
            (DO_NOT_TRACK, ""),
            (SCARF_NO_ANALYTICS, "0"),
            (SCARF_NO_ANALYTICS, "false"),
            (SCARF_NO_ANALYTICS, ""),
        ];
        let (_server, url, handle) = serve(cases.len(), Duration::ZERO, 200);

        for (var, value) in cases {
            let logger = logger_for(&url, MapEnv::new().with(var, value));
            assert!(logger.log_event(&sample(), None).unwrap(), "{var}={value}");
        }

        let captured = handle.join().unwrap();
        assert_eq!(captured.len(), cases.len());
        assert!(captured.iter().all(|c| c.url == "/api/v1?event=test&value=42"));
    }

    #[test]
    fn opt_out_is_read_per_call() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        let logger = logger_for(&url, MapEnv::new());
        assert!(!logger.tracking_disabled());
        assert!(logger.log_event(&sample(), None).unwrap());
        assert_eq!(handle.join().unwrap().len(), 1);
    }

    #[test]
    fn non_success_status_is_error() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 500);
        let err = logger_for(&url, MapEnv::new())
            .log_event(&sample(), None)
            .unwrap_err();

        match err {
            ScarfError::Status { status, url } => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/api/v1?event=test&value=42"));
            }
            other => panic!("esperado Status, veio {other:?}"),
        }
        handle.join().unwrap();
    }

    #[test]
    fn connection_refused_is_transport_error() {
        // Porta liberada logo após o bind
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let logger = logger_for(&format!("http://127.0.0.1:{port}"), MapEnv::new());

        let err = logger.log_event(&sample(), None).unwrap_err();
        assert!(matches!(err, ScarfError::Transport(_)), "{err:?}");
    }

    #[test]
    fn slow_backend_times_out_with_short_timeout() {
        let (_server, url, handle) = serve(1, Duration::from_secs(2), 200);
        let logger = ScarfEventLogger::builder()
            .endpoint_url(&url)
            .timeout(Duration::from_secs(1))
            .env(MapEnv::new())
            .build()
            .unwrap();

        let err = logger.log_event(&sample(), None).unwrap_err();
        assert!(err.is_timeout(), "{err:?}");
        handle.join().unwrap();
    }

    #[test]
    fn slow_backend_succeeds_with_long_timeout() {
        let (_server, url, handle) = serve(1, Duration::from_secs(2), 200);
        let logger = ScarfEventLogger::builder()
            .endpoint_url(&url)
            .timeout(Duration::from_secs(3))
            .env(MapEnv::new())
            .build()
            .unwrap();

        assert!(logger.log_event(&sample(), None).unwrap());
        handle.join().unwrap();
    }

    #[test]
    fn per_call_timeout_overrides_default() {
        let (_server, url, handle) = serve(1, Duration::from_secs(2), 200);
        let logger = logger_for(&url, MapEnv::new());
        assert_eq!(logger.timeout(), DEFAULT_TIMEOUT);

        let err = logger
            .log_event(&sample(), Some(Duration::from_secs(1)))
            .unwrap_err();
        match err {
            ScarfError::Timeout { timeout, .. } => assert_eq!(timeout, Duration::from_secs(1)),
            other => panic!("esperado Timeout, veio {other:?}"),
        }
        handle.join().unwrap();
    }

    #[test]
    fn json_event_validates_before_sending() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let logger = logger_for(&format!("http://127.0.0.1:{port}"), MapEnv::new());

        let payload = serde_json::json!({"event": "test", "tags": ["a", "b"]});
        let err = logger
            .log_json_event(payload.as_object().unwrap(), None)
            .unwrap_err();

        match err {
            ScarfError::Validation(v) => assert_eq!(v.key, "tags"),
            other => panic!("esperado Validation, veio {other:?}"),
        }
        assert!(server.try_recv().unwrap().is_none());
    }

    #[test]
    fn json_event_skips_validation_when_disabled() {
        let logger = logger_for(DEFAULT_ENDPOINT, MapEnv::new().with(DO_NOT_TRACK, "1"));
        let payload = serde_json::json!({"nested": {"a": 1}});
        assert!(!logger.log_json_event(payload.as_object().unwrap(), None).unwrap());
    }

    #[test]
    fn json_event_sends_simple_values() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        let logger = logger_for(&url, MapEnv::new());

        let payload = serde_json::json!({"event": "test", "ok": true});
        assert!(logger.log_json_event(payload.as_object().unwrap(), None).unwrap());
        assert_eq!(handle.join().unwrap()[0].url, "/api/v1?event=test&ok=true");
    }

    #[test]
    fn verbose_logger_still_sends() {
        let (_server, url, handle) = serve(1, Duration::ZERO, 200);
        let logger = ScarfEventLogger::builder()
            .endpoint_url(&url)
            .verbose(true)
            .env(MapEnv::new())
            .build()
            .unwrap();

        assert!(logger.log_event(&sample(), None).unwrap());
        assert_eq!(handle.join().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_calls_share_one_client() {
        let (_server, url, handle) = serve(4, Duration::ZERO, 200);
        let logger = Arc::new(logger_for(&url, MapEnv::new()));

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let logger = logger.clone();
                std::thread::spawn(move || {
                    let props = EventProperties::new().with("worker", i);
                    logger.log_event(&props, None).unwrap()
                })
            })
            .collect();

        for w in workers {
            assert!(w.join().unwrap());
        }
        assert_eq!(handle.join().unwrap().len(), 4);
    }
}
