//! Linhas de diagnóstico do modo verbose.
//!
//! Funções puras: o logger imprime o resultado em stdout.

use crate::types::EventProperties;
use std::time::Duration;

/// Limite de caracteres do corpo da resposta no log.
pub const MAX_BODY_CHARS: usize = 1000;

fn secs(d: Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}

/// Resumo da configuração, impresso logo após a construção.
pub fn config_lines(endpoint_url: &str, timeout: Duration, user_agent: &str) -> Vec<String> {
    vec![
        "Scarf Logger Configuration:".to_string(),
        format!("  Endpoint URL: {endpoint_url}"),
        format!("  Timeout: {}", secs(timeout)),
        format!("  User-Agent: {user_agent}"),
    ]
}

pub fn disabled_lines() -> Vec<String> {
    vec!["Analytics disabled via DO_NOT_TRACK/SCARF_NO_ANALYTICS; event not sent".to_string()]
}

pub fn sending_lines(properties: &EventProperties, timeout: Duration) -> Vec<String> {
    let rendered = serde_json::to_string(properties).unwrap_or_else(|_| format!("{properties:?}"));
    vec![
        "\nSending event:".to_string(),
        format!("  Properties: {rendered}"),
        format!("  Timeout: {}", secs(timeout)),
    ]
}

pub fn response_lines(elapsed: Duration, status: u16, url: &str, body: &str) -> Vec<String> {
    vec![
        format!("\nResponse received in {:.3}s:", elapsed.as_secs_f64()),
        format!("  Status: {status}"),
        format!("  URL: {url}"),
        format!("  Body: {}", truncate_chars(body, MAX_BODY_CHARS)),
    ]
}

/// Corta em `max` caracteres (não bytes).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
