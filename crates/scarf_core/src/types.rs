//! Tipos do payload de evento.
//!
//! Só valores simples são aceitos: `null`, booleano, inteiro, float e
//! string. A restrição é de tipo: [`PropertyValue`] não tem variante para
//! listas ou objetos. Entradas dinâmicas (`serde_json::Value`) passam pela
//! conversão checada [`EventProperties::from_json_map`].

use crate::error::ValidationError;
use serde::Serialize;
use std::collections::BTreeMap;

// ──────────────────────────────────────────────
// Valor
// ──────────────────────────────────────────────

/// Valor simples de uma propriedade.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Inteiros acima de `i64::MAX`
    UInt(u64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// Valor como parâmetro de query. `Null` não vai para a URL.
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            PropertyValue::Null => None,
            PropertyValue::Bool(b) => Some(b.to_string()),
            PropertyValue::Int(i) => Some(i.to_string()),
            PropertyValue::UInt(u) => Some(u.to_string()),
            // Debug mantém o ponto decimal (1.0 → "1.0")
            PropertyValue::Float(f) => Some(format!("{f:?}")),
            PropertyValue::String(s) => Some(s.clone()),
        }
    }

    /// Infere o tipo a partir de texto livre (argumentos `chave=valor`).
    ///
    /// `null` → Null, `true`/`false` → Bool, inteiro → Int, número → Float,
    /// o resto → String.
    pub fn parse_loose(raw: &str) -> Self {
        match raw {
            "null" => return PropertyValue::Null,
            "true" => return PropertyValue::Bool(true),
            "false" => return PropertyValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return PropertyValue::Int(i);
        }
        if let Ok(u) = raw.parse::<u64>() {
            return PropertyValue::UInt(u);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => PropertyValue::Float(f),
            _ => PropertyValue::String(raw.to_string()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Int(v.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<u64> for PropertyValue {
    fn from(v: u64) -> Self {
        PropertyValue::UInt(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(PropertyValue::Null, Into::into)
    }
}

/// Nome do tipo JSON, usado nas mensagens de validação.
fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl PropertyValue {
    /// Converte um valor JSON, rejeitando arrays e objetos.
    pub fn from_json(key: &str, value: &serde_json::Value) -> Result<Self, ValidationError> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropertyValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    PropertyValue::UInt(u)
                } else {
                    PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => PropertyValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                return Err(ValidationError {
                    key: key.to_string(),
                    kind: json_kind(value),
                });
            }
        })
    }
}

// ──────────────────────────────────────────────
// Propriedades
// ──────────────────────────────────────────────

/// Propriedades de um evento (chave → valor simples).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventProperties(BTreeMap<String, PropertyValue>);

impl EventProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: adiciona uma propriedade.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pares `(chave, valor)` para a query string, sem os `Null`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.to_query_value().map(|v| (k.clone(), v)))
            .collect()
    }

    /// Valida e converte um objeto JSON.
    ///
    /// Falha na primeira chave (em ordem alfabética) cujo valor é array ou
    /// objeto.
    pub fn from_json_map(
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ValidationError> {
        let mut props = BTreeMap::new();
        for (key, value) in map {
            props.insert(key.clone(), PropertyValue::from_json(key, value)?);
        }
        Ok(Self(props))
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for EventProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl TryFrom<serde_json::Value> for EventProperties {
    type Error = ValidationError;

    /// Só objetos JSON (ou `null`, tratado como vazio) viram propriedades.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Self::from_json_map(&map),
            serde_json::Value::Null => Ok(Self::new()),
            other => Err(ValidationError {
                key: String::new(),
                kind: json_kind(&other),
            }),
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
