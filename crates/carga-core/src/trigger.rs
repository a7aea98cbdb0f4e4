//! Payload de disparo: notificación de "objeto creado" del bucket de ingesta.
//!
//! Se aceptan las dos formas que puede emitir el origen:
//! - EventBridge: `{"detail": {"object": {"key": "raw/..."}}}`
//! - Notificación S3: `{"Records": [{"s3": {"object": {"key": "raw/..."}}}]}`
//!
//! En la forma S3 la llave viene URL-encoded (`+` por espacio, `%XX`).

use serde::Deserialize;

use crate::errors::EventError;
use crate::model::FileKey;

#[derive(Debug, Deserialize)]
struct ObjectRef {
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Detail {
    object: Option<ObjectRef>,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    object: Option<ObjectRef>,
}

#[derive(Debug, Deserialize)]
struct S3Record {
    s3: Option<S3Entity>,
}

/// Evento de disparo. Campos desconocidos se ignoran.
#[derive(Debug, Deserialize)]
pub struct TriggerEvent {
    detail: Option<Detail>,
    #[serde(rename = "Records")]
    records: Option<Vec<S3Record>>,
}

impl TriggerEvent {
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, EventError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Llave completa del objeto, decodificada.
    pub fn object_key(&self) -> Result<String, EventError> {
        if let Some(key) = self.detail
                               .as_ref()
                               .and_then(|d| d.object.as_ref())
                               .and_then(|o| o.key.clone())
        {
            return Ok(key);
        }
        let encoded = self.records
                          .as_ref()
                          .and_then(|r| r.first())
                          .and_then(|r| r.s3.as_ref())
                          .and_then(|s| s.object.as_ref())
                          .and_then(|o| o.key.as_deref())
                          .ok_or(EventError::MissingKey)?;
        decode_s3_key(encoded)
    }

    /// Llave normalizada para el almacén (prefijo removido una vez).
    pub fn file_key(&self, prefix: &str) -> Result<FileKey, EventError> {
        FileKey::from_object_key(&self.object_key()?, prefix)
    }
}

/// Decodifica la llave de una notificación S3 (form-urlencoded).
fn decode_s3_key(encoded: &str) -> Result<String, EventError> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let hex = bytes.get(i + 1..i + 3)
                               .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                               .and_then(|h| std::str::from_utf8(h).ok())
                               .and_then(|h| u8::from_str_radix(h, 16).ok())
                               .ok_or_else(|| EventError::BadEncoding(encoded.to_string()))?;
                out.push(hex);
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8(out).map_err(|_| EventError::BadEncoding(encoded.to_string()))
}
