//! Errores del core del gatekeeper.

use thiserror::Error;

/// Fallo del almacén de estados. Cualquier operación del gateway puede
/// devolverlo; el gateway nunca reintenta.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Conexión rota, timeout o pool agotado.
    #[error("connection error: {0}")]
    Connection(String),
    /// La sentencia falló en el servidor.
    #[error("query error: {0}")]
    Query(String),
    /// La fila devuelta no cumple la proyección tipada esperada.
    #[error("invalid row: {0}")]
    InvalidRow(String),
}

/// Payload de disparo sin llave de objeto utilizable.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("payload is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no object key (expected detail.object.key or Records[0].s3.object.key)")]
    MissingKey,
    #[error("object key is empty after removing prefix {prefix:?}")]
    EmptyKey { prefix: String },
    #[error("object key has invalid percent-encoding: {0}")]
    BadEncoding(String),
}
