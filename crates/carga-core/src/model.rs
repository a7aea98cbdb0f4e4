//! Proyecciones tipadas de las filas del almacén y llave normalizada.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EventError;
use crate::status::LoadStatus;

/// Identificador opaco de una carga, asignado por el almacén.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(pub Uuid);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for LoadId {
    fn from(id: Uuid) -> Self {
        LoadId(id)
    }
}

/// Fila de `cargas`. El gatekeeper nunca la crea, sólo transiciona `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRecord {
    pub id: LoadId,
    pub file_key: String,
    pub status: LoadStatus,
}

/// Scripts aplicables a un archivo. Ambos son opcionales de forma
/// independiente.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptResolution {
    pub validation_script: Option<String>,
    pub transformation_script: Option<String>,
}

impl ScriptResolution {
    /// Construye la proyección desde las columnas crudas de la función de
    /// resolución. Nombres vacíos o sólo espacios cuentan como ausentes.
    pub fn from_columns(v_script: Option<String>, t_script: Option<String>) -> Self {
        Self { validation_script: non_blank(v_script),
               transformation_script: non_blank(t_script) }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
             let trimmed = s.trim();
             if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
         })
}

/// Llave de la carga tal como aparece en `cargas.nombre_archivo`, junto con
/// la llave completa del objeto en el bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    key: String,
    object_key: String,
}

impl FileKey {
    /// Normaliza la llave del objeto quitando `prefix` una única vez y sólo si
    /// aparece al inicio.
    pub fn from_object_key(object_key: &str, prefix: &str) -> Result<Self, EventError> {
        let key = object_key.strip_prefix(prefix).unwrap_or(object_key);
        if key.is_empty() {
            return Err(EventError::EmptyKey { prefix: prefix.to_string() });
        }
        Ok(Self { key: key.to_string(),
                  object_key: object_key.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Llave completa del objeto, con prefijo si lo traía.
    pub fn object_key(&self) -> &str {
        &self.object_key
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
