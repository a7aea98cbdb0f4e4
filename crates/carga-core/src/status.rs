use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::*;

/// Estado de una carga tal como se persiste en `cargas.status`.
///
/// Transiciones que realiza el gatekeeper:
/// - `Raw` -> `Verificando` (condicional, sólo si el estado actual es `Raw`)
/// - `Verificando` -> alguna variante `Validated*`
/// - cualquier estado -> `Failed` (escritura compensatoria best-effort)
///
/// Cualquier otro string escrito por colaboradores externos se conserva en
/// `Other` para que el parseo sea total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    Raw,
    Verificando,
    ValidatedWithoutScript,
    ValidatedValAndTra,
    ValidatedValNotTra,
    ValidatedTraNotVal,
    Failed,
    Other(String),
}

impl LoadStatus {
    /// String exacto almacenado en la base de datos.
    pub fn as_str(&self) -> &str {
        match self {
            LoadStatus::Raw => STATUS_RAW,
            LoadStatus::Verificando => STATUS_VERIFICANDO,
            LoadStatus::ValidatedWithoutScript => STATUS_VALIDATED_WITHOUT_SCRIPT,
            LoadStatus::ValidatedValAndTra => STATUS_VALIDATED_VAL_AND_TRA,
            LoadStatus::ValidatedValNotTra => STATUS_VALIDATED_VAL_NOT_TRA,
            LoadStatus::ValidatedTraNotVal => STATUS_VALIDATED_TRA_NOT_VAL,
            LoadStatus::Failed => STATUS_FAILED,
            LoadStatus::Other(s) => s.as_str(),
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            STATUS_RAW => LoadStatus::Raw,
            STATUS_VERIFICANDO => LoadStatus::Verificando,
            STATUS_VALIDATED_WITHOUT_SCRIPT => LoadStatus::ValidatedWithoutScript,
            STATUS_VALIDATED_VAL_AND_TRA => LoadStatus::ValidatedValAndTra,
            STATUS_VALIDATED_VAL_NOT_TRA => LoadStatus::ValidatedValNotTra,
            STATUS_VALIDATED_TRA_NOT_VAL => LoadStatus::ValidatedTraNotVal,
            STATUS_FAILED => LoadStatus::Failed,
            other => LoadStatus::Other(other.to_string()),
        }
    }

    /// Único estado desde el que se acepta iniciar la verificación.
    pub fn is_eligible(&self) -> bool {
        matches!(self, LoadStatus::Raw)
    }

    pub fn is_validated(&self) -> bool {
        matches!(self,
                 LoadStatus::ValidatedWithoutScript
                 | LoadStatus::ValidatedValAndTra
                 | LoadStatus::ValidatedValNotTra
                 | LoadStatus::ValidatedTraNotVal)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LoadStatus {
    fn from(raw: &str) -> Self {
        LoadStatus::parse(raw)
    }
}

impl From<String> for LoadStatus {
    fn from(raw: String) -> Self {
        LoadStatus::parse(&raw)
    }
}

impl Serialize for LoadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LoadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LoadStatus::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_strings_roundtrip_to_the_same_literal() {
        for s in [STATUS_RAW,
                  STATUS_VERIFICANDO,
                  STATUS_VALIDATED_WITHOUT_SCRIPT,
                  STATUS_VALIDATED_VAL_AND_TRA,
                  STATUS_VALIDATED_VAL_NOT_TRA,
                  STATUS_VALIDATED_TRA_NOT_VAL,
                  STATUS_FAILED]
        {
            let parsed = LoadStatus::parse(s);
            assert!(!matches!(parsed, LoadStatus::Other(_)), "{s} debería ser conocido");
            assert_eq!(parsed.as_str(), s);
        }
    }

    #[test]
    fn unknown_strings_are_kept_verbatim() {
        let st = LoadStatus::parse("VALIDATED");
        assert_eq!(st, LoadStatus::Other("VALIDATED".into()));
        assert_eq!(st.to_string(), "VALIDATED");
        assert!(!st.is_eligible());
        assert!(!st.is_validated());
    }

    #[test]
    fn raw_is_the_only_eligible_status() {
        assert!(LoadStatus::Raw.is_eligible());
        assert!(!LoadStatus::Verificando.is_eligible());
        assert!(!LoadStatus::Failed.is_eligible());
        // Comparación exacta: minúsculas no cuentan como RAW.
        assert!(!LoadStatus::parse("raw").is_eligible());
    }

    #[test]
    fn serde_uses_the_stored_literal() {
        let json = serde_json::to_string(&LoadStatus::ValidatedValAndTra).unwrap();
        assert_eq!(json, "\"VALIDATED - WITH SCRIPT VAL AND TRA\"");
        let back: LoadStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LoadStatus::ValidatedValAndTra);
    }
}
