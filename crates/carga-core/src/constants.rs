//! Constantes del gatekeeper.
//!
//! Los literales de estado son parte del contrato con la tabla `cargas`: las
//! etapas posteriores del pipeline filtran por estos strings exactos, por lo
//! que no deben cambiarse sin migrar los datos existentes.

/// Prefijo con el que llegan las llaves del bucket de ingesta.
pub const DEFAULT_KEY_PREFIX: &str = "raw/";

pub const STATUS_RAW: &str = "RAW";
pub const STATUS_VERIFICANDO: &str = "VERIFICANDO SI POSEE ALGORITMO";
pub const STATUS_VALIDATED_WITHOUT_SCRIPT: &str = "VALIDATED - WITHOUT ANY SCRIPT";
pub const STATUS_VALIDATED_VAL_AND_TRA: &str = "VALIDATED - WITH SCRIPT VAL AND TRA";
pub const STATUS_VALIDATED_VAL_NOT_TRA: &str = "VALIDATED - WITH SCRIPT VAL NOT TRA";
/// Combinación sin validación pero con transformación; ver `classify`.
pub const STATUS_VALIDATED_TRA_NOT_VAL: &str = "VALIDATED - WITH SCRIPT TRA NOT VAL";
pub const STATUS_FAILED: &str = "FAILED";

/// Prefijo del mensaje de error devuelto al runtime.
pub const CRITICAL_FAILURE_PREFIX: &str = "Fallo crítico";

/// Motivo base de un rechazo por precondición.
pub const REJECTION_REASON: &str = "El estado previo no es RAW o no existe el registro";
