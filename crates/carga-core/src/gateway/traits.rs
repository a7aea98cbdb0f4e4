use crate::errors::StoreError;
use crate::model::{LoadId, ScriptResolution};
use crate::status::LoadStatus;

/// Operaciones tipadas contra el almacén de estados de carga.
///
/// Cada método es un único round-trip. No hay lógica de negocio ni
/// reintentos: cualquier fallo de conexión o de query se devuelve como
/// `StoreError` y la política de reintento, si existe, es del llamador.
pub trait StatusGateway {
    /// Estado actual de la carga o `None` si no existe el registro.
    fn read_status(&mut self, file_key: &str) -> Result<Option<LoadStatus>, StoreError>;

    /// Update incondicional del estado, confirmado de inmediato.
    fn write_status(&mut self, file_key: &str, status: &LoadStatus) -> Result<(), StoreError>;

    /// Cambia el estado a `new` sólo si el actual es `expected`, de forma
    /// atómica. Devuelve `true` si la fila transicionó.
    fn compare_and_set_status(&mut self,
                              file_key: &str,
                              expected: &LoadStatus,
                              new: &LoadStatus)
                              -> Result<bool, StoreError>;

    fn resolve_id(&mut self, file_key: &str) -> Result<Option<LoadId>, StoreError>;

    /// Scripts registrados para el archivo; `None` si no hay ninguno.
    fn resolve_scripts(&mut self, file_key: &str) -> Result<Option<ScriptResolution>, StoreError>;
}

/// Adquisición con alcance de un gateway por invocación.
///
/// El gateway devuelto es dueño de su conexión y la libera al hacer drop,
/// así que la liberación ocurre exactamente una vez en cualquier camino.
pub trait GatewayProvider {
    type Gateway: StatusGateway;

    fn open(&self) -> Result<Self::Gateway, StoreError>;
}
