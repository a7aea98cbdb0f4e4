use crate::model::ScriptResolution;
use crate::status::LoadStatus;

/// Estado terminal a partir de qué scripts existen. Función pura.
///
/// | validación | transformación | estado                               |
/// |------------|----------------|--------------------------------------|
/// | no         | no             | `VALIDATED - WITHOUT ANY SCRIPT`     |
/// | sí         | sí             | `VALIDATED - WITH SCRIPT VAL AND TRA`|
/// | sí         | no             | `VALIDATED - WITH SCRIPT VAL NOT TRA`|
/// | no         | sí             | `VALIDATED - WITH SCRIPT TRA NOT VAL`|
///
/// La última fila no existía en el flujo anterior (caía en "sin script" y
/// descartaba el script de transformación); ahora tiene estado propio para
/// que las etapas siguientes puedan decidir qué hacer con ella.
pub fn classify(scripts: &ScriptResolution) -> LoadStatus {
    match (scripts.validation_script.is_some(), scripts.transformation_script.is_some()) {
        (false, false) => LoadStatus::ValidatedWithoutScript,
        (true, true) => LoadStatus::ValidatedValAndTra,
        (true, false) => LoadStatus::ValidatedValNotTra,
        (false, true) => LoadStatus::ValidatedTraNotVal,
    }
}
