//! Escenarios de la pasada de decisión sobre el gateway en memoria.
//!
//! Verifica:
//! - Rechazo sin escrituras cuando el registro no existe o no está en RAW.
//! - VERIFICANDO se escribe antes de resolver scripts.
//! - Clasificación de las cuatro combinaciones de scripts.
//! - Falta de id tras la transición -> rejected sin más escrituras.
//! - Fallo del almacén -> exactamente un intento de FAILED, outcome error.
//! - La conexión se libera exactamente una vez en todos los caminos.

use carga_core::gateway::{GatewayOp, InMemoryStatusStore};
use carga_core::{run_invocation, FileKey, LoadStatus, OutcomeStatus, ScriptResolution};

fn key(name: &str) -> FileKey {
    FileKey::from_object_key(&format!("raw/{name}"), "raw/").expect("key")
}

fn scripts(v: Option<&str>, t: Option<&str>) -> ScriptResolution {
    ScriptResolution::from_columns(v.map(String::from), t.map(String::from))
}

fn failed_writes(store: &InMemoryStatusStore) -> usize {
    store.write_attempts()
         .iter()
         .filter(|c| c.op == GatewayOp::WriteStatus && c.status == Some(LoadStatus::Failed))
         .count()
}

#[test]
fn scenario_a_raw_without_scripts() {
    let store = InMemoryStatusStore::new();
    let id = store.insert_record("ventas.csv", LoadStatus::Raw);

    let out = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(out.status, OutcomeStatus::Success);
    assert_eq!(out.file_key, "raw/ventas.csv");
    assert_eq!(out.id_carga, Some(id.to_string()));
    assert_eq!(out.script_val, None);
    assert_eq!(out.script_tra, None);
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::ValidatedWithoutScript));
}

#[test]
fn scenario_b_raw_with_both_scripts() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::Raw);
    store.insert_scripts("ventas.csv", scripts(Some("s1"), Some("s2")));

    let out = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(out.status, OutcomeStatus::Success);
    assert_eq!(out.script_val.as_deref(), Some("s1"));
    assert_eq!(out.script_tra.as_deref(), Some("s2"));
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::ValidatedValAndTra));
}

#[test]
fn scenario_c_already_validated_is_rejected_without_writes() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::parse("VALIDATED"));

    let out = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(out.status, OutcomeStatus::Rejected);
    assert_eq!(out.file_key, "ventas.csv");
    let reason = out.reason.expect("reason");
    assert!(reason.contains("no es RAW"), "motivo inesperado: {reason}");
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::parse("VALIDATED")));
    // El único intento de mutación es el update condicional, que no aplicó.
    assert!(store.write_attempts().iter().all(|c| c.op == GatewayOp::CompareAndSet));
    assert_eq!(failed_writes(&store), 0);
}

#[test]
fn missing_record_is_rejected_without_writes() {
    let store = InMemoryStatusStore::new();

    let out = run_invocation(&store, &key("fantasma.csv"));

    assert_eq!(out.status, OutcomeStatus::Rejected);
    assert!(out.reason.expect("reason").contains("no existe el registro"));
    assert!(store.write_attempts().iter().all(|c| c.op == GatewayOp::CompareAndSet));
    assert_eq!(store.status_of("fantasma.csv"), None);
}

#[test]
fn scenario_d_store_unreachable_on_script_resolution() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::Raw);
    store.fail_on(GatewayOp::ResolveScripts);

    let out = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(out.status, OutcomeStatus::Error);
    assert!(out.message.expect("message").starts_with("Fallo crítico"));
    assert_eq!(failed_writes(&store), 1);
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::Failed));
}

#[test]
fn failed_compensation_still_returns_error() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::Raw);
    store.fail_on(GatewayOp::ResolveId);
    store.fail_on_write(LoadStatus::Failed);

    let out = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(out.status, OutcomeStatus::Error);
    assert_eq!(failed_writes(&store), 1);
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::Verificando));
    assert_eq!(store.released(), 1);
}

#[test]
fn verificando_is_written_before_scripts_are_resolved() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::Raw);
    store.insert_scripts("ventas.csv", scripts(Some("v"), None));

    run_invocation(&store, &key("ventas.csv"));

    let calls = store.calls();
    let claim = calls.iter()
                     .position(|c| c.op == GatewayOp::CompareAndSet && c.status == Some(LoadStatus::Verificando))
                     .expect("claim");
    let resolve = calls.iter().position(|c| c.op == GatewayOp::ResolveScripts).expect("resolve");
    assert!(claim < resolve);
}

#[test]
fn all_four_script_combinations() {
    let cases = [(scripts(None, None), LoadStatus::ValidatedWithoutScript, None, None),
                 (scripts(Some("v"), Some("t")), LoadStatus::ValidatedValAndTra, Some("v"), Some("t")),
                 (scripts(Some("v"), None), LoadStatus::ValidatedValNotTra, Some("v"), None),
                 (scripts(None, Some("t")), LoadStatus::ValidatedTraNotVal, None, Some("t"))];
    for (input, expected, val, tra) in cases {
        let store = InMemoryStatusStore::new();
        store.insert_record("x.csv", LoadStatus::Raw);
        store.insert_scripts("x.csv", input);

        let out = run_invocation(&store, &key("x.csv"));

        assert_eq!(out.status, OutcomeStatus::Success);
        assert_eq!(store.status_of("x.csv"), Some(expected.clone()), "estado final para {expected}");
        assert_eq!(out.script_val.as_deref(), val);
        assert_eq!(out.script_tra.as_deref(), tra);
    }
}

#[test]
fn missing_id_after_claim_is_rejected_without_further_writes() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::Raw);
    store.hide_id("ventas.csv");

    let out = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(out.status, OutcomeStatus::Rejected);
    assert_eq!(out.file_key, "raw/ventas.csv");
    assert_eq!(store.write_attempts().len(), 1);
    assert!(!store.calls().iter().any(|c| c.op == GatewayOp::ResolveScripts));
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::Verificando));
}

#[test]
fn second_trigger_for_same_key_is_rejected() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::Raw);

    let first = run_invocation(&store, &key("ventas.csv"));
    let second = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(first.status, OutcomeStatus::Success);
    assert_eq!(second.status, OutcomeStatus::Rejected);
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::ValidatedWithoutScript));
}

#[test]
fn connection_released_once_on_every_path() {
    // success
    let ok = InMemoryStatusStore::new();
    ok.insert_record("a.csv", LoadStatus::Raw);
    run_invocation(&ok, &key("a.csv"));
    // rejected
    let rejected = InMemoryStatusStore::new();
    run_invocation(&rejected, &key("a.csv"));
    // error
    let failing = InMemoryStatusStore::new();
    failing.insert_record("a.csv", LoadStatus::Raw);
    failing.fail_on(GatewayOp::ResolveScripts);
    run_invocation(&failing, &key("a.csv"));

    for store in [&ok, &rejected, &failing] {
        assert_eq!(store.acquired(), 1);
        assert_eq!(store.released(), 1);
    }
}

#[test]
fn read_fault_after_lost_claim_leaves_foreign_record_untouched() {
    let store = InMemoryStatusStore::new();
    store.insert_record("ventas.csv", LoadStatus::Verificando);
    store.fail_on(GatewayOp::ReadStatus);

    let out = run_invocation(&store, &key("ventas.csv"));

    assert_eq!(out.status, OutcomeStatus::Rejected);
    assert_eq!(store.status_of("ventas.csv"), Some(LoadStatus::Verificando));
    assert!(!store.calls().iter().any(|c| c.op == GatewayOp::WriteStatus));
    assert_eq!(failed_writes(&store), 0);
    assert_eq!(store.released(), 1);
}
