//! Esquema Diesel de las tablas que toca el gatekeeper. Sólo se declaran las
//! columnas que se consultan; `created_at`/`updated_at` los mantiene la base.

diesel::table! {
    cargas (id) {
        id -> Uuid,
        nombre_archivo -> Text,
        status -> Text,
    }
}

diesel::table! {
    carga_scripts (carga_id) {
        carga_id -> Uuid,
        v_script -> Nullable<Text>,
        t_script -> Nullable<Text>,
    }
}

diesel::joinable!(carga_scripts -> cargas (carga_id));

diesel::allow_tables_to_appear_in_same_query!(
    cargas,
    carga_scripts,
);
