//! Esquema Diesel (declarado manualmente). Reemplazable con `diesel print-schema`.

diesel::table! {
    flow_action_log (seq) {
        seq -> BigInt,
        user_flow_id -> Uuid,
        ts -> Timestamptz,
        action_type -> Text,
        performed_by -> Uuid,
        reason -> Nullable<Text>,
        metadata -> Jsonb,
    }
}

diesel::table! {
    progress_snapshots (id) {
        id -> BigInt,
        user_flow_id -> Uuid,
        flow_step_id -> Uuid,
        kind -> Text,
        payload -> Jsonb,
        content_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    flow_action_log,
    progress_snapshots,
);
