pub mod model;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

/// Orchestration store schema, applied idempotently at startup. The science
/// tables live elsewhere; this store only tracks pipeline state.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS recording (
    id TEXT PRIMARY KEY,
    modality INTEGER NOT NULL,
    location TEXT NOT NULL,
    status INTEGER NOT NULL DEFAULT 0,
    transfer_task_id TEXT,
    source_dir TEXT NOT NULL,
    dest_dir TEXT NOT NULL,
    created_time TEXT NOT NULL,
    last_modified_time TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS recording_process (
    id TEXT PRIMARY KEY,
    recording_id TEXT NOT NULL,
    fragment_no INTEGER NOT NULL,
    status INTEGER NOT NULL DEFAULT 0,
    pre_path TEXT NOT NULL,
    post_path TEXT NOT NULL,
    transfer_task_id TEXT,
    job_id TEXT,
    created_time TEXT NOT NULL,
    last_modified_time TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS status_log (
    id TEXT PRIMARY KEY,
    entity TEXT NOT NULL,
    entity_id TEXT NOT NULL,
    old_status INTEGER NOT NULL,
    new_status INTEGER NOT NULL,
    message TEXT,
    trace TEXT,
    created_time TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS processing_parameters (
    id TEXT PRIMARY KEY,
    recording_id TEXT NOT NULL,
    fragment_no INTEGER NOT NULL,
    preprocess_steps TEXT NOT NULL,
    algorithm TEXT NOT NULL,
    created_time TEXT NOT NULL,
    last_modified_time TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_recording_status ON recording (status);
CREATE INDEX IF NOT EXISTS idx_recording_process_status ON recording_process (status);
CREATE INDEX IF NOT EXISTS idx_status_log_entity ON status_log (entity_id)
"#;

pub async fn connect(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(url).await?;
    for statement in SCHEMA_SQL.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            db.execute_unprepared(statement).await?;
        }
    }
    Ok(db)
}
