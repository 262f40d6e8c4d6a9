use crate::{context, orm::Session, storage};
use anyhow::{Context, Result};

pub fn init_session(ctx: &context::Context) -> Result<Session> {
    let db_path = &ctx.config.db_path;
    if ctx.config.reset {
        storage::SqliteStorage::reset_all(db_path).context("resetting storage")?;
    }
    let sqlite = storage::SqliteStorage::open(db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    Ok(Session::new(sqlite))
}
