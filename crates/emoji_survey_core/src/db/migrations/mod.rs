//! Survey schema versions.
//!
//! # Responsibility
//! - Bring a fresh or browser-exported file to the current survey schema.
//!
//! # Invariants
//! - Pending steps run in version order inside one transaction, and
//!   `PRAGMA user_version` follows each step.
//! - Field domains are not CHECK-constrained in SQL; the repository validates
//!   on write and drops rows that fail to parse on read.

mod browser_import;

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

#[derive(Clone, Copy)]
enum Step {
    Sql(&'static str),
    Apply(fn(&Transaction<'_>) -> rusqlite::Result<()>),
}

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    step: Step,
}

impl Migration {
    fn run(&self, tx: &Transaction<'_>) -> rusqlite::Result<()> {
        match self.step {
            Step::Sql(sql) => tx.execute_batch(sql)?,
            Step::Apply(apply) => apply(tx)?,
        }
        tx.pragma_update(None, "user_version", self.version)
    }
}

// Browser tables share the survey table names, so they are moved aside
// before the schema is created and drained into it afterwards.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "stash_browser_tables",
        step: Step::Apply(browser_import::stash_browser_tables),
    },
    Migration {
        version: 2,
        name: "survey_schema",
        step: Step::Sql(include_str!("0002_survey_schema.sql")),
    },
    Migration {
        version: 3,
        name: "import_browser_rows",
        step: Step::Apply(browser_import::import_browser_rows),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Runs every step newer than the file's `user_version`.
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build; nothing is touched.
/// - `Migration` naming the failed step; the file keeps its old version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        migration
            .run(&tx)
            .map_err(|source| DbError::Migration {
                version: migration.version,
                step: migration.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} step={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={supported}");
    Ok(())
}
