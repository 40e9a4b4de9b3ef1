//! Adoption of databases exported by the browser build.
//!
//! The browser schema keys responses by `id` alone (no `seq`) and keeps a
//! history of drafts instead of one slot. Its rows already satisfied the
//! browser's CHECK constraints; rows that collide on `id` or carry a NULL
//! where the survey schema requires a value are skipped.

use crate::db::{table_exists, table_has_column};
use log::info;
use rusqlite::{Connection, Transaction};

const STASHED_RESPONSES: &str = "browser_survey_responses";
const STASHED_DRAFTS: &str = "browser_survey_drafts";

/// Moves browser-shaped survey tables out of the way of the survey schema.
pub(super) fn stash_browser_tables(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    stash_if_browser_shaped(tx, "survey_responses", "seq", STASHED_RESPONSES)?;
    stash_if_browser_shaped(tx, "survey_drafts", "slot", STASHED_DRAFTS)?;
    Ok(())
}

/// Copies stashed rows into the survey tables and drops the stash.
///
/// Responses keep their browser rowid order; only the most recently updated
/// draft survives.
pub(super) fn import_browser_rows(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    let mut imported_responses = 0;
    if table_exists(tx, STASHED_RESPONSES)? {
        imported_responses = tx.execute(
            "INSERT OR IGNORE INTO survey_responses (
                id,
                timestamp,
                frequency,
                clarity_impact,
                tone_influence,
                professional_context,
                age,
                gender,
                created_at
            )
            SELECT
                id,
                timestamp,
                frequency,
                clarity_impact,
                tone_influence,
                professional_context,
                age,
                gender,
                COALESCE(
                    CAST(strftime('%s', created_at) AS INTEGER) * 1000,
                    strftime('%s', 'now') * 1000
                )
            FROM browser_survey_responses
            ORDER BY rowid ASC;",
            [],
        )?;
        tx.execute_batch("DROP TABLE browser_survey_responses;")?;
    }

    let mut imported_draft = false;
    if table_exists(tx, STASHED_DRAFTS)? {
        imported_draft = tx.execute(
            "INSERT OR REPLACE INTO survey_drafts (slot, draft_data)
            SELECT 1, draft_data
            FROM browser_survey_drafts
            WHERE draft_data IS NOT NULL
            ORDER BY updated_at DESC, rowid DESC
            LIMIT 1;",
            [],
        )? > 0;
        tx.execute_batch("DROP TABLE browser_survey_drafts;")?;
    }

    if imported_responses > 0 || imported_draft {
        info!(
            "event=browser_import module=db status=ok responses={} draft={}",
            imported_responses, imported_draft
        );
    }
    Ok(())
}

fn stash_if_browser_shaped(
    conn: &Connection,
    table: &str,
    survey_only_column: &str,
    stash: &str,
) -> rusqlite::Result<()> {
    if !table_exists(conn, table)? || table_has_column(conn, table, survey_only_column)? {
        return Ok(());
    }

    conn.execute_batch(&format!("ALTER TABLE {table} RENAME TO {stash};"))?;

    // Index names follow the table on rename and would shadow the survey
    // schema's `CREATE INDEX IF NOT EXISTS`.
    let index_names = {
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'index' AND tbl_name = ?1 AND sql IS NOT NULL;",
        )?;
        let names = stmt.query_map([stash], |row| row.get::<_, String>(0))?;
        names.collect::<rusqlite::Result<Vec<_>>>()?
    };
    for index in &index_names {
        conn.execute_batch(&format!("DROP INDEX \"{index}\";"))?;
    }

    info!(
        "event=browser_import module=db status=stashed table={} indexes_dropped={}",
        table,
        index_names.len()
    );
    Ok(())
}
