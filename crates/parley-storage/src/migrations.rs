// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, applied at open time.

use refinery::embed_migrations;

embed_migrations!("migrations");

/// Apply all pending migrations on the given connection.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    migrations::runner()
        .run(conn)
        .map_err(|e| rusqlite::Error::ModuleError(format!("migration failed: {e}")))?;
    Ok(())
}
