//! SQLite-backed host table.
use std::path::Path;

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::models::{Endpoint, Host, HostRecord};

const TABLE: &str = "host_management";

pub struct HostRepository {
    conn: Connection,
    table: String,
}

fn record(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, bool)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn to_record((id, protocol, hostname, default): (i64, String, String, bool)) -> Result<HostRecord> {
    let protocol = protocol.parse().map_err(Error::InvalidRow)?;
    Ok(HostRecord { id, host: Host { protocol, hostname, default } })
}

impl HostRepository {
    /// Opens (or creates) the database file. The table is created by `install`.
    pub fn open(path: &Path, prefix: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!("opened host database {}", path.display());
        Ok(Self::with_connection(conn, prefix))
    }

    pub fn in_memory(prefix: &str) -> Result<Self> {
        Ok(Self::with_connection(Connection::open_in_memory()?, prefix))
    }

    fn with_connection(conn: Connection, prefix: &str) -> Self {
        HostRepository { conn, table: format!("{prefix}{TABLE}") }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn install(&self) -> Result<()> {
        self.conn.execute_batch(&format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                protocol VARCHAR(5) NOT NULL,
                hostname VARCHAR(255) NOT NULL,
                "default" INTEGER NOT NULL DEFAULT 0
            );"#,
            self.table
        ))?;
        Ok(())
    }

    pub fn uninstall(&self) -> Result<()> {
        self.conn.execute_batch(&format!(r#"DROP TABLE IF EXISTS "{}";"#, self.table))?;
        Ok(())
    }

    pub fn insert(&self, host: &Host) -> Result<()> {
        self.conn.execute(
            &format!(r#"INSERT INTO "{}" (protocol, hostname, "default") VALUES (?1, ?2, ?3)"#, self.table),
            params![host.protocol.as_str(), host.hostname, host.default],
        )?;
        Ok(())
    }

    /// Inserts all hosts in one transaction.
    pub fn insert_many(&mut self, hosts: &[Host]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                r#"INSERT INTO "{}" (protocol, hostname, "default") VALUES (?1, ?2, ?3)"#,
                self.table
            ))?;
            for host in hosts {
                stmt.execute(params![host.protocol.as_str(), host.hostname, host.default])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn all(&self) -> Result<Vec<HostRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"SELECT id, protocol, hostname, "default" FROM "{}" ORDER BY id"#,
            self.table
        ))?;
        let rows = stmt.query_map([], record)?.collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(to_record).collect()
    }

    pub fn hosts(&self) -> Result<Vec<Host>> {
        Ok(self.all()?.into_iter().map(|r| r.host).collect())
    }

    /// First host flagged default.
    pub fn get_default(&self) -> Result<Option<HostRecord>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    r#"SELECT id, protocol, hostname, "default" FROM "{}" WHERE "default" = 1 ORDER BY id LIMIT 1"#,
                    self.table
                ),
                [],
                record,
            )
            .optional()?;
        row.map(to_record).transpose()
    }

    /// Points the default host(s) at the endpoint read from the config file.
    pub fn update_default(&self, endpoint: &Endpoint) -> Result<()> {
        self.conn.execute(
            &format!(r#"UPDATE "{}" SET protocol = ?1, hostname = ?2 WHERE "default" = 1"#, self.table),
            params![endpoint.protocol, endpoint.hostname],
        )?;
        Ok(())
    }

    pub fn truncate(&self) -> Result<()> {
        self.conn.execute(&format!(r#"DELETE FROM "{}""#, self.table), [])?;
        Ok(())
    }
}
