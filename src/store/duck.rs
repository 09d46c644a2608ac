use duckdb::{params, Connection};

use crate::config::DestinationConfig;
use crate::error::PipelineResult;

use super::record::IssueRecord;

/// Destination-side access: watermark reads and the upsert load path.
///
/// Owns one scoped connection for the run; dropping the store releases it on
/// every exit path.
pub struct IssueStore {
    conn: Connection,
    schema: String,
    table: String,
}

impl IssueStore {
    /// Connect to the configured MotherDuck database.
    pub fn connect(cfg: &DestinationConfig) -> PipelineResult<Self> {
        let conn = Connection::open(cfg.connection_string())?;
        Ok(Self::new(conn, &cfg.schema, &cfg.table))
    }

    /// Wrap an existing connection (tests use an in-memory database).
    pub fn new(conn: Connection, schema: &str, table: &str) -> Self {
        Self {
            conn,
            schema: schema.to_string(),
            table: table.to_string(),
        }
    }

    fn qualified_table(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }

    /// Whether the destination table exists, via the catalog.
    pub fn table_exists(&self) -> PipelineResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM information_schema.tables
             WHERE table_schema = ? AND table_name = ?",
            params![self.schema, self.table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// The maximum `updated_date` already persisted, or `None` when the table
    /// is absent (first run) or empty. The absent case never queries the table
    /// itself.
    pub fn latest_updated(&self) -> PipelineResult<Option<String>> {
        if !self.table_exists()? {
            return Ok(None);
        }
        let max: Option<String> = self.conn.query_row(
            &format!("SELECT MAX(updated_date) FROM {}", self.qualified_table()),
            [],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// Create the destination schema and table if absent.
    pub fn ensure_table(&self) -> PipelineResult<()> {
        self.conn.execute_batch(&format!(
            "CREATE SCHEMA IF NOT EXISTS {schema};
             CREATE TABLE IF NOT EXISTS {table} (
                 id           VARCHAR PRIMARY KEY,
                 key          VARCHAR NOT NULL,
                 summary      VARCHAR NOT NULL,
                 status       VARCHAR NOT NULL,
                 assignee     VARCHAR,
                 created_date VARCHAR NOT NULL,
                 updated_date VARCHAR NOT NULL,
                 issue_type   VARCHAR NOT NULL,
                 fields_json  VARCHAR NOT NULL
             );",
            schema = quote_ident(&self.schema),
            table = self.qualified_table(),
        ))?;
        Ok(())
    }

    /// Upsert records keyed on `id` inside one transaction.
    ///
    /// A record whose id already exists replaces the stored row entirely, so
    /// re-running an overlapping load is idempotent. Returns the number of
    /// records written.
    pub fn upsert<I>(&mut self, records: I) -> PipelineResult<usize>
    where
        I: IntoIterator<Item = IssueRecord>,
    {
        let sql = format!(
            "INSERT INTO {} (id, key, summary, status, assignee,
                             created_date, updated_date, issue_type, fields_json)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                 key = excluded.key,
                 summary = excluded.summary,
                 status = excluded.status,
                 assignee = excluded.assignee,
                 created_date = excluded.created_date,
                 updated_date = excluded.updated_date,
                 issue_type = excluded.issue_type,
                 fields_json = excluded.fields_json",
            self.qualified_table()
        );

        let tx = self.conn.transaction()?;
        let mut written = 0usize;
        {
            let mut stmt = tx.prepare(&sql)?;
            for record in records {
                stmt.execute(params![
                    record.id,
                    record.key,
                    record.summary,
                    record.status,
                    record.assignee,
                    record.created_date,
                    record.updated_date,
                    record.issue_type,
                    record.fields_json,
                ])?;
                written += 1;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Count rows in the destination table.
    pub fn count_rows(&self) -> PipelineResult<i64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT count(*) FROM {}", self.qualified_table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Quote an SQL identifier.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
