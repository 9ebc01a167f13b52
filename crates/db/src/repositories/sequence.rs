//! Atomic code allocation from the sequences counter table.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

use curia_core::sequence::{CodePrefix, format_code};

/// Allocates year-scoped sequential codes.
///
/// Generic over the connection so allocation can run inside the same
/// database transaction as the insert that uses the code.
pub struct SequenceRepository;

impl SequenceRepository {
    /// Allocates the next code in the (prefix, year) namespace.
    ///
    /// The upsert increments the counter row atomically; concurrent
    /// allocators serialize on the row lock and each sees a distinct
    /// value. Counting existing codes would race instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn next_code<C: ConnectionTrait>(
        conn: &C,
        prefix: CodePrefix,
        year: i32,
    ) -> Result<String, DbErr> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "INSERT INTO sequences (prefix, year, value)
             VALUES ($1, $2, 1)
             ON CONFLICT (prefix, year)
             DO UPDATE SET value = sequences.value + 1
             RETURNING value",
            [prefix.as_str().into(), year.into()],
        );

        let row = conn
            .query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::Custom("sequence upsert returned no row".to_string()))?;
        let value: i32 = row.try_get("", "value")?;

        Ok(format_code(prefix, year, i64::from(value)))
    }
}
