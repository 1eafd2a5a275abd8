use geodistance::{dialect::SqlDialect, query::ParameterValue, Result};
use sqlx::{mysql::MySqlRow, Executor, FromRow, MySql};

use crate::{convert_error, select::DistanceSelect};

/// Renders `select` for MySQL and fetches all matching rows.
pub async fn fetch_all<'c, E, T>(executor: E, select: &DistanceSelect) -> Result<Vec<T>>
where
    E: Executor<'c, Database = MySql>,
    for<'r> T: FromRow<'r, MySqlRow> + Send + Unpin,
{
    let (sql, values) = select.to_sql(SqlDialect::MySql)?;
    log::debug!("distance query: {}", sql);

    let mut query = sqlx::query_as::<MySql, T>(&sql);
    for value in values {
        query = match value {
            ParameterValue::Float(value) => query.bind(value),
            ParameterValue::Integer(value) => query.bind(value),
            ParameterValue::Bool(value) => query.bind(value),
            ParameterValue::Text(value) => query.bind(value),
        };
    }

    query.fetch_all(executor).await.map_err(convert_error)
}
