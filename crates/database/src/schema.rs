use std::collections::HashSet;

use async_trait::async_trait;
use geodistance::{config::SchemaSource, dialect::SqlDialect, Result};

use crate::{convert_error, GeoConnection};

#[async_trait]
impl SchemaSource for GeoConnection {
    async fn column_names(&self, table: &str) -> Result<HashSet<String>> {
        let columns: Vec<String> = match self {
            Self::Postgres(pool) => {
                sqlx::query_scalar(
                    "
                    SELECT column_name::text
                    FROM information_schema.columns
                    WHERE table_schema = current_schema()
                        AND table_name = $1;
                    ",
                )
                .bind(table)
                .fetch_all(pool)
                .await
                .map_err(convert_error)?
            }
            Self::MySql(pool) => {
                sqlx::query_scalar(
                    "
                    SELECT column_name
                    FROM information_schema.columns
                    WHERE table_schema = DATABASE()
                        AND table_name = ?;
                    ",
                )
                .bind(table)
                .fetch_all(pool)
                .await
                .map_err(convert_error)?
            }
        };

        Ok(columns.into_iter().collect())
    }

    fn dialect(&self) -> SqlDialect {
        match self {
            Self::Postgres(_) => SqlDialect::Postgres,
            Self::MySql(_) => SqlDialect::MySql,
        }
    }
}
