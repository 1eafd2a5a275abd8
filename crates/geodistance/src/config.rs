use std::collections::HashSet;

use async_trait::async_trait;

use crate::{dialect::SqlDialect, units::DistanceUnit, GeoDistanceError, Result};

/// Per-table configuration of the distance finder.
///
/// The defaults match the column names most tables use; override them where a
/// table stores its coordinates elsewhere.
#[derive(Debug, Clone)]
pub struct GeoDistanceConfig {
    pub latitude_column: String,
    pub longitude_column: String,
    pub default_unit: DistanceUnit,
}

impl Default for GeoDistanceConfig {
    fn default() -> Self {
        Self {
            latitude_column: "latitude".to_owned(),
            longitude_column: "longitude".to_owned(),
            default_unit: DistanceUnit::Miles,
        }
    }
}

/// Schema and connection facts the attach-time validation needs.
/// Implemented by the concrete database layer.
#[async_trait]
pub trait SchemaSource {
    /// The names of all columns of `table`.
    async fn column_names(&self, table: &str) -> Result<HashSet<String>>;

    fn dialect(&self) -> SqlDialect;
}

/// A table binding whose column configuration has been validated against the
/// live schema. Immutable once attached; every query call builds its own spec
/// from scratch, so concurrent use of one binding is safe.
#[derive(Debug, Clone)]
pub struct TableBinding {
    table: String,
    latitude_column: String,
    longitude_column: String,
    default_unit: DistanceUnit,
    dialect: SqlDialect,
}

impl TableBinding {
    /// Validates `config` against the table schema and fixes the binding.
    /// Both checks run once, before any query; a failure here is a
    /// misconfiguration, not bad caller input.
    pub async fn attach<S>(
        source: &S,
        table: &str,
        config: GeoDistanceConfig,
    ) -> Result<Self>
    where
        S: SchemaSource + Sync,
    {
        let columns = source.column_names(table).await?;
        for column in [&config.latitude_column, &config.longitude_column] {
            if !columns.contains(column.as_str()) {
                return Err(GeoDistanceError::Configuration(format!(
                    "invalid column '{}' for table '{}'",
                    column, table
                )));
            }
        }

        Ok(Self {
            table: table.to_owned(),
            latitude_column: format!("{}.{}", table, config.latitude_column),
            longitude_column: format!("{}.{}", table, config.longitude_column),
            default_unit: config.default_unit,
            dialect: source.dialect(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The latitude column, qualified with the table name.
    pub fn latitude_column(&self) -> &str {
        &self.latitude_column
    }

    /// The longitude column, qualified with the table name.
    pub fn longitude_column(&self) -> &str {
        &self.longitude_column
    }

    pub fn default_unit(&self) -> DistanceUnit {
        self.default_unit
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }
}
