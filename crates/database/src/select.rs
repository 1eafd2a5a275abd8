use std::fmt::Write as _;

use geodistance::{
    dialect::SqlDialect,
    query::{BoundParameter, ParameterValue, QueryTarget},
    GeoDistanceError, Result,
};

/// A minimal select builder for distance queries.
///
/// Caller conditions go into the inner select and may reference table
/// columns; filters added through the `QueryTarget` seam reference computed
/// aliases and are applied on the derived relation. Rendering wraps the inner
/// select in a CTE so both engines can restrict on the computed column.
/// Parameter names must be unique per query; the distance spec reserves
/// `earth_radius`, `latitude`, `longitude` and `radius`.
#[derive(Debug, Clone, Default)]
pub struct DistanceSelect {
    table: String,
    columns: Vec<String>,
    computed: Vec<(String, String)>,
    conditions: Vec<String>,
    filters: Vec<String>,
    order: Vec<String>,
    parameters: Vec<BoundParameter>,
}

impl DistanceSelect {
    pub fn new<S: Into<String>>(table: S) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Projects a plain column. Defaults to `*` if none is specified.
    pub fn column<S: Into<String>>(mut self, column: S) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Appends a caller condition on the underlying table. All conditions
    /// compose conjunctively.
    pub fn condition<S: Into<String>>(mut self, condition: S) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Binds a value for a `:name` placeholder referenced by a caller
    /// condition.
    pub fn parameter<S: Into<String>>(mut self, name: S, value: ParameterValue) -> Self {
        self.parameters.push(BoundParameter::new(name, value));
        self
    }

    /// Renders the query for `dialect`, rewriting `:name` placeholders to the
    /// engine's positional style and collecting the values to bind in
    /// placeholder order.
    pub fn to_sql(&self, dialect: SqlDialect) -> Result<(String, Vec<ParameterValue>)> {
        let mut sql = String::new();
        let projected = if self.columns.is_empty() {
            "*".to_owned()
        } else {
            self.columns.join(", ")
        };
        write!(&mut sql, "WITH distance_calc AS (SELECT {}", projected).unwrap();
        for (alias, expression) in &self.computed {
            write!(&mut sql, ", {} AS {}", expression, alias).unwrap();
        }
        write!(&mut sql, " FROM {}", self.table).unwrap();
        if !self.conditions.is_empty() {
            write!(&mut sql, " WHERE {}", self.conditions.join(" AND ")).unwrap();
        }
        sql.push_str(") SELECT * FROM distance_calc");
        if !self.filters.is_empty() {
            write!(&mut sql, " WHERE {}", self.filters.join(" AND ")).unwrap();
        }
        if !self.order.is_empty() {
            write!(&mut sql, " ORDER BY {}", self.order.join(", ")).unwrap();
        }
        sql.push(';');

        bind_placeholders(&sql, &self.parameters, dialect)
    }
}

impl QueryTarget for DistanceSelect {
    fn computed(&mut self, alias: &str, expression: &str) {
        self.computed.push((alias.to_owned(), expression.to_owned()));
    }

    fn filter(&mut self, condition: &str) {
        self.filters.push(condition.to_owned());
    }

    fn order_by(&mut self, clause: &str) {
        self.order.push(clause.to_owned());
    }

    fn bind(&mut self, parameter: BoundParameter) {
        self.parameters.push(parameter);
    }
}

/// Rewrites `:name` placeholders to `$n` (Postgres, one number per distinct
/// name) or `?` (MySQL, one value per occurrence) and returns the values in
/// the order the rewritten query references them.
fn bind_placeholders(
    sql: &str,
    parameters: &[BoundParameter],
    dialect: SqlDialect,
) -> Result<(String, Vec<ParameterValue>)> {
    let mut rendered = String::with_capacity(sql.len());
    let mut values = Vec::new();
    // postgres: distinct names in order of first occurrence; index+1 is the
    // placeholder number
    let mut numbered: Vec<String> = Vec::new();

    let mut remaining = sql;
    while let Some(index) = remaining.find(':') {
        let (head, tail) = remaining.split_at(index);
        rendered.push_str(head);
        let after = &tail[1..];
        let end = after
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(after.len());
        if end == 0 {
            rendered.push(':');
            remaining = after;
            continue;
        }

        let name = &after[..end];
        let parameter = parameters
            .iter()
            .find(|parameter| parameter.name == name)
            .ok_or_else(|| {
                GeoDistanceError::InvalidArgument(format!(
                    "no value bound for parameter '{}'",
                    name
                ))
            })?;

        match dialect {
            SqlDialect::Postgres => {
                let number = match numbered.iter().position(|known| known == name) {
                    Some(position) => position + 1,
                    None => {
                        numbered.push(name.to_owned());
                        values.push(parameter.value.clone());
                        numbered.len()
                    }
                };
                write!(&mut rendered, "${}", number).unwrap();
            }
            SqlDialect::MySql => {
                rendered.push('?');
                values.push(parameter.value.clone());
            }
        }
        remaining = &after[end..];
    }
    rendered.push_str(remaining);

    Ok((rendered, values))
}
