use serde::{Deserialize, Serialize};

use crate::{GeoDistanceError, Result};

/// The SQL syntax variant a query is rendered for.
///
/// The distance formula is the same on both engines; only the cast/rounding
/// idiom around it and the placeholder style differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SqlDialect {
    MySql,
    Postgres,
}

impl SqlDialect {
    /// Resolves the dialect from a connection url scheme. Any engine other
    /// than MySQL or Postgres is rejected before a connection is attempted.
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = match url.split_once("://") {
            Some((scheme, _)) => scheme,
            None => "",
        };
        match scheme {
            "mysql" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(GeoDistanceError::Configuration(
                "only MySQL and Postgres are supported".to_owned(),
            )),
        }
    }
}
