use std::{error, fmt, result};

pub mod config;
pub mod dialect;
pub mod expression;
pub mod geo;
pub mod query;
pub mod units;

/// Error type shared by the whole toolkit.
///
/// `Configuration` failures happen once, while a table binding is set up, and
/// are fatal for that binding. `InvalidArgument` failures happen per query
/// call and are recoverable: the caller can correct its input and retry. No
/// partial query spec is ever produced on either failure.
#[derive(Debug)]
pub enum GeoDistanceError {
    Configuration(String),
    InvalidArgument(String),
    Database(Box<dyn error::Error + Send + Sync>),
}

impl GeoDistanceError {
    pub fn database<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Database(Box::new(why))
    }
}

impl fmt::Display for GeoDistanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(why) => write!(f, "configuration error: {}", why),
            Self::InvalidArgument(why) => write!(f, "invalid argument: {}", why),
            Self::Database(why) => write!(f, "database error: {}", why),
        }
    }
}

impl error::Error for GeoDistanceError {}

pub type Result<T> = result::Result<T, GeoDistanceError>;
