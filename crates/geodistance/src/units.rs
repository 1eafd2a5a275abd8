use serde::{Deserialize, Serialize};

use crate::{
    geo::{EARTH_RADIUS_KM, EARTH_RADIUS_MILES},
    GeoDistanceError, Result,
};

/// Unit in which distances are computed and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceUnit {
    Miles,
    Kilometres,
}

impl DistanceUnit {
    /// parses one of the accepted aliases: 'miles', 'mi', 'kilometres', 'km'.
    pub fn parse(alias: &str) -> Result<Self> {
        match alias {
            "miles" | "mi" => Ok(Self::Miles),
            "kilometres" | "km" => Ok(Self::Kilometres),
            _ => Err(GeoDistanceError::InvalidArgument(
                "unrecognized units, expected one of: 'miles', 'mi', 'kilometres', 'km'"
                    .to_owned(),
            )),
        }
    }

    pub fn earth_radius(&self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MILES,
            Self::Kilometres => EARTH_RADIUS_KM,
        }
    }
}

impl Default for DistanceUnit {
    fn default() -> Self {
        Self::Miles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_aliases() {
        assert_eq!(DistanceUnit::parse("miles").unwrap(), DistanceUnit::Miles);
        assert_eq!(DistanceUnit::parse("mi").unwrap(), DistanceUnit::Miles);
        assert_eq!(
            DistanceUnit::parse("kilometres").unwrap(),
            DistanceUnit::Kilometres
        );
        assert_eq!(DistanceUnit::parse("km").unwrap(), DistanceUnit::Kilometres);
    }

    #[test]
    fn rejects_unknown_aliases() {
        for alias in ["foo", "", "Miles", "KM", "kilometers"] {
            assert!(matches!(
                DistanceUnit::parse(alias),
                Err(GeoDistanceError::InvalidArgument(_))
            ));
        }
    }
}
