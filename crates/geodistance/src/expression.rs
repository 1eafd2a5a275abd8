use crate::{
    dialect::SqlDialect,
    geo::GeoPoint,
    query::BoundParameter,
    units::DistanceUnit,
};

/// Named placeholders referenced by the generated expression.
pub const PARAM_EARTH_RADIUS: &str = "earth_radius";
pub const PARAM_LATITUDE: &str = "latitude";
pub const PARAM_LONGITUDE: &str = "longitude";

/// Builds the spherical-cosine-law distance expression for the given
/// coordinate columns, together with the bound parameters it references.
///
/// The reference point and the earth radius enter the expression as bound
/// parameters, never as interpolated text. The cosine-law argument is clamped
/// to [-1, 1] with LEAST/GREATEST: for a row at the reference point itself the
/// argument should be exactly 1, but floating point error can push it slightly
/// above, where ACOS is undefined. Only the cast/rounding wrapper differs
/// between the two dialects.
pub fn distance_expression(
    point: GeoPoint,
    latitude_column: &str,
    longitude_column: &str,
    unit: DistanceUnit,
    dialect: SqlDialect,
) -> (String, Vec<BoundParameter>) {
    let spherical_cosine = format!(
        "(:earth_radius * ACOS(LEAST(1, GREATEST(-1, \
         COS(RADIANS(:latitude)) * COS(RADIANS({0})) * \
         COS(RADIANS({1}) - RADIANS(:longitude)) + \
         SIN(RADIANS(:latitude)) * SIN(RADIANS({0}))))))",
        latitude_column, longitude_column
    );

    let expression = match dialect {
        SqlDialect::MySql => format!("ROUND({}, 3)", spherical_cosine),
        SqlDialect::Postgres => {
            format!("ROUND(CAST({} AS numeric), 3)", spherical_cosine)
        }
    };

    let parameters = vec![
        BoundParameter::float(PARAM_EARTH_RADIUS, unit.earth_radius()),
        BoundParameter::float(PARAM_LATITUDE, point.latitude()),
        BoundParameter::float(PARAM_LONGITUDE, point.longitude()),
    ];

    (expression, parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ParameterValue;

    fn reference_point() -> GeoPoint {
        GeoPoint::new(52.47980068128972, -1.8967723846435545).unwrap()
    }

    #[test]
    fn mysql_expression_rounds_without_cast() {
        let (expression, _) = distance_expression(
            reference_point(),
            "places.lat",
            "places.lng",
            DistanceUnit::Kilometres,
            SqlDialect::MySql,
        );
        assert_eq!(
            expression,
            "ROUND((:earth_radius * ACOS(LEAST(1, GREATEST(-1, \
             COS(RADIANS(:latitude)) * COS(RADIANS(places.lat)) * \
             COS(RADIANS(places.lng) - RADIANS(:longitude)) + \
             SIN(RADIANS(:latitude)) * SIN(RADIANS(places.lat)))))), 3)"
        );
    }

    #[test]
    fn postgres_expression_casts_before_rounding() {
        let (expression, _) = distance_expression(
            reference_point(),
            "places.lat",
            "places.lng",
            DistanceUnit::Kilometres,
            SqlDialect::Postgres,
        );
        assert!(expression.starts_with("ROUND(CAST((:earth_radius * ACOS(LEAST(1, "));
        assert!(expression.ends_with(" AS numeric), 3)"));
    }

    #[test]
    fn binds_earth_radius_and_reference_point_in_order() {
        let (_, parameters) = distance_expression(
            reference_point(),
            "places.lat",
            "places.lng",
            DistanceUnit::Miles,
            SqlDialect::Postgres,
        );
        let named = parameters
            .iter()
            .map(|parameter| (parameter.name.as_str(), parameter.value.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            named,
            vec![
                ("earth_radius", ParameterValue::Float(3958.756)),
                ("latitude", ParameterValue::Float(52.47980068128972)),
                ("longitude", ParameterValue::Float(-1.8967723846435545)),
            ]
        );
    }
}
