use serde::Deserialize;

use crate::{
    config::TableBinding,
    expression::distance_expression,
    geo::GeoPoint,
    units::DistanceUnit,
    GeoDistanceError, Result,
};

/// Alias under which the computed distance column is exposed to the caller.
pub const DISTANCE_ALIAS: &str = "distance";

/// Named placeholder for the radius bound by the filter condition.
pub const PARAM_RADIUS: &str = "radius";

/// A value passed to the query execution layer separately from the query
/// text. Executors substitute these through their driver, never by string
/// interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Float(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    pub name: String,
    pub value: ParameterValue,
}

impl BoundParameter {
    pub fn new<S: Into<String>>(name: S, value: ParameterValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn float<S: Into<String>>(name: S, value: f64) -> Self {
        Self::new(name, ParameterValue::Float(value))
    }

    pub fn integer<S: Into<String>>(name: S, value: i64) -> Self {
        Self::new(name, ParameterValue::Integer(value))
    }

    pub fn bool<S: Into<String>>(name: S, value: bool) -> Self {
        Self::new(name, ParameterValue::Bool(value))
    }

    pub fn text<S: Into<String>, V: Into<String>>(name: S, value: V) -> Self {
        Self::new(name, ParameterValue::Text(value.into()))
    }
}

/// Caller-supplied parameters of a single find-by-distance call.
///
/// `None` models a missing parameter; a non-finite float models a value that
/// is not a number. Both reject during validation, before any SQL is built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistanceQueryOptions {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub units: Option<String>,
}

/// Everything an external query executor needs to apply a distance filter:
/// the computed column, the filter predicate, the sort key and the bound
/// parameters, in the order they are referenced.
#[derive(Debug, Clone)]
pub struct DistanceQuerySpec {
    pub distance_expression: String,
    pub filter_condition: String,
    pub order_clause: String,
    pub parameters: Vec<BoundParameter>,
}

/// The narrow query interface the spec is pushed through. Any storage backend
/// that can project a computed column, restrict on it and sort by it can
/// implement this.
pub trait QueryTarget {
    fn computed(&mut self, alias: &str, expression: &str);
    fn filter(&mut self, condition: &str);
    fn order_by(&mut self, clause: &str);
    fn bind(&mut self, parameter: BoundParameter);
}

impl DistanceQuerySpec {
    /// Appends the computed column, filter, sort key and parameters to the
    /// target. Anything the caller already added to the target is left
    /// untouched; the distance filter composes conjunctively with it.
    pub fn apply_to<Q: QueryTarget>(&self, query: &mut Q) {
        query.computed(DISTANCE_ALIAS, &self.distance_expression);
        query.filter(&self.filter_condition);
        query.order_by(&self.order_clause);
        for parameter in &self.parameters {
            query.bind(parameter.clone());
        }
    }
}

impl TableBinding {
    /// Builds the distance filter spec for one query call.
    ///
    /// Validation fails fast, first violated check wins: latitude, longitude,
    /// radius, units. Nothing is assembled on a validation failure.
    pub fn find_by_distance(
        &self,
        options: &DistanceQueryOptions,
    ) -> Result<DistanceQuerySpec> {
        let latitude = match options.latitude {
            Some(latitude)
                if latitude.is_finite() && (-90.0..=90.0).contains(&latitude) =>
            {
                latitude
            }
            _ => {
                return Err(GeoDistanceError::InvalidArgument(
                    "latitude out of range or missing".to_owned(),
                ))
            }
        };
        let longitude = match options.longitude {
            Some(longitude)
                if longitude.is_finite() && (-180.0..=180.0).contains(&longitude) =>
            {
                longitude
            }
            _ => {
                return Err(GeoDistanceError::InvalidArgument(
                    "longitude out of range or missing".to_owned(),
                ))
            }
        };
        let radius = match options.radius {
            Some(radius) if radius.is_finite() && radius >= 0.0 => radius,
            _ => {
                return Err(GeoDistanceError::InvalidArgument(
                    "radius must be a non-negative number".to_owned(),
                ))
            }
        };
        let unit = match options.units.as_deref() {
            Some(alias) if !alias.is_empty() => DistanceUnit::parse(alias)?,
            _ => self.default_unit(),
        };

        let point = GeoPoint::new(latitude, longitude)?;
        let (expression, mut parameters) = distance_expression(
            point,
            self.latitude_column(),
            self.longitude_column(),
            unit,
            self.dialect(),
        );
        parameters.push(BoundParameter::float(PARAM_RADIUS, radius));

        Ok(DistanceQuerySpec {
            distance_expression: expression,
            filter_condition: format!("{} <= :{}", DISTANCE_ALIAS, PARAM_RADIUS),
            order_clause: format!("{} ASC", DISTANCE_ALIAS),
            parameters,
        })
    }
}
