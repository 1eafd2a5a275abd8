use std::collections::HashSet;
use std::f64::consts::PI;

use async_trait::async_trait;
use geodistance::{
    config::{GeoDistanceConfig, SchemaSource, TableBinding},
    dialect::SqlDialect,
    geo::{self, GeoPoint, EARTH_RADIUS_KM},
    query::{BoundParameter, DistanceQueryOptions, ParameterValue, QueryTarget},
    units::DistanceUnit,
    Result,
};

struct Place {
    name: &'static str,
    lat: f64,
    lng: f64,
    active: bool,
}

// reference data: both poles, a pair of antimeridian points describing the
// same physical location, a cluster of Birmingham points within ~1km of each
// other and one Birmingham in the wrong hemisphere
const PLACES: [Place; 10] = [
    Place { name: "south pole", lat: -90.0, lng: 0.0, active: false },
    Place { name: "north pole", lat: 90.0, lng: 0.0, active: false },
    Place { name: "same 1", lat: 0.0, lng: -180.0, active: false },
    Place { name: "same 2", lat: 0.0, lng: 180.0, active: false },
    Place { name: "birminham centre", lat: 52.47980068128972, lng: -1.8967723846435545, active: true },
    Place { name: "birmingham close 1", lat: 52.4858640956247, lng: -1.8966865539550781, active: true },
    Place { name: "birmingham close 2", lat: 52.47985295567416, lng: -1.904325485229492, active: true },
    Place { name: "birmingham close 3", lat: 52.47718688287627, lng: -1.8944549560546875, active: false },
    Place { name: "birmingham far", lat: 52.50514646853436, lng: -1.8513679504394531, active: true },
    Place { name: "wrong birmingham", lat: 33.519644153199245, lng: -86.8033218383789, active: true },
];

struct MemoryTable;

#[async_trait]
impl SchemaSource for MemoryTable {
    async fn column_names(&self, _table: &str) -> Result<HashSet<String>> {
        Ok(["id", "name", "lat", "lng", "active"]
            .iter()
            .map(|column| (*column).to_owned())
            .collect())
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }
}

/// An in-memory stand-in for a SQL executor. It collects what the spec pushes
/// through the `QueryTarget` seam and evaluates the distance expression with
/// the bound parameter values, the way a database engine would.
#[derive(Default)]
struct MemoryQuery {
    computed: Vec<(String, String)>,
    filters: Vec<String>,
    order: Vec<String>,
    parameters: Vec<BoundParameter>,
    // a caller-side extra condition, composed conjunctively
    active_only: bool,
}

impl QueryTarget for MemoryQuery {
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

impl MemoryQuery {
    fn float_parameter(&self, name: &str) -> f64 {
        match self
            .parameters
            .iter()
            .find(|parameter| parameter.name == name)
        {
            Some(BoundParameter {
                value: ParameterValue::Float(value),
                ..
            }) => *value,
            other => panic!("missing float parameter '{}': {:?}", name, other),
        }
    }

    fn run(&self) -> Vec<(&'static str, f64)> {
        assert_eq!(self.computed.len(), 1);
        assert_eq!(self.computed[0].0, "distance");
        assert_eq!(self.filters, ["distance <= :radius"]);
        assert_eq!(self.order, ["distance ASC"]);

        let center = GeoPoint::new(
            self.float_parameter("latitude"),
            self.float_parameter("longitude"),
        )
        .unwrap();
        let earth_radius = self.float_parameter("earth_radius");
        let radius = self.float_parameter("radius");

        let mut rows = PLACES
            .iter()
            .filter(|place| !self.active_only || place.active)
            .map(|place| {
                let row = GeoPoint::new(place.lat, place.lng).unwrap();
                (place.name, geo::distance_on_sphere(center, row, earth_radius))
            })
            .filter(|(_, distance)| *distance <= radius)
            .collect::<Vec<_>>();
        rows.sort_by(|left, right| left.1.partial_cmp(&right.1).unwrap());
        rows
    }
}

async fn places_binding() -> TableBinding {
    let config = GeoDistanceConfig {
        latitude_column: "lat".to_owned(),
        longitude_column: "lng".to_owned(),
        default_unit: DistanceUnit::Miles,
    };
    TableBinding::attach(&MemoryTable, "places", config)
        .await
        .unwrap()
}

fn names(rows: &[(&'static str, f64)]) -> Vec<&'static str> {
    rows.iter().map(|(name, _)| *name).collect()
}

#[tokio::test]
async fn small_radius_returns_only_the_cluster() {
    let binding = places_binding().await;
    let options = DistanceQueryOptions {
        latitude: Some(52.47980068128972),
        longitude: Some(-1.8967723846435545),
        radius: Some(0.9),
        units: Some("km".to_owned()),
    };

    let mut query = MemoryQuery::default();
    binding.find_by_distance(&options).unwrap().apply_to(&mut query);
    let rows = query.run();

    assert_eq!(rows.len(), 4);
    // ordered by distance, the centre point itself first at 0.0
    assert_eq!(rows[0], ("birminham centre", 0.0));
    for name in names(&rows) {
        assert!([
            "birminham centre",
            "birmingham close 1",
            "birmingham close 2",
            "birmingham close 3",
        ]
        .contains(&name));
    }
}

#[tokio::test]
async fn antimeridian_points_are_the_same_location() {
    let binding = places_binding().await;
    // radius 0 from (0, 180) must still match both antimeridian rows
    let options = DistanceQueryOptions {
        latitude: Some(0.0),
        longitude: Some(180.0),
        radius: Some(0.0),
        units: Some("km".to_owned()),
    };

    let mut query = MemoryQuery::default();
    binding.find_by_distance(&options).unwrap().apply_to(&mut query);
    let rows = query.run();

    assert_eq!(names(&rows), vec!["same 1", "same 2"]);
    assert!(rows.iter().all(|(_, distance)| *distance == 0.0));
}

#[tokio::test]
async fn half_circumference_radius_reaches_every_row() {
    let binding = places_binding().await;
    let half_circumference = (PI * EARTH_RADIUS_KM * 1000.0).round() / 1000.0;
    let options = DistanceQueryOptions {
        latitude: Some(90.0),
        longitude: Some(0.0),
        radius: Some(half_circumference),
        units: Some("km".to_owned()),
    };

    let mut query = MemoryQuery::default();
    binding.find_by_distance(&options).unwrap().apply_to(&mut query);
    let rows = query.run();

    assert_eq!(rows.len(), PLACES.len());
    // the south pole is the antipode of the query center
    let (name, distance) = rows.last().unwrap();
    assert_eq!(*name, "south pole");
    assert_eq!(*distance, half_circumference);
}

#[tokio::test]
async fn extra_conditions_compose_with_the_distance_filter() {
    let binding = places_binding().await;
    // no units given, so the configured default (miles) applies
    let options = DistanceQueryOptions {
        latitude: Some(52.47980068128972),
        longitude: Some(-1.8967723846435545),
        radius: Some(1.0),
        units: None,
    };

    let mut query = MemoryQuery {
        active_only: true,
        ..MemoryQuery::default()
    };
    binding.find_by_distance(&options).unwrap().apply_to(&mut query);
    let rows = query.run();

    assert_eq!(rows.len(), 3);
    for name in names(&rows) {
        assert!(
            ["birminham centre", "birmingham close 1", "birmingham close 2"]
                .contains(&name)
        );
    }
}

#[tokio::test]
async fn no_spec_is_produced_for_invalid_input() {
    let binding = places_binding().await;
    let options = DistanceQueryOptions {
        latitude: Some(52.47980068128972),
        longitude: Some(-1.8967723846435545),
        radius: None,
        units: Some("km".to_owned()),
    };

    // production of a spec is all-or-nothing: on a validation failure the
    // target must not have been touched
    let mut query = MemoryQuery::default();
    match binding.find_by_distance(&options) {
        Ok(spec) => {
            spec.apply_to(&mut query);
            panic!("expected a validation failure");
        }
        Err(why) => {
            assert!(matches!(
                why,
                geodistance::GeoDistanceError::InvalidArgument(_)
            ));
        }
    }
    assert!(query.computed.is_empty());
    assert!(query.parameters.is_empty());
}
