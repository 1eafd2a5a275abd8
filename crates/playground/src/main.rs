use database::{
    mysql, postgres, select::DistanceSelect, DatabaseConnectionInfo, GeoConnection,
};
use geodistance::{config::GeoDistanceConfig, query::DistanceQueryOptions};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
struct PlaceRow {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let info = DatabaseConnectionInfo::from_env()
        .expect("DATABASE_SCHEME/USER/PASSWORD/HOST/PORT/NAME must be set");
    let connection = GeoConnection::connect(&info.url()).await.unwrap();

    let binding = connection
        .attach("places", GeoDistanceConfig::default())
        .await
        .unwrap();

    // everything within 25 km of Kiel main station
    let options = DistanceQueryOptions {
        latitude: Some(54.3233),
        longitude: Some(10.1228),
        radius: Some(25.0),
        units: Some("km".to_owned()),
    };
    let spec = binding.find_by_distance(&options).unwrap();

    let mut select = DistanceSelect::new("places")
        .column("name")
        .column("latitude")
        .column("longitude");
    spec.apply_to(&mut select);

    let places: Vec<PlaceRow> = match &connection {
        GeoConnection::Postgres(pool) => {
            postgres::fetch_all(pool, &select).await.unwrap()
        }
        GeoConnection::MySql(pool) => mysql::fetch_all(pool, &select).await.unwrap(),
    };

    let json = serde_json::to_string_pretty(&places).unwrap();
    println!("json: {}", json);
}
