mod rides;
mod schema;

pub use rides::RidesTable;
pub use schema::{DROPOFF, PASSENGER_COUNT, PICKUP, TRIP_DISTANCE, rides_schema};
