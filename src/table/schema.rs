use crate::core::{Column, DataType, ScanError, Schema};

pub const PICKUP: &str = "tpep_pickup_datetime";
pub const DROPOFF: &str = "tpep_dropoff_datetime";
pub const PASSENGER_COUNT: &str = "passenger_count";
pub const TRIP_DISTANCE: &str = "trip_distance";

/// Columns of a taxi ride file, in their usual header order.
pub fn rides_schema() -> Result<Schema, ScanError> {
    Schema::new(vec![
        Column::new("VendorID", DataType::Int8),
        Column::new(PICKUP, DataType::Timestamp),
        Column::new(DROPOFF, DataType::Timestamp),
        Column::new(PASSENGER_COUNT, DataType::Int8),
        Column::new(TRIP_DISTANCE, DataType::Float64),
        Column::new("RatecodeID", DataType::Int8),
        Column::new("store_and_fwd_flag", DataType::Utf8),
        Column::new("PULocationID", DataType::Int16),
        Column::new("DOLocationID", DataType::Int16),
        Column::new("payment_type", DataType::Int8),
        Column::new("fare_amount", DataType::Float32),
        Column::new("extra", DataType::Float32),
        Column::new("mta_tax", DataType::Float32),
        Column::new("tip_amount", DataType::Float32),
        Column::new("tolls_amount", DataType::Float32),
        Column::new("improvement_surcharge", DataType::Float32),
        Column::new("total_amount", DataType::Float32),
        Column::new("congestion_surcharge", DataType::Float32),
    ])
}
