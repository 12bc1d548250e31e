pub mod conf;
pub mod core;
pub mod index;
pub mod io;
pub mod query;
pub mod storage;
pub mod table;

#[cfg(feature = "testutil")]
pub mod testutil;
