pub mod ports;
pub mod postgres;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use postgres::PostgresDatabase;
