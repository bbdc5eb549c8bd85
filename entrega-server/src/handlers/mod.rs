pub mod locations;
pub mod orders;
pub mod tracking;
