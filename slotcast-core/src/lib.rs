#[cfg(test)]
#[macro_use]
mod test_macros;

pub mod config;
pub mod datetime_ext;
pub mod error;
pub mod generator;
pub mod models;
pub mod packing;
pub mod rotation;
pub mod schedule;
pub mod show;
pub mod slot;
pub mod throttle;
pub mod tracing_ext;

pub use generator::LineupGenerator;
pub use generator::generate_lineup;
