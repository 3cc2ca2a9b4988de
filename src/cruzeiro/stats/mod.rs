pub mod aggregate;
pub mod error;
pub mod io;
pub mod model;
pub mod orchestrate;
pub mod participation;
pub mod report;

pub use error::{Result, StatsError};
