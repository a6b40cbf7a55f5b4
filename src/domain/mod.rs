pub mod day_type;
pub mod error;
pub mod occupancy;
pub mod profile;
pub mod vehicle;

pub use day_type::*;
pub use error::*;
pub use occupancy::*;
pub use profile::*;
pub use vehicle::*;
