pub mod location;
pub mod records;
pub mod traits;
