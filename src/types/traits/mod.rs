pub mod any;
pub mod types;
