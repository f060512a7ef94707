//! Reactive views over the snapshot: a pure derivation plus a session that
//! recomputes it as the user changes the parameters.

pub mod engine;
pub mod error;
pub mod params;
pub mod session;
