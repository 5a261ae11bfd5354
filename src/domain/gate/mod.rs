//! Authentication gate domain

mod state;

pub use state::{GateEvent, GateState};
