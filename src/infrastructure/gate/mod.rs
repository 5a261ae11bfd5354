//! Authentication gate service

mod service;

pub use service::AuthenticationGate;
