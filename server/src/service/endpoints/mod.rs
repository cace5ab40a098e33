//! Endpoint handlers organized by domain

pub mod races;

pub use races::RacesEndpoints;
