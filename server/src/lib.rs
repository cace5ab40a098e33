//! Race listing service.
//!
//! Requests flow through [`service`] into a [`persistence::RacesRepository`],
//! which builds a parameterized query ([`persistence::query`]), runs it, and
//! maps the rows back into `racing_proto::Race` records.

pub mod config;
pub mod persistence;
pub mod service;
