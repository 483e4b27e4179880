//! Typed client for the Pulse Grow cloud API.
//!
//! The vendor API reports environmental-sensor hubs and their attached
//! devices. This crate holds the wire schema (integer-coded enumerations
//! that decode totally, records whose optional fields stay optional) and an
//! HTTP client with the failure policy the bridge daemon relies on:
//! transport failures propagate (or become empty results in lenient mode),
//! schema mismatches always decode to an absent value.

pub mod client;
pub mod error;
pub mod models;
pub mod types;

pub use client::{PulseClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::Error;
