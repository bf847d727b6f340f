//! RedGifs module.
//!
//! Token cache and resolver for the external video host. The token lives
//! only in memory; validity is learned lazily from a 401 response.

pub mod client;

pub use client::{RedgifsClient, Resolution};
