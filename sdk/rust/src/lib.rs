//! Client for the spray proxy admin API.

mod client;

pub use client::{SdkError, SprayClient};
