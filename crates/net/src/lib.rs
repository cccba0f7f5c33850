#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! HTTP transport for vouch
//!
//! A thin wrapper over a pooled `reqwest` client. Each call carries its own
//! timeout and there is deliberately no retry layer: within one process
//! lifetime a failed call is final, and callers degrade instead of retrying.

mod client;

pub use client::{NetClient, NetConfig};
