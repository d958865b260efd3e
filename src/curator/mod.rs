//! AI Curator
//!
//! A thin, stateless bridge between the visitor chat widget and a hosted
//! conversational model.

pub mod client;
pub mod handler;

pub use client::{CuratorClient, APOLOGY};
pub use handler::{curator_router, CuratorState};
