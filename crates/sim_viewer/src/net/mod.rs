//! Simulation service access

pub mod client;
pub mod poller;

pub use client::{join_url, HttpSimulationClient, ServiceError, SimulationService};
pub use poller::{poll_cycle, PollOutcome};
