//! Application Layer
//!
//! Use cases and port definitions. Orchestrates the domain decision core
//! against the external trading platform.
//!
//! - `ports`: Interfaces for the platform collaborators
//! - `use_cases`: The daily evaluation cycle
//! - `services`: The parameterless daily entry point and its schedule

pub mod ports;
pub mod services;
pub mod use_cases;
