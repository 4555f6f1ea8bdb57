//! Pass-by-pass settlement and the stepped run controller.

pub mod controller;
pub mod engine;
pub mod snapshot;
