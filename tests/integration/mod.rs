//! End-to-end operation tests over a scripted transport.

pub mod errors;
pub mod group;
pub mod organization;
pub mod search;
pub mod user;
