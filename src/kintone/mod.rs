//! The kintone user API.
//!
//! [`KintoneClient`] knows the endpoint layout under `{baseUrl}/v1/`, the
//! JSON envelopes of each endpoint and the fetch-by-id, fetch-by-code and
//! page conventions shared by users, organizations and groups.

pub mod bodies;
pub mod client;

pub use client::KintoneClient;
