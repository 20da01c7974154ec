//! Integration test suite for the kintone connector.
//!
//! Every test drives a [`KintoneConnector`](kintone_connector::KintoneConnector)
//! over a scripted [`MockTransport`](kintone_connector::transport::MockTransport)
//! and checks both the outcome and the requests that reached the wire.
//!
//! ## Test Organization
//!
//! - `common/` - connector fixtures, URL helpers and canned responses
//! - `integration/group` - group lifecycle, rename-only updates
//! - `integration/organization` - organization lifecycle
//! - `integration/user` - user lifecycle, associations, write ordering
//! - `integration/search` - filters, projections, pagination
//! - `integration/errors` - response classification end to end
//!
//! ## Usage
//!
//! ```bash
//! cargo test
//! cargo test integration::user
//! ```

pub mod common;
pub mod integration;
