//! Data transfer objects shared by the HTTP API.
//!
//! Every type here is serialized to or deserialized from JSON request and
//! response bodies and carries a `utoipa` schema for the generated OpenAPI
//! document. Domain logic lives in `server::model`; these types only describe
//! the wire format.

pub mod api;
pub mod coupon;
pub mod credit;
pub mod draft;
pub mod payment;
pub mod plan;
pub mod post;
pub mod user;
