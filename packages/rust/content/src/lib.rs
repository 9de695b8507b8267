//! Client for the FT content API.
//!
//! This crate provides:
//! - [`ContentClient`] — the four getters and their shared dispatch routine
//! - [`paths`] — request path builders
//! - [`CallKind`] — the static descriptor of each supported call
//! - [`ContentEvent`] and [`EventSink`] — result delivery
//! - [`Transport`] and the reqwest-backed [`HttpTransport`]

pub mod client;
pub mod descriptor;
pub mod events;
pub mod paths;
pub mod transport;

pub use client::{ContentClient, Dispatch, DispatchSummary};
pub use descriptor::{CallDescriptor, CallKind, PathShape};
pub use events::{ContentEvent, EventSink, SilentSink, channel};
pub use paths::{
    API_PARAM, build_collection_path, build_item_path, build_page_content_path, build_page_path,
};
pub use transport::{HttpOptions, HttpTransport, Transport};
