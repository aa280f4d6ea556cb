//! HTTP transport seam
//!
//! The engine never talks to the network directly; it hands a
//! [`crate::RequestDescriptor`] to a [`Transport`] and gets back the raw
//! status code and body bytes. The production implementation wraps a
//! pooled reqwest client; tests substitute their own.

mod transport;

pub use transport::{RawResponse, ReqwestTransport, Transport};
