//! HTTP transport and response envelope handling

pub mod envelope;
pub mod transport;

pub use envelope::{decode, ApiEnvelope};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, ReqwestTransport};
