//! Client side of the app: session state, the invoice form and an HTTP
//! client for the REST API.

pub mod api;
pub mod builder;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use builder::{BuilderError, ComprobanteBuilder, TipoComprobante};
pub use session::{RateCache, Session};
