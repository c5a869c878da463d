pub mod client;
pub mod error;
pub mod queries;
pub mod transport;
pub mod types;

pub use client::MediaQueryClient;
pub use error::{FetchError, TransportError};
pub use transport::HttpTransport;
