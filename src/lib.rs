//! Blocking HTTP helpers: a request executor with retries and exponential
//! backoff, and a single-shot page fetcher.

pub mod commands;
pub mod executor;
pub mod fetcher;
pub mod http;
pub mod retry;

pub use executor::{RequestOptions, RetryingRequestExecutor, make_request};
pub use fetcher::PageFetcher;
pub use http::{MakeRequestError, RequestFailed, RequestSpec, Response};
pub use retry::RetryPolicy;
