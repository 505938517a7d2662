//! Command implementations behind the `pagefetch` binary.

mod fetch;
mod request;

pub use fetch::{DEFAULT_PREVIEW_CHARS, DEFAULT_URL, fetch, preview};
pub use request::{RequestCommand, parse_header, request};
