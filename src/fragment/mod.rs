//! Fragment Loading
//!
//! Static HTML fragments (navbar, sidebar, footer, page bodies) fetched by
//! convention-based relative paths and injected into mount points.
//!
//! ## Architecture
//!
//! - **FragmentSource**: resolves a locator to markup (directory, HTTP,
//!   in-memory)
//! - **FragmentLoader**: writes fetched markup into the shared document,
//!   isolating failures and discarding stale loads

mod error;
mod loader;
mod source;

pub use error::{FragmentError, FragmentResult};
pub use loader::{FragmentLoader, FragmentRequest, LoadOutcome, LoadReport};
pub use source::{DirectorySource, FragmentSource, HttpSource, StaticSource};
