#![warn(missing_docs)]
#![crate_name = "linkpager_rs"]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # linkpager-rs
//!
//! `linkpager_rs` turns a link-paginated HTTP list endpoint into a single, lazily produced,
//! ordered stream of decoded items.
//!
//! The [`Paginator`] drives any [`PageFetcher`]. [`PagerClient`] is the bundled HTTP
//! fetcher: it decodes each response body as a JSON array and follows the `rel="next"`
//! entry of the `Link` header.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use linkpager_rs::{collection, PagerClient, PaginatedRequests, PaginationOptions, Value};
//!
//! #[tokio::main]
//! async fn main() -> linkpager_rs::PagerResult<()> {
//!     let client = Arc::new(
//!         PagerClient::builder()
//!             .base_url("https://api.github.com")
//!             .token("my-token")
//!             .build()?,
//!     );
//!
//!     let mut repos = client.paginate::<Value>(
//!         "orgs/rust-lang/repos",
//!         collection! { "type" => "public" },
//!         None,
//!         PaginationOptions::builder().page_size(100).build(),
//!     )?;
//!     while let Some(repo) = repos.next().await {
//!         println!("{}", repo?["full_name"]);
//!     }
//!     Ok(())
//! }
//! ```

extern crate self as linkpager_rs;

/// Module containing the HTTP client.
pub mod client;
/// Module containing the pagination cursor.
pub mod cursor;
/// Module containing the pagination engine.
pub mod engine;
/// Module containing the error type.
pub mod error;
/// Module containing the page fetcher contract.
pub mod fetcher;
pub mod links;
/// Module containing the macros.
pub mod macros;
/// Module containing the pagination options.
pub mod options;
/// Module containing a single fetched page.
pub mod page;
mod params;
/// Module containing list resources described by path templates.
pub mod resources;

pub use client::{PagerClient, PaginatedRequests};
pub use cursor::FetchCursor;
pub use engine::{CancelHandle, PageBatches, PageStream, Paginator};
pub use error::PagerError;
pub use fetcher::PageFetcher;
pub use links::PaginationLinks;
pub use options::PaginationOptions;
pub use page::Page;
pub use params::Parameters;
pub use resources::{render_path, ListResource};

pub use async_trait::async_trait;
pub use reqwest::header::HeaderMap;
pub use serde_json::Value;
pub use url::Url;

#[cfg(feature = "derive")]
pub use linkpager_rs_derive::ListResource;

/// Result type for the linkpager-rs crate.
pub type PagerResult<T> = std::result::Result<T, error::PagerError>;
