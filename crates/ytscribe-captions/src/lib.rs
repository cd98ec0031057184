//! YouTube caption track client.
//!
//! This crate is the worker's view of the caption provider:
//! - [`CaptionSource`] - the capability trait the fetch engine drives
//! - [`CaptionError`] - the closed failure taxonomy the engine classifies on
//! - [`InnertubeClient`] - the concrete client for YouTube's innertube
//!   player API and `json3` caption tracks

pub mod client;
pub mod error;
pub mod parse;
pub mod source;

pub use client::{CaptionClientConfig, InnertubeClient};
pub use error::{CaptionError, CaptionResult};
pub use source::CaptionSource;
