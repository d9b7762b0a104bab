//! Sitesmith: turns a one-line website idea into a generated landing page.
//!
//! The core is [`generation`]: prompt → chat completion → lenient
//! normalization, with a deterministic fallback page whenever the model path
//! cannot deliver. [`store`] persists results, [`service`] ties the two
//! together behind boundary validation, and [`export`] renders stored pages.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod export;
pub mod generation;
pub mod logging;
pub mod providers;
pub mod service;
pub mod store;
