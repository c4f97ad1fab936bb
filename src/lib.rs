//! Dream interpretation service
//!
//! Serves a browser front end that sends a dream description for a five-point
//! healing analysis and asks for a matching illustration. Analysis is proxied
//! to DeepSeek; imagery comes from 4oimageapi.io's asynchronous jobs, with
//! Unsplash and curated images behind it.

pub mod ai;
pub mod config;
pub mod error;
pub mod gallery;
pub mod i18n;
pub mod keywords;
pub mod models;
pub mod prompts;
pub mod routes;
pub mod server;
pub mod store;

pub use error::{Error, Result};
