//! Shelf application library
//!
//! The library registry module plus the bootstrap that deploys it and serves
//! it over HTTP.

pub mod app;
pub mod modules;

pub use modules::library::{Library, LibraryError, LibraryEvent, LibraryService};
