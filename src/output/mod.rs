//! Persisting generated bundles to disk

pub mod writer;

pub use writer::BundleWriter;
