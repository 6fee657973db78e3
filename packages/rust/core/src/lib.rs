//! Core orchestration for gitingester.
//!
//! This crate ties the pattern resolver and the ingestor together into a
//! single run (`process_directory`) and names the digest file.

pub mod output;
pub mod processor;

pub use output::{TIMESTAMP_FORMAT, build_output_path};
pub use processor::{ProcessOptions, effective_excludes, merge_excludes, process_directory};
