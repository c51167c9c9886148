//! Page-level logic for mdnotes.
//!
//! This crate ties discovery and Markdown conversion together into the two
//! pages a reader sees: the file index and the document viewer.

pub mod index;
pub mod viewer;

pub use index::{FileIndex, viewer_href};
pub use viewer::{Viewer, ViewerPage, error_block, select_document};
