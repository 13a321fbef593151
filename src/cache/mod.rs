//! Cache module for storing article images to disk
//!
//! This module provides an image store that downloads each article's
//! artwork on a detached background task and writes it to the filesystem,
//! one file per article title. Writes to the same destination path are
//! serialized so concurrent saves never interleave the remove/rename step.

mod images;

pub use images::{ImageStore, ImageStoreError};
