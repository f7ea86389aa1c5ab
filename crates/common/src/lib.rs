//! Shared runtime plumbing for chancery binaries.

pub mod logging;
