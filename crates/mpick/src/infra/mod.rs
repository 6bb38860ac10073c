//! Infrastructure adapters for config, git, manifests, snapshots, and dispatch.

pub mod config;
pub mod dispatch;
pub mod extensions;
pub mod git;
pub mod host;
pub mod session;
