//! Remote repository data.

pub mod github;

pub use github::{count_open, GhCli, RepoSource, SearchKind};
