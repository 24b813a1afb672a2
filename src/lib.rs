//! Gitfolio - the project pipeline behind a personal portfolio page.
//!
//! Fetches a GitHub user's public repositories, filters out forks, and
//! projects the rest into a stable view model with an explicit
//! loading/loaded lifecycle. The page renderer is an external collaborator
//! that re-reads the view state on every render pass; nothing in this crate
//! draws anything.

pub mod config;
pub mod fetch;
pub mod project;
pub mod view;

// Re-exports for ergonomics
pub use config::PortfolioConfig;
pub use fetch::{FetchError, FetchEvent, RawRepository, RepoFetcher};
pub use project::{project_repositories, LoadState, Project};
pub use view::PortfolioView;
