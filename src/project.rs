use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::fetch::{FetchError, RawRepository};

/// Shown in place of a missing or empty repository description.
pub const DESCRIPTION_FALLBACK: &str = "No description available";

/// One portfolio entry, normalized for rendering. Immutable once built;
/// a reload replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub github_url: String,
    /// `None` suppresses the language badge entirely; never an empty string.
    pub language: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub updated_at: NaiveDate,
}

impl Project {
    fn from_raw(raw: RawRepository) -> Self {
        let description = match raw.description {
            Some(text) if !text.is_empty() => text,
            _ => DESCRIPTION_FALLBACK.to_string(),
        };

        Self {
            id: raw.id,
            title: raw.name,
            description,
            github_url: raw.html_url,
            language: raw.language,
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            updated_at: raw.updated_at.date_naive(),
        }
    }

    /// Date-only label in the conventional short form, e.g. "01/15/23".
    pub fn updated_label(&self) -> String {
        self.updated_at.format("%x").to_string()
    }
}

/// View-scoped load state. Starts as `Loading` and transitions to `Loaded`
/// exactly once per view; it never goes back.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded(Vec<Project>),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Projects to render, empty while still loading.
    pub fn projects(&self) -> &[Project] {
        match self {
            LoadState::Loading => &[],
            LoadState::Loaded(projects) => projects,
        }
    }
}

/// Turn a settled fetch into the state the renderer consumes.
///
/// Forked repositories are dropped and the rest are mapped in source order.
/// A failed fetch degrades to an empty project list: the page shows an empty
/// project section, never an error surface. The warning is the only trace
/// the failure leaves.
pub fn project_repositories(result: Result<Vec<RawRepository>, FetchError>) -> LoadState {
    match result {
        Ok(raw) => LoadState::Loaded(
            raw.into_iter()
                .filter(|repo| !repo.fork)
                .map(Project::from_raw)
                .collect(),
        ),
        Err(err) => {
            warn!("Failed to fetch projects, rendering none: {}", err);
            LoadState::Loaded(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn raw(id: u64, name: &str, fork: bool) -> RawRepository {
        RawRepository {
            id,
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            html_url: format!("https://github.com/octocat/{}", name),
            language: Some("Rust".to_string()),
            stargazers_count: 3,
            forks_count: 1,
            updated_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            fork,
        }
    }

    #[test]
    fn test_forks_are_filtered_out() {
        let state = project_repositories(Ok(vec![
            raw(1, "alpha", false),
            raw(2, "fork1", true),
            raw(3, "beta", false),
        ]));

        let projects = state.projects();
        assert_eq!(projects.len(), 2);
        assert!(projects.iter().all(|p| p.title != "fork1"));
    }

    #[test]
    fn test_source_order_is_preserved() {
        let state = project_repositories(Ok(vec![
            raw(9, "zulu", false),
            raw(1, "alpha", true),
            raw(5, "mike", false),
            raw(3, "echo", false),
        ]));

        let titles: Vec<&str> = state.projects().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["zulu", "mike", "echo"]);
    }

    #[test]
    fn test_missing_description_gets_fallback() {
        let mut repo = raw(1, "alpha", false);
        repo.description = None;

        let state = project_repositories(Ok(vec![repo]));
        assert_eq!(state.projects()[0].description, DESCRIPTION_FALLBACK);
    }

    #[test]
    fn test_empty_description_gets_fallback() {
        let mut repo = raw(1, "alpha", false);
        repo.description = Some(String::new());

        let state = project_repositories(Ok(vec![repo]));
        assert_eq!(state.projects()[0].description, DESCRIPTION_FALLBACK);
    }

    #[test]
    fn test_missing_language_stays_absent() {
        let mut repo = raw(1, "alpha", false);
        repo.language = None;

        let state = project_repositories(Ok(vec![repo]));
        assert_eq!(state.projects()[0].language, None);
    }

    #[test]
    fn test_fallbacks_applied_per_element() {
        let mut bare = raw(1, "bare", false);
        bare.description = None;
        bare.language = None;
        let full = raw(2, "full", false);

        let state = project_repositories(Ok(vec![bare, full]));
        let projects = state.projects();

        assert_eq!(projects[0].description, DESCRIPTION_FALLBACK);
        assert_eq!(projects[0].language, None);
        assert_eq!(projects[1].description, "full description");
        assert_eq!(projects[1].language.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_field_mapping() {
        let state = project_repositories(Ok(vec![raw(42, "alpha", false)]));
        let project = &state.projects()[0];

        assert_eq!(project.id, 42);
        assert_eq!(project.title, "alpha");
        assert_eq!(project.github_url, "https://github.com/octocat/alpha");
        assert_eq!(project.stars, 3);
        assert_eq!(project.forks, 1);
        assert_eq!(
            project.updated_at,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_updated_label_is_date_only() {
        let state = project_repositories(Ok(vec![raw(1, "alpha", false)]));
        assert_eq!(state.projects()[0].updated_label(), "01/01/23");
    }

    #[test]
    fn test_http_failure_degrades_to_empty_list() {
        let state = project_repositories(Err(FetchError::HttpStatus { code: 404 }));
        assert!(!state.is_loading());
        assert!(state.projects().is_empty());
    }

    #[test]
    fn test_malformed_response_degrades_to_empty_list() {
        let source =
            serde_json::from_str::<Vec<RawRepository>>(r#"{"message": "rate limit exceeded"}"#)
                .unwrap_err();
        let state = project_repositories(Err(FetchError::MalformedResponse { source }));

        assert_eq!(state, LoadState::Loaded(Vec::new()));
    }

    #[test]
    fn test_all_forks_yields_loaded_empty() {
        let state = project_repositories(Ok(vec![raw(1, "fork1", true), raw(2, "fork2", true)]));
        assert_eq!(state, LoadState::Loaded(Vec::new()));
    }

    #[test]
    fn test_empty_input_yields_loaded_empty() {
        let state = project_repositories(Ok(Vec::new()));
        assert_eq!(state, LoadState::Loaded(Vec::new()));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let input = vec![raw(1, "alpha", false), raw(2, "fork1", true)];
        let first = project_repositories(Ok(input.clone()));
        let second = project_repositories(Ok(input));
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_state_projects_empty_while_loading() {
        let state = LoadState::Loading;
        assert!(state.is_loading());
        assert!(state.projects().is_empty());
    }
}
