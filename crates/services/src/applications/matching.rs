//! Fuzzy ranking of applications against a search pattern.

use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::Application;

/// Multipliers applied to the fuzzy score of each application field.
///
/// The best weighted field score is the application's score. A weight of
/// zero excludes the field from matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub name: i64,
    pub keywords: i64,
    pub executable: i64,
    pub description: i64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            name: 4,
            keywords: 2,
            executable: 2,
            description: 1,
        }
    }
}

/// Rank `apps` against `pattern`.
///
/// `apps` must already be in baseline order. A blank pattern returns every
/// application in that order; otherwise non-matching applications are
/// dropped and the rest are ordered by descending score, ties keeping their
/// baseline position.
pub fn rank(apps: &[Arc<Application>], pattern: &str, weights: MatchWeights) -> Vec<Arc<Application>> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return apps.to_vec();
    }

    let matcher = SkimMatcherV2::default().ignore_case();

    apps.iter()
        .filter_map(|app| score(&matcher, app, pattern, weights).map(|s| (s, app)))
        // `sorted_by` is stable, so equal scores stay in baseline order.
        .sorted_by(|a, b| b.0.cmp(&a.0))
        .map(|(_, app)| Arc::clone(app))
        .collect()
}

fn score(
    matcher: &SkimMatcherV2,
    app: &Application,
    pattern: &str,
    weights: MatchWeights,
) -> Option<i64> {
    let field = |text: &str, weight: i64| -> Option<i64> {
        if weight <= 0 {
            return None;
        }
        matcher.fuzzy_match(text, pattern).map(|s| s.saturating_mul(weight))
    };

    let name = field(&app.name, weights.name);
    let keywords = app
        .keywords
        .iter()
        .filter_map(|k| field(k, weights.keywords))
        .max();
    let executable = app
        .executable()
        .and_then(|exe| field(exe, weights.executable));
    let description = app
        .description
        .as_deref()
        .and_then(|d| field(d, weights.description));

    [name, keywords, executable, description]
        .into_iter()
        .flatten()
        .max()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn app(name: &str, exec: &str, description: Option<&str>, keywords: &[&str]) -> Arc<Application> {
        Arc::new(Application {
            id: format!("{}.desktop", name.to_lowercase()),
            name: name.to_string(),
            description: description.map(str::to_string),
            icon: None,
            icon_path: None,
            exec: exec.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            terminal: false,
            desktop_file: PathBuf::new(),
        })
    }

    fn names(apps: &[Arc<Application>]) -> Vec<&str> {
        apps.iter().map(|a| a.name.as_str()).collect()
    }

    fn fixture() -> Vec<Arc<Application>> {
        vec![
            app("Calculator", "gnome-calculator", Some("Perform calculations"), &[]),
            app("Files", "nautilus --new-window", Some("Access and organize files"), &["folder", "explorer"]),
            app("Firefox", "firefox %u", Some("Browse the World Wide Web"), &["internet", "web"]),
            app("Terminal", "foot", Some("Use the command line"), &["shell", "console"]),
        ]
    }

    #[test]
    fn test_blank_pattern_keeps_baseline_order() {
        let apps = fixture();
        assert_eq!(names(&rank(&apps, "", MatchWeights::default())), names(&apps));
        assert_eq!(names(&rank(&apps, "   ", MatchWeights::default())), names(&apps));
    }

    #[test]
    fn test_drops_non_matching() {
        let apps = fixture();
        assert!(rank(&apps, "zzzznomatch", MatchWeights::default()).is_empty());
    }

    #[test]
    fn test_name_match_ranks_first() {
        let apps = fixture();
        let ranked = rank(&apps, "fire", MatchWeights::default());
        assert_eq!(ranked.first().map(|a| a.name.as_str()), Some("Firefox"));
    }

    #[test]
    fn test_matches_keywords_and_executable() {
        let apps = fixture();
        assert_eq!(names(&rank(&apps, "console", MatchWeights::default())), vec!["Terminal"]);
        assert_eq!(names(&rank(&apps, "nautilus", MatchWeights::default())), vec!["Files"]);
    }

    #[test]
    fn test_zero_weight_excludes_field() {
        let apps = fixture();
        let weights = MatchWeights {
            keywords: 0,
            ..MatchWeights::default()
        };
        assert!(!names(&rank(&apps, "console", weights)).contains(&"Terminal"));
    }

    #[test]
    fn test_huge_weight_saturates() {
        let apps = fixture();
        let weights = MatchWeights {
            name: i64::MAX / 2,
            ..MatchWeights::default()
        };
        let ranked = rank(&apps, "fire", weights);
        assert_eq!(ranked.first().map(|a| a.name.as_str()), Some("Firefox"));
    }
}
