//! Category and free-text filtering over the parsed projects.
//!
//! Filtering operates on the records, not the rendered markup; the page
//! only toggles card visibility to match the result.

use crate::model::Project;

/// Which cards the category buttons currently show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => project.category == *id,
        }
    }
}

/// Case-insensitive substring search over title, description and tags.
/// An empty term matches every project.
#[must_use]
pub fn matches_search(project: &Project, term: &str) -> bool {
    let term = term.to_lowercase();
    project.title.to_lowercase().contains(&term)
        || project.description.to_lowercase().contains(&term)
        || project
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&term))
}

/// Projects passing both the category filter and the search term.
pub fn select<'a>(
    projects: &'a [Project],
    category: &CategoryFilter,
    term: &str,
) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|project| category.matches(project) && matches_search(project, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn project(category: &str, title: &str, tags: &[&str]) -> Project {
        serde_json::from_str(&format!(
            r#"{{
                "category": "{category}",
                "date": "2024-01-01",
                "title": "{title}",
                "description": "about {title}",
                "tags": [{}],
                "hero": {{"src": "/i.png", "alt": "{title}"}}
            }}"#,
            tags.iter()
                .map(|tag| format!("\"{tag}\""))
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .unwrap()
    }

    fn sample() -> Vec<Project> {
        vec![
            project("robotics", "Rover", &["esp32", "cad"]),
            project("software", "Tracer", &["rust"]),
            project("robotics", "Arm", &[]),
        ]
    }

    #[test]
    fn all_filter_keeps_every_project() {
        let projects = sample();
        assert_eq!(select(&projects, &CategoryFilter::All, "").len(), 3);
    }

    #[test]
    fn category_filter_keeps_only_matching_projects() {
        let projects = sample();
        let filter = CategoryFilter::Category("robotics".into());
        let selected = select(&projects, &filter, "");
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|project| project.category == "robotics"));
    }

    #[test]
    fn search_is_case_insensitive_and_covers_tags() {
        let projects = sample();
        assert_eq!(select(&projects, &CategoryFilter::All, "ROVER").len(), 1);
        assert_eq!(select(&projects, &CategoryFilter::All, "rust").len(), 1);
        assert_eq!(select(&projects, &CategoryFilter::All, "submarine").len(), 0);
    }

    #[test]
    fn search_and_category_combine() {
        let projects = sample();
        let filter = CategoryFilter::Category("software".into());
        assert_eq!(select(&projects, &filter, "rover").len(), 0);
        assert_eq!(select(&projects, &filter, "tracer").len(), 1);
    }

    proptest! {
        #[test]
        fn empty_term_never_filters_anything_out(term in "[ ]*") {
            let projects = sample();
            prop_assert_eq!(select(&projects, &CategoryFilter::All, term.trim()).len(), 3);
        }

        #[test]
        fn selected_is_always_a_subset(term in ".*") {
            let projects = sample();
            let selected = select(&projects, &CategoryFilter::All, &term);
            prop_assert!(selected.len() <= projects.len());
        }
    }
}
