//! Read-only records parsed from the project data document.
//!
//! Nothing here is mutated after parse; rendering is a pure projection of
//! these records.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read project data")]
    Io(#[from] std::io::Error),
    #[error("failed to parse project data")]
    Json(#[from] serde_json::Error),
}

/// The complete project data document.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub projects: Vec<Project>,
}

impl Catalog {
    /// Reads and parses a project data file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the file cannot be read or the JSON
    /// does not match the expected shape.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&source)?)
    }
}

/// One filterable category.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

/// How a project presents its media.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectKind {
    /// A hero image with an optional top-level video.
    #[default]
    Single,
    /// A hero image plus a collapsible list of build-log entries.
    Log,
}

impl<'de> Deserialize<'de> for ProjectKind {
    // any unrecognized type string means a plain single-media card
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Ok(if text == "log" { Self::Log } else { Self::Single })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub category: String,
    /// ISO `YYYY-MM-DD`; cards are sorted by this, newest first.
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "type")]
    pub kind: ProjectKind,
    pub hero: Hero,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hero {
    pub src: String,
    pub alt: String,
}

/// One timestamped entry of a build log.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogEntry {
    Image {
        src: String,
        alt: String,
        #[serde(default)]
        caption: Option<String>,
    },
    Video {
        src: String,
        #[serde(default)]
        alt: Option<String>,
        #[serde(default)]
        caption: Option<String>,
        #[serde(default)]
        poster: Option<String>,
    },
}
