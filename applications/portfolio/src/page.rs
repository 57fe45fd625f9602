//! Assembles the static projects page from the rendered catalog.

use anyhow::Context;
use lib_project_catalog::{render, unable_to_load, Catalog};
use log::{debug, error, info};
use std::path::Path;
use std::sync::mpsc::Sender;

const PAGE_TEMPLATE: &str = include_str!("../assets/projects.html");

/// Renders the catalog at `data_path` into a complete HTML page at
/// `output_path` and signals `rendered` once the page is on disk.
///
/// A missing or malformed data file is not fatal: the page is written
/// with an error notice where the grid would be, matching what a visitor
/// should see.
pub fn write(data_path: &Path, output_path: &Path, rendered: &Sender<()>) -> anyhow::Result<()> {
    let (filters, grid) = match Catalog::load(data_path) {
        Ok(catalog) => {
            let rendered = render(&catalog);
            (rendered.filters, rendered.grid)
        }
        Err(load_error) => {
            error!("failed to load {}: {load_error}", data_path.display());
            (String::new(), unable_to_load().to_html())
        }
    };

    let page = PAGE_TEMPLATE
        .replace("<!--FILTERS-->", &filters)
        .replace("<!--PROJECTS-->", &grid);
    std::fs::write(output_path, page)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    info!("wrote {}", output_path.display());
    // completion notification for whoever binds behavior to the new markup
    if rendered.send(()).is_err() {
        debug!("nobody is listening for the render notification");
    }
    Ok(())
}
