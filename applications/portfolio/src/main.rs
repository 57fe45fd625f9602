//! Portfolio entry point: renders the static projects page or opens one
//! of the two viewer windows.

mod page;

use anyhow::{bail, Context};
use engine_viewer::{ExploderScene, Scene, SceneRendererBuilder, ShowcaseScene, ViewerConfig};
use lib_mesh_model::Model;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::channel;
use viewer_framework::{application::Application, logging::init_logger};
use winit::event_loop::{ControlFlow, EventLoop};

const USAGE: &str = "\
usage: portfolio <command>

commands:
  page <projects.json> <output.html>    render the projects page
  exploder <model> [viewer.json]        open the exploded-view window
  showcase <model> [viewer.json]        open the dithered showcase window
";

fn main() -> ExitCode {
    init_logger();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let arguments: Vec<String> = std::env::args().skip(1).collect();
    match arguments.as_slice() {
        [command, data, output] if command == "page" => {
            render_page(Path::new(data), Path::new(output))
        }
        [command, model, rest @ ..] if command == "exploder" => {
            let config = load_config(rest.first().map(PathBuf::from))?;
            let scene = ExploderScene::new(load_model(Path::new(model)), config);
            run_viewer("Exploded View", scene)
        }
        [command, model, rest @ ..] if command == "showcase" => {
            let config = load_config(rest.first().map(PathBuf::from))?;
            let scene = ShowcaseScene::new(load_model(Path::new(model)), config);
            run_viewer("Showcase", scene)
        }
        _ => bail!("{USAGE}"),
    }
}

fn render_page(data: &Path, output: &Path) -> anyhow::Result<()> {
    let (rendered_sender, rendered_receiver) = channel();
    page::write(data, output, &rendered_sender)?;
    if rendered_receiver.try_recv().is_ok() {
        info!("projects rendered");
    }
    Ok(())
}

/// Missing config file means defaults; a present but malformed one is an
/// error the user should see.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    if !path.exists() {
        warn!("{} not found, using defaults", path.display());
        return Ok(ViewerConfig::default());
    }
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("failed to parse {}", path.display()))
}

/// A model that cannot be loaded leaves the viewer with an empty scene
/// instead of aborting; the window still opens and stays responsive.
fn load_model(path: &Path) -> Model {
    match Model::load(path) {
        Ok(model) => model,
        Err(load_error) => {
            error!("failed to load {}: {load_error}", path.display());
            Model::from_parts(Vec::new())
        }
    }
}

fn run_viewer<S: Scene + 'static>(title: &str, scene: S) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create the window event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut application = Application::new(title.into(), SceneRendererBuilder::new(scene));

    info!("entering event loop");
    event_loop
        .run_app(&mut application)
        .context("window event loop failed")?;
    drop(application);
    Ok(())
}
