//! CrashWorld - drop cubes, click the ground, watch them scatter.

mod actors;
mod camera;
mod config;
mod events;
mod interaction;
mod presentation;
mod registry;
mod scene_config;
mod simulation;
mod state;

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::Settings;
use state::SandboxState;

/// Fixed frame length of a headless run.
const HEADLESS_FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    /// Scene file. Without one a single cube is dropped.
    config: Option<PathBuf>,
    /// Run this many frames without a window, then exit.
    headless: Option<u32>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--headless" => {
                    let frames = args.next().context("--headless needs a frame count")?;
                    parsed.headless = Some(
                        frames
                            .parse()
                            .with_context(|| format!("invalid frame count {:?}", frames))?,
                    );
                }
                other => bail!("unknown argument {:?} (usage: crashworld [--config PATH] [--headless FRAMES])", other),
            }
        }
        Ok(parsed)
    }
}

struct App {
    state: SandboxState,
    window: Option<Arc<Window>>,
}

impl App {
    fn new(state: SandboxState) -> Self {
        Self { state, window: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let settings = &self.state.settings.window;
        let window_attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(settings.width, settings.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        self.state.resize(size.width, size.height);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if self.state.handle_window_event(event, &window) || !self.state.running {
            event_loop.exit();
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        self.state.handle_device_event(event);
    }
}

fn run_headless(state: &mut SandboxState, frames: u32) {
    log::info!("Running {} headless frame(s)", frames);
    for _ in 0..frames {
        state.update_fixed(HEADLESS_FRAME);
    }
    for handle in state.registry.iter() {
        let label = state.scene.name(handle.presentation).unwrap_or_else(|| handle.name.clone());
        if let Some(transform) = handle.transform(&state.physics) {
            log::info!("{}: {:.3?}", label, transform.position);
        }
    }
    if state.scene.is_empty() {
        log::warn!("Nothing was presented");
    }
    log::info!(
        "Done: {} frame(s), {:.2}s simulated, {} instance(s) presented",
        state.simulation.frames(),
        state.physics.simulated_time(),
        state.scene.instance_data().len()
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let settings = Settings::load();

    let document = match &args.config {
        Some(path) => Some(
            scene_config::load_from_path(path)
                .inspect_err(|e| match (e.index(), e.field()) {
                    (Some(index), Some(field)) => {
                        log::error!("Fix `{}` of cube #{} in {}", field, index, path.display())
                    }
                    (Some(index), None) => {
                        log::error!("Fix cube #{} in {}", index, path.display())
                    }
                    _ => {}
                })
                .with_context(|| format!("failed to load scene {}", path.display()))?,
        ),
        None => None,
    };
    let mut state = SandboxState::new(settings, document.as_ref()).context("failed to spawn scene")?;
    log::info!(
        "Starting CrashWorld: {} actor(s), {} collider(s)",
        state.registry.len(),
        state.physics.collider_count()
    );

    if let Some(frames) = args.headless {
        run_headless(&mut state, frames);
        return Ok(());
    }

    log::info!("Controls: RMB drag look, WASD move, R/F up/down, LMB push, Alt+0 reset view, Esc quit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
