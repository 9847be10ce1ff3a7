use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use scatter_scene::assets::SceneTextures;
use scatter_scene::cli::Cli;
use scatter_scene::core::{Controller, WinitController};
use scatter_scene::renderer::WgpuRenderer;
use scatter_scene::ui::{PanelView, UiLayer};
use scatter_scene::{AppState, FrameLoop, FrameOutcome, PanelBridge, SceneConfig, SceneError, Viewport};

struct App {
    config: SceneConfig,
    textures: SceneTextures,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    state: Option<AppState>,
    ui: Option<UiLayer>,
    input: WinitController,
    frame_loop: FrameLoop,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig, textures: SceneTextures) -> Self {
        Self {
            config,
            textures,
            window: None,
            renderer: None,
            state: None,
            ui: None,
            input: WinitController::new(),
            frame_loop: FrameLoop::new(),
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(window_config.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height)),
            )
            .map_err(SceneError::Window)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let viewport = Viewport::from_physical(
            size.width,
            size.height,
            window.scale_factor(),
            window_config.max_pixel_ratio,
        );
        let state = AppState::new(self.config.clone(), viewport);

        let renderer = pollster::block_on(WgpuRenderer::new(
            window.clone(),
            viewport.surface_size(),
            &self.config.text,
            &self.textures,
            &state.materials,
        ))
        .context("initializing renderer")?;

        if self.config.window.show_ui {
            self.ui = Some(UiLayer::new(&window));
        }
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.state = Some(state);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            window: Some(window),
            renderer: Some(renderer),
            state: Some(state),
            ui,
            input,
            frame_loop,
            ..
        } = self
        else {
            return;
        };

        let mut pointer_captured = false;
        if let Some(ui) = ui.as_mut() {
            let view = PanelView::capture(state, frame_loop.perf());
            let (commands, overlay) = ui.run(window, &view, state.viewport.pixel_ratio() as f32);
            for command in commands {
                let outcome = PanelBridge::apply(state, command);
                if let Some(message) = outcome.advisory {
                    ui.show_advisory(message);
                }
            }
            renderer.set_overlay(overlay);
            pointer_captured = ui.wants_pointer();
        }

        let controller: Option<&dyn Controller> = if pointer_captured { None } else { Some(&*input) };
        let outcome = frame_loop.tick(state, controller, renderer);
        input.reset_deltas();

        if let FrameOutcome::Stopped(err) = outcome {
            self.fail(event_loop, anyhow::Error::new(err).context("frame loop stopped"));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let mut consumed = false;
        if let (Some(ui), Some(window)) = (&mut self.ui, &self.window) {
            consumed = ui.on_window_event(window, &event);
        }
        // Releases always reach the orbit input so a drag never sticks.
        let release = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            }
        );
        if !consumed || release {
            self.input.process_event(&event);
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(state), Some(renderer)) = (&mut self.state, &mut self.renderer) {
                    state.apply_resize(size.width, size.height, renderer);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let (Some(state), Some(renderer)) = (&mut self.state, &mut self.renderer) {
                    state.apply_scale_factor(scale_factor, renderer);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = SceneConfig::load(&cli).context("loading configuration")?;
    let textures = SceneTextures::load(&config.assets).context("loading textures")?;

    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut app = App::new(config, textures);

    log::info!("Scatter scene - drag to orbit, wheel to zoom, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
