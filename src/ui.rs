use winit::window::Window;

use crate::core::PerfMonitor;
use crate::math::Color;
use crate::panel::{PanelCommand, WireframeTarget};
use crate::scene::{Palette, PaletteSlot};
use crate::state::AppState;

pub const PANEL_WIDTH: f32 = 300.0;

/// Tessellated egui output for one frame, ready for the renderer.
pub struct OverlayFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// What the panel shows; a snapshot taken before the UI runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub palette: Palette,
    pub wireframe: [(WireframeTarget, bool); 3],
    pub fps: f32,
    pub frame_ms: f32,
    pub objects: usize,
    pub populate_count: u32,
}

impl PanelView {
    pub fn capture(state: &AppState, perf: &PerfMonitor) -> Self {
        let wireframe = WireframeTarget::ALL.map(|t| (t, state.materials.get(t.material()).wireframe));
        Self {
            palette: state.palette,
            wireframe,
            fps: perf.fps(),
            frame_ms: perf.frame_ms(),
            objects: state.store.len(),
            populate_count: state.counter.count(),
        }
    }
}

/// Stats label, tweak panel and advisory notice.
#[derive(Debug, Default)]
pub struct PanelUi {
    advisory: Option<&'static str>,
}

impl PanelUi {
    pub fn show_advisory(&mut self, message: &'static str) {
        self.advisory = Some(message);
    }

    pub fn advisory(&self) -> Option<&'static str> {
        self.advisory
    }

    /// Draws everything and returns the commands the user issued.
    pub fn draw(&mut self, ctx: &egui::Context, view: &PanelView) -> Vec<PanelCommand> {
        let mut commands = Vec::new();

        egui::Window::new("Stats")
            .title_bar(false)
            .resizable(false)
            .fixed_pos(egui::pos2(10.0, 10.0))
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("{:.0} FPS", view.fps))
                        .size(20.0)
                        .color(egui::Color32::from_rgb(74, 158, 255)),
                );
                ui.label(
                    egui::RichText::new(format!("{:.2} ms", view.frame_ms))
                        .size(12.0)
                        .color(egui::Color32::GRAY),
                );
                ui.monospace(format!("Objects: {}", view.objects));
            });

        egui::Window::new("Controls")
            .default_open(false)
            .resizable(false)
            .default_width(PANEL_WIDTH)
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.set_width(PANEL_WIDTH);
                egui::CollapsingHeader::new("Color").default_open(true).show(ui, |ui| {
                    for slot in PaletteSlot::ALL {
                        let mut rgb = view.palette.get(slot).to_array();
                        ui.horizontal(|ui| {
                            ui.label(slot.label());
                            if ui.color_edit_button_srgb(&mut rgb).changed() {
                                commands.push(PanelCommand::SetPaletteColor {
                                    slot,
                                    color: Color::from_array(rgb),
                                });
                            }
                        });
                    }
                });

                egui::CollapsingHeader::new("Wireframe").default_open(true).show(ui, |ui| {
                    for (target, enabled) in view.wireframe {
                        let mut value = enabled;
                        if ui.checkbox(&mut value, target.label()).changed() {
                            commands.push(PanelCommand::SetWireframe { target, enabled: value });
                        }
                    }
                });

                ui.separator();
                if ui.button("Reset Color (Button)").clicked() {
                    commands.push(PanelCommand::ResetColor);
                }
                if ui.button("Populate (Button)").clicked() {
                    commands.push(PanelCommand::Populate);
                }
                ui.weak(format!("populated {} times", view.populate_count));
            });

        if let Some(message) = self.advisory {
            let mut open = true;
            let mut dismissed = false;
            egui::Window::new("Advisory")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(255, 200, 100)));
                    dismissed = ui.button("OK").clicked();
                });
            if !open || dismissed {
                self.advisory = None;
            }
        }

        commands
    }
}

/// Rasterizes and lays out the UI at `pixels_per_point` instead of the
/// window's scale factor. Pointer input stays in points either way.
pub fn override_pixels_per_point(raw_input: &mut egui::RawInput, pixels_per_point: f32) {
    raw_input
        .viewports
        .entry(raw_input.viewport_id)
        .or_default()
        .native_pixels_per_point = Some(pixels_per_point);
}

/// egui context, winit integration and the panel.
pub struct UiLayer {
    ctx: egui::Context,
    state: egui_winit::State,
    panel: PanelUi,
}

impl UiLayer {
    pub fn new(window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        Self {
            ctx,
            state,
            panel: PanelUi::default(),
        }
    }

    /// Returns true when egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Pointer is over a panel or dragging a widget.
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    pub fn show_advisory(&mut self, message: &'static str) {
        self.panel.show_advisory(message);
    }

    /// Runs one UI frame. `pixels_per_point` is the render surface's scale,
    /// which may be below the window's when the pixel ratio is clamped; the
    /// font atlas and tessellation both use it.
    pub fn run(
        &mut self,
        window: &Window,
        view: &PanelView,
        pixels_per_point: f32,
    ) -> (Vec<PanelCommand>, OverlayFrame) {
        let mut raw_input = self.state.take_egui_input(window);
        override_pixels_per_point(&mut raw_input, pixels_per_point);
        let ctx = self.ctx.clone();
        let panel = &mut self.panel;
        let mut commands = Vec::new();
        let full_output = ctx.run(raw_input, |ctx| {
            commands = panel.draw(ctx, view);
        });

        self.state.handle_platform_output(window, full_output.platform_output);
        let pixels_per_point = full_output.pixels_per_point;
        let primitives = ctx.tessellate(full_output.shapes, pixels_per_point);
        let overlay = OverlayFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point,
        };
        (commands, overlay)
    }
}
