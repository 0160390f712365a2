//! Interactive space-colonization viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which hosts an [`Orchestrator`] and
//! implements [`eframe::App`]: it owns the per-frame schedule, viewport
//! resizing, the collapse animation, and pointer interaction.

use colonizer_core::{
    Command, Config, ConfigError, Orchestrator,
    attractor::AttractorSet,
    render::{self, Color, Surface},
    types::Point,
};
use eframe::App;
use glam::Vec2;
use rand::rng;

use crate::shift::{SHIFT_DURATION, ShiftAnimation, target_shift};

/// Pointer tolerance, in pixels, for hovering an attractor.
const HOVER_TOLERANCE: f32 = 12.0;
/// Candidates per active sample when scattering attractors.
const SCATTER_ATTEMPTS: usize = 140;
/// Seconds after the first run starts before the view collapses on its own.
const INTRO_SECONDS: f64 = 4.0;

/// Adapts an [`egui::Painter`] to the core renderer's [`Surface`].
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl PainterSurface<'_> {
    fn to_screen(&self, p: Point) -> egui::Pos2 {
        world_to_screen(p, self.origin)
    }
}

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Converts a canvas position to screen space; the canvas origin is its top-left corner.
fn world_to_screen(p: Point, origin: egui::Pos2) -> egui::Pos2 {
    egui::pos2(origin.x + p.x, origin.y + p.y)
}

/// Inverse of [`world_to_screen`].
fn screen_to_world(p: egui::Pos2, origin: egui::Pos2) -> Point {
    Vec2::new(p.x - origin.x, p.y - origin.y)
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self, size: Vec2, color: Color) {
        let rect = egui::Rect::from_min_size(self.origin, egui::vec2(size.x, size.y));
        self.painter.rect_filled(rect, 0.0, color32(color));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.painter
            .circle_filled(self.to_screen(center), radius, color32(color));
    }

    fn line_segment(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            egui::Stroke::new(width, color32(color)),
        );
    }
}

/// Main application state for the viewer.
///
/// Each frame:
/// 1. Detects viewport resizes and regrows the pattern for the new size.
/// 2. Handles hover, clicks, and the intro timeout.
/// 3. Advances growth by exactly one iteration.
/// 4. Renders through [`render::draw_frame`].
///
/// ### Fields
/// - `orch` - Growth lifecycle, attractors, and finished trees.
/// - `config_override` - Parameters loaded from a file; used instead of the
///   viewport-derived ones when present.
/// - `rng` - Random number generator used for scattering attractors.
/// - `viewport` - Canvas size seen on the previous frame.
/// - `shift` - Vertical shift animation toward the collapsed layout.
/// - `hover` - Attractor under the pointer, if any.
/// - `intro_deadline` - Time at which the intro run is cut short and the view collapses.
/// - `intro_done` - Whether the intro timeout has already fired.
pub struct Viewer {
    orch: Orchestrator,
    config_override: Option<Config>,
    rng: rand::rngs::ThreadRng,
    viewport: Vec2,
    shift: ShiftAnimation,
    hover: Option<usize>,
    intro_deadline: Option<f64>,
    intro_done: bool,
}

impl Viewer {
    /// Creates an idle viewer; the first frame sizes the field and starts growth.
    ///
    /// ### Returns
    /// An error if `config_override` fails validation.
    pub fn new(config_override: Option<Config>) -> Result<Self, ConfigError> {
        let cfg = config_override.clone().unwrap_or_default();
        let orch = Orchestrator::new(cfg)?.with_on_finish(|tree| {
            log::info!(
                "tree {} finished: {} nodes, {} attractors consumed",
                tree.id,
                tree.nodes.len(),
                tree.killed_attractors.len()
            );
        });

        Ok(Self {
            orch,
            config_override,
            rng: rng(),
            viewport: Vec2::ZERO,
            shift: ShiftAnimation::new(SHIFT_DURATION),
            hover: None,
            intro_deadline: None,
            intro_done: false,
        })
    }

    /// Regenerates the attractor field for a new canvas size and restarts growth.
    ///
    /// The parameters are re-derived from the size unless a config file
    /// was supplied. While collapsed, only the visible band is filled.
    fn on_resize(&mut self, size: Vec2, now: f64) {
        self.viewport = size;

        let cfg = self
            .config_override
            .clone()
            .unwrap_or_else(|| Config::for_viewport(size.x, size.y));
        if let Err(err) = self.orch.reconfigure(cfg) {
            log::error!("keeping previous parameters: {err}");
        }

        self.regrow(now);
        self.shift
            .retarget(target_shift(self.orch.is_collapsed(), size.y), now);
    }

    /// Scatters a fresh field, ends any run, and starts again from the centre.
    fn regrow(&mut self, now: f64) {
        let size = self.viewport;
        let field_height = if self.orch.is_collapsed() {
            (size.y * 0.35).round()
        } else {
            size.y
        };
        let radius = (size.x / 75.0).floor().min((size.y / 150.0).floor()).max(1.0);
        let field =
            AttractorSet::poisson_disk(size.x, field_height, radius, SCATTER_ATTEMPTS, &mut self.rng);
        log::debug!("scattered {} attractors at spacing {radius}", field.len());

        self.orch.send(Command::Stop);
        self.orch.send(Command::ReplaceAttractors(field.points));
        self.orch.send(Command::Start(size * 0.5));
        if self.intro_deadline.is_none() {
            self.intro_deadline = Some(now + INTRO_SECONDS);
        }
    }

    /// Ends the intro: drop unreached attractors and collapse.
    ///
    /// With the field emptied, the live run finishes on its next tick and
    /// its tree is kept for the collapsed view.
    fn finish_intro(&mut self, now: f64) {
        self.orch.send(Command::ClearAttractors);
        self.set_collapsed(true, now);
    }

    fn set_collapsed(&mut self, collapsed: bool, now: f64) {
        self.orch.send(Command::SetCollapsed(collapsed));
        self.shift
            .retarget(target_shift(collapsed, self.viewport.y), now);
    }

    /// Runs one growth tick, then resolves the pointer against the
    /// attractors that remain; a click on one while idle starts a run there.
    ///
    /// `pointer` is in unshifted canvas coordinates.
    fn advance(&mut self, pointer: Option<Point>, clicked: bool) {
        self.orch.tick();

        let attractors = self.orch.engine().attractors();
        self.hover = pointer.and_then(|p| attractors.nearest_within(p, HOVER_TOLERANCE));

        if clicked
            && !self.orch.is_running()
            && let Some(i) = self.hover
        {
            let seed = self.orch.engine().attractors().points[i];
            self.orch.send(Command::Start(seed));
        }
    }

    /// Builds the top panel (collapse, regrow, status).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let collapsed = self.orch.is_collapsed();
                if ui
                    .button(if collapsed { "Expand" } else { "Collapse" })
                    .clicked()
                {
                    self.set_collapsed(!collapsed, now);
                }

                if ui.button("Regrow").clicked() {
                    self.regrow(now);
                }

                if ui
                    .add_enabled(self.orch.is_running(), egui::Button::new("Stop"))
                    .clicked()
                {
                    self.orch.send(Command::Stop);
                }

                ui.separator();
                let engine = self.orch.engine();
                ui.label(format!("iteration = {}", engine.iteration()));
                ui.label(format!("nodes = {}", engine.nodes().len()));
                ui.label(format!("attractors = {}", engine.attractors().len()));
                ui.label(format!("trees = {}", self.orch.saved_trees().len()));
            });
        });
    }

    /// Builds the canvas: input handling, one growth tick, and the frame itself.
    fn ui_canvas(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                let size = Vec2::new(rect.width(), rect.height());
                if size != self.viewport && size.x > 0.0 && size.y > 0.0 {
                    self.on_resize(size, now);
                }

                if !self.intro_done
                    && let Some(deadline) = self.intro_deadline
                    && now >= deadline
                {
                    self.intro_done = true;
                    self.finish_intro(now);
                }

                let shift = self.shift.value(now);
                let pointer = response
                    .hover_pos()
                    .map(|p| screen_to_world(p, rect.min) - Vec2::new(0.0, shift));
                self.advance(pointer, response.clicked());

                let mut surface = PainterSurface {
                    painter: &painter,
                    origin: rect.min,
                };
                render::draw_frame(&self.orch.frame(size, shift, self.hover), &mut surface);

                if self.orch.is_running() || !self.shift.is_settled(now) {
                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds the panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_canvas(ctx);
    }
}
