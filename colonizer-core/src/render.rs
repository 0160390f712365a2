//! Frame rendering: a pure mapping from growth state to drawing commands.
//!
//! [`draw_frame`] holds no state between frames and never mutates its input.
//! Hosts implement [`Surface`] for their canvas; tests record into a
//! `Vec<DrawCommand>`.

use glam::Vec2;

use crate::{
    tree::{self, Node, TreeRecord},
    types::Point,
};

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

pub const BACKGROUND: Color = Color::rgb(0x11, 0x11, 0x11);
pub const ATTRACTOR_COLOR: Color = Color::WHITE;
pub const ATTRACTOR_RADIUS: f32 = 2.0;
pub const HOVER_RADIUS: f32 = 4.5;
pub const EDGE_COLOR: Color = Color::WHITE;
pub const EDGE_WIDTH: f32 = 3.0;

/// A drawing target.
pub trait Surface {
    /// Fills the whole `size` area with `color`.
    fn clear(&mut self, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
    fn line_segment(&mut self, from: Point, to: Point, width: f32, color: Color);
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        size: Vec2,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    },
}

impl Surface for Vec<DrawCommand> {
    fn clear(&mut self, size: Vec2, color: Color) {
        self.push(DrawCommand::Clear { size, color });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn line_segment(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

/// Everything one frame depends on.
#[derive(Clone, Copy, Debug)]
pub struct FrameState<'a> {
    pub viewport: Vec2,
    /// Vertical translation applied to everything drawn after the clear.
    pub shift: f32,
    pub attractors: &'a [Point],
    /// Index into `attractors` under the pointer, if any.
    pub hover: Option<usize>,
    pub running: bool,
    pub live_nodes: &'a [Node],
    pub saved_trees: &'a [TreeRecord],
    /// Show only the most recently finished tree.
    pub collapsed: bool,
}

/// Draws one frame of `state` onto `surface`.
///
/// The hovered attractor is enlarged only while no run is active. Tree
/// edges come from the live nodes while running, otherwise from the last
/// saved tree when collapsed, otherwise from every visible saved tree.
pub fn draw_frame(state: &FrameState<'_>, surface: &mut impl Surface) {
    surface.clear(state.viewport, BACKGROUND);

    let offset = Vec2::new(0.0, state.shift);
    let hover = if state.running { None } else { state.hover };

    for (i, &p) in state.attractors.iter().enumerate() {
        let radius = if hover == Some(i) {
            HOVER_RADIUS
        } else {
            ATTRACTOR_RADIUS
        };
        surface.fill_circle(p + offset, radius, ATTRACTOR_COLOR);
    }

    if state.running {
        draw_edges(surface, state.live_nodes, offset);
    } else if state.collapsed
        && let Some(last) = state.saved_trees.last()
    {
        draw_edges(surface, &last.nodes, offset);
    } else {
        for t in state.saved_trees.iter().filter(|t| t.visible) {
            draw_edges(surface, &t.nodes, offset);
        }
    }
}

fn draw_edges(surface: &mut impl Surface, nodes: &[Node], offset: Vec2) {
    for (from, to) in tree::edges(nodes) {
        surface.line_segment(from + offset, to + offset, EDGE_WIDTH, EDGE_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(id: u64, start: Point, visible: bool) -> TreeRecord {
        TreeRecord {
            id,
            seed: start,
            nodes: vec![
                Node::new_root(start),
                Node::new_child(start + Vec2::X, 0),
                Node::new_child(start + Vec2::new(2.0, 0.0), 1),
            ],
            killed_attractors: Vec::new(),
            visible,
        }
    }

    fn state<'a>(
        attractors: &'a [Point],
        live: &'a [Node],
        saved: &'a [TreeRecord],
    ) -> FrameState<'a> {
        FrameState {
            viewport: Vec2::new(320.0, 200.0),
            shift: 0.0,
            attractors,
            hover: None,
            running: false,
            live_nodes: live,
            saved_trees: saved,
            collapsed: false,
        }
    }

    fn lines(cmds: &[DrawCommand]) -> Vec<(Point, Point)> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    fn circles(cmds: &[DrawCommand]) -> Vec<(Point, f32)> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_state_only_clears() {
        let mut cmds = Vec::new();
        draw_frame(&state(&[], &[], &[]), &mut cmds);
        assert_eq!(
            cmds,
            vec![DrawCommand::Clear {
                size: Vec2::new(320.0, 200.0),
                color: BACKGROUND
            }]
        );
    }

    #[test]
    fn hovered_attractor_grows_only_when_idle() {
        let pts = [Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0)];
        let mut s = state(&pts, &[], &[]);
        s.hover = Some(1);

        let mut cmds = Vec::new();
        draw_frame(&s, &mut cmds);
        assert_eq!(
            circles(&cmds),
            vec![(pts[0], ATTRACTOR_RADIUS), (pts[1], HOVER_RADIUS)]
        );

        s.running = true;
        let mut cmds = Vec::new();
        draw_frame(&s, &mut cmds);
        assert!(circles(&cmds).iter().all(|&(_, r)| r == ATTRACTOR_RADIUS));
    }

    #[test]
    fn running_draws_live_nodes_only() {
        let live = chain(0, Vec2::new(50.0, 50.0), true).nodes;
        let saved = [chain(1, Vec2::ZERO, true)];
        let mut s = state(&[], &live, &saved);
        s.running = true;

        let mut cmds = Vec::new();
        draw_frame(&s, &mut cmds);
        let segs = lines(&cmds);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], (Vec2::new(50.0, 50.0), Vec2::new(51.0, 50.0)));
    }

    #[test]
    fn idle_draws_visible_saved_trees() {
        let saved = [
            chain(1, Vec2::ZERO, true),
            chain(2, Vec2::new(0.0, 10.0), false),
            chain(3, Vec2::new(0.0, 20.0), true),
        ];
        let mut cmds = Vec::new();
        draw_frame(&state(&[], &[], &saved), &mut cmds);

        let segs = lines(&cmds);
        assert_eq!(segs.len(), 4);
        assert!(segs.iter().all(|(from, _)| from.y != 10.0));
    }

    #[test]
    fn collapsed_draws_only_the_latest_tree() {
        let saved = [chain(1, Vec2::ZERO, true), chain(2, Vec2::new(0.0, 10.0), false)];
        let mut s = state(&[], &[], &saved);
        s.collapsed = true;

        let mut cmds = Vec::new();
        draw_frame(&s, &mut cmds);
        let segs = lines(&cmds);
        assert_eq!(segs.len(), 2);
        assert!(segs.iter().all(|(from, _)| from.y == 10.0));
    }

    #[test]
    fn shift_translates_attractors_and_edges() {
        let pts = [Vec2::new(3.0, 4.0)];
        let saved = [chain(1, Vec2::ZERO, true)];
        let mut s = state(&pts, &[], &saved);
        s.shift = -25.0;

        let mut cmds = Vec::new();
        draw_frame(&s, &mut cmds);

        assert_eq!(circles(&cmds), vec![(Vec2::new(3.0, -21.0), ATTRACTOR_RADIUS)]);
        assert_eq!(
            lines(&cmds)[0],
            (Vec2::new(0.0, -25.0), Vec2::new(1.0, -25.0))
        );
    }
}
