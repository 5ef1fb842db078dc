//! Draw command recording and the render surface seam
//!
//! Geometry builders never talk to a canvas directly. They emit
//! [`DrawCommand`]s into a [`RenderSurface`]; the [`CommandBuffer`]
//! implementation records them so a frame can be inspected, serialized or
//! replayed onto a real backend later with [`replay`].
//!
//! Every command carries its own [`Paint`], captured at creation time, so
//! there is no shared paint state to save and restore between draws.

use glam::Vec2;
use serde::Serialize;

use crate::geometry::Rect;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque colour from an RGB triple
    pub const fn rgb([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same colour with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha as a 0.0-1.0 opacity
    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }
}

/// How a shape is painted
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PaintStyle {
    Fill,
    Stroke { width: f32 },
}

/// Immutable paint attached to a single draw command
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Paint {
    pub color: Rgba,
    pub style: PaintStyle,
}

impl Paint {
    pub const fn fill(color: Rgba) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
        }
    }

    pub const fn stroke(color: Rgba, width: f32) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke { width },
        }
    }
}

/// One segment of a path outline, continuing from the previous end point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathSegment {
    LineTo(Vec2),
    QuadTo { control: Vec2, to: Vec2 },
    CubicTo { control1: Vec2, control2: Vec2, to: Vec2 },
}

impl PathSegment {
    /// End point of this segment
    pub fn end(&self) -> Vec2 {
        match *self {
            PathSegment::LineTo(to)
            | PathSegment::QuadTo { to, .. }
            | PathSegment::CubicTo { to, .. } => to,
        }
    }
}

/// A path outline: a start point followed by line/curve segments.
///
/// Closed paths are implicitly closed back to `start` when filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path2D {
    pub start: Vec2,
    pub segments: Vec<PathSegment>,
}

impl Path2D {
    /// Begin a path at `start`
    pub fn move_to(start: Vec2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(mut self, to: Vec2) -> Self {
        self.segments.push(PathSegment::LineTo(to));
        self
    }

    pub fn quad_to(mut self, control: Vec2, to: Vec2) -> Self {
        self.segments.push(PathSegment::QuadTo { control, to });
        self
    }

    pub fn cubic_to(mut self, control1: Vec2, control2: Vec2, to: Vec2) -> Self {
        self.segments.push(PathSegment::CubicTo {
            control1,
            control2,
            to,
        });
        self
    }

    /// Start point followed by every segment end point
    pub fn vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        std::iter::once(self.start).chain(self.segments.iter().map(PathSegment::end))
    }

    /// Whether any segment is a curve
    pub fn has_curves(&self) -> bool {
        self.segments
            .iter()
            .any(|s| !matches!(s, PathSegment::LineTo(_)))
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Start an offscreen translucent layer; composited on the matching `EndLayer`
    BeginLayer { bounds: Rect, alpha: u8 },
    EndLayer,
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    ClosedPath { path: Path2D, paint: Paint },
}

/// Host drawing backend.
///
/// Layers nest: every `begin_layer` is matched by an `end_layer`, and shapes
/// drawn in between blend against each other before the whole layer is
/// composited at `alpha`.
pub trait RenderSurface {
    fn begin_layer(&mut self, bounds: Rect, alpha: u8);
    fn end_layer(&mut self);
    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn draw_closed_path(&mut self, path: &Path2D, paint: &Paint);
}

/// Records draw calls in submission order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Take ownership of the recorded commands
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl RenderSurface for CommandBuffer {
    fn begin_layer(&mut self, bounds: Rect, alpha: u8) {
        self.commands.push(DrawCommand::BeginLayer { bounds, alpha });
    }

    fn end_layer(&mut self) {
        self.commands.push(DrawCommand::EndLayer);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint: *paint,
        });
    }

    fn draw_closed_path(&mut self, path: &Path2D, paint: &Paint) {
        self.commands.push(DrawCommand::ClosedPath {
            path: path.clone(),
            paint: *paint,
        });
    }
}

/// Submit recorded commands to a surface in order
pub fn replay<S: RenderSurface + ?Sized>(commands: &[DrawCommand], surface: &mut S) {
    for command in commands {
        match command {
            DrawCommand::BeginLayer { bounds, alpha } => surface.begin_layer(*bounds, *alpha),
            DrawCommand::EndLayer => surface.end_layer(),
            DrawCommand::Circle {
                center,
                radius,
                paint,
            } => surface.draw_circle(*center, *radius, paint),
            DrawCommand::ClosedPath { path, paint } => surface.draw_closed_path(path, paint),
        }
    }
}
