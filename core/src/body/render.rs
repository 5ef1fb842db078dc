//! Skeleton → draw commands

use crate::render::{CommandBuffer, DrawCommand, Paint, Path2D, RenderSurface, Rgba};

use super::{BodyConfig, Fin, Segment, Skeleton};

/// Per-part paints, resolved once from the body colours
struct Paints {
    body: Paint,
    fin: Paint,
    other: Paint,
}

impl Paints {
    fn new(config: &BodyConfig) -> Self {
        let base = Rgba::rgb(config.color);
        Self {
            body: Paint::fill(base.with_alpha(config.body_alpha)),
            fin: Paint::fill(base.with_alpha(config.fin_alpha)),
            other: Paint::fill(base.with_alpha(config.other_alpha)),
        }
    }
}

/// Record the fish outline as draw commands
pub fn render_skeleton(skeleton: &Skeleton, config: &BodyConfig) -> Vec<DrawCommand> {
    let mut buffer = CommandBuffer::new();
    draw_skeleton(skeleton, config, &mut buffer);
    buffer.into_commands()
}

/// Draw the fish onto `surface`.
///
/// Order matters for the translucent blend: head, fins, upper segment,
/// tail, lower segment, then the body panel on top.
pub fn draw_skeleton<S: RenderSurface + ?Sized>(
    skeleton: &Skeleton,
    config: &BodyConfig,
    surface: &mut S,
) {
    let paints = Paints::new(config);

    surface.draw_circle(skeleton.head, skeleton.head_radius, &paints.other);

    for fin in &skeleton.fins {
        surface.draw_closed_path(&fin_path(fin), &paints.fin);
    }

    let upper = &skeleton.upper;
    surface.draw_circle(upper.top, upper.top_radius, &paints.other);
    surface.draw_circle(upper.bottom, upper.bottom_radius, &paints.other);
    surface.draw_closed_path(&trapezoid(upper), &paints.other);

    let tail = &skeleton.tail;
    for triangle in [&tail.inner, &tail.outer] {
        let path = Path2D::move_to(triangle[0])
            .line_to(triangle[1])
            .line_to(triangle[2])
            .line_to(triangle[0]);
        surface.draw_closed_path(&path, &paints.other);
    }

    let lower = &skeleton.lower;
    surface.draw_circle(lower.bottom, lower.bottom_radius, &paints.other);
    surface.draw_closed_path(&trapezoid(lower), &paints.other);

    let body = &skeleton.body;
    let panel = Path2D::move_to(body.front_right)
        .quad_to(body.control_right, body.rear_right)
        .line_to(body.rear_left)
        .quad_to(body.control_left, body.front_left)
        .line_to(body.front_right);
    surface.draw_closed_path(&panel, &paints.body);
}

fn fin_path(fin: &Fin) -> Path2D {
    Path2D::move_to(fin.root)
        .quad_to(fin.control, fin.tip)
        .line_to(fin.root)
}

fn trapezoid(segment: &Segment) -> Path2D {
    Path2D::move_to(segment.top_right)
        .line_to(segment.top_left)
        .line_to(segment.bottom_left)
        .line_to(segment.bottom_right)
}
