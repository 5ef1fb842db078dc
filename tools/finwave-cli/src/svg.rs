//! SVG render surface

use std::fmt::Write;

use finwave_core::geometry::Rect;
use finwave_core::render::PathSegment;
use finwave_core::{Paint, PaintStyle, Path2D, RenderSurface};
use glam::Vec2;

/// Writes draw calls as SVG elements; layers become `<g opacity>` groups
pub struct SvgSurface {
    width: f32,
    height: f32,
    body: String,
    depth: usize,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            depth: 0,
        }
    }

    /// Open polyline or curve, used for debug overlays
    pub fn draw_open_path(&mut self, path: &Path2D, paint: &Paint) {
        let d = path_data(path, false);
        let attrs = paint_attrs(paint);
        self.element(format_args!("<path d=\"{d}\" {attrs}/>"));
    }

    /// Close any unbalanced layers and return the document
    pub fn finish(mut self) -> String {
        while self.depth > 0 {
            self.end_layer();
        }
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = num(self.width),
            h = num(self.height),
            body = self.body,
        )
    }

    fn element(&mut self, args: std::fmt::Arguments<'_>) {
        for _ in 0..=self.depth {
            self.body.push_str("  ");
        }
        // Writing into a String cannot fail
        let _ = self.body.write_fmt(args);
        self.body.push('\n');
    }
}

impl RenderSurface for SvgSurface {
    fn begin_layer(&mut self, bounds: Rect, alpha: u8) {
        let opacity = num(f32::from(alpha) / 255.0);
        self.element(format_args!(
            "<g opacity=\"{opacity}\" data-bounds=\"{} {} {} {}\">",
            num(bounds.min.x),
            num(bounds.min.y),
            num(bounds.width()),
            num(bounds.height()),
        ));
        self.depth += 1;
    }

    fn end_layer(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        self.element(format_args!("</g>"));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        let attrs = paint_attrs(paint);
        self.element(format_args!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {attrs}/>",
            num(center.x),
            num(center.y),
            num(radius),
        ));
    }

    fn draw_closed_path(&mut self, path: &Path2D, paint: &Paint) {
        let d = path_data(path, true);
        let attrs = paint_attrs(paint);
        self.element(format_args!("<path d=\"{d}\" {attrs}/>"));
    }
}

fn paint_attrs(paint: &Paint) -> String {
    let c = paint.color;
    let rgb = format!("rgb({},{},{})", c.r, c.g, c.b);
    let opacity = num(c.opacity());
    match paint.style {
        PaintStyle::Fill => format!("fill=\"{rgb}\" fill-opacity=\"{opacity}\""),
        PaintStyle::Stroke { width } => format!(
            "fill=\"none\" stroke=\"{rgb}\" stroke-opacity=\"{opacity}\" stroke-width=\"{}\"",
            num(width)
        ),
    }
}

fn path_data(path: &Path2D, close: bool) -> String {
    let mut d = format!("M{} {}", num(path.start.x), num(path.start.y));
    for segment in &path.segments {
        match *segment {
            PathSegment::LineTo(to) => {
                let _ = write!(d, " L{} {}", num(to.x), num(to.y));
            }
            PathSegment::QuadTo { control, to } => {
                let _ = write!(
                    d,
                    " Q{} {} {} {}",
                    num(control.x),
                    num(control.y),
                    num(to.x),
                    num(to.y)
                );
            }
            PathSegment::CubicTo {
                control1,
                control2,
                to,
            } => {
                let _ = write!(
                    d,
                    " C{} {} {} {} {} {}",
                    num(control1.x),
                    num(control1.y),
                    num(control2.x),
                    num(control2.y),
                    num(to.x),
                    num(to.y)
                );
            }
        }
    }
    if close {
        d.push_str(" Z");
    }
    d
}

/// Two decimals, trailing zeros trimmed
fn num(value: f32) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finwave_core::{FinwaveConfig, Rgba, Simulation};

    #[test]
    fn test_num_trims() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(2.346), "2.35");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_circle_and_stroke() {
        let mut svg = SvgSurface::new(100.0, 50.0);
        let paint = Paint::stroke(Rgba::rgb([0, 125, 251]).with_alpha(51), 8.0);
        svg.draw_circle(Vec2::new(10.0, 20.0), 5.0, &paint);
        let doc = svg.finish();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("viewBox=\"0 0 100 50\""));
        assert!(doc.contains(
            "<circle cx=\"10\" cy=\"20\" r=\"5\" fill=\"none\" stroke=\"rgb(0,125,251)\" stroke-opacity=\"0.2\" stroke-width=\"8\"/>"
        ));
    }

    #[test]
    fn test_closed_path_data() {
        let mut svg = SvgSurface::new(10.0, 10.0);
        let path = Path2D::move_to(Vec2::ZERO)
            .quad_to(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0))
            .line_to(Vec2::new(5.0, 6.0));
        svg.draw_closed_path(&path, &Paint::fill(Rgba::rgb([1, 2, 3])));
        let doc = svg.finish();
        assert!(doc.contains("d=\"M0 0 Q1 2 3 4 L5 6 Z\""));
    }

    #[test]
    fn test_unbalanced_layers_are_closed() {
        let mut svg = SvgSurface::new(10.0, 10.0);
        svg.begin_layer(Rect::from_size(10.0, 10.0), 240);
        let doc = svg.finish();
        assert_eq!(doc.matches("<g ").count(), doc.matches("</g>").count());
    }

    #[test]
    fn test_frame_renders_into_one_layer() {
        let sim = Simulation::new(FinwaveConfig::default()).unwrap();
        let mut svg = SvgSurface::new(1080.0, 1920.0);
        sim.draw(&mut svg).unwrap();
        let doc = svg.finish();
        assert_eq!(doc.matches("<g ").count(), 1);
        assert_eq!(doc.matches("<circle").count(), 4);
        assert_eq!(doc.matches("<path").count(), 7);
    }
}
