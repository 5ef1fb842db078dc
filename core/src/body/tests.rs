//! Body kinematics tests

use glam::Vec2;

use super::*;
use crate::render::{DrawCommand, PaintStyle};

fn kinematics() -> BodyKinematics {
    BodyKinematics::new(BodyConfig::default())
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

const ANCHOR: Vec2 = Vec2::new(125.4, 125.4);

// ============================================================================
// Skeleton geometry
// ============================================================================

#[test]
fn test_compute_is_deterministic() {
    let body = kinematics();
    for phase in [0.0, 13.7, 999.0, 53_999.5] {
        let a = body.compute_skeleton(ANCHOR, 37.0, phase, 2.0, 0.6).unwrap();
        let b = body.compute_skeleton(ANCHOR, 37.0, phase, 2.0, 0.6).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_head_sits_half_a_body_ahead_of_anchor() {
    let body = kinematics();
    let skeleton = body.compute_skeleton(ANCHOR, 90.0, 0.0, 1.0, 0.0).unwrap();
    // Heading 90 is straight up the screen
    assert!(close(skeleton.head, ANCHOR - Vec2::new(0.0, 48.0)));
}

#[test]
fn test_head_ignores_wobble() {
    let body = kinematics();
    let calm = body.compute_skeleton(ANCHOR, 90.0, 0.0, 1.0, 0.0).unwrap();
    let wobbling = body.compute_skeleton(ANCHOR, 90.0, 75.0, 1.0, 0.0).unwrap();
    assert_eq!(calm.head, wobbling.head);
    assert_ne!(calm.body_angle, wobbling.body_angle);
}

#[test]
fn test_body_angle_wobble_is_bounded_by_two_degrees() {
    let body = kinematics();
    for step in 0..360 {
        let phase = step as f32 * 3.3;
        let skeleton = body.compute_skeleton(ANCHOR, 10.0, phase, 2.0, 0.0).unwrap();
        assert!((skeleton.body_angle - 10.0).abs() <= 2.0 + 1e-4);
    }
}

#[test]
fn test_phase_zero_layout() {
    // At phase 0: head wobble 0, upper segment +15°, lower segment +0°
    let body = kinematics();
    let skeleton = body.compute_skeleton(Vec2::ZERO, 90.0, 0.0, 1.0, 0.0).unwrap();
    assert_eq!(skeleton.body_angle, 90.0);
    assert!((skeleton.upper.angle - 105.0).abs() < 1e-4);
    assert!((skeleton.lower.angle - 105.0).abs() < 1e-4);

    // Rear of the body panel lies one body length behind the head
    assert!(close(skeleton.body.rear_center, Vec2::new(0.0, -48.0 + 96.0)));
    assert_eq!(skeleton.upper.top, skeleton.body.rear_center);
}

#[test]
fn test_segments_chain_and_taper() {
    let body = kinematics();
    let skeleton = body.compute_skeleton(ANCHOR, 45.0, 321.0, 1.0, 0.0).unwrap();
    let cfg = body.config();

    assert_eq!(skeleton.lower.top, skeleton.upper.bottom);
    assert!((skeleton.upper.top_radius - cfg.head_radius * 0.7).abs() < 1e-5);
    assert!((skeleton.upper.bottom_radius - skeleton.upper.top_radius * 0.6).abs() < 1e-5);
    assert!((skeleton.lower.top_radius - skeleton.upper.top_radius * 0.6).abs() < 1e-5);
    assert!((skeleton.lower.bottom_radius - skeleton.lower.top_radius * 0.4).abs() < 1e-5);

    let upper_len = skeleton.upper.top.distance(skeleton.upper.bottom);
    assert!((upper_len - skeleton.upper.top_radius * 1.6).abs() < 1e-3);
    let lower_len = skeleton.lower.top.distance(skeleton.lower.bottom);
    assert!((lower_len - skeleton.lower.top_radius * 3.1).abs() < 1e-3);
}

#[test]
fn test_segment_corners_are_perpendicular_to_axis() {
    let body = kinematics();
    let skeleton = body.compute_skeleton(ANCHOR, 200.0, 77.0, 1.0, 0.0).unwrap();
    let seg = &skeleton.upper;
    let axis = seg.bottom - seg.top;
    let across = seg.top_left - seg.top_right;
    assert!(axis.dot(across).abs() < 1e-2);
    assert!((across.length() - 2.0 * seg.top_radius).abs() < 1e-3);
}

#[test]
fn test_tail_hangs_from_lower_segment() {
    let body = kinematics();
    let skeleton = body.compute_skeleton(ANCHOR, 0.0, 40.0, 1.0, 0.0).unwrap();
    assert_eq!(skeleton.tail.base, skeleton.lower.top);
    assert_eq!(skeleton.tail.outer[0], skeleton.tail.base);
    assert_eq!(skeleton.tail.inner[0], skeleton.tail.base);

    let outer_span = skeleton.tail.outer[1].distance(skeleton.tail.outer[2]);
    assert!((outer_span - 2.0 * skeleton.tail.half_width).abs() < 1e-3);
}

#[test]
fn test_tail_width_is_non_negative_and_bounded() {
    let body = kinematics();
    let cfg = body.config().clone();
    for step in 0..2000 {
        let phase = step as f32 * 0.77;
        for frequency in [1.0, 2.0] {
            let w = body.tail_half_width(phase, frequency);
            assert!(w >= cfg.head_radius / 5.0 - 1e-5);
            assert!(w <= cfg.tail_width_bound() + 1e-4);
        }
    }
}

#[test]
fn test_fins_mirror_at_zero_flutter() {
    let body = kinematics();
    // Heading 90 points up, so the fish's axis is vertical through the head
    let skeleton = body.compute_skeleton(Vec2::ZERO, 90.0, 0.0, 1.0, 0.0).unwrap();
    let [right, left] = skeleton.fins;
    assert_eq!(right.side, FinSide::Right);
    assert_eq!(left.side, FinSide::Left);
    let head_x = skeleton.head.x;
    assert!(right.root.x > head_x);
    assert!(left.root.x < head_x);
    assert!(((right.root.x - head_x) + (left.root.x - head_x)).abs() < 1e-3);
    assert!((right.tip.y - left.tip.y).abs() < 1e-3);
    assert!((right.control.y - left.control.y).abs() < 1e-3);
}

#[test]
fn test_fin_flutter_moves_tips_only() {
    let body = kinematics();
    let still = body.compute_skeleton(ANCHOR, 90.0, 10.0, 1.0, 0.0).unwrap();
    let flutter = body.compute_skeleton(ANCHOR, 90.0, 10.0, 1.0, 12.0).unwrap();
    for (a, b) in still.fins.iter().zip(flutter.fins.iter()) {
        assert_eq!(a.root, b.root);
        assert_ne!(a.tip, b.tip);
        let len = body.config().fin_length();
        assert!((b.root.distance(b.tip) - len).abs() < 1e-3);
    }
    assert_eq!(still.body, flutter.body);
}

#[test]
fn test_non_finite_inputs_are_rejected() {
    let body = kinematics();
    assert!(matches!(
        body.compute_skeleton(ANCHOR, f32::NAN, 0.0, 1.0, 0.0),
        Err(KinematicsError::NonFinite { name: "heading", .. })
    ));
    assert!(matches!(
        body.compute_skeleton(ANCHOR, 0.0, f32::INFINITY, 1.0, 0.0),
        Err(KinematicsError::NonFinite { name: "phase", .. })
    ));
    assert!(body
        .compute_skeleton(Vec2::new(f32::NAN, 0.0), 0.0, 0.0, 1.0, 0.0)
        .is_err());
    assert!(body
        .compute_skeleton(ANCHOR, 0.0, 0.0, f32::NEG_INFINITY, 0.0)
        .is_err());
}

#[test]
fn test_config_derived_dimensions() {
    let cfg = BodyConfig::default();
    assert!((cfg.body_length() - 96.0).abs() < 1e-4);
    assert!((cfg.fin_length() - 39.0).abs() < 1e-4);
    assert!((cfg.pivot_offset().x - 125.4).abs() < 1e-3);
}

#[test]
fn test_default_fin_flutter_peaks_at_one_degree() {
    let cfg = BodyConfig::default();
    assert_eq!(cfg.fin_flutter_degrees, 1.0);

    let body = BodyKinematics::new(cfg);
    let still = body.compute_skeleton(ANCHOR, 90.0, 0.0, 1.0, 0.0).unwrap();
    let peak = body.compute_skeleton(ANCHOR, 90.0, 0.0, 1.0, 1.0).unwrap();
    // A one-degree swing of a 39-unit fin moves its tip well under one unit
    for (a, b) in still.fins.iter().zip(peak.fins.iter()) {
        let moved = a.tip.distance(b.tip);
        assert!(moved > 0.0 && moved < 1.0);
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_emits_parts_in_order() {
    let body = kinematics();
    let skeleton = body.compute_skeleton(ANCHOR, 90.0, 5.0, 1.0, 0.0).unwrap();
    let commands = render_skeleton(&skeleton, body.config());

    assert_eq!(commands.len(), 11);
    assert!(matches!(
        commands[0],
        DrawCommand::Circle { center, radius, .. } if center == skeleton.head && radius == 30.0
    ));
    assert!(matches!(commands[1], DrawCommand::ClosedPath { .. }));
    assert!(matches!(commands[10], DrawCommand::ClosedPath { .. }));
}

#[test]
fn test_render_uses_per_part_alpha() {
    let body = kinematics();
    let cfg = body.config();
    let skeleton = body.compute_skeleton(ANCHOR, 90.0, 5.0, 1.0, 0.0).unwrap();
    let commands = render_skeleton(&skeleton, cfg);

    let alpha = |c: &DrawCommand| match c {
        DrawCommand::Circle { paint, .. } | DrawCommand::ClosedPath { paint, .. } => {
            paint.color.a
        }
        _ => panic!("unexpected layer command"),
    };

    assert_eq!(alpha(&commands[0]), cfg.other_alpha);
    assert_eq!(alpha(&commands[1]), cfg.fin_alpha);
    assert_eq!(alpha(&commands[2]), cfg.fin_alpha);
    assert_eq!(alpha(&commands[10]), cfg.body_alpha);
    assert!(cfg.body_alpha > cfg.fin_alpha);

    for command in &commands {
        if let DrawCommand::Circle { paint, .. } | DrawCommand::ClosedPath { paint, .. } = command {
            assert_eq!(paint.style, PaintStyle::Fill);
            assert_eq!((paint.color.r, paint.color.g, paint.color.b), (244, 92, 71));
        }
    }
}

#[test]
fn test_render_body_panel_outline() {
    let body = kinematics();
    let skeleton = body.compute_skeleton(ANCHOR, 30.0, 5.0, 1.0, 0.0).unwrap();
    let commands = render_skeleton(&skeleton, body.config());
    let DrawCommand::ClosedPath { path, .. } = &commands[10] else {
        panic!("body panel must be a path");
    };
    let vertices: Vec<Vec2> = path.vertices().collect();
    let panel = &skeleton.body;
    assert_eq!(
        vertices,
        vec![
            panel.front_right,
            panel.rear_right,
            panel.rear_left,
            panel.front_left,
            panel.front_right
        ]
    );
    assert!(path.has_curves());
}
