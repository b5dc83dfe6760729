use std::f32::consts::TAU;

use cgmath::Deg;
use quad_ngin::{
    data_structures::{
        camera::{Camera, Projection},
        transform::Transform,
    },
    math::{Matrix4x4, Vector3},
};

const FRAMES: usize = 120;
const EPSILON: f32 = 1e-4;

fn camera() -> Camera {
    Camera::new(
        Transform::at(Vector3::new(0.0, 0.0, -5.0)),
        Projection::new(1280, 720, Deg(45.0), 0.1, 100.0),
    )
}

/// Advances `rotate.y` by `speed` every frame, exactly like the render loop.
fn run_frames(speed: f32) -> Vec<(f32, Matrix4x4)> {
    let camera = camera();
    let mut object = Transform::default();
    (0..FRAMES)
        .map(|_| {
            object.rotate.y += speed;
            let wvp = camera.world_view_projection(&object).compose();
            (object.rotate.y, wvp)
        })
        .collect()
}

#[test]
fn wvp_sequence_is_always_finite() {
    for speed in [0.03, 0.1, 1.0, TAU / 60.0] {
        for (frame, (_, wvp)) in run_frames(speed).iter().enumerate() {
            assert!(wvp.is_finite(), "frame {frame} with speed {speed}: {wvp:?}");
        }
    }
}

#[test]
fn wvp_is_periodic_in_the_rotation_angle() {
    let camera = camera();
    for (angle, wvp) in run_frames(0.03) {
        let shifted = Transform {
            rotate: Vector3::new(0.0, angle + TAU, 0.0),
            ..Transform::default()
        };
        let expected = camera.world_view_projection(&shifted).compose();
        assert!(wvp.approx_eq(&expected, EPSILON), "angle {angle}");
    }
}

#[test]
fn full_turn_repeats_the_sequence() {
    // 60 frames per turn, so frame k and k + 60 show the same pose
    let frames = run_frames(TAU / 60.0);
    for k in 0..FRAMES - 60 {
        assert!(
            frames[k].1.approx_eq(&frames[k + 60].1, EPSILON),
            "frame {k} vs {}",
            k + 60
        );
    }
}

#[test]
fn rotation_changes_the_matrix_every_frame() {
    let frames = run_frames(0.03);
    for pair in frames.windows(2) {
        assert!(!pair[0].1.approx_eq(&pair[1].1, 1e-6));
    }
}
