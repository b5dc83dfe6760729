use cgmath::Deg;
use quad_ngin::{
    data_structures::{
        camera::{Camera, Projection},
        transform::Transform,
    },
    math::{
        AffineComposition, AffineStage, Matrix4x4, Vector3, Vector4, WorldViewProjection,
        make_affine_matrix, make_perspective_fov_matrix,
    },
};

const EPSILON: f32 = 1e-4;

fn demo_camera() -> Camera {
    Camera::new(
        Transform::at(Vector3::new(0.0, 0.0, -5.0)),
        Projection::new(1280, 720, Deg(45.0), 0.1, 100.0),
    )
}

#[test]
fn default_transform_is_identity_pose() {
    let transform = Transform::default();
    assert_eq!(transform.scale, Vector3::ONE);
    assert_eq!(transform.rotate, Vector3::ZERO);
    assert_eq!(transform.translate, Vector3::ZERO);
    assert_eq!(transform.world_matrix(), Matrix4x4::IDENTITY);
}

#[test]
fn world_matrix_uses_affine_constructor() {
    let transform = Transform::new(
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(0.1, 0.2, 0.3),
        Vector3::new(-1.0, 4.0, 9.0),
    );
    assert_eq!(
        transform.world_matrix(),
        make_affine_matrix(transform.scale, transform.rotate, transform.translate)
    );
}

#[test]
fn zero_scale_is_accepted() {
    let transform = Transform::new(Vector3::ZERO, Vector3::ZERO, Vector3::ZERO);
    assert!(transform.world_matrix().is_finite());
    assert_eq!(transform.world_matrix().determinant(), 0.0);
}

#[test]
fn affine_composition_lists_stages_in_order() {
    let scale = Vector3::new(2.0, 1.0, 1.0);
    let rotate = Vector3::new(0.0, 1.0, 0.0);
    let translate = Vector3::new(0.0, 0.0, 3.0);
    let composition = AffineComposition::scale_rotate_translate(scale, rotate, translate);

    assert_eq!(
        composition.stages(),
        &[
            AffineStage::Scale(scale),
            AffineStage::Rotate(rotate),
            AffineStage::Translate(translate)
        ]
    );
    let folded = composition
        .stages()
        .iter()
        .fold(Matrix4x4::IDENTITY, |acc, stage| acc * stage.matrix());
    assert_eq!(composition.matrix(), folded);
}

#[test]
fn view_matrix_inverts_camera_pose() {
    let camera = demo_camera();
    let view = camera.view_matrix();
    assert!(view
        .multiply(&camera.transform.world_matrix())
        .approx_eq(&Matrix4x4::IDENTITY, EPSILON));

    // the camera sits at z = -5, so the origin is 5 units in front of it
    let origin = view.transform_point(Vector4::new(0.0, 0.0, 0.0, 1.0));
    assert!(origin.approx_eq(&Vector4::new(0.0, 0.0, 5.0, 1.0), EPSILON));
}

#[test]
fn projection_tracks_viewport_aspect() {
    let mut projection = Projection::new(1280, 720, Deg(45.0), 0.1, 100.0);
    assert!((projection.aspect() - 1280.0 / 720.0).abs() < EPSILON);

    projection.resize(800, 800);
    assert!((projection.aspect() - 1.0).abs() < EPSILON);

    // minimized windows keep the previous aspect
    projection.resize(0, 600);
    assert!((projection.aspect() - 1.0).abs() < EPSILON);
    assert!(projection.matrix().is_finite());
}

#[test]
fn projection_matrix_uses_radians() {
    let projection = Projection::new(1, 1, Deg(90.0), 0.1, 100.0);
    let expected = make_perspective_fov_matrix(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    assert!(projection.matrix().approx_eq(&expected, EPSILON));
}

#[test]
fn world_view_projection_composes_world_then_view_projection() {
    let camera = demo_camera();
    let object = Transform::new(
        Vector3::new(1.5, 1.5, 1.5),
        Vector3::new(0.2, 0.7, 0.0),
        Vector3::new(0.5, -0.5, 1.0),
    );
    let wvp = camera.world_view_projection(&object);
    assert_eq!(wvp.world, object.world_matrix());
    assert_eq!(wvp.projection, camera.projection.matrix());

    let expected = object
        .world_matrix()
        .multiply(&camera.view_matrix().multiply(&camera.projection.matrix()));
    assert!(wvp.compose().approx_eq(&expected, EPSILON));

    let chained = (object.world_matrix() * camera.view_matrix()) * camera.projection.matrix();
    assert!(wvp.compose().approx_eq(&chained, EPSILON));
}

#[test]
fn quad_center_lands_in_screen_center() {
    let camera = demo_camera();
    let wvp = WorldViewProjection::from_camera_world(
        Transform::default().world_matrix(),
        camera.transform.world_matrix(),
        camera.projection.matrix(),
    )
    .compose();
    let clip = wvp.transform_point(Vector4::new(0.0, 0.0, 0.0, 1.0));
    assert!((clip.x / clip.w).abs() < EPSILON);
    assert!((clip.y / clip.w).abs() < EPSILON);
    assert!((clip.w - 5.0).abs() < EPSILON);
    let depth = clip.z / clip.w;
    assert!(depth > 0.0 && depth < 1.0);
}
