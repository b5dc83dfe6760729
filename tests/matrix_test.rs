use cgmath::SquareMatrix;
use quad_ngin::math::{
    Matrix4x4, Vector3, Vector4, make_affine_matrix, make_identity_4x4,
    make_perspective_fov_matrix, make_rotate_matrix, make_rotate_x_matrix, make_rotate_y_matrix,
    make_rotate_z_matrix, make_scale_matrix, make_translate_matrix,
};

const EPSILON: f32 = 1e-4;

fn samples() -> Vec<Matrix4x4> {
    vec![
        Matrix4x4::new([
            [3.2, 0.7, 0.0, 0.0],
            [0.0, 1.0, 5.3, 0.0],
            [2.4, 6.6, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]),
        Matrix4x4::new([
            [1.0, 2.0, 3.0, 4.0],
            [0.5, -1.0, 2.0, 0.0],
            [3.0, 0.0, 1.0, -2.0],
            [0.0, 1.5, -1.0, 2.0],
        ]),
        make_affine_matrix(
            Vector3::new(1.2, 0.79, -2.1),
            Vector3::new(0.4, 1.43, -0.8),
            Vector3::new(2.7, -4.15, 1.57),
        ),
    ]
}

#[test]
fn identity_is_neutral_for_multiply() {
    let identity = make_identity_4x4();
    for a in samples() {
        assert_eq!(a.multiply(&identity), a);
        assert_eq!(identity.multiply(&a), a);
    }
}

#[test]
fn identity_has_ones_on_the_diagonal() {
    let identity = Matrix4x4::identity();
    for i in 0..4 {
        for j in 0..4 {
            assert_eq!(identity.m[i][j], if i == j { 1.0 } else { 0.0 });
        }
    }
    assert_eq!(Matrix4x4::default(), identity);
}

#[test]
fn add_is_commutative_subtract_is_not() {
    let [a, b, _] = <[Matrix4x4; 3]>::try_from(samples()).unwrap();
    assert_eq!(a + b, b + a);
    assert_ne!(a.subtract(&b), b.subtract(&a));
    assert!((a + b).subtract(&b).approx_eq(&a, EPSILON));
    assert_eq!(a - b, a.subtract(&b));
}

#[test]
fn multiply_is_not_commutative() {
    let a = make_translate_matrix(Vector3::new(1.0, 2.0, 3.0));
    let b = make_rotate_z_matrix(0.5);
    assert!(!a.multiply(&b).approx_eq(&b.multiply(&a), EPSILON));
    assert_eq!(a * b, a.multiply(&b));
    assert_eq!(&a * &b, a.multiply(&b));
}

#[test]
fn multiply_matches_reference_values() {
    let a = Matrix4x4::new([
        [3.2, 0.7, 9.4, 1.0],
        [0.0, 1.0, 3.0, 2.0],
        [0.0, 0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0, 1.0],
    ]);
    let b = Matrix4x4::new([
        [2.1, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 2.0, 0.0],
        [0.0, 4.0, 0.0, 1.0],
    ]);
    let expected = Matrix4x4::new([
        [6.72, 4.7, 18.8, 1.0],
        [0.0, 9.0, 6.0, 2.0],
        [0.0, 0.0, 2.0, 0.0],
        [2.1, 4.0, 0.0, 1.0],
    ]);
    assert!(a.multiply(&b).approx_eq(&expected, EPSILON));
}

#[test]
fn transpose_twice_is_identity_operation() {
    for a in samples() {
        assert_eq!(a.transpose().transpose(), a);
    }
    let a = samples()[1];
    assert_eq!(a.transpose().m[0][3], a.m[3][0]);
    assert_eq!(a.transpose().m[2][1], a.m[1][2]);
}

#[test]
fn inverse_times_matrix_is_identity() {
    for a in samples() {
        let inverse = a.inverse();
        assert!(
            a.multiply(&inverse).approx_eq(&Matrix4x4::IDENTITY, EPSILON),
            "{:?}",
            a.multiply(&inverse)
        );
        assert!(inverse.multiply(&a).approx_eq(&Matrix4x4::IDENTITY, EPSILON));
    }
}

#[test]
fn inverse_matches_cgmath() {
    for a in samples() {
        let reference: cgmath::Matrix4<f32> = a.into();
        let expected: Matrix4x4 = reference.invert().expect("sample is invertible").into();
        assert!(a.inverse().approx_eq(&expected, EPSILON));
    }
}

#[test]
fn determinant_matches_cgmath() {
    for a in samples() {
        let reference: cgmath::Matrix4<f32> = a.into();
        assert!((a.determinant() - reference.determinant()).abs() < 1e-3);
    }
}

#[test]
fn row_vector_product_matches_cgmath_column_vector_product() {
    let [a, b, _] = <[Matrix4x4; 3]>::try_from(samples()).unwrap();
    let (ca, cb): (cgmath::Matrix4<f32>, cgmath::Matrix4<f32>) = (a.into(), b.into());
    let expected: Matrix4x4 = (cb * ca).into();
    assert!(a.multiply(&b).approx_eq(&expected, EPSILON));
}

#[test]
fn singular_inverse_is_not_finite() {
    let singular = make_scale_matrix(Vector3::new(1.0, 0.0, 1.0));
    assert_eq!(singular.determinant(), 0.0);
    assert!(!singular.inverse().is_finite());
}

#[test]
fn zero_rotation_is_identity() {
    assert_eq!(make_rotate_matrix(Vector3::ZERO), Matrix4x4::IDENTITY);
}

#[test]
fn unit_affine_is_identity() {
    let affine = make_affine_matrix(Vector3::ONE, Vector3::ZERO, Vector3::ZERO);
    assert_eq!(affine, Matrix4x4::IDENTITY);
}

#[test]
fn scale_applies_per_axis() {
    let scaled = make_scale_matrix(Vector3::new(2.0, 3.0, 4.0)).transform_point(Vector4::new(1.0, 1.0, 1.0, 1.0));
    assert_eq!(scaled, Vector4::new(2.0, 3.0, 4.0, 1.0));
}

#[test]
fn translate_moves_the_origin() {
    let moved = make_translate_matrix(Vector3::new(5.0, -2.0, 0.0)).transform_point(Vector4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(moved, Vector4::new(5.0, -2.0, 0.0, 1.0));
}

#[test]
fn translate_ignores_directions() {
    let direction = Vector4::new(1.0, 0.0, 0.0, 0.0);
    let moved = make_translate_matrix(Vector3::new(5.0, -2.0, 7.0)).transform_point(direction);
    assert_eq!(moved, direction);
}

#[test]
fn axis_rotations_follow_the_left_handed_convention() {
    let quarter = std::f32::consts::FRAC_PI_2;
    let x = Vector4::new(1.0, 0.0, 0.0, 1.0);
    let y = Vector4::new(0.0, 1.0, 0.0, 1.0);
    let z = Vector4::new(0.0, 0.0, 1.0, 1.0);

    assert!(make_rotate_x_matrix(quarter).transform_point(y).approx_eq(&z, EPSILON));
    assert!(make_rotate_y_matrix(quarter).transform_point(z).approx_eq(&x, EPSILON));
    assert!(make_rotate_z_matrix(quarter).transform_point(x).approx_eq(&y, EPSILON));
}

#[test]
fn rotate_composes_x_then_y_then_z() {
    let rotate = Vector3::new(0.3, -1.1, 2.0);
    let expected = make_rotate_x_matrix(rotate.x)
        .multiply(&make_rotate_y_matrix(rotate.y))
        .multiply(&make_rotate_z_matrix(rotate.z));
    assert_eq!(make_rotate_matrix(rotate), expected);

    let reversed = make_rotate_z_matrix(rotate.z)
        .multiply(&make_rotate_y_matrix(rotate.y))
        .multiply(&make_rotate_x_matrix(rotate.x));
    assert!(!make_rotate_matrix(rotate).approx_eq(&reversed, EPSILON));
}

#[test]
fn affine_scales_then_rotates_then_translates() {
    let scale = Vector3::new(2.0, 2.0, 2.0);
    let rotate = Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
    let translate = Vector3::new(10.0, 0.0, 0.0);
    let affine = make_affine_matrix(scale, rotate, translate);

    // (1,0,0) -> scale (2,0,0) -> rotate z 90deg (0,2,0) -> translate (10,2,0)
    let p = affine.transform_point(Vector4::new(1.0, 0.0, 0.0, 1.0));
    assert!(p.approx_eq(&Vector4::new(10.0, 2.0, 0.0, 1.0), EPSILON));

    let manual = make_scale_matrix(scale)
        .multiply(&make_rotate_matrix(rotate))
        .multiply(&make_translate_matrix(translate));
    assert!(affine.approx_eq(&manual, EPSILON));
}

#[test]
fn perspective_depth_terms_match_closed_form() {
    let (near, far) = (0.1_f32, 100.0_f32);
    let projection = make_perspective_fov_matrix(std::f32::consts::FRAC_PI_2, 1.0, near, far);

    assert!((projection.m[0][0] - 1.0).abs() < EPSILON);
    assert!((projection.m[1][1] - 1.0).abs() < EPSILON);
    assert!((projection.m[2][2] - far / (far - near)).abs() < EPSILON);
    assert!((projection.m[3][2] - (-near * far / (far - near))).abs() < EPSILON);
    assert!((projection.m[2][2] - 1.001_001).abs() < EPSILON);
    assert!((projection.m[3][2] + 0.100_100_1).abs() < EPSILON);
    assert_eq!(projection.m[2][3], 1.0);
    assert_eq!(projection.m[3][3], 0.0);
}

#[test]
fn perspective_divides_x_by_aspect() {
    let projection = make_perspective_fov_matrix(std::f32::consts::FRAC_PI_2, 16.0 / 9.0, 0.1, 100.0);
    assert!((projection.m[0][0] - 9.0 / 16.0).abs() < EPSILON);
    assert!((projection.m[1][1] - 1.0).abs() < EPSILON);
}

#[test]
fn perspective_maps_near_and_far_to_unit_depth() {
    let (near, far) = (0.1_f32, 100.0_f32);
    let projection = make_perspective_fov_matrix(0.45, 1280.0 / 720.0, near, far);

    let depth_at = |z: f32| {
        let clip = projection.transform_point(Vector4::new(0.0, 0.0, z, 1.0));
        clip.z / clip.w
    };
    assert!(depth_at(near).abs() < EPSILON);
    assert!((depth_at(far) - 1.0).abs() < EPSILON);
    assert!(depth_at(5.0) > 0.0 && depth_at(5.0) < 1.0);
}

#[test]
fn matrix_converts_to_and_from_arrays() {
    let a = samples()[1];
    let raw: [[f32; 4]; 4] = a.into();
    assert_eq!(Matrix4x4::from(raw), a);
    assert_eq!(bytemuck::bytes_of(&a).len(), 64);
}
