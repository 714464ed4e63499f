//! Euler angles → rotation matrices and homogeneous transforms.

use nalgebra::{Matrix3, Matrix4, Vector3};

/// Rotation matrix for roll/pitch/yaw given in degrees.
///
/// Composed as `Rz(yaw) * Ry(pitch) * Rx(roll)` from explicit axis
/// rotations. Existing calibration files were produced with exactly this
/// multiplication order, so do not replace it with a closed form.
#[rustfmt::skip]
pub fn euler_to_rotation_matrix(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
    let (roll, pitch, yaw) = (roll.to_radians(), pitch.to_radians(), yaw.to_radians());

    let rx = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, roll.cos(), -roll.sin(),
        0.0, roll.sin(), roll.cos(),
    );
    let ry = Matrix3::new(
        pitch.cos(), 0.0, pitch.sin(),
        0.0, 1.0, 0.0,
        -pitch.sin(), 0.0, pitch.cos(),
    );
    let rz = Matrix3::new(
        yaw.cos(), -yaw.sin(), 0.0,
        yaw.sin(), yaw.cos(), 0.0,
        0.0, 0.0, 1.0,
    );

    rz * ry * rx
}

/// 4x4 homogeneous transform from a rotation block and a translation.
pub fn homogeneous(rotation: &Matrix3<f64>, translation: &Vector3<f64>) -> Matrix4<f64> {
    let mut transform = Matrix4::identity();
    transform.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
    transform.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    transform
}

/// Quantize to 6 decimal places by printing and reparsing.
pub fn round6(value: f64) -> f64 {
    // "{:.6}" of a finite f64 always reparses
    format!("{value:.6}").parse().unwrap_or(value)
}

/// Apply [`round6`] to every entry of a transform.
pub fn quantize(transform: &Matrix4<f64>) -> Matrix4<f64> {
    transform.map(round6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    #[test]
    fn test_zero_angles_give_identity() {
        let r = euler_to_rotation_matrix(0.0, 0.0, 0.0);
        assert_eq!(r, Matrix3::identity());
    }

    #[test]
    fn test_yaw_only() {
        let r = euler_to_rotation_matrix(0.0, 0.0, 90.0);
        let x = r * Vector3::new(1.0, 0.0, 0.0);
        assert!((x - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_matches_nalgebra_euler_convention() {
        // nalgebra's from_euler_angles is also extrinsic XYZ (Rz * Ry * Rx)
        let (roll, pitch, yaw) = (12.5_f64, -33.0_f64, 171.25_f64);
        let ours = euler_to_rotation_matrix(roll, pitch, yaw);
        let theirs =
            Rotation3::from_euler_angles(roll.to_radians(), pitch.to_radians(), yaw.to_radians());
        assert!((ours - theirs.matrix()).abs().max() < 1e-12);
    }

    #[test]
    fn test_rotations_are_orthonormal() {
        // Deterministic pseudo-random sweep over the angle space
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 720_000) as f64 / 1000.0 - 360.0
        };
        for _ in 0..500 {
            let r = euler_to_rotation_matrix(next(), next(), next());
            let err = (r * r.transpose() - Matrix3::identity()).abs().max();
            assert!(err < 1e-6, "R * R^T deviates from identity by {err}");
            assert!((r.determinant() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_homogeneous_layout() {
        let r = euler_to_rotation_matrix(10.0, 20.0, 30.0);
        let t = homogeneous(&r, &Vector3::new(1.5, -2.0, 0.25));
        assert_eq!(t.fixed_view::<3, 3>(0, 0).into_owned(), r);
        assert_eq!(t[(0, 3)], 1.5);
        assert_eq!(t[(1, 3)], -2.0);
        assert_eq!(t[(2, 3)], 0.25);
        assert_eq!(t.row(3).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_round6() {
        assert_eq!(round6(0.123_456_789), 0.123_457);
        assert_eq!(round6(1.0), 1.0);
        assert_eq!(round6(0.0), 0.0);
        assert_eq!(round6(-2.000_000_4), -2.0);
        assert_eq!(round6(6.123_233_995_736_766e-17), 0.0);
    }
}
