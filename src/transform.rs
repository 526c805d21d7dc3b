use nalgebra::{Isometry3, Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3};

use std::ops;

/// Rigid transform between two camera frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform(Isometry3<f32>);

impl Transform {
    pub fn eye() -> Self {
        Self(Isometry3::identity())
    }

    /// Builds the transform `p' = R * p + t`.
    ///
    /// # Arguments
    ///
    /// * rotation: 3x3 rotation. It is re-orthonormalized, small calibration residuals
    ///   are fine.
    /// * translation: Translation applied after the rotation.
    pub fn from_rotation_translation(rotation: &Matrix3<f32>, translation: &Vector3<f32>) -> Self {
        Self(Isometry3::from_parts(
            Translation3::new(translation[0], translation[1], translation[2]),
            UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(rotation)),
        ))
    }

    pub fn from_matrix4(matrix: &Matrix4<f32>) -> Self {
        Self::from_rotation_translation(
            &matrix.fixed_slice::<3, 3>(0, 0).into_owned(),
            &Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]),
        )
    }

    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        self.0.rotation.to_rotation_matrix().into_inner()
    }

    pub fn translation(&self) -> Vector3<f32> {
        self.0.translation.vector
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    /// Transforms a position, translation included.
    pub fn transform_point(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.0.transform_point(&(*point).into()).coords
    }
}

impl ops::Mul<&Vector3<f32>> for &Transform {
    type Output = Vector3<f32>;

    fn mul(self, rhs: &Vector3<f32>) -> Self::Output {
        self.transform_point(rhs)
    }
}

impl ops::Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Self::Output {
        Transform(self.0 * rhs.0)
    }
}

impl From<Transform> for Matrix4<f32> {
    fn from(transform: Transform) -> Self {
        transform.0.into()
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Matrix4, Vector3};

    #[test]
    fn test_eye_keeps_points() {
        let point = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(&Transform::eye() * &point, point);
    }

    #[test]
    fn test_transform_point_applies_translation() {
        // Half turn around Y followed by a shift along Z.
        let rotation = Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0);
        let transform =
            Transform::from_rotation_translation(&rotation, &Vector3::new(0.0, 0.0, 3.0));

        let moved = &transform * &Vector3::new(1.0, 2.0, 3.0);
        assert_abs_diff_eq!(moved, Vector3::new(-1.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_matrix4_roundtrip() {
        let rotation = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let transform =
            Transform::from_rotation_translation(&rotation, &Vector3::new(0.02, -0.001, 0.01));
        let matrix: Matrix4<f32> = transform.clone().into();

        let rebuilt = Transform::from_matrix4(&matrix);
        assert_abs_diff_eq!(rebuilt.rotation_matrix(), rotation, epsilon = 1e-6);
        assert_abs_diff_eq!(
            rebuilt.translation(),
            Vector3::new(0.02, -0.001, 0.01),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_inverse() {
        let rotation = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let transform =
            Transform::from_rotation_translation(&rotation, &Vector3::new(0.5, 0.25, -1.0));
        let point = Vector3::new(0.3, -0.7, 2.0);
        let back = &transform.inverse() * &(&transform * &point);
        assert_abs_diff_eq!(back, point, epsilon = 1e-5);
    }
}
