/// Compute the rotation matrix of a quaternion.
///
/// # Arguments
///
/// * `quaternion` - The quaternion components in (x, y, z, w) order.
///
/// # Returns
///
/// The rotation matrix in row-major order.
///
/// PRECONDITION: the quaternion is a unit quaternion; it is not
/// renormalized here.
///
/// Example:
///
/// ```
/// use reconviz_scene::pose::rotation_from_quaternion;
///
/// let identity = [0.0, 0.0, 0.0, 1.0];
/// let rotation = rotation_from_quaternion(&identity);
/// assert_eq!(rotation, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn rotation_from_quaternion(quaternion: &[f64; 4]) -> [[f64; 3]; 3] {
    let [x, y, z, w] = *quaternion;

    let m00 = 1.0 - 2.0 * y * y - 2.0 * z * z;
    let m01 = 2.0 * x * y - 2.0 * z * w;
    let m02 = 2.0 * x * z + 2.0 * y * w;

    let m10 = 2.0 * x * y + 2.0 * z * w;
    let m11 = 1.0 - 2.0 * x * x - 2.0 * z * z;
    let m12 = 2.0 * y * z - 2.0 * x * w;

    let m20 = 2.0 * x * z - 2.0 * y * w;
    let m21 = 2.0 * y * z + 2.0 * x * w;
    let m22 = 1.0 - 2.0 * x * x - 2.0 * y * y;

    [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]]
}

/// Compute a camera's position in world coordinates from its stored
/// world-to-camera pose.
///
/// The pose maps world points into the camera frame as `R * p + t`, so
/// the camera center is `-R^T * t`.
///
/// # Arguments
///
/// * `quaternion` - The rotation quaternion in (x, y, z, w) order.
/// * `translation` - The translation of the world-to-camera transform.
///
/// # Returns
///
/// The camera center in world coordinates.
///
/// Example:
///
/// ```
/// use reconviz_scene::pose::camera_world_position;
///
/// let identity = [0.0, 0.0, 0.0, 1.0];
/// let position = camera_world_position(&identity, &[1.0, 2.0, 3.0]);
/// assert_eq!(position, [-1.0, -2.0, -3.0]);
/// ```
pub fn camera_world_position(quaternion: &[f64; 4], translation: &[f64; 3]) -> [f64; 3] {
    let r = rotation_from_quaternion(quaternion);
    let [tx, ty, tz] = *translation;

    [
        -(r[0][0] * tx + r[1][0] * ty + r[2][0] * tz),
        -(r[0][1] * tx + r[1][1] * ty + r[2][1] * tz),
        -(r[0][2] * tx + r[1][2] * ty + r[2][2] * tz),
    ]
}
