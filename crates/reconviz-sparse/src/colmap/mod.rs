mod text;

pub use text::*;

/// File name of the 3D points table inside a reconstruction directory.
pub const POINTS3D_FILE: &str = "points3D.txt";

/// File name of the camera intrinsics table.
pub const CAMERAS_FILE: &str = "cameras.txt";

/// File name of the image pose table.
pub const IMAGES_FILE: &str = "images.txt";

/// Error types for the COLMAP text readers.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Failed to read the reconstruction file
    #[error("Failed to read the reconstruction file. {0}")]
    Io(#[from] std::io::Error),

    /// A numeric field could not be converted.
    #[error("Invalid numeric field \"{token}\" at {path}:{line}. {reason}")]
    InvalidField {
        /// The offending token, verbatim.
        token: String,
        /// Why the conversion failed.
        reason: String,
        /// The file the token came from.
        path: std::path::PathBuf,
        /// 1-based line number of the token.
        line: usize,
    },
}

/// Camera intrinsics record from a `cameras.txt` table.
///
/// The model tag and parameter tail are carried verbatim; nothing here
/// interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraIntrinsics {
    /// Camera id
    pub camera_id: u32,
    /// Camera model tag, e.g. "PINHOLE"
    pub model: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Model-dependent parameters
    pub params: Vec<f64>,
}

/// World-to-camera pose record from an `images.txt` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePose {
    /// Image id
    pub image_id: u32,
    /// Rotation quaternion in (x, y, z, w) component order.
    ///
    /// The table stores (w, x, y, z); the reorder happens once, inside
    /// [`read_images_txt`], and every consumer downstream assumes w last.
    pub quaternion: [f64; 4],
    /// Translation of the world-to-camera transform
    pub translation: [f64; 3],
    /// Id of the camera that captured the image
    pub camera_id: u32,
    /// Image file name
    pub name: String,
}
