use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use super::{CameraIntrinsics, FormatError, ImagePose};
use crate::cloud::SparseCloud;

/// Read a points3D.txt file and return the positions and colors it holds.
///
/// Comment lines, blank lines and lines with too few tokens are skipped;
/// a token that fails numeric conversion fails the whole file.
///
/// # Arguments
///
/// * `path` - The path to the points3D.txt file.
///
/// # Returns
///
/// The parsed cloud, possibly empty.
pub fn read_points3d_txt(path: impl AsRef<Path>) -> Result<SparseCloud, FormatError> {
    let path = path.as_ref();
    // open the file and create a buffered reader
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut cloud = SparseCloud::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(tokens) = content_tokens(&line) else {
            continue;
        };
        if tokens.len() < 7 {
            log::debug!(
                "{}:{}: dropping point line with {} tokens",
                path.display(),
                idx + 1,
                tokens.len()
            );
            continue;
        }
        let (position, color) = parse_point3d_line(&tokens, path, idx + 1)?;
        cloud.push(position, color);
    }

    Ok(cloud)
}

/// Read a cameras.txt file and return the intrinsics records keyed by
/// camera id. A repeated id keeps the record that appears last.
///
/// # Arguments
///
/// * `path` - The path to the cameras.txt file.
///
/// # Returns
///
/// The intrinsics records keyed by camera id.
pub fn read_cameras_txt(
    path: impl AsRef<Path>,
) -> Result<HashMap<u32, CameraIntrinsics>, FormatError> {
    let path = path.as_ref();
    // open the file and create a buffered reader
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut cameras = HashMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(tokens) = content_tokens(&line) else {
            continue;
        };
        if tokens.len() < 5 {
            log::debug!(
                "{}:{}: dropping camera line with {} tokens",
                path.display(),
                idx + 1,
                tokens.len()
            );
            continue;
        }
        let camera = parse_camera_line(&tokens, path, idx + 1)?;
        cameras.insert(camera.camera_id, camera);
    }

    Ok(cameras)
}

/// Read an images.txt file and return the pose records in file order.
///
/// The table interleaves each pose line with one observation-list line.
/// After a pose line is accepted, the next physical line is consumed
/// unparsed as its observation list, unless that line is a comment or
/// blank line, in which case nothing is consumed. A pose line directly
/// following another pose line is therefore swallowed as the first one's
/// observation list.
///
/// # Arguments
///
/// * `path` - The path to the images.txt file.
///
/// # Returns
///
/// The pose records, quaternions reordered to (x, y, z, w).
pub fn read_images_txt(path: impl AsRef<Path>) -> Result<Vec<ImagePose>, FormatError> {
    let path = path.as_ref();
    // open the file and create a buffered reader
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut images = Vec::new();
    // whether the next content line is the observation list paired with
    // the pose parsed just before it
    let mut expect_observations = false;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(tokens) = content_tokens(&line) else {
            // a comment or blank line is never the observation list
            expect_observations = false;
            continue;
        };
        if expect_observations {
            // consumed verbatim, whatever it holds
            expect_observations = false;
            continue;
        }
        if tokens.len() < 10 {
            log::debug!(
                "{}:{}: dropping image line with {} tokens",
                path.display(),
                idx + 1,
                tokens.len()
            );
            continue;
        }
        images.push(parse_image_line(&tokens, path, idx + 1)?);
        expect_observations = true;
    }

    Ok(images)
}

/// Split a line into whitespace tokens. Returns None for blank lines and
/// for comment lines, whose first non-space character is '#'.
fn content_tokens(line: &str) -> Option<Vec<&str>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(trimmed.split_whitespace().collect())
}

/// Utility function for converting one token, with file context on failure.
fn parse_token<T: std::str::FromStr>(
    token: &str,
    path: &Path,
    line: usize,
) -> Result<T, FormatError>
where
    T::Err: std::fmt::Display,
{
    token.parse::<T>().map_err(|e| FormatError::InvalidField {
        token: token.to_string(),
        reason: e.to_string(),
        path: path.to_path_buf(),
        line,
    })
}

/// Parse a point line into its position and color.
/// NOTE: the id, the reprojection error and the track tail are display
///       irrelevant and dropped here.
///       POINT3D_ID, X, Y, Z, R, G, B, ERROR, TRACK[0], TRACK[1], ...
fn parse_point3d_line(
    tokens: &[&str],
    path: &Path,
    line: usize,
) -> Result<([f64; 3], [u8; 3]), FormatError> {
    let position = [
        parse_token(tokens[1], path, line)?,
        parse_token(tokens[2], path, line)?,
        parse_token(tokens[3], path, line)?,
    ];
    let color = [
        parse_token(tokens[4], path, line)?,
        parse_token(tokens[5], path, line)?,
        parse_token(tokens[6], path, line)?,
    ];
    Ok((position, color))
}

/// Parse a camera line.
/// NOTE: the number of parameters depends on the camera model, so the
///       tail length is not validated against the model tag.
///       CAMERA_ID, MODEL, WIDTH, HEIGHT, PARAMS[0], PARAMS[1], ...
fn parse_camera_line(
    tokens: &[&str],
    path: &Path,
    line: usize,
) -> Result<CameraIntrinsics, FormatError> {
    Ok(CameraIntrinsics {
        camera_id: parse_token(tokens[0], path, line)?,
        model: tokens[1].to_string(),
        width: parse_token(tokens[2], path, line)?,
        height: parse_token(tokens[3], path, line)?,
        params: tokens[4..]
            .iter()
            .map(|s| parse_token(s, path, line))
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Parse an image pose line. Tokens past the name are ignored.
/// NOTE: the table stores the quaternion w-first; it is reordered to
///       (x, y, z, w) here and nowhere else.
///       IMAGE_ID, QW, QX, QY, QZ, TX, TY, TZ, CAMERA_ID, NAME
fn parse_image_line(tokens: &[&str], path: &Path, line: usize) -> Result<ImagePose, FormatError> {
    Ok(ImagePose {
        image_id: parse_token(tokens[0], path, line)?,
        quaternion: [
            parse_token(tokens[2], path, line)?,
            parse_token(tokens[3], path, line)?,
            parse_token(tokens[4], path, line)?,
            parse_token(tokens[1], path, line)?,
        ],
        translation: [
            parse_token(tokens[5], path, line)?,
            parse_token(tokens[6], path, line)?,
            parse_token(tokens[7], path, line)?,
        ],
        camera_id: parse_token(tokens[8], path, line)?,
        name: tokens[9].to_string(),
    })
}
