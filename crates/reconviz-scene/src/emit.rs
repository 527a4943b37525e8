use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use reconviz_sparse::colmap::{
    read_cameras_txt, read_images_txt, read_points3d_txt, CameraIntrinsics, FormatError,
    ImagePose, CAMERAS_FILE, IMAGES_FILE, POINTS3D_FILE,
};

use crate::cluster::{self, ClusterId};
use crate::color::{ColorSource, CAMERA_COLOR};
use crate::pose::camera_world_position;

/// Receiver of the emitted scene events.
///
/// The interactive viewer lives outside this crate; this is the seam it
/// is reached through. A single event kind exists: a named batch of 3D
/// points with per-point colors and a display radius.
pub trait SceneSink {
    /// Hand one points event to the viewer.
    ///
    /// PRECONDITION: positions and colors have the same length.
    fn log_points(
        &mut self,
        path: &str,
        positions: &[[f64; 3]],
        colors: &[[u8; 3]],
        radius: f32,
    ) -> Result<(), Box<dyn Error>>;
}

/// Display parameters of an emission run.
#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Point radius of the per-cluster clouds.
    pub cluster_radius: f32,
    /// Radius of the camera position markers.
    pub camera_radius: f32,
    /// Point radius of the final merged layer, smaller than the cluster
    /// radius so the authoritative result reads on top.
    pub merged_radius: f32,
    /// Marker color for camera positions.
    pub camera_color: [u8; 3],
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            cluster_radius: 0.05,
            camera_radius: 0.03,
            merged_radius: 0.015,
            camera_color: CAMERA_COLOR,
        }
    }
}

/// Outcome counters of one emission run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Clusters whose point cloud went out.
    pub clusters_emitted: usize,
    /// Parse failures reported along the way while the run continued.
    pub parse_failures: usize,
    /// Points across all emitted clouds, the final layer included.
    pub points_emitted: usize,
    /// Camera markers emitted.
    pub cameras_emitted: usize,
}

/// Error types for scene emission.
///
/// Parse problems never show up here, they are reported and counted per
/// cluster while the run continues. Losing the sink is the one thing
/// that aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The sink rejected an event.
    #[error("Sink rejected event \"{path}\". {message}")]
    Sink {
        /// Name of the rejected event.
        path: String,
        /// Failure reported by the sink.
        message: String,
    },
}

/// One scene emission run over a results tree.
///
/// A session borrows the sink for its whole lifetime and is consumed by
/// [`SceneEmitter::run`], so independent runs never share counters.
pub struct SceneEmitter<'a, S: SceneSink> {
    sink: &'a mut S,
    config: EmitConfig,
    stats: SceneStats,
}

impl<'a, S: SceneSink> SceneEmitter<'a, S> {
    /// Create an emitter session writing into `sink`.
    pub fn new(sink: &'a mut S, config: EmitConfig) -> Self {
        Self {
            sink,
            config,
            stats: SceneStats::default(),
        }
    }

    /// Convert the results tree under `results_root` into the ordered
    /// event stream and return the run counters.
    ///
    /// Clusters go out in discovery order, each cloud followed by its
    /// camera markers; the merged result is re-emitted strictly last.
    pub fn run(mut self, results_root: &Path) -> Result<SceneStats, SceneError> {
        let clusters = cluster::discover(results_root);
        if clusters.is_empty() {
            log::warn!("no reconstruction found under {}", results_root.display());
        }

        for id in clusters {
            self.emit_cluster(results_root, id)?;
        }
        // the merged cloud goes out again last, so the authoritative
        // layer renders on top of the cluster layers
        self.emit_final_layer(results_root)?;

        Ok(self.stats)
    }

    fn emit_cluster(&mut self, results_root: &Path, id: ClusterId) -> Result<(), SceneError> {
        let dir = results_root.join(id.relative_dir());

        let cloud = match read_points3d_txt(dir.join(POINTS3D_FILE)) {
            Ok(cloud) => cloud,
            Err(err) => {
                log::warn!("cluster {id}: skipped, {err}");
                self.stats.parse_failures += 1;
                return Ok(());
            }
        };

        if cloud.is_empty() {
            log::warn!("cluster {id}: points file holds no usable points");
        } else {
            log::debug!(
                "cluster {id}: bounds {} .. {}",
                cloud.get_min_bound(),
                cloud.get_max_bound()
            );
        }
        log::debug!(
            "cluster {id}: display color {:?}",
            ColorSource::for_cluster(id).resolve()
        );

        let entity = format!("clusters/{}/points", id.entity_key());
        let radius = self.config.cluster_radius;
        self.log(&entity, cloud.positions(), cloud.colors(), radius)?;
        self.stats.clusters_emitted += 1;
        self.stats.points_emitted += cloud.len();
        log::info!("cluster {id}: {} points", cloud.len());

        self.emit_cluster_cameras(&dir, id)
    }

    fn emit_cluster_cameras(&mut self, dir: &Path, id: ClusterId) -> Result<(), SceneError> {
        let cameras_file = dir.join(CAMERAS_FILE);
        let images_file = dir.join(IMAGES_FILE);
        // camera markers need both tables; a cluster carrying only one of
        // them stays a bare cloud
        if !cameras_file.exists() || !images_file.exists() {
            return Ok(());
        }

        let (cameras, images) = match read_pose_tables(&cameras_file, &images_file) {
            Ok(tables) => tables,
            Err(err) => {
                log::warn!("cluster {id}: camera markers skipped, {err}");
                self.stats.parse_failures += 1;
                return Ok(());
            }
        };
        // intrinsics are parsed and validated, nothing renders them yet
        log::debug!("cluster {id}: {} intrinsics records", cameras.len());

        let radius = self.config.camera_radius;
        let color = self.config.camera_color;
        for image in &images {
            let position = camera_world_position(&image.quaternion, &image.translation);
            let entity = format!("clusters/{}/cameras/{}", id.entity_key(), image.name);
            self.log(&entity, &[position], &[color], radius)?;
        }
        self.stats.cameras_emitted += images.len();
        log::info!("cluster {id}: {} camera markers", images.len());
        Ok(())
    }

    fn emit_final_layer(&mut self, results_root: &Path) -> Result<(), SceneError> {
        let points_file = results_root
            .join(ClusterId::Merged.relative_dir())
            .join(POINTS3D_FILE);
        if !points_file.exists() {
            log::debug!("no merged result, final layer not emitted");
            return Ok(());
        }

        let cloud = match read_points3d_txt(&points_file) {
            Ok(cloud) => cloud,
            Err(err) => {
                log::warn!("final layer skipped, {err}");
                self.stats.parse_failures += 1;
                return Ok(());
            }
        };

        let radius = self.config.merged_radius;
        self.log("final_reconstruction/points", cloud.positions(), cloud.colors(), radius)?;
        self.stats.points_emitted += cloud.len();
        log::info!("final layer: {} points", cloud.len());
        Ok(())
    }

    fn log(
        &mut self,
        path: &str,
        positions: &[[f64; 3]],
        colors: &[[u8; 3]],
        radius: f32,
    ) -> Result<(), SceneError> {
        self.sink
            .log_points(path, positions, colors, radius)
            .map_err(|err| SceneError::Sink {
                path: path.to_string(),
                message: err.to_string(),
            })
    }
}

/// Convert the results tree under `results_root` into the ordered event
/// stream, writing events into `sink`.
///
/// # Arguments
///
/// * `results_root` - The directory holding the `ba_output` tree.
/// * `sink` - The viewer connection receiving the events.
/// * `config` - Display parameters of the run.
///
/// # Returns
///
/// The run counters, or the sink failure that aborted the run.
pub fn emit_scene<S: SceneSink>(
    results_root: &Path,
    sink: &mut S,
    config: EmitConfig,
) -> Result<SceneStats, SceneError> {
    SceneEmitter::new(sink, config).run(results_root)
}

fn read_pose_tables(
    cameras_file: &Path,
    images_file: &Path,
) -> Result<(HashMap<u32, CameraIntrinsics>, Vec<ImagePose>), FormatError> {
    let cameras = read_cameras_txt(cameras_file)?;
    let images = read_images_txt(images_file)?;
    Ok((cameras, images))
}

/// One recorded points event.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkEvent {
    /// Name of the event.
    pub path: String,
    /// Point positions.
    pub positions: Vec<[f64; 3]>,
    /// Per-point colors.
    pub colors: Vec<[u8; 3]>,
    /// Display radius.
    pub radius: f32,
}

/// A [`SceneSink`] that records every event it receives.
///
/// Useful for tests and dry runs; a fresh sink per run keeps runs in one
/// process independent of each other.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<SinkEvent>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events in emission order.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }
}

impl SceneSink for MemorySink {
    fn log_points(
        &mut self,
        path: &str,
        positions: &[[f64; 3]],
        colors: &[[u8; 3]],
        radius: f32,
    ) -> Result<(), Box<dyn Error>> {
        self.events.push(SinkEvent {
            path: path.to_string(),
            positions: positions.to_vec(),
            colors: colors.to_vec(),
            radius,
        });
        Ok(())
    }
}
