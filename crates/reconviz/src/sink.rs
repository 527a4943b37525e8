use std::error::Error;

use reconviz_scene::emit::SceneSink;

/// Bridges emitted scene events into a rerun recording stream.
pub struct RerunSink {
    rec: rerun::RecordingStream,
}

impl RerunSink {
    /// Wrap a recording stream.
    pub fn new(rec: rerun::RecordingStream) -> Self {
        Self { rec }
    }
}

impl SceneSink for RerunSink {
    fn log_points(
        &mut self,
        path: &str,
        positions: &[[f64; 3]],
        colors: &[[u8; 3]],
        radius: f32,
    ) -> Result<(), Box<dyn Error>> {
        let positions = positions
            .iter()
            .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
            .collect::<Vec<_>>();
        let colors = colors
            .iter()
            .map(|c| rerun::Color::from_rgb(c[0], c[1], c[2]))
            .collect::<Vec<_>>();

        self.rec.log(
            path,
            &rerun::Points3D::new(positions)
                .with_colors(colors)
                .with_radii([radius]),
        )?;

        Ok(())
    }
}
