mod sink;

use argh::FromArgs;
use std::path::PathBuf;

use reconviz_scene::emit::{emit_scene, EmitConfig};
use sink::RerunSink;

#[derive(FromArgs)]
/// Convert a hierarchical SfM results tree into a rerun recording of
/// color-coded point clouds and camera positions.
struct Args {
    /// path to the results directory holding the ba_output tree
    #[argh(option)]
    results_root: PathBuf,

    /// where to write the recording, defaults to reconstruction.rrd
    /// inside the results directory
    #[argh(option)]
    output: Option<PathBuf>,

    /// stream into a spawned interactive viewer instead of writing a file
    #[argh(switch)]
    spawn: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    log::info!("🚀 reading reconstruction from {}", args.results_root.display());

    // create a rerun recording stream
    let rec = if args.spawn {
        if args.output.is_some() {
            log::warn!("--output is ignored when --spawn is set");
        }
        rerun::RecordingStreamBuilder::new("reconviz").spawn()?
    } else {
        let output = args
            .output
            .unwrap_or_else(|| args.results_root.join("reconstruction.rrd"));
        log::info!("recording to {}", output.display());
        rerun::RecordingStreamBuilder::new("reconviz").save(output)?
    };

    // reconstructions come out of COLMAP in a y-up right-handed frame
    rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Y_UP())?;

    let mut sink = RerunSink::new(rec);
    let stats = emit_scene(&args.results_root, &mut sink, EmitConfig::default())?;

    log::info!(
        "✅ done: {} clusters, {} points, {} camera markers, {} parse failures",
        stats.clusters_emitted,
        stats.points_emitted,
        stats.cameras_emitted,
        stats.parse_failures
    );
    if !args.spawn {
        log::info!("open the recording with `rerun <file>`");
    }

    Ok(())
}
