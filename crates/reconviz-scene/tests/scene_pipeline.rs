use std::collections::HashSet;
use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use reconviz_scene::cluster::ClusterId;
use reconviz_scene::emit::{emit_scene, EmitConfig, MemorySink, SceneStats};

fn write_cluster_points(root: &Path, relative: &Path, lines: &str) {
    let dir = root.join(relative);
    fs::create_dir_all(&dir).expect("create cluster dir");
    fs::write(dir.join("points3D.txt"), lines).expect("write points3D.txt");
}

fn write_pose_tables(root: &Path, relative: &Path, cameras: &str, images: &str) {
    let dir = root.join(relative);
    fs::create_dir_all(&dir).expect("create cluster dir");
    fs::write(dir.join("cameras.txt"), cameras).expect("write cameras.txt");
    fs::write(dir.join("images.txt"), images).expect("write images.txt");
}

/// Test the event stream of a small tree end to end: cluster clouds in
/// discovery order, camera markers after their cloud, merged layer last.
#[test]
fn full_tree_emits_clusters_cameras_then_final_layer() {
    let root = tempfile::tempdir().expect("create temp dir");

    write_cluster_points(
        root.path(),
        &ClusterId::Merged.relative_dir(),
        "# merged result\n\
         1 0.0 0.0 0.0 255 0 0 0.5\n\
         2 1.0 1.0 1.0 0 255 0 0.5\n",
    );
    write_cluster_points(
        root.path(),
        &ClusterId::Group(2).relative_dir(),
        "7 0.25 0.5 0.75 10 20 30 0.2\n",
    );
    write_cluster_points(
        root.path(),
        &ClusterId::Leaf(3, 1).relative_dir(),
        "9 -1.0 2.0 -3.0 40 50 60 0.3\n",
    );
    write_pose_tables(
        root.path(),
        &ClusterId::Group(2).relative_dir(),
        "1 PINHOLE 100 100 50.0 50.0 50.0 50.0\n",
        "# image list\n\
         1 1.0 0.0 0.0 0.0 1.0 2.0 3.0 1 a.jpg\n\
         10.0 10.0 1\n\
         2 0.7071067811865476 0.0 0.0 0.7071067811865476 1.0 0.0 0.0 1 b.jpg\n\
         20.0 20.0 2\n",
    );

    let mut sink = MemorySink::new();
    let stats = emit_scene(root.path(), &mut sink, EmitConfig::default())
        .expect("well-formed tree must emit");

    let paths = sink
        .events()
        .iter()
        .map(|event| event.path.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        paths,
        vec![
            "clusters/ba_output/points",
            "clusters/C_2_ba_output/points",
            "clusters/C_2_ba_output/cameras/a.jpg",
            "clusters/C_2_ba_output/cameras/b.jpg",
            "clusters/C_3_C_3_1_ba_output/points",
            "final_reconstruction/points",
        ]
    );

    // cluster clouds carry the file's own positions and colors
    let merged = &sink.events()[0];
    assert_eq!(merged.positions, vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
    assert_eq!(merged.colors, vec![[255, 0, 0], [0, 255, 0]]);
    assert_eq!(merged.radius, 0.05);

    // an identity rotation puts the camera at the negated translation
    let cam_a = &sink.events()[2];
    assert_eq!(cam_a.positions, vec![[-1.0, -2.0, -3.0]]);
    assert_eq!(cam_a.colors, vec![[0, 255, 255]]);
    assert_eq!(cam_a.radius, 0.03);

    // a quarter turn about z moves (1, 0, 0) to (0, 1, 0)
    let cam_b = &sink.events()[3];
    assert_relative_eq!(cam_b.positions[0][0], 0.0, epsilon = 1e-9);
    assert_relative_eq!(cam_b.positions[0][1], 1.0, epsilon = 1e-9);
    assert_relative_eq!(cam_b.positions[0][2], 0.0, epsilon = 1e-9);

    // the final layer re-reads the merged cloud at the smaller radius
    let last = &sink.events()[5];
    assert_eq!(last.positions, merged.positions);
    assert_eq!(last.colors, merged.colors);
    assert_eq!(last.radius, 0.015);

    assert_eq!(
        stats,
        SceneStats {
            clusters_emitted: 3,
            parse_failures: 0,
            points_emitted: 6,
            cameras_emitted: 2,
        }
    );
}

/// Test that a cluster with a corrupt points table is reported and
/// skipped while the rest of the run continues.
#[test]
fn corrupt_cluster_is_reported_and_skipped() {
    let root = tempfile::tempdir().expect("create temp dir");

    write_cluster_points(
        root.path(),
        &ClusterId::Group(1).relative_dir(),
        "1 0.0 oops 0.0 255 0 0 0.5\n",
    );
    write_cluster_points(
        root.path(),
        &ClusterId::Group(2).relative_dir(),
        "1 0.5 0.5 0.5 1 2 3 0.5\n",
    );

    let mut sink = MemorySink::new();
    let stats = emit_scene(root.path(), &mut sink, EmitConfig::default())
        .expect("one bad cluster must not abort");

    let paths = sink
        .events()
        .iter()
        .map(|event| event.path.as_str())
        .collect::<Vec<_>>();
    assert_eq!(paths, vec!["clusters/C_2_ba_output/points"]);

    assert_eq!(stats.clusters_emitted, 1);
    assert_eq!(stats.parse_failures, 1);
}

/// Test that a corrupt pose table drops the camera markers but keeps the
/// cluster's cloud in the stream.
#[test]
fn pose_table_failure_keeps_the_cloud() {
    let root = tempfile::tempdir().expect("create temp dir");

    write_cluster_points(
        root.path(),
        &ClusterId::Group(1).relative_dir(),
        "1 0.0 0.0 0.0 255 0 0 0.5\n",
    );
    write_pose_tables(
        root.path(),
        &ClusterId::Group(1).relative_dir(),
        "1 PINHOLE 100 100 50.0\n",
        "1 not-a-number 0.0 0.0 0.0 0.0 0.0 0.0 1 a.jpg\n",
    );

    let mut sink = MemorySink::new();
    let stats = emit_scene(root.path(), &mut sink, EmitConfig::default())
        .expect("pose failure must not abort");

    let paths = sink
        .events()
        .iter()
        .map(|event| event.path.as_str())
        .collect::<Vec<_>>();
    assert_eq!(paths, vec!["clusters/C_1_ba_output/points"]);

    assert_eq!(stats.clusters_emitted, 1);
    assert_eq!(stats.cameras_emitted, 0);
    assert_eq!(stats.parse_failures, 1);
}

/// Test that camera markers require both pose tables.
#[test]
fn camera_markers_need_both_tables() {
    let root = tempfile::tempdir().expect("create temp dir");
    let relative = ClusterId::Group(3).relative_dir();

    write_cluster_points(root.path(), &relative, "1 0.0 0.0 0.0 255 0 0 0.5\n");
    // cameras.txt alone, no images.txt
    fs::write(
        root.path().join(&relative).join("cameras.txt"),
        "1 PINHOLE 100 100 50.0\n",
    )
    .expect("write cameras.txt");

    let mut sink = MemorySink::new();
    let stats = emit_scene(root.path(), &mut sink, EmitConfig::default())
        .expect("missing images.txt is not an error");

    assert_eq!(sink.events().len(), 1);
    assert_eq!(stats.cameras_emitted, 0);
    assert_eq!(stats.parse_failures, 0);
}

/// Test that a present but pointless points file still produces its
/// event, so the cluster shows up in the viewer tree.
#[test]
fn empty_points_file_still_emits_its_event() {
    let root = tempfile::tempdir().expect("create temp dir");

    write_cluster_points(
        root.path(),
        &ClusterId::Leaf(1, 1).relative_dir(),
        "# only comments in here\n",
    );

    let mut sink = MemorySink::new();
    let stats = emit_scene(root.path(), &mut sink, EmitConfig::default())
        .expect("empty cloud is not an error");

    assert_eq!(sink.events().len(), 1);
    assert_eq!(sink.events()[0].path, "clusters/C_1_C_1_1_ba_output/points");
    assert!(sink.events()[0].positions.is_empty());
    assert_eq!(stats.clusters_emitted, 1);
    assert_eq!(stats.points_emitted, 0);
}

/// Test a fully populated tree: every slot emits under its own name, no
/// two events collide, and the merged layer is the very last event.
#[test]
fn event_names_are_unique_across_a_full_tree() {
    let root = tempfile::tempdir().expect("create temp dir");

    for id in ClusterId::candidates() {
        write_cluster_points(
            root.path(),
            &id.relative_dir(),
            "1 0.0 0.0 0.0 255 255 255 0.5\n",
        );
        write_pose_tables(
            root.path(),
            &id.relative_dir(),
            "1 PINHOLE 100 100 50.0\n",
            "1 1.0 0.0 0.0 0.0 0.0 0.0 0.0 1 cam.jpg\n0.0 0.0 1\n",
        );
    }

    let mut sink = MemorySink::new();
    let stats = emit_scene(root.path(), &mut sink, EmitConfig::default())
        .expect("full tree must emit");

    // 21 clouds, 21 camera markers and the final layer
    assert_eq!(sink.events().len(), 43);

    let unique = sink
        .events()
        .iter()
        .map(|event| event.path.as_str())
        .collect::<HashSet<_>>();
    assert_eq!(unique.len(), sink.events().len());

    // cloud events come out in candidate order
    let cloud_paths = sink
        .events()
        .iter()
        .map(|event| event.path.as_str())
        .filter(|path| path.starts_with("clusters/") && path.ends_with("/points"))
        .collect::<Vec<_>>();
    let expected = ClusterId::candidates()
        .map(|id| format!("clusters/{}/points", id.entity_key()))
        .collect::<Vec<_>>();
    assert_eq!(cloud_paths, expected);

    let last = sink.events().last().expect("stream is not empty");
    assert_eq!(last.path, "final_reconstruction/points");

    assert_eq!(stats.clusters_emitted, 21);
    assert_eq!(stats.cameras_emitted, 21);
    assert_eq!(stats.points_emitted, 22);
}
