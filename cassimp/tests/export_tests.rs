// Export to disk and memory, then read the result back.

use cassimp::exporter::formats;
use cassimp::{Error, Exporter, PostProcessSteps, Scene};

const QUAD: &[u8] = b"o Quad\nv 0 0 0\nv 2 0 0\nv 2 2 0\nv 0 2 0\nf 1 2 3 4\n";

fn quad() -> Scene {
    Scene::from_memory(QUAD, Some("obj"), PostProcessSteps::TRIANGULATE).unwrap()
}

#[test]
fn ply_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.ply");

    Exporter::export_to_file(&quad(), formats::PLY, &path, PostProcessSteps::empty()).unwrap();
    assert!(path.exists());

    let back = Scene::from_file(&path, PostProcessSteps::empty()).unwrap();
    let mesh = back.mesh(0).unwrap();
    assert_eq!(mesh.num_faces(), 2);
    assert_eq!(mesh.aabb().max.x, 2.0);
}

#[test]
fn blob_reimports_from_memory() {
    let blob = Exporter::export_to_blob(&quad(), formats::STL, PostProcessSteps::empty()).unwrap();
    assert_eq!(blob.len(), 1);
    assert_eq!(blob.primary().name(), "");

    let back = Scene::from_memory(blob.data(), Some("stl"), PostProcessSteps::empty()).unwrap();
    assert_eq!(back.mesh(0).unwrap().num_faces(), 2);
}

#[test]
fn export_runs_post_processing_on_the_output() {
    let blob = Exporter::export_to_blob(
        &quad(),
        formats::OBJ,
        PostProcessSteps::GEN_NORMALS,
    )
    .unwrap();
    let text = String::from_utf8_lossy(blob.data());
    assert!(text.lines().any(|l| l.starts_with("vn ")));
}

#[test]
fn blob_outlives_its_scene_and_moves_across_threads() {
    let blob = Exporter::export_to_blob(&quad(), formats::PLY_BINARY, PostProcessSteps::empty()).unwrap();
    let size = std::thread::spawn(move || blob.data().len()).join().unwrap();
    assert!(size > 0);
}

#[test]
fn unknown_format_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.xyz");
    let err = Exporter::export_to_file(&quad(), "xyz", &path, PostProcessSteps::empty()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
    assert!(!path.exists());
}

#[test]
fn copied_scene_exports_like_the_original() {
    let original = quad();
    let copy = Exporter::copy_scene(&original).unwrap();
    let a = Exporter::export_to_blob(&original, formats::OBJ, PostProcessSteps::empty()).unwrap();
    let b = Exporter::export_to_blob(&copy, formats::OBJ, PostProcessSteps::empty()).unwrap();
    assert_eq!(a.data(), b.data());
}
