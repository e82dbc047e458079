// Concurrent imports and shared read-only scenes.

use std::sync::Arc;
use std::thread;

use cassimp::{Importer, PostProcessSteps, Scene};

fn cube(scale: f32) -> String {
    let mut obj = String::new();
    for (x, y, z) in [
        (-1, -1, 1),
        (1, -1, 1),
        (1, 1, 1),
        (-1, 1, 1),
        (-1, -1, -1),
        (1, -1, -1),
        (1, 1, -1),
        (-1, 1, -1),
    ] {
        obj += &format!("v {} {} {}\n", x as f32 * scale, y as f32 * scale, z as f32 * scale);
    }
    obj += "f 1 2 3 4\nf 8 7 6 5\nf 4 3 7 8\nf 5 1 4 8\nf 5 6 2 1\nf 2 6 7 3\n";
    obj
}

#[test]
fn parallel_imports_are_independent() {
    let handles: Vec<_> = (1..=8)
        .map(|i| {
            thread::spawn(move || {
                let source = cube(i as f32);
                let scene = Importer::new()
                    .read_from_memory(source.as_bytes())
                    .with_hint("obj")
                    .with_post_process(PostProcessSteps::TRIANGULATE)
                    .import()
                    .unwrap();
                (i, scene.mesh(0).unwrap().aabb().max.x)
            })
        })
        .collect();

    for handle in handles {
        let (i, max_x) = handle.join().unwrap();
        assert_eq!(max_x, i as f32);
    }
}

#[test]
fn one_scene_read_from_many_threads() {
    let source = cube(1.0);
    let scene = Arc::new(
        Scene::from_memory(source.as_bytes(), Some("obj"), PostProcessSteps::TRIANGULATE).unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scene = Arc::clone(&scene);
            thread::spawn(move || {
                scene
                    .meshes()
                    .map(|m| m.faces().map(|f| f.num_indices()).sum::<usize>())
                    .sum::<usize>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 36);
    }
}

#[test]
fn scene_moves_to_another_thread() {
    let source = cube(3.0);
    let scene = Scene::from_memory(source.as_bytes(), Some("obj"), PostProcessSteps::empty()).unwrap();
    let count = thread::spawn(move || scene.mesh(0).map(|m| m.num_vertices())).join().unwrap();
    assert!(count.unwrap() >= 8);
}
