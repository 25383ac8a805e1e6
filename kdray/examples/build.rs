//! Builds a k-d tree over a procedural scene and prints its statistics.
//!
//! ```text
//! RUST_LOG=debug cargo run --example build --features metrics -- \
//!     [path/to/kdray.cfg] [grid-size]
//! ```

use std::env;
use std::error::Error;

use kdray::{Aggregate, Config, KdTreeConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);

    let config = match args.next() {
        Some(path) => KdTreeConfig::from_config(&Config::load(path)?),
        None => KdTreeConfig::default(),
    };

    let size = match args.next() {
        Some(size) => size.parse()?,
        None => 24,
    };

    let vertices = terrain(size);
    let triangles = kdray::triangles_from_vertices(&vertices);
    let aggregate = Aggregate::new(&triangles, config);
    let tree = aggregate.tree();

    println!("triangles: {}", triangles.len());
    println!("max depth: {}", tree.max_depth());
    println!("{}", tree.stats());

    println!(
        "buffers: nodes = {} B, indices = {} B, triangles = {} B",
        aggregate.nodes_as_bytes().len(),
        aggregate.indices_as_bytes().len(),
        aggregate.woop_triangles_as_bytes().len(),
    );

    println!("fingerprint: {:016x}", tree.fingerprint());

    if tree.node_count() <= 64 {
        print!("{}", tree);
    }

    Ok(())
}

/// Generates a wavy `size` x `size` heightfield, two triangles per cell, as
/// a flat buffer of `xyzw` vertices.
fn terrain(size: usize) -> Vec<f32> {
    let height = |x: usize, z: usize| {
        let (x, z) = (x as f32, z as f32);

        (x * 0.35).sin() * (z * 0.25).cos() * 2.0
    };

    let vertex = |x: usize, z: usize| [x as f32, height(x, z), z as f32, 1.0];

    let mut vertices = Vec::new();

    for x in 0..size {
        for z in 0..size {
            let v00 = vertex(x, z);
            let v10 = vertex(x + 1, z);
            let v01 = vertex(x, z + 1);
            let v11 = vertex(x + 1, z + 1);

            for v in [v00, v10, v11, v00, v11, v01] {
                vertices.extend(v);
            }
        }
    }

    vertices
}
