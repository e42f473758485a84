//! Benchmarks for topology extraction and selection.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::{Point3, Vector3};
use polygroup::prelude::*;

/// Flat grid of quad cells, each cell its own group.
fn grid_of_groups(cols: usize, rows: usize) -> TriMesh {
    let mut positions = Vec::with_capacity((cols + 1) * (rows + 1));
    for j in 0..=rows {
        for i in 0..=cols {
            positions.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    let mut triangles = Vec::with_capacity(cols * rows * 2);
    let mut groups = Vec::with_capacity(cols * rows * 2);
    for j in 0..rows {
        for i in 0..cols {
            let v00 = j * (cols + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (cols + 1);
            let v11 = v01 + 1;
            let cell = j * cols + i;

            triangles.push([v00, v10, v11]);
            triangles.push([v00, v11, v01]);
            groups.push(cell);
            groups.push(cell);
        }
    }
    TriMesh::from_triangles(&positions, &triangles, &groups).unwrap()
}

fn bench_rebuild_topology(c: &mut Criterion) {
    c.bench_function("rebuild_grid_16x16", |b| {
        let mesh = grid_of_groups(16, 16);
        b.iter(|| GroupTopology::new(mesh.clone()).unwrap())
    });

    c.bench_function("rebuild_per_triangle_16x16", |b| {
        let mesh = grid_of_groups(16, 16);
        b.iter(|| GroupTopology::per_triangle(mesh.clone()))
    });
}

fn bench_selection(c: &mut Criterion) {
    c.bench_function("select_corner_grid_16x16", |b| {
        let topology = GroupTopology::new(grid_of_groups(16, 16)).unwrap();
        let spatial = LinearMeshSpatial::new(topology.mesh());
        let mut selector = TopologySelector::new();
        selector.set_tolerance(0.2);
        let ray = Ray3::new(Point3::new(8.0, 8.0, 4.0), Vector3::new(0.0, 0.0, -1.0));
        let settings = SelectionSettings::default();

        b.iter(|| selector.find_selected_element(&topology, &ray, &settings, &spatial))
    });
}

fn bench_loop_expansion(c: &mut Criterion) {
    c.bench_function("edge_loop_grid_32x32", |b| {
        let topology = GroupTopology::new(grid_of_groups(32, 32)).unwrap();
        let pair = GroupId::sorted_pair(GroupId::new(16), GroupId::new(48));
        let start = (0..topology.edge_count())
            .map(GroupEdgeId::new)
            .find(|&e| topology.group_edge(e).groups == pair)
            .unwrap();

        b.iter(|| {
            let mut selection = TopologySelection::new();
            expand_selection_by_edge_loops(&topology, &mut selection, &[start]);
            selection
        })
    });
}

criterion_group!(
    benches,
    bench_rebuild_topology,
    bench_selection,
    bench_loop_expansion
);
criterion_main!(benches);
