//! Benchmarks for mesh-orient operations.
//!
//! Run with: cargo bench -p mesh-orient
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-orient -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-orient -- --baseline main

#![allow(missing_docs, clippy::cast_possible_truncation, clippy::expect_used)]

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use mesh_orient::{OrientParams, fix_face_orientation, recalculate_normals};
use mesh_raycast::{BvhOracle, RaycastParams};
use mesh_types::{SubmeshMesh, Vector3, flip_winding, subdivided_box};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Box with `segments` x `segments` quads per side and every third triangle
/// wound backward.
fn scrambled_box(segments: u32) -> SubmeshMesh {
    let mut mesh = subdivided_box(Vector3::new(2.0, 1.0, 1.5), segments);
    let mut faces = mesh.submesh(0).expect("box has one submesh").to_vec();
    for face in faces.iter_mut().step_by(3) {
        flip_winding(face);
    }
    mesh.set_submesh(0, faces).expect("flipping keeps the triangle count");
    mesh
}

fn test_cases() -> [(&'static str, SubmeshMesh); 3] {
    [
        ("box_48tri", scrambled_box(2)),
        ("box_768tri", scrambled_box(8)),
        ("box_4800tri", scrambled_box(20)),
    ]
}

// =============================================================================
// Oracle Benchmarks
// =============================================================================

fn bench_bvh_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("BvhBuild");

    for (name, mesh) in &test_cases() {
        group.throughput(Throughput::Elements(mesh.triangle_count() as u64));

        group.bench_with_input(BenchmarkId::new("build", name), mesh, |b, mesh| {
            b.iter(|| BvhOracle::build(black_box(mesh), RaycastParams::default()));
        });
    }

    group.finish();
}

// =============================================================================
// Solver Benchmarks
// =============================================================================

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("Orientation");

    for (name, mesh) in &test_cases() {
        group.throughput(Throughput::Elements(mesh.triangle_count() as u64));

        group.bench_with_input(BenchmarkId::new("recalculate_normals", name), mesh, |b, mesh| {
            let oracle = BvhOracle::build(mesh, RaycastParams::default());
            b.iter_batched(
                || mesh.clone(),
                |mut m| recalculate_normals(&mut m, &oracle, 1),
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("fix_face_orientation", name), mesh, |b, mesh| {
            let params = OrientParams::thorough();
            b.iter_batched(
                || mesh.clone(),
                |mut m| fix_face_orientation(&mut m, black_box(&params)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_bvh_build, bench_solver);

criterion_main!(benches);
