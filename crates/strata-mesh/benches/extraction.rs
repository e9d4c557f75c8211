use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::IVec3;
use strata_mesh::*;
use strata_volume::{GeneratorPager, PagedVolume, Region};

/// Rolling terrain: solid below a sine-shaped height field.
fn terrain_volume() -> PagedVolume<u8> {
    let pager = GeneratorPager::new(|p: IVec3| {
        let height = 32.0 + 8.0 * ((p.x as f32) * 0.1).sin() * ((p.z as f32) * 0.07).cos();
        if (p.y as f32) < height { 1u8 } else { 0 }
    });
    PagedVolume::new(Region::new(IVec3::ZERO, IVec3::splat(127)), 5, 512, pager)
        .expect("valid volume settings")
}

fn bench_extract_level_0(c: &mut Criterion) {
    let volume = terrain_volume();
    let region = Region::new(IVec3::ZERO, IVec3::splat(63));
    c.bench_function("extract_level_0_64", |bencher| {
        bencher.iter(|| black_box(extract_decimated_surface_to_mesh(&volume, 0, region)))
    });
}

fn bench_extract_level_2(c: &mut Criterion) {
    let volume = terrain_volume();
    let region = Region::new(IVec3::ZERO, IVec3::splat(127));
    c.bench_function("extract_level_2_128", |bencher| {
        bencher.iter(|| black_box(extract_decimated_surface_to_mesh(&volume, 2, region)))
    });
}

fn bench_reuse_mesh(c: &mut Criterion) {
    let volume = terrain_volume();
    let region = Region::new(IVec3::ZERO, IVec3::splat(63));
    let mut mesh = Mesh::<u32>::new();
    c.bench_function("extract_level_1_reused_mesh", |bencher| {
        bencher.iter(|| {
            extract_decimated_surface(&volume, 1, region, &mut mesh)
                .expect("extraction succeeds");
            black_box(mesh.vertex_count())
        })
    });
}

criterion_group!(benches, bench_extract_level_0, bench_extract_level_2, bench_reuse_mesh);
criterion_main!(benches);
