//! Decimated marching cubes over a [`PagedVolume`].
//!
//! The region is walked slice by slice along Z on a grid of step
//! `s = 2^level`. Every grid point is the lower corner of a cell whose eight
//! corners are sub-sampled voxels (the minimum of the `s`-sided block at each
//! corner), classified empty or solid into an 8-bit cube index.
//!
//! Cube indices are shared between neighbouring cells: the previous slice, the
//! `x - s` neighbour and the `y - s` neighbour together supply every corner
//! except `(1, 1, 1)`, so an interior corner is sampled exactly once.
//!
//! Each grid point owns the +X, +Y and +Z edges leaving it. Vertices sit on
//! edge midpoints with an axis-aligned normal pointing from solid to empty.
//! Vertex indices are cached per slice so neighbouring cells reuse them, and
//! triangles for a slice are emitted once the vertices of the slice above it
//! exist.
//!
//! The last grid point along each axis only looks ahead: it contributes the
//! edges on the far faces of the last cells but owns no cell itself.

use glam::IVec3;
use strata_volume::{PagedVolume, Region, Sampler, Voxel};

use crate::error::{ExtractError, MeshError};
use crate::mesh::{Mesh, MeshIndex, MeshVertex};
use crate::tables::{CORNER_OFFSETS, EDGE_TABLE, TRI_TABLE};

/// Highest supported level of detail (step of 128 voxels).
pub const MAX_LEVEL: u8 = 7;

/// Corner bits copied from the cell at `x - s`.
const FROM_X_NEIGHBOUR: u8 = 0b1001_1001;
/// Corner bits copied from the cell at `y - s`.
const FROM_Y_NEIGHBOUR: u8 = 0b0011_0011;
/// Corner bits copied from the same cell one slice below.
const FROM_PREVIOUS_SLICE: u8 = 0b0000_1111;

/// Grid step in voxels for a level of detail.
pub fn step_size(level: u8) -> i32 {
    1 << level
}

/// Extracts the surface of `region` at `level` into `mesh`.
///
/// The mesh is cleared first. Its offset is set to the lower corner of the
/// region after cropping, and vertex positions are relative to it. The region
/// is cropped so every sub-sampled read stays inside the volume's enclosing
/// region; regions too small to hold one cell produce an empty mesh.
pub fn extract_decimated_surface<V: Voxel, I: MeshIndex>(
    volume: &PagedVolume<V>,
    level: u8,
    region: Region,
    mesh: &mut Mesh<I>,
) -> Result<(), ExtractError> {
    if level > MAX_LEVEL {
        return Err(ExtractError::LevelTooLarge {
            level,
            max: MAX_LEVEL,
        });
    }

    mesh.clear();
    let step = step_size(level);
    let region = cropped_region(volume, region, step);
    mesh.set_offset(region.lower());

    let Some(grid) = Grid::new(&region, step) else {
        tracing::debug!(?region, level, "region holds no cells, nothing to extract");
        return Ok(());
    };

    let mut classifier = volume.sampler();
    let mut vertex_sampler = volume.sampler();
    let mut current = Slice::new(grid.slice_len());
    let mut next = Slice::new(grid.slice_len());

    current.non_empty = classify_slice(&mut classifier, &grid, level, 0, None, &mut current.masks);
    generate_vertices(&mut vertex_sampler, &grid, level, 0, &mut current, mesh)?;

    for k in 0..grid.cells.z {
        next.non_empty = classify_slice(
            &mut classifier,
            &grid,
            level,
            k + 1,
            Some(&current.masks),
            &mut next.masks,
        );
        generate_vertices(&mut vertex_sampler, &grid, level, k + 1, &mut next, mesh)?;

        if current.non_empty != 0 {
            generate_indices(&grid, &current, &next, mesh);
        }
        tracing::trace!(
            slice = k,
            active_cells = current.non_empty,
            vertices = mesh.vertex_count(),
            "extracted slice"
        );

        std::mem::swap(&mut current, &mut next);
    }

    tracing::debug!(
        level,
        lower = ?region.lower(),
        upper = ?region.upper(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "extracted decimated surface"
    );
    Ok(())
}

/// Convenience wrapper returning a fresh 32-bit indexed mesh.
pub fn extract_decimated_surface_to_mesh<V: Voxel>(
    volume: &PagedVolume<V>,
    level: u8,
    region: Region,
) -> Result<Mesh<u32>, ExtractError> {
    let mut mesh = Mesh::new();
    extract_decimated_surface(volume, level, region, &mut mesh)?;
    Ok(mesh)
}

/// Cube index of the cell at `lower`, sampling all eight corners directly.
pub fn classify_cell<V: Voxel>(sampler: &mut Sampler<'_, V>, lower: IVec3, level: u8) -> u8 {
    let step = step_size(level);
    let mut cube = 0u8;
    for (bit, offset) in CORNER_OFFSETS.iter().enumerate() {
        if sample(sampler, lower + IVec3::from_array(*offset) * step, level).is_empty() {
            cube |= 1 << bit;
        }
    }
    cube
}

fn cropped_region<V: Voxel>(volume: &PagedVolume<V>, mut region: Region, step: i32) -> Region {
    let mut bounds = volume.enclosing_region();
    bounds.shift_upper(IVec3::splat(-(2 * step - 1)));
    region.crop_to(&bounds);
    region
}

/// Sub-sampled voxel at `position`, stepping the cursor when it is one voxel
/// behind on X.
fn sample<V: Voxel>(sampler: &mut Sampler<'_, V>, position: IVec3, level: u8) -> V {
    let delta = position - sampler.position();
    if delta == IVec3::X {
        sampler.move_positive_x();
    } else if delta != IVec3::ZERO {
        sampler.set_position_vec(position);
    }
    sampler.sub_sampled_voxel(level)
}

/// Grid points `lower + (i, j, k) * step` for `0 <= (i, j, k) <= cells`.
#[derive(Clone, Copy, Debug)]
struct Grid {
    lower: IVec3,
    step: i32,
    cells: IVec3,
}

impl Grid {
    /// Returns `None` if the region holds no complete cell on some axis.
    fn new(region: &Region, step: i32) -> Option<Self> {
        if !region.is_valid() {
            return None;
        }
        let cells = (region.upper() - region.lower()) / step;
        if cells.cmpeq(IVec3::ZERO).any() {
            return None;
        }
        Some(Self {
            lower: region.lower(),
            step,
            cells,
        })
    }

    fn row_len(&self) -> usize {
        self.cells.x as usize + 1
    }

    fn slice_len(&self) -> usize {
        self.row_len() * (self.cells.y as usize + 1)
    }

    fn index(&self, i: i32, j: i32) -> usize {
        j as usize * self.row_len() + i as usize
    }

    fn point(&self, i: i32, j: i32, k: i32) -> IVec3 {
        self.lower + IVec3::new(i, j, k) * self.step
    }
}

/// Per-slice scratch buffers.
struct Slice<I> {
    masks: Vec<u8>,
    x_vertices: Vec<Option<I>>,
    y_vertices: Vec<Option<I>>,
    z_vertices: Vec<Option<I>>,
    /// Cells whose cube index crosses the surface.
    non_empty: usize,
}

impl<I: MeshIndex> Slice<I> {
    fn new(len: usize) -> Self {
        Self {
            masks: vec![0; len],
            x_vertices: vec![None; len],
            y_vertices: vec![None; len],
            z_vertices: vec![None; len],
            non_empty: 0,
        }
    }

    fn clear_vertices(&mut self) {
        self.x_vertices.fill(None);
        self.y_vertices.fill(None);
        self.z_vertices.fill(None);
    }
}

/// Computes the cube index of every grid point in slice `k`, reusing corners
/// from already classified neighbours. Returns the number of cells the
/// surface passes through.
fn classify_slice<V: Voxel>(
    sampler: &mut Sampler<'_, V>,
    grid: &Grid,
    level: u8,
    k: i32,
    previous: Option<&[u8]>,
    masks: &mut [u8],
) -> usize {
    let mut non_empty = 0;
    for j in 0..=grid.cells.y {
        for i in 0..=grid.cells.x {
            let mut cube = 0u8;
            let mut known = 0u8;

            if let Some(previous) = previous {
                cube |= previous[grid.index(i, j)] >> 4;
                known |= FROM_PREVIOUS_SLICE;
            }
            if i > 0 {
                let px = masks[grid.index(i - 1, j)];
                cube |= ((px & 2) >> 1) | ((px & 4) << 1) | ((px & 32) >> 1) | ((px & 64) << 1);
                known |= FROM_X_NEIGHBOUR;
            }
            if j > 0 {
                let py = masks[grid.index(i, j - 1)];
                cube |= ((py & 8) >> 3) | ((py & 4) >> 1) | ((py & 128) >> 3) | ((py & 64) >> 1);
                known |= FROM_Y_NEIGHBOUR;
            }

            let lower = grid.point(i, j, k);
            for (bit, offset) in CORNER_OFFSETS.iter().enumerate() {
                if known & (1 << bit) != 0 {
                    continue;
                }
                let corner = lower + IVec3::from_array(*offset) * grid.step;
                if sample(sampler, corner, level).is_empty() {
                    cube |= 1 << bit;
                }
            }

            masks[grid.index(i, j)] = cube;
            if EDGE_TABLE[cube as usize] != 0 {
                non_empty += 1;
            }
        }
    }
    non_empty
}

/// Creates the vertices on the edges owned by each grid point of slice `k`.
fn generate_vertices<V: Voxel, I: MeshIndex>(
    sampler: &mut Sampler<'_, V>,
    grid: &Grid,
    level: u8,
    k: i32,
    slice: &mut Slice<I>,
    mesh: &mut Mesh<I>,
) -> Result<(), MeshError> {
    slice.clear_vertices();
    if slice.non_empty == 0 {
        return Ok(());
    }

    for j in 0..=grid.cells.y {
        for i in 0..=grid.cells.x {
            let cell = grid.index(i, j);
            let edges = EDGE_TABLE[slice.masks[cell] as usize];
            if edges == 0 {
                continue;
            }

            let lower = grid.point(i, j, k);
            let v000 = sample(sampler, lower, level);

            // Edges leaving the grid on the far faces have no owner.
            if edges & 1 != 0 && i < grid.cells.x {
                slice.x_vertices[cell] =
                    Some(add_edge_vertex(sampler, mesh, grid, level, lower, v000, IVec3::X)?);
            }
            if edges & 8 != 0 && j < grid.cells.y {
                slice.y_vertices[cell] =
                    Some(add_edge_vertex(sampler, mesh, grid, level, lower, v000, IVec3::Y)?);
            }
            if edges & 256 != 0 && k < grid.cells.z {
                slice.z_vertices[cell] =
                    Some(add_edge_vertex(sampler, mesh, grid, level, lower, v000, IVec3::Z)?);
            }
        }
    }
    Ok(())
}

fn add_edge_vertex<V: Voxel, I: MeshIndex>(
    sampler: &mut Sampler<'_, V>,
    mesh: &mut Mesh<I>,
    grid: &Grid,
    level: u8,
    lower: IVec3,
    v000: V,
    axis: IVec3,
) -> Result<I, MeshError> {
    let other = sample(sampler, lower + axis * grid.step, level);
    let direction = axis.as_vec3();
    let position = (lower - grid.lower).as_vec3() + direction * (grid.step as f32 * 0.5);
    let normal = if v000 > other { direction } else { -direction };
    // One side is empty, so the OR is the solid side's material.
    let material = (v000 | other).material_id();
    mesh.add_vertex(MeshVertex::new(position, normal, material))
}

/// Emits the triangles of every cell in `current`, whose upper face lies in
/// `next`.
fn generate_indices<I: MeshIndex>(
    grid: &Grid,
    current: &Slice<I>,
    next: &Slice<I>,
    mesh: &mut Mesh<I>,
) {
    for j in 0..grid.cells.y {
        for i in 0..grid.cells.x {
            let here = grid.index(i, j);
            let cube = current.masks[here] as usize;
            if EDGE_TABLE[cube] == 0 {
                continue;
            }

            let right = grid.index(i + 1, j);
            let up = grid.index(i, j + 1);
            let diagonal = grid.index(i + 1, j + 1);
            let edge_vertices = [
                current.x_vertices[here],
                current.y_vertices[right],
                current.x_vertices[up],
                current.y_vertices[here],
                next.x_vertices[here],
                next.y_vertices[right],
                next.x_vertices[up],
                next.y_vertices[here],
                current.z_vertices[here],
                current.z_vertices[right],
                current.z_vertices[diagonal],
                current.z_vertices[up],
            ];

            for triangle in TRI_TABLE[cube].chunks_exact(3).take_while(|t| t[0] >= 0) {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                    .map(|edge| edge_vertices[edge as usize]);
                match (a, b, c) {
                    (Some(a), Some(b), Some(c)) => mesh.add_triangle(a, b, c),
                    _ => debug_assert!(
                        false,
                        "missing edge vertex in cell ({i}, {j}), cube {cube:#04x}"
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use glam::Vec3;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;
    use strata_volume::{EmptyPager, GeneratorPager};

    use super::*;

    fn bounds(max: i32) -> Region {
        Region::new(IVec3::ZERO, IVec3::splat(max))
    }

    fn box_volume(solid: Region, material: u8) -> PagedVolume<u8> {
        let pager = GeneratorPager::new(move |p: IVec3| {
            if solid.contains_point(p) { material } else { 0 }
        });
        PagedVolume::new(bounds(31), 3, 256, pager).unwrap()
    }

    /// Seeded random solid/empty field over `0..size` on every axis.
    fn random_volume(seed: u64, size: i32, solid_probability: f64) -> PagedVolume<u8> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let len = (size * size * size) as usize;
        let cells: Vec<u8> = (0..len)
            .map(|_| if rng.gen_bool(solid_probability) { rng.gen_range(1..4) } else { 0 })
            .collect();
        let pager = GeneratorPager::new(move |p: IVec3| {
            if p.cmplt(IVec3::ZERO).any() || p.cmpge(IVec3::splat(size)).any() {
                return 0;
            }
            cells[(p.x + p.y * size + p.z * size * size) as usize]
        });
        PagedVolume::new(bounds(size - 1), 2, 64, pager).unwrap()
    }

    fn assert_indices_in_range<I: MeshIndex>(mesh: &Mesh<I>) {
        for index in mesh.indices() {
            assert!(index.to_usize() < mesh.vertex_count());
        }
    }

    fn assert_watertight<I: MeshIndex>(mesh: &Mesh<I>) {
        let mut edges: HashMap<(usize, usize), usize> = HashMap::new();
        for triangle in mesh.triangles() {
            let [a, b, c] = triangle.map(|i| i.to_usize());
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *edges.entry((u.min(v), u.max(v))).or_default() += 1;
            }
        }
        assert!(!edges.is_empty());
        for (edge, count) in edges {
            assert_eq!(count, 2, "edge {edge:?} used by {count} triangles");
        }
    }

    fn assert_normals_point_outward(mesh: &Mesh<u32>, center: Vec3) {
        let offset = mesh.offset().as_vec3();
        for vertex in mesh.vertices() {
            let world = vertex.position() + offset;
            assert_eq!(vertex.normal().length(), 1.0);
            assert!(
                vertex.normal().dot(world - center) > 0.0,
                "normal {:?} at {world} points inward",
                vertex.normal()
            );
        }
    }

    #[test]
    fn test_step_size() {
        assert_eq!(step_size(0), 1);
        assert_eq!(step_size(1), 2);
        assert_eq!(step_size(3), 8);
        assert_eq!(step_size(MAX_LEVEL), 128);
    }

    #[test]
    fn test_level_above_maximum_is_rejected() {
        let volume = PagedVolume::<u8>::new(bounds(15), 3, 8, EmptyPager).unwrap();
        let result = extract_decimated_surface_to_mesh(&volume, 8, bounds(15));
        assert_eq!(result, Err(ExtractError::LevelTooLarge { level: 8, max: MAX_LEVEL }));
    }

    #[test]
    fn test_single_voxel_gives_octahedron() {
        let volume = box_volume(Region::new(IVec3::splat(5), IVec3::splat(5)), 3);
        let mesh = extract_decimated_surface_to_mesh(&volume, 0, bounds(31)).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.index_count(), 24);
        assert!(mesh.vertices().iter().all(|v| v.material == 3));
        assert_watertight(&mesh);
        assert_normals_point_outward(&mesh, Vec3::splat(5.0));
    }

    #[test]
    fn test_box_gives_closed_outward_shell() {
        let solid = Region::new(IVec3::splat(2), IVec3::splat(4));
        let volume = box_volume(solid, 7);
        let mesh = extract_decimated_surface_to_mesh(&volume, 0, bounds(31)).unwrap();

        // One vertex per solid/empty voxel pair across the six faces.
        assert_eq!(mesh.vertex_count(), 54);
        assert!(mesh.vertices().iter().all(|v| v.material == 7));
        assert_indices_in_range(&mesh);
        assert_watertight(&mesh);
        assert_normals_point_outward(&mesh, Vec3::splat(3.0));
    }

    #[test]
    fn test_level_one_box_is_decimated() {
        let solid = Region::new(IVec3::splat(4), IVec3::splat(11));
        let volume = box_volume(solid, 2);
        let mesh = extract_decimated_surface_to_mesh(&volume, 1, bounds(31)).unwrap();

        // The 8^3 box becomes a 4^3 box of 2-voxel blocks.
        assert_eq!(mesh.vertex_count(), 6 * 16);
        assert_watertight(&mesh);
        assert_normals_point_outward(&mesh, Vec3::splat(7.0));
        for vertex in mesh.vertices() {
            let p = vertex.position();
            assert!(p.min_element() >= 3.0 && p.max_element() <= 12.0, "{p}");
        }
    }

    #[test]
    fn test_all_empty_and_all_solid_give_empty_mesh() {
        let empty = PagedVolume::<u8>::new(bounds(15), 3, 64, EmptyPager).unwrap();
        let mesh = extract_decimated_surface_to_mesh(&empty, 0, bounds(15)).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);

        let pager = GeneratorPager::new(|_: IVec3| 5u8);
        let solid = PagedVolume::<u8>::new(bounds(15), 3, 64, pager).unwrap();
        let mesh = extract_decimated_surface_to_mesh(&solid, 0, bounds(15)).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_notch_cube_index_depends_on_level() {
        let pager = GeneratorPager::new(|_: IVec3| 1u8);
        let mut volume = PagedVolume::<u8>::new(bounds(15), 3, 64, pager).unwrap();
        volume.set_voxel(3, 2, 2, 0);
        let mut sampler = volume.sampler();

        // At level 1 the notch empties the whole block of corner 0.
        assert_eq!(classify_cell(&mut sampler, IVec3::splat(2), 1), 0b0000_0001);
        // At level 0 the notch is corner 1 of the same cell.
        assert_eq!(classify_cell(&mut sampler, IVec3::splat(2), 0), 0b0000_0010);
        assert_eq!(classify_cell(&mut sampler, IVec3::new(3, 2, 2), 0), 0b0000_0001);
    }

    /// Every vertex lies `radius` from `center` with its normal facing it.
    fn assert_cavity_around(mesh: &Mesh<u32>, center: Vec3, radius: f32) {
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_watertight(mesh);
        let offset = mesh.offset().as_vec3();
        for vertex in mesh.vertices() {
            let world = vertex.position() + offset;
            assert_eq!(vertex.material, 1);
            assert_eq!(world.distance(center), radius, "vertex at {world}");
            assert!(vertex.normal().dot(center - world) > 0.0, "normal at {world}");
        }
    }

    #[test]
    fn test_notch_extracts_as_cavity_at_both_levels() {
        let pager = GeneratorPager::new(|_: IVec3| 1u8);
        let mut volume = PagedVolume::<u8>::new(bounds(15), 3, 64, pager).unwrap();
        volume.set_voxel(3, 2, 2, 0);

        // Level 0: the single empty voxel, enclosed by half-step vertices.
        let mesh = extract_decimated_surface_to_mesh(&volume, 0, bounds(15)).unwrap();
        assert_cavity_around(&mesh, Vec3::new(3.0, 2.0, 2.0), 0.5);

        // Level 1: the empty voxel erodes the whole block at grid point (2, 2, 2).
        let mesh = extract_decimated_surface_to_mesh(&volume, 1, bounds(15)).unwrap();
        assert_eq!(mesh.offset(), IVec3::ZERO);
        assert_cavity_around(&mesh, Vec3::splat(2.0), 1.0);
    }

    #[test]
    fn test_propagated_cube_indices_match_direct_classification() {
        for (level, density) in [(0u8, 0.5), (1, 0.9), (2, 0.99)] {
            let volume = random_volume(u64::from(level) + 11, 24, density);
            let step = step_size(level);
            let region = cropped_region(&volume, bounds(23), step);
            let grid = Grid::new(&region, step).unwrap();

            let mut classifier = volume.sampler();
            let mut reference = volume.sampler();
            let mut previous = vec![0u8; grid.slice_len()];
            let mut masks = vec![0u8; grid.slice_len()];

            for k in 0..=grid.cells.z {
                let prev = (k > 0).then_some(previous.as_slice());
                classify_slice(&mut classifier, &grid, level, k, prev, &mut masks);
                for j in 0..=grid.cells.y {
                    for i in 0..=grid.cells.x {
                        let expected = classify_cell(&mut reference, grid.point(i, j, k), level);
                        assert_eq!(
                            masks[grid.index(i, j)],
                            expected,
                            "level {level} cell ({i}, {j}, {k})"
                        );
                    }
                }
                std::mem::swap(&mut previous, &mut masks);
            }
        }
    }

    #[test]
    fn test_random_fields_give_valid_meshes() {
        for (level, density) in [(0u8, 0.5), (1, 0.9), (2, 0.99)] {
            let volume = random_volume(u64::from(level) + 100, 24, density);
            let mesh = extract_decimated_surface_to_mesh(&volume, level, bounds(23)).unwrap();
            assert!(!mesh.is_empty(), "level {level}");
            assert_eq!(mesh.index_count() % 3, 0);
            assert_indices_in_range(&mesh);
            for vertex in mesh.vertices() {
                assert!((1..4).contains(&vertex.material));
            }
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let volume = random_volume(42, 20, 0.6);
        let first = extract_decimated_surface_to_mesh(&volume, 0, bounds(19)).unwrap();
        let second = extract_decimated_surface_to_mesh(&volume, 0, bounds(19)).unwrap();
        assert_eq!(first.vertices(), second.vertices());
        assert_eq!(first.indices(), second.indices());
    }

    #[test]
    fn test_offset_is_cropped_lower_corner() {
        let volume = box_volume(Region::new(IVec3::splat(5), IVec3::splat(5)), 1);

        let oversized = Region::new(IVec3::splat(-10), IVec3::splat(100));
        let mesh = extract_decimated_surface_to_mesh(&volume, 0, oversized).unwrap();
        assert_eq!(mesh.offset(), IVec3::ZERO);
        assert_eq!(mesh.vertex_count(), 6);

        let inner = Region::new(IVec3::splat(2), IVec3::splat(9));
        let mesh = extract_decimated_surface_to_mesh(&volume, 0, inner).unwrap();
        assert_eq!(mesh.offset(), IVec3::splat(2));
        let mut world: Vec<[f32; 3]> = mesh
            .vertices()
            .iter()
            .map(|v| (v.position() + mesh.offset().as_vec3()).to_array())
            .collect();
        world.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(world[0], [4.5, 5.0, 5.0]);
        assert_eq!(world[5], [5.5, 5.0, 5.0]);
    }

    #[test]
    fn test_region_without_cells_gives_empty_mesh() {
        let volume = box_volume(Region::new(IVec3::splat(5), IVec3::splat(5)), 1);
        let single = Region::new(IVec3::splat(5), IVec3::splat(5));
        let mesh = extract_decimated_surface_to_mesh(&volume, 0, single).unwrap();
        assert!(mesh.is_empty());

        let outside = Region::new(IVec3::splat(40), IVec3::splat(50));
        let mesh = extract_decimated_surface_to_mesh(&volume, 0, outside).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_reused_mesh_is_cleared() {
        let volume = box_volume(Region::new(IVec3::splat(5), IVec3::splat(5)), 1);
        let mut mesh = Mesh::<u32>::new();
        extract_decimated_surface(&volume, 0, bounds(31), &mut mesh).unwrap();
        extract_decimated_surface(&volume, 0, bounds(31), &mut mesh).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn test_u16_mesh_reports_capacity_exceeded() {
        let pager = GeneratorPager::new(|p: IVec3| ((p.x + p.y + p.z) & 1) as u8);
        let volume = PagedVolume::<u8>::new(bounds(47), 4, 64, pager).unwrap();
        let mut mesh = Mesh::<u16>::new();
        let result = extract_decimated_surface(&volume, 0, bounds(47), &mut mesh);
        assert_eq!(
            result,
            Err(ExtractError::Mesh(MeshError::CapacityExceeded { max: 65_535 }))
        );
    }
}
