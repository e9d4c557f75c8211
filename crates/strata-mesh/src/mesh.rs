//! Indexed triangle mesh produced by surface extraction.

use std::fmt::Debug;

use glam::{IVec3, Vec3};

use crate::error::MeshError;

/// Integer type used for triangle indices.
pub trait MeshIndex: Copy + Debug + Eq + Send + Sync + bytemuck::Pod + 'static {
    /// Largest representable index.
    const MAX: usize;

    /// Converts a vertex position. The caller guarantees `value <= MAX`.
    fn from_usize(value: usize) -> Self;

    fn to_usize(self) -> usize;
}

macro_rules! impl_mesh_index {
    ($($t:ty),*) => {
        $(
            impl MeshIndex for $t {
                const MAX: usize = <$t>::MAX as usize;

                #[inline]
                fn from_usize(value: usize) -> Self {
                    debug_assert!(value <= <Self as MeshIndex>::MAX);
                    value as $t
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_mesh_index!(u16, u32);

/// A single mesh vertex: 28 bytes, ready for GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position relative to the mesh offset.
    pub position: [f32; 3],
    /// Axis-aligned unit normal pointing from solid towards empty space.
    pub normal: [f32; 3],
    /// Material of the solid side of the surface.
    pub material: u32,
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 28]);

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, material: u32) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            material,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Vertices plus triangle indices, generic over the index width.
///
/// Vertex positions are relative to [`Mesh::offset`], the lower corner of the
/// region the mesh was extracted from.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh<I: MeshIndex = u32> {
    vertices: Vec<MeshVertex>,
    indices: Vec<I>,
    offset: IVec3,
}

impl<I: MeshIndex> Mesh<I> {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            offset: IVec3::ZERO,
        }
    }

    /// Appends a vertex and returns its index.
    ///
    /// Fails once the vertex count reaches the largest value of the index
    /// type, so every returned index is strictly below `I::MAX`.
    pub fn add_vertex(&mut self, vertex: MeshVertex) -> Result<I, MeshError> {
        if self.vertices.len() >= I::MAX {
            return Err(MeshError::CapacityExceeded { max: I::MAX });
        }
        self.vertices.push(vertex);
        Ok(I::from_usize(self.vertices.len() - 1))
    }

    /// Appends a triangle. All indices must refer to existing vertices.
    pub fn add_triangle(&mut self, i0: I, i1: I, i2: I) {
        debug_assert!(i0.to_usize() < self.vertices.len(), "index {i0:?} out of range");
        debug_assert!(i1.to_usize() < self.vertices.len(), "index {i1:?} out of range");
        debug_assert!(i2.to_usize() < self.vertices.len(), "index {i2:?} out of range");
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Removes all vertices and indices. The offset is kept.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// True if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[I] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn offset(&self) -> IVec3 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: IVec3) {
        self.offset = offset;
    }

    /// Iterates triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [I; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Drops vertices no triangle refers to and remaps the indices.
    ///
    /// Returns the number of vertices removed. Relative vertex order is kept.
    pub fn remove_unused_vertices(&mut self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for index in &self.indices {
            used[index.to_usize()] = true;
        }

        let mut remap = vec![0usize; self.vertices.len()];
        let mut kept = 0;
        for old in 0..self.vertices.len() {
            if used[old] {
                self.vertices[kept] = self.vertices[old];
                remap[old] = kept;
                kept += 1;
            }
        }

        let removed = self.vertices.len() - kept;
        self.vertices.truncate(kept);
        for index in &mut self.indices {
            *index = I::from_usize(remap[index.to_usize()]);
        }
        removed
    }

    /// Vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl<I: MeshIndex> Default for Mesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> MeshVertex {
        MeshVertex::new(Vec3::new(x, 0.0, 0.0), Vec3::X, 1)
    }

    #[test]
    fn test_index_types_convert_up_to_their_maximum() {
        assert_eq!(<u16 as MeshIndex>::MAX, 65_535);
        assert_eq!(<u32 as MeshIndex>::MAX, u32::MAX as usize);
        assert_eq!(u16::from_usize(65_535), u16::MAX);
        assert_eq!(u32::from_usize(70_000).to_usize(), 70_000);
        assert_eq!(7u16.to_usize(), 7);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::<u32>::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(mesh.offset(), IVec3::ZERO);
    }

    #[test]
    fn test_add_vertex_returns_sequential_indices() {
        let mut mesh = Mesh::<u16>::new();
        assert_eq!(mesh.add_vertex(vertex(0.0)).unwrap(), 0);
        assert_eq!(mesh.add_vertex(vertex(1.0)).unwrap(), 1);
        assert_eq!(mesh.add_vertex(vertex(2.0)).unwrap(), 2);
        mesh.add_triangle(0, 1, 2);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().next(), Some([0, 1, 2]));
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_u16_mesh_rejects_vertex_past_capacity() {
        let mut mesh = Mesh::<u16>::new();
        for _ in 0..u16::MAX {
            mesh.add_vertex(vertex(0.0)).unwrap();
        }
        assert_eq!(mesh.vertex_count(), 65_535);
        assert_eq!(
            mesh.add_vertex(vertex(0.0)),
            Err(MeshError::CapacityExceeded { max: 65_535 })
        );
        assert_eq!(mesh.vertex_count(), 65_535);
    }

    #[test]
    fn test_clear_keeps_offset() {
        let mut mesh = Mesh::<u32>::new();
        mesh.set_offset(IVec3::new(4, 5, 6));
        mesh.add_vertex(vertex(0.0)).unwrap();
        mesh.clear();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.offset(), IVec3::new(4, 5, 6));
    }

    #[test]
    fn test_remove_unused_vertices_remaps_indices() {
        let mut mesh = Mesh::<u32>::new();
        for x in 0..6 {
            mesh.add_vertex(vertex(x as f32)).unwrap();
        }
        mesh.add_triangle(1, 3, 5);
        mesh.add_triangle(5, 3, 4);

        let removed = mesh.remove_unused_vertices();

        assert_eq!(removed, 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 3, 3, 1, 2]);
        let xs: Vec<f32> = mesh.vertices().iter().map(|v| v.position[0]).collect();
        assert_eq!(xs, vec![1.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_byte_views() {
        let mut mesh = Mesh::<u16>::new();
        mesh.add_vertex(vertex(0.0)).unwrap();
        mesh.add_vertex(vertex(1.0)).unwrap();
        mesh.add_vertex(vertex(2.0)).unwrap();
        mesh.add_triangle(0, 1, 2);
        assert_eq!(mesh.vertex_bytes().len(), 3 * 28);
        assert_eq!(mesh.index_bytes().len(), 3 * 2);
    }

    #[test]
    fn test_vertex_accessors() {
        let v = MeshVertex::new(Vec3::new(1.5, 2.0, 3.0), Vec3::NEG_Y, 7);
        assert_eq!(v.position(), Vec3::new(1.5, 2.0, 3.0));
        assert_eq!(v.normal(), Vec3::NEG_Y);
        assert_eq!(v.material, 7);
    }
}
