use glam::IVec3;

/// Axis-aligned integer box, inclusive on both corners.
///
/// A region with `lower == upper` contains exactly one voxel. A region whose
/// lower corner exceeds its upper corner on any axis is invalid and contains
/// nothing; [`Region::crop_to`] can produce such regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    lower: IVec3,
    upper: IVec3,
}

impl Region {
    /// Creates a region from its inclusive corners. No sorting is performed.
    pub const fn new(lower: IVec3, upper: IVec3) -> Self {
        Self { lower, upper }
    }

    /// Creates a region of `size` voxels per axis starting at `lower`.
    pub fn from_size(lower: IVec3, size: IVec3) -> Self {
        Self {
            lower,
            upper: lower + size - IVec3::ONE,
        }
    }

    pub fn lower(&self) -> IVec3 {
        self.lower
    }

    pub fn upper(&self) -> IVec3 {
        self.upper
    }

    pub fn set_lower(&mut self, lower: IVec3) {
        self.lower = lower;
    }

    pub fn set_upper(&mut self, upper: IVec3) {
        self.upper = upper;
    }

    /// Number of voxels along X.
    pub fn width(&self) -> i32 {
        self.upper.x - self.lower.x + 1
    }

    /// Number of voxels along Y.
    pub fn height(&self) -> i32 {
        self.upper.y - self.lower.y + 1
    }

    /// Number of voxels along Z.
    pub fn depth(&self) -> i32 {
        self.upper.z - self.lower.z + 1
    }

    /// Voxel counts along each axis.
    pub fn size(&self) -> IVec3 {
        self.upper - self.lower + IVec3::ONE
    }

    /// Returns true if `lower <= upper` on every axis.
    pub fn is_valid(&self) -> bool {
        self.lower.cmple(self.upper).all()
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains_point(&self, p: IVec3) -> bool {
        self.contains_point_in_x(p.x)
            && self.contains_point_in_y(p.y)
            && self.contains_point_in_z(p.z)
    }

    pub fn contains_point_in_x(&self, x: i32) -> bool {
        x >= self.lower.x && x <= self.upper.x
    }

    pub fn contains_point_in_y(&self, y: i32) -> bool {
        y >= self.lower.y && y <= self.upper.y
    }

    pub fn contains_point_in_z(&self, z: i32) -> bool {
        z >= self.lower.z && z <= self.upper.z
    }

    /// Returns true if this region overlaps `other` (touching counts).
    pub fn intersects(&self, other: &Region) -> bool {
        self.lower.cmple(other.upper).all() && self.upper.cmpge(other.lower).all()
    }

    /// Shrinks this region so it lies within `other`.
    ///
    /// The result is invalid if the two regions do not overlap.
    pub fn crop_to(&mut self, other: &Region) {
        self.lower = self.lower.max(other.lower);
        self.upper = self.upper.min(other.upper);
    }

    /// Moves both corners by `amount`.
    pub fn shift(&mut self, amount: IVec3) {
        self.lower += amount;
        self.upper += amount;
    }

    /// Moves only the upper corner by `amount`.
    pub fn shift_upper(&mut self, amount: IVec3) {
        self.upper += amount;
    }

    /// Expands the region by `amount` on all six faces.
    pub fn grow(&mut self, amount: i32) {
        self.lower -= IVec3::splat(amount);
        self.upper += IVec3::splat(amount);
    }

    /// Contracts the region by `amount` on all six faces.
    pub fn shrink(&mut self, amount: i32) {
        self.grow(-amount);
    }

    /// Number of voxels contained, zero for invalid regions.
    pub fn voxel_count(&self) -> u64 {
        if !self.is_valid() {
            return 0;
        }
        let size = self.size().as_i64vec3();
        (size.x * size.y * size.z) as u64
    }
}
