use glam::DVec3;

/// A sparse reconstruction point cloud with one color per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseCloud {
    // The triangulated point positions.
    positions: Vec<[f64; 3]>,
    // The colors of the points, index-aligned with the positions.
    colors: Vec<[u8; 3]>,
}

impl SparseCloud {
    /// Create a new sparse cloud from positions and their colors.
    ///
    /// PRECONDITION: positions and colors have the same length.
    pub fn new(positions: Vec<[f64; 3]>, colors: Vec<[u8; 3]>) -> Self {
        assert_eq!(positions.len(), colors.len());
        Self { positions, colors }
    }

    /// Create an empty cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Append one point, keeping positions and colors aligned.
    pub fn push(&mut self, position: [f64; 3], color: [u8; 3]) {
        self.positions.push(position);
        self.colors.push(color);
    }

    /// Get the number of points in the cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Get as reference the point positions.
    pub fn positions(&self) -> &Vec<[f64; 3]> {
        &self.positions
    }

    /// Get as reference the point colors.
    pub fn colors(&self) -> &Vec<[u8; 3]> {
        &self.colors
    }

    /// Convert a position from [f64; 3] to DVec3.
    fn position_to_dvec3(position: &[f64; 3]) -> DVec3 {
        DVec3::new(position[0], position[1], position[2])
    }

    /// Get the minimum bound of the cloud, or zero when empty.
    pub fn get_min_bound(&self) -> DVec3 {
        if self.positions.is_empty() {
            return DVec3::ZERO;
        }
        self.positions()
            .iter()
            .map(Self::position_to_dvec3)
            .fold(Self::position_to_dvec3(&self.positions[0]), |a, b| a.min(b))
    }

    /// Get the maximum bound of the cloud, or zero when empty.
    pub fn get_max_bound(&self) -> DVec3 {
        if self.positions.is_empty() {
            return DVec3::ZERO;
        }
        self.positions()
            .iter()
            .map(Self::position_to_dvec3)
            .fold(Self::position_to_dvec3(&self.positions[0]), |a, b| a.max(b))
    }
}
