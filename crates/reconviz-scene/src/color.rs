use crate::cluster::{ClusterId, CLUSTER_FANOUT};

/// Marker color shared by every camera position event.
pub const CAMERA_COLOR: [u8; 3] = [0, 255, 255];

// Hand-picked colors for the merged result and the four groups, in that
// order.
const FIXED_COLORS: [[u8; 3]; 5] = [
    [255, 100, 100],
    [100, 255, 100],
    [100, 100, 255],
    [255, 255, 100],
    [255, 100, 255],
];

/// How a cluster's display color is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSource {
    /// A hand-picked literal.
    Fixed([u8; 3]),
    /// Derived from the leaf indices through the sine palette.
    Procedural {
        /// First-level index of the leaf.
        i: u8,
        /// Second-level index of the leaf.
        j: u8,
    },
}

impl ColorSource {
    /// The color source assigned to a cluster.
    pub fn for_cluster(id: ClusterId) -> ColorSource {
        match id {
            ClusterId::Merged => ColorSource::Fixed(FIXED_COLORS[0]),
            ClusterId::Group(i) => ColorSource::Fixed(FIXED_COLORS[i as usize]),
            ClusterId::Leaf(i, j) => ColorSource::Procedural { i, j },
        }
    }

    /// Resolve the source to an RGB triple. Resolution is pure, the same
    /// source always yields the same color.
    pub fn resolve(&self) -> [u8; 3] {
        match *self {
            ColorSource::Fixed(rgb) => rgb,
            ColorSource::Procedural { i, j } => sine_palette(i, j),
        }
    }
}

/// Sixteen visually distinct leaf colors without a lookup table: one hue
/// step per leaf slot, three phase-shifted sine waves mapped to [0, 255].
fn sine_palette(i: u8, j: u8) -> [u8; 3] {
    let slot = (i - 1) * CLUSTER_FANOUT + (j - 1);
    let hue = f64::from(slot) / 16.0;
    let angle = hue * 2.0 * std::f64::consts::PI;

    let channel = |phase: f64| (255.0 * (0.5 + 0.5 * (angle + phase).sin())).round() as u8;
    [channel(0.0), channel(2.094), channel(4.189)]
}
