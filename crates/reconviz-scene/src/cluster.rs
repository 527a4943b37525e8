use std::fmt;
use std::path::{Path, PathBuf};

use reconviz_sparse::colmap::POINTS3D_FILE;

/// Number of child slots at each level of the cluster tree.
pub const CLUSTER_FANOUT: u8 = 4;

/// Identifier of one reconstruction in the fixed two-level cluster tree.
///
/// The tree always has the same shape: the merged result at the root,
/// four first-level groups and four leaves under each group. Which slots
/// are populated varies from run to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterId {
    /// The top-level merged reconstruction.
    Merged,
    /// A first-level group `C_<i>`, with i in 1..=4.
    Group(u8),
    /// A second-level leaf `C_<i>/C_<i>_<j>`, with i and j in 1..=4.
    Leaf(u8, u8),
}

impl ClusterId {
    /// All 21 candidate slots in emission order: the merged result first,
    /// then the groups, then the leaves grouped by their parent.
    pub fn candidates() -> impl Iterator<Item = ClusterId> {
        let groups = (1..=CLUSTER_FANOUT).map(ClusterId::Group);
        let leaves = (1..=CLUSTER_FANOUT)
            .flat_map(|i| (1..=CLUSTER_FANOUT).map(move |j| ClusterId::Leaf(i, j)));
        std::iter::once(ClusterId::Merged).chain(groups).chain(leaves)
    }

    /// Directory holding this cluster's bundle-adjustment output,
    /// relative to the results root.
    pub fn relative_dir(&self) -> PathBuf {
        match self {
            ClusterId::Merged => PathBuf::from("ba_output"),
            ClusterId::Group(i) => PathBuf::from(format!("C_{i}")).join("ba_output"),
            ClusterId::Leaf(i, j) => PathBuf::from(format!("C_{i}"))
                .join(format!("C_{i}_{j}"))
                .join("ba_output"),
        }
    }

    /// Key used inside emitted event names: the relative directory with
    /// its separators flattened to underscores.
    pub fn entity_key(&self) -> String {
        match self {
            ClusterId::Merged => "ba_output".to_string(),
            ClusterId::Group(i) => format!("C_{i}_ba_output"),
            ClusterId::Leaf(i, j) => format!("C_{i}_C_{i}_{j}_ba_output"),
        }
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterId::Merged => write!(f, "ba_output"),
            ClusterId::Group(i) => write!(f, "C_{i}/ba_output"),
            ClusterId::Leaf(i, j) => write!(f, "C_{i}/C_{i}_{j}/ba_output"),
        }
    }
}

/// Enumerate the clusters under `results_root` that hold a points file,
/// in candidate order.
///
/// Presence of the points file alone decides membership; camera and
/// image files are not consulted. A sparse tree is the normal case, a
/// divide-and-conquer pipeline only keeps the slots that survived its
/// merge step.
pub fn discover(results_root: &Path) -> Vec<ClusterId> {
    ClusterId::candidates()
        .filter(|id| results_root.join(id.relative_dir()).join(POINTS3D_FILE).exists())
        .collect()
}
