use std::collections::VecDeque;
use std::hash::Hash;

use hashbrown::HashSet;
use hexmesh_hex::Axial;

/// A position inside one plane, with its same-plane adjacency.
pub trait PlanePosition: Copy + Eq + Hash + Ord {
    type Neighbors: IntoIterator<Item = Self>;

    fn plane_neighbors(self) -> Self::Neighbors;
}

impl PlanePosition for Axial {
    type Neighbors = [Axial; 6];

    #[inline]
    fn plane_neighbors(self) -> [Axial; 6] {
        self.neighbors()
    }
}

/// Layers of a single lateral column; adjacent when one apart.
impl PlanePosition for i32 {
    type Neighbors = [i32; 2];

    #[inline]
    fn plane_neighbors(self) -> [i32; 2] {
        [self - 1, self + 1]
    }
}

/// Maximal connected set of same-plane positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region<P: PlanePosition> {
    /// Smallest member; the flood fill started here.
    pub seed: P,
    pub cells: HashSet<P>,
}

impl<P: PlanePosition> Region<P> {
    #[inline]
    pub fn contains(&self, p: &P) -> bool {
        self.cells.contains(p)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Members in ascending order.
    pub fn sorted(&self) -> Vec<P> {
        let mut v: Vec<P> = self.cells.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

/// Partitions `positions` into connected regions, emitted in order of their smallest member.
pub fn merge_regions<P: PlanePosition>(positions: &HashSet<P>) -> Vec<Region<P>> {
    let mut order: Vec<P> = positions.iter().copied().collect();
    order.sort_unstable();
    let mut pending = positions.clone();
    let mut out = Vec::new();
    let mut queue = VecDeque::new();
    for seed in order {
        if !pending.remove(&seed) {
            continue;
        }
        let mut cells = HashSet::new();
        cells.insert(seed);
        queue.push_back(seed);
        while let Some(p) = queue.pop_front() {
            for n in p.plane_neighbors() {
                if pending.remove(&n) {
                    cells.insert(n);
                    queue.push_back(n);
                }
            }
        }
        out.push(Region { seed, cells });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_runs_split_on_gaps() {
        let set: HashSet<i32> = [0, 1, 2, 5, 6, 9].into_iter().collect();
        let regions = merge_regions(&set);
        let runs: Vec<Vec<i32>> = regions.iter().map(Region::sorted).collect();
        assert_eq!(runs, vec![vec![0, 1, 2], vec![5, 6], vec![9]]);
    }

    #[test]
    fn separated_cells_form_separate_regions() {
        let a = Axial::new(0, 0);
        let b = Axial::new(0, 2);
        let set: HashSet<Axial> = [a, b, a.neighbor(hexmesh_hex::HexDir::NorthEast)]
            .into_iter()
            .collect();
        let regions = merge_regions(&set);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].seed, a);
        assert_eq!(regions[0].len(), 2);
        assert_eq!(regions[1].seed, b);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(merge_regions::<Axial>(&HashSet::new()).is_empty());
    }
}
