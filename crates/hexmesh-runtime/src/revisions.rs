use hashbrown::HashMap;
use hexmesh_voxel::ChunkCoord;

use crate::MeshReady;

/// Latest requested revision per chunk, owned by whoever drains results.
#[derive(Clone, Debug, Default)]
pub struct ChunkRevisions {
    revs: HashMap<ChunkCoord, u64>,
}

impl ChunkRevisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates in-flight work for `chunk` and returns the revision new jobs should carry.
    pub fn bump(&mut self, chunk: ChunkCoord) -> u64 {
        let rev = self.revs.entry(chunk).or_insert(0);
        *rev += 1;
        *rev
    }

    #[inline]
    pub fn current(&self, chunk: ChunkCoord) -> u64 {
        self.revs.get(&chunk).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_current(&self, chunk: ChunkCoord, rev: u64) -> bool {
        self.current(chunk) == rev
    }

    /// False for results built from a superseded revision.
    pub fn accept(&self, ready: &MeshReady) -> bool {
        let ok = self.is_current(ready.chunk, ready.rev);
        if !ok {
            log::debug!(
                target: "runtime",
                "discard stale mesh cq={} cr={} rev={} current={} job={}",
                ready.chunk.cq,
                ready.chunk.cr,
                ready.rev,
                self.current(ready.chunk),
                ready.job_id
            );
        }
        ok
    }

    pub fn forget(&mut self, chunk: ChunkCoord) -> Option<u64> {
        self.revs.remove(&chunk)
    }

    pub fn len(&self) -> usize {
        self.revs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_is_per_chunk() {
        let mut revs = ChunkRevisions::new();
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(1, -1);
        assert_eq!(revs.current(a), 0);
        assert_eq!(revs.bump(a), 1);
        assert_eq!(revs.bump(a), 2);
        assert_eq!(revs.bump(b), 1);
        assert!(revs.is_current(a, 2));
        assert!(!revs.is_current(a, 1));
        assert_eq!(revs.forget(a), Some(2));
        assert_eq!(revs.current(a), 0);
        assert_eq!(revs.len(), 1);
    }
}
