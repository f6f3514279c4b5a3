//! Partition of the index space `[0, n)` into diagonal blocks.
//!
//! A block is an ordered list of global row/column indices; the position of
//! an index in that list is its *local* index inside the block. The same
//! index set is used for rows and columns, so every block describes a square
//! diagonal sub-matrix. Blocks are disjoint but need not cover `[0, n)`;
//! indices outside every block are never touched by a sweep.

use crate::error::KError;
use crate::utils::coloring::build_blocks_from_colors;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPartition {
    dimension: usize,
    blocks: Vec<Vec<usize>>,
    /// Per block: `(global, local)` pairs sorted by global index.
    lookup: Vec<Vec<(usize, usize)>>,
}

impl BlockPartition {
    /// Build a partition of `[0, dimension)` from explicit index lists.
    ///
    /// Fails if an index is out of range or appears twice, within one block
    /// or across blocks. Empty blocks are accepted.
    pub fn new(dimension: usize, blocks: Vec<Vec<usize>>) -> Result<Self, KError> {
        let mut owner: Vec<Option<usize>> = vec![None; dimension];
        for (b, block) in blocks.iter().enumerate() {
            for &g in block {
                if g >= dimension {
                    return Err(KError::InvalidPartition(format!(
                        "block {b} contains index {g}, outside [0, {dimension})"
                    )));
                }
                if let Some(prev) = owner[g] {
                    return Err(KError::InvalidPartition(format!(
                        "index {g} appears in block {prev} and block {b}"
                    )));
                }
                owner[g] = Some(b);
            }
        }
        let lookup = blocks
            .iter()
            .map(|block| {
                let mut pairs: Vec<(usize, usize)> =
                    block.iter().enumerate().map(|(local, &g)| (g, local)).collect();
                pairs.sort_unstable();
                pairs
            })
            .collect();
        Ok(Self { dimension, blocks, lookup })
    }

    /// Consecutive blocks of `block_size` indices; the last one may be shorter.
    pub fn contiguous(dimension: usize, block_size: usize) -> Result<Self, KError> {
        if block_size == 0 {
            return Err(KError::InvalidPartition("block size must be positive".into()));
        }
        let blocks = (0..dimension)
            .step_by(block_size)
            .map(|start| (start..(start + block_size).min(dimension)).collect())
            .collect();
        Self::new(dimension, blocks)
    }

    /// One block per color class: block `c` holds every index colored `c`.
    pub fn from_colors(colors: &[usize]) -> Result<Self, KError> {
        Self::new(colors.len(), build_blocks_from_colors(colors))
    }

    /// Size of the index space the blocks live in.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of blocks.
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of indices in block `b`.
    pub fn block_size(&self, b: usize) -> usize {
        self.blocks[b].len()
    }

    /// Global indices of block `b`, in local order.
    pub fn block(&self, b: usize) -> &[usize] {
        &self.blocks[b]
    }

    /// Iterate over the global indices of block `b`, in local order.
    pub fn iter(&self, b: usize) -> impl Iterator<Item = usize> + '_ {
        self.blocks[b].iter().copied()
    }

    /// Local position of `global` inside block `b`, or `None` if the index
    /// does not belong to that block.
    pub fn local_index(&self, b: usize, global: usize) -> Option<usize> {
        let pairs = &self.lookup[b];
        pairs
            .binary_search_by_key(&global, |&(g, _)| g)
            .ok()
            .map(|pos| pairs[pos].1)
    }
}
