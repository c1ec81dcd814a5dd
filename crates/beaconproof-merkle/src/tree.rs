//! Tree building
//!
//! Two realizations of the same bottom-up combine share `hash_pair`:
//! [`merkleize`] computes a root without materializing padding, so the
//! schema's large list capacities (the 2^20-leaf transaction list) cost
//! O(n); [`Tree`] retains every intermediate node so any position can be
//! fetched by generalized index in O(1) after the one-time O(capacity)
//! build, which is what proof generation needs.

use crate::error::{Error, Result};
use crate::gindex::leaf_gindex;
use crate::hash::{hash_pair, zero_subtree_root, ZERO_CHUNK};
use beaconproof_types::Root;

/// Compute the Merkle root of a chunk sequence padded to a capacity
///
/// `limit` is the schema-reserved chunk capacity; it is rounded up to the
/// next power of two. Chunks beyond the real count are virtually zero;
/// entire zero subtrees are folded via their precomputable roots instead
/// of being materialized.
pub fn merkleize(chunks: &[Root], limit: u64) -> Result<Root> {
    let capacity = limit.max(1).next_power_of_two();
    if chunks.len() as u64 > capacity {
        return Err(Error::InvalidChunkCount {
            capacity,
            actual: chunks.len() as u64,
        });
    }

    let depth = capacity.trailing_zeros();
    if chunks.is_empty() {
        return Ok(zero_subtree_root(depth));
    }

    let mut layer = chunks.to_vec();
    let mut zero = ZERO_CHUNK;
    for _ in 0..depth {
        if layer.len() % 2 == 1 {
            layer.push(zero);
        }
        layer = layer
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
        zero = hash_pair(&zero, &zero);
    }
    Ok(layer[0])
}

/// Bind a variable-length container's element count into its commitment
///
/// Combines the content root with a chunk holding the little-endian
/// count. The mixed root, not the bare content root, is the field's
/// summarizing chunk.
pub fn mix_in_length(root: &Root, length: u64) -> Root {
    hash_pair(root, &crate::encode::uint64_chunk(length))
}

/// A complete binary tree retaining all intermediate nodes
///
/// Nodes are stored by generalized index: the root at 1, children of
/// node `i` at `2i` and `2i+1`, leaves at `capacity..2*capacity`.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Root>,
    capacity: u64,
}

impl Tree {
    /// Build a tree over `chunks`, zero-padded to `capacity` leaves
    ///
    /// `capacity` is rounded up to the next power of two. Fails with
    /// `InvalidChunkCount` if there are more chunks than leaves.
    pub fn from_chunks(chunks: &[Root], capacity: u64) -> Result<Self> {
        let capacity = capacity.max(1).next_power_of_two();
        if chunks.len() as u64 > capacity {
            return Err(Error::InvalidChunkCount {
                capacity,
                actual: chunks.len() as u64,
            });
        }

        let base = capacity as usize;
        let mut nodes = vec![ZERO_CHUNK; 2 * base];
        nodes[base..base + chunks.len()].copy_from_slice(chunks);
        for i in (1..base).rev() {
            nodes[i] = hash_pair(&nodes[2 * i], &nodes[2 * i + 1]);
        }
        Ok(Tree { nodes, capacity })
    }

    /// The tree's root (generalized index 1)
    pub fn root(&self) -> Root {
        self.nodes[1]
    }

    /// Leaf capacity the tree was built with
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Fetch any node by generalized index
    pub fn node(&self, index: u64) -> Result<Root> {
        if index == 0 || index >= 2 * self.capacity {
            return Err(Error::IndexOutOfRange {
                index,
                size: 2 * self.capacity,
            });
        }
        Ok(self.nodes[index as usize])
    }

    /// Fetch a leaf by its zero-based position
    pub fn leaf(&self, position: u64) -> Result<Root> {
        self.node(leaf_gindex(self.capacity, position)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(byte: u8) -> Root {
        Root::from_bytes([byte; 32])
    }

    #[test]
    fn test_merkleize_single_chunk() {
        let c = chunk(7);
        assert_eq!(merkleize(&[c], 1).unwrap(), c);
    }

    #[test]
    fn test_merkleize_empty_is_zero_subtree() {
        assert_eq!(merkleize(&[], 1).unwrap(), ZERO_CHUNK);
        assert_eq!(merkleize(&[], 16).unwrap(), zero_subtree_root(4));
        // virtual padding must agree with materialized padding
        assert_eq!(
            merkleize(&[], 1 << 20).unwrap(),
            zero_subtree_root(20)
        );
    }

    #[test]
    fn test_merkleize_pads_with_zero_chunks() {
        let chunks = [chunk(1), chunk(2), chunk(3)];
        let explicit = merkleize(&[chunk(1), chunk(2), chunk(3), ZERO_CHUNK], 4).unwrap();
        assert_eq!(merkleize(&chunks, 4).unwrap(), explicit);
    }

    #[test]
    fn test_merkleize_virtual_padding_matches_tree() {
        let chunks: Vec<Root> = (0..5).map(chunk).collect();
        let tree = Tree::from_chunks(&chunks, 16).unwrap();
        assert_eq!(merkleize(&chunks, 16).unwrap(), tree.root());
    }

    #[test]
    fn test_merkleize_rejects_overflow() {
        let chunks: Vec<Root> = (0..3).map(chunk).collect();
        let err = merkleize(&chunks, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidChunkCount { capacity: 2, actual: 3 }));
    }

    #[test]
    fn test_mix_in_length_changes_root() {
        let root = chunk(9);
        assert_ne!(mix_in_length(&root, 0), mix_in_length(&root, 1));
        assert_eq!(mix_in_length(&root, 5), mix_in_length(&root, 5));
    }

    #[test]
    fn test_tree_nodes_combine_upward() {
        let chunks: Vec<Root> = (0..4).map(chunk).collect();
        let tree = Tree::from_chunks(&chunks, 4).unwrap();

        let left = hash_pair(&chunks[0], &chunks[1]);
        let right = hash_pair(&chunks[2], &chunks[3]);
        assert_eq!(tree.node(2).unwrap(), left);
        assert_eq!(tree.node(3).unwrap(), right);
        assert_eq!(tree.root(), hash_pair(&left, &right));
    }

    #[test]
    fn test_tree_leaf_addressing() {
        let chunks: Vec<Root> = (0..10).map(chunk).collect();
        let tree = Tree::from_chunks(&chunks, 16).unwrap();
        assert_eq!(tree.capacity(), 16);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(tree.leaf(i as u64).unwrap(), *c);
            assert_eq!(tree.node(16 + i as u64).unwrap(), *c);
        }
        // padding leaves are zero
        assert_eq!(tree.leaf(15).unwrap(), ZERO_CHUNK);
    }

    #[test]
    fn test_tree_index_bounds() {
        let tree = Tree::from_chunks(&[chunk(1)], 4).unwrap();
        assert!(tree.node(0).is_err());
        assert!(tree.node(8).is_err());
        assert!(tree.node(7).is_ok());
    }

    #[test]
    fn test_tree_rejects_overflow() {
        let chunks: Vec<Root> = (0..17).map(chunk).collect();
        assert!(matches!(
            Tree::from_chunks(&chunks, 16),
            Err(Error::InvalidChunkCount { .. })
        ));
    }
}
