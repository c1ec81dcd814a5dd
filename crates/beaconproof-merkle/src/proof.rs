//! Merkle inclusion proof generation and verification
//!
//! A proof pairs a target leaf with the sibling hash at every level from
//! the leaf up to (but not including) the root. It is meaningful only
//! together with a claimed root and the target's generalized index.

use crate::error::{Error, Result};
use crate::gindex::{compose, depth, parent, sibling};
use crate::hash::hash_pair;
use crate::tree::Tree;
use beaconproof_types::Root;

/// An inclusion proof for one node of a built tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    /// Generalized index of the proven node
    pub index: u64,
    /// Value of the proven node
    pub leaf: Root,
    /// Sibling hashes, ordered from the target's level up to the root
    pub hashes: Vec<Root>,
}

/// Extract the sibling hashes for `index` from a built tree
///
/// Walks from the target to the root: the sibling of node `i` is `i ^ 1`,
/// the next node is `i / 2`. Fails with `IndexOutOfRange` if `index`
/// does not address a node of `tree`.
pub fn generate_proof(tree: &Tree, index: u64) -> Result<Proof> {
    let leaf = tree.node(index)?;
    let mut hashes = Vec::with_capacity(depth(index) as usize);
    let mut i = index;
    while i > 1 {
        hashes.push(tree.node(sibling(i))?);
        i = parent(i);
    }
    Ok(Proof { index, leaf, hashes })
}

impl Tree {
    /// Convenience wrapper around [`generate_proof`]
    pub fn prove(&self, index: u64) -> Result<Proof> {
        generate_proof(self, index)
    }
}

/// Recompute the root a proof commits to
///
/// Fails with `ProofLengthMismatch` if the sibling count disagrees with
/// the target index's depth.
fn compute_root(proof: &Proof) -> Result<Root> {
    if proof.index == 0 {
        return Err(Error::IndexOutOfRange {
            index: 0,
            size: 0,
        });
    }
    let expected = depth(proof.index) as usize;
    if proof.hashes.len() != expected {
        return Err(Error::ProofLengthMismatch {
            expected,
            actual: proof.hashes.len(),
        });
    }

    let mut node = proof.leaf;
    let mut i = proof.index;
    for hash in &proof.hashes {
        node = if i % 2 == 0 {
            hash_pair(&node, hash)
        } else {
            hash_pair(hash, &node)
        };
        i = parent(i);
    }
    Ok(node)
}

/// Check a proof against a claimed root
///
/// A malformed proof (wrong sibling count) is an error; a proof that
/// recomputes to a different root is an ordinary `Ok(false)`. A prefix
/// match is never trusted: the full sibling sequence is always consumed.
pub fn verify_proof(root: &Root, proof: &Proof) -> Result<bool> {
    Ok(compute_root(proof)? == *root)
}

/// Chain a proof within a nested subtree onto a proof of that subtree
///
/// `outer` proves the subtree's root within the enclosing tree; `inner`
/// proves a node within the subtree. The result proves the inner node
/// against the enclosing tree's root at the composed generalized index.
/// Fails with `RootMismatch` if `inner` does not resolve to `outer`'s
/// leaf.
pub fn join_proofs(outer: &Proof, inner: &Proof) -> Result<Proof> {
    let inner_root = compute_root(inner)?;
    if inner_root != outer.leaf {
        return Err(Error::RootMismatch {
            expected: outer.leaf.to_string(),
            computed: inner_root.to_string(),
        });
    }

    let mut hashes = inner.hashes.clone();
    hashes.extend_from_slice(&outer.hashes);
    Ok(Proof {
        index: compose(outer.index, inner.index),
        leaf: inner.leaf,
        hashes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    fn chunk(byte: u8) -> Root {
        Root::from_bytes([byte; 32])
    }

    fn sample_tree() -> Tree {
        let chunks: Vec<Root> = (1..=10).map(chunk).collect();
        Tree::from_chunks(&chunks, 16).unwrap()
    }

    #[test]
    fn test_prove_and_verify_every_leaf() {
        let tree = sample_tree();
        for position in 0..16 {
            let proof = tree.prove(16 + position).unwrap();
            assert_eq!(proof.hashes.len(), 4);
            assert!(verify_proof(&tree.root(), &proof).unwrap());
        }
    }

    #[test]
    fn test_prove_internal_node() {
        let tree = sample_tree();
        let proof = tree.prove(5).unwrap();
        assert_eq!(proof.hashes.len(), 2);
        assert!(verify_proof(&tree.root(), &proof).unwrap());
    }

    #[test]
    fn test_prove_root_is_empty_proof() {
        let tree = sample_tree();
        let proof = tree.prove(1).unwrap();
        assert!(proof.hashes.is_empty());
        assert!(verify_proof(&tree.root(), &proof).unwrap());
    }

    #[test]
    fn test_prove_out_of_range() {
        let tree = sample_tree();
        assert!(matches!(
            tree.prove(32),
            Err(Error::IndexOutOfRange { index: 32, .. })
        ));
        assert!(tree.prove(0).is_err());
    }

    #[test]
    fn test_verify_wrong_root() {
        let tree = sample_tree();
        let proof = tree.prove(25).unwrap();
        assert!(!verify_proof(&chunk(0xff), &proof).unwrap());
    }

    #[test]
    fn test_verify_tampered_sibling_bit() {
        let tree = sample_tree();
        let root = tree.root();
        let good = tree.prove(25).unwrap();

        for (level, hash) in good.hashes.iter().enumerate() {
            let mut bytes = *hash.as_bytes();
            bytes[0] ^= 0x01;
            let mut tampered = good.clone();
            tampered.hashes[level] = Root::from_bytes(bytes);
            assert!(
                !verify_proof(&root, &tampered).unwrap(),
                "tampered sibling at level {level} still verified"
            );
        }
    }

    #[test]
    fn test_verify_tampered_leaf() {
        let tree = sample_tree();
        let mut proof = tree.prove(20).unwrap();
        let mut bytes = *proof.leaf.as_bytes();
        bytes[31] ^= 0x80;
        proof.leaf = Root::from_bytes(bytes);
        assert!(!verify_proof(&tree.root(), &proof).unwrap());
    }

    #[test]
    fn test_verify_wrong_length_is_error() {
        let tree = sample_tree();
        let mut proof = tree.prove(25).unwrap();
        proof.hashes.pop();
        assert!(matches!(
            verify_proof(&tree.root(), &proof),
            Err(Error::ProofLengthMismatch { expected: 4, actual: 3 })
        ));

        let mut proof = tree.prove(25).unwrap();
        proof.hashes.push(chunk(0));
        assert!(matches!(
            verify_proof(&tree.root(), &proof),
            Err(Error::ProofLengthMismatch { expected: 4, actual: 5 })
        ));
    }

    #[test]
    fn test_join_proofs_across_nested_trees() {
        // inner record tree, its root stored as leaf 9 of the outer tree
        let inner_chunks: Vec<Root> = (1..=14).map(chunk).collect();
        let inner = Tree::from_chunks(&inner_chunks, 16).unwrap();

        let mut outer_chunks: Vec<Root> = (1..=10).map(chunk).collect();
        outer_chunks[9] = inner.root();
        let outer = Tree::from_chunks(&outer_chunks, 16).unwrap();

        let outer_proof = outer.prove(25).unwrap();
        let inner_proof = inner.prove(28).unwrap();
        let joined = join_proofs(&outer_proof, &inner_proof).unwrap();

        assert_eq!(joined.index, 412);
        assert_eq!(joined.hashes.len(), 8);
        assert_eq!(joined.leaf, inner.node(28).unwrap());
        assert!(verify_proof(&outer.root(), &joined).unwrap());
    }

    #[test]
    fn test_join_proofs_rejects_unrelated_trees() {
        let tree_a = sample_tree();
        let inner_chunks: Vec<Root> = (20..=25).map(chunk).collect();
        let tree_b = Tree::from_chunks(&inner_chunks, 16).unwrap();

        let outer_proof = tree_a.prove(25).unwrap();
        let inner_proof = tree_b.prove(28).unwrap();
        assert!(matches!(
            join_proofs(&outer_proof, &inner_proof),
            Err(Error::RootMismatch { .. })
        ));
    }
}
