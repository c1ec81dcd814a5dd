//! The hash primitive combining two tree nodes
//!
//! Every internal node of the tree is the SHA-256 digest of the 64-byte
//! concatenation of its two children. There is no domain separation and
//! no retained hasher state; each call owns its own working buffer.

use beaconproof_types::Root;
use sha2::{Digest, Sha256};

/// The all-zero chunk used to pad incomplete trees
pub const ZERO_CHUNK: Root = Root::ZERO;

/// Combine two child nodes into their parent
///
/// Returns `SHA256(left || right)`.
pub fn hash_pair(left: &Root, right: &Root) -> Root {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    Root::from_bytes(digest)
}

/// Root of a perfect subtree of the given depth whose leaves are all zero
///
/// Depth 0 is the zero chunk itself; each additional level combines the
/// previous value with itself.
pub fn zero_subtree_root(depth: u32) -> Root {
    let mut node = ZERO_CHUNK;
    for _ in 0..depth {
        node = hash_pair(&node, &node);
    }
    node
}
