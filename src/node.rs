/*!
# Node Representation

Nodes are plain integers in the range `0..n` where `n` is the number of nodes
in the graph. Ids are dense: the matchers allocate per-node tables indexed
directly by id, so a graph must not contain gaps.
*/

use stream_bitset::bitset::BitSetImpl;

/// Nodes are numbered `0` to `n - 1`.
///
/// As most graphs do not exceed `2^32` nodes, `u32` saves space compared to
/// `u64/usize` in the dense per-node tables the matchers allocate.
pub type Node = u32;

/// There can be at most `2^32 - 1` nodes in a graph.
pub type NumNodes = Node;

/// BitSet over nodes.
pub type NodeBitSet = BitSetImpl<Node>;
