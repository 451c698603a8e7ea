//! Huffman tree construction by greedy merging of the two lightest nodes.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::io::{Read, Write};

use dyn_size_of::GetSize;
use log::trace;

use crate::{HuffmanError, Result};

/// Index of a node in the arena of [`Tree`].
pub type NodeId = u32;

/// Node of the Huffman tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Node {
    /// Leaf that holds a symbol and the number of its occurrences.
    Leaf { symbol: char, weight: u64 },
    /// Internal node, whose weight is the sum of weights of its children.
    Internal { weight: u64, left: NodeId, right: NodeId },
}

impl Node {
    /// Returns the weight of `self`.
    #[inline] pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight
        }
    }

    #[inline] pub fn is_leaf(&self) -> bool { matches!(self, Node::Leaf { .. }) }
}

/// Binary Huffman tree stored in an arena.
///
/// Nodes are stored in the order of their construction, children before parents,
/// so the root is always the last node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl GetSize for Tree {
    fn size_bytes_dyn(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
    }
    const USES_DYN_MEM: bool = true;
}

impl Tree {
    /// Constructs the tree for given `frequencies` of symbols.
    ///
    /// Leaves enter the priority queue in the iteration order of `frequencies`,
    /// which also breaks ties between nodes of equal weights.
    /// Of the two nodes extracted in each step, the first one becomes the left child.
    ///
    /// The algorithm runs in *O(n log n)* time, where *n* is the number of distinct symbols.
    pub fn from_frequencies<'f, I>(frequencies: I) -> Result<Self>
        where I: IntoIterator<Item = (&'f char, &'f u32)>
    {
        let mut nodes = Vec::new();
        for (symbol, count) in frequencies {
            if *count == 0 { return Err(HuffmanError::ZeroFrequency(*symbol)); }
            nodes.push(Node::Leaf { symbol: *symbol, weight: *count as u64 });
        }
        if nodes.is_empty() { return Err(HuffmanError::EmptyInput); }
        nodes.reserve(nodes.len() - 1);

        // (weight, insertion sequence, node id); the sequence makes equal weights pop in insertion order
        let mut queue: BinaryHeap<Reverse<(u64, u32, NodeId)>> = nodes.iter().enumerate()
            .map(|(id, node)| Reverse((node.weight(), id as u32, id as NodeId)))
            .collect();
        let mut sequence = nodes.len() as u32;
        while let Some(Reverse((left_weight, _, left))) = queue.pop() {
            // the last node left in the queue is the root, which is also the last node in the arena
            let Some(Reverse((right_weight, _, right))) = queue.pop() else { break };
            let weight = left_weight + right_weight;
            let id = nodes.len() as NodeId;
            nodes.push(Node::Internal { weight, left, right });
            trace!("merged nodes {left} and {right} into {id} of weight {weight}");
            queue.push(Reverse((weight, sequence, id)));
            sequence += 1;
        }
        Ok(Self { nodes })
    }

    /// Returns the identifier of the root.
    #[inline] pub fn root(&self) -> NodeId { (self.nodes.len() - 1) as NodeId }

    /// Returns the node with given `id`.
    #[inline] pub fn node(&self, id: NodeId) -> &Node { &self.nodes[id as usize] }

    /// Returns the root node.
    #[inline] pub fn root_node(&self) -> &Node { self.node(self.root()) }

    /// Returns the number of all nodes (leaves and internal).
    #[inline] pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns `false`, as a tree has at least one node.
    #[inline] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns the number of leaves, which equals the number of distinct symbols.
    #[inline] pub fn leaf_count(&self) -> usize { (self.nodes.len() + 1) / 2 }

    /// Returns the weight of the root, i.e. the total number of symbol occurrences.
    #[inline] pub fn weight(&self) -> u64 { self.root_node().weight() }

    /// Calls `f` for each leaf, in depth-first (left before right) order.
    /// Arguments of `f` are the symbol, the weight of the leaf and the path from the root,
    /// given as a slice of directions (`false` for left, `true` for right).
    pub fn for_each_leaf<F>(&self, mut f: F) where F: FnMut(char, u64, &[bool]) {
        let mut path = Vec::new();
        // (node, depth of node, direction from parent)
        let mut stack = vec![(self.root(), 0usize, false)];
        while let Some((id, depth, direction)) = stack.pop() {
            path.truncate(depth.saturating_sub(1));
            if depth > 0 { path.push(direction); }
            match *self.node(id) {
                Node::Leaf { symbol, weight } => f(symbol, weight, &path),
                Node::Internal { left, right, .. } => {
                    stack.push((right, depth + 1, true));
                    stack.push((left, depth + 1, false));
                }
            }
        }
    }

    /// Returns a map from symbols to the depths of their leaves.
    pub fn depths(&self) -> BTreeMap<char, u32> {
        let mut result = BTreeMap::new();
        self.for_each_leaf(|symbol, _, path| { result.insert(symbol, path.len() as u32); });
        result
    }

    /// Returns the sum of leaf weights multiplied by leaf depths,
    /// i.e. the number of bits needed to encode all counted symbol occurrences.
    /// A single-leaf tree is counted as having depth 1, as its symbol is encoded with one bit.
    pub fn weighted_path_length(&self) -> u64 {
        let mut result = 0;
        self.for_each_leaf(|_, weight, path| result += weight * (path.len().max(1) as u64));
        result
    }

    /// Writes the shape of `self` and symbols of its leaves (but not weights) to `output`,
    /// in pre-order: byte `0` for an internal node, byte `1` followed by
    /// the little-endian `u32` code point of the symbol for a leaf.
    pub fn write_shape(&self, output: &mut dyn Write) -> std::io::Result<()> {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            match *self.node(id) {
                Node::Leaf { symbol, .. } => {
                    output.write_all(&[1])?;
                    output.write_all(&(symbol as u32).to_le_bytes())?;
                }
                Node::Internal { left, right, .. } => {
                    output.write_all(&[0])?;
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        Ok(())
    }

    /// Returns number of bytes which `write_shape` will write.
    pub fn write_shape_bytes(&self) -> usize {
        self.len() + 4 * self.leaf_count()
    }

    /// Reads the tree written by `write_shape`. All leaves of the read tree have weight 1,
    /// and weights of internal nodes are sums of weights of their children.
    pub fn read_shape(input: &mut dyn Read) -> Result<Self> {
        enum Step { Visit, Join }
        let mut nodes = Vec::new();
        let mut leaves = 0usize;
        let mut built: Vec<NodeId> = Vec::new();
        let mut steps = vec![Step::Visit];
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit => {
                    let mut tag = [0u8];
                    input.read_exact(&mut tag)?;
                    match tag[0] {
                        0 => {
                            steps.push(Step::Join);
                            steps.push(Step::Visit);
                            steps.push(Step::Visit);
                        }
                        1 => {
                            let mut code_point = [0u8; 4];
                            input.read_exact(&mut code_point)?;
                            let code_point = u32::from_le_bytes(code_point);
                            let symbol = char::from_u32(code_point).ok_or_else(||
                                HuffmanError::InvalidHeader(format!("leaf holds invalid code point {code_point:#x}")))?;
                            built.push(nodes.len() as NodeId);
                            nodes.push(Node::Leaf { symbol, weight: 1 });
                            leaves += 1;
                        }
                        other => return Err(HuffmanError::InvalidHeader(format!("unknown tree node tag {other}"))),
                    }
                }
                Step::Join => {
                    // both children are complete, the right one on top
                    let (Some(right), Some(left)) = (built.pop(), built.pop()) else {
                        return Err(HuffmanError::InvalidHeader("internal node lacks children".into()));
                    };
                    let weight = nodes[left as usize].weight() + nodes[right as usize].weight();
                    built.push(nodes.len() as NodeId);
                    nodes.push(Node::Internal { weight, left, right });
                }
            }
        }
        let mut symbols: Vec<char> = nodes.iter().filter_map(|n| match n {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None
        }).collect();
        symbols.sort_unstable();
        symbols.dedup();
        if symbols.len() != leaves {
            return Err(HuffmanError::InvalidHeader("tree holds a repeated symbol".into()));
        }
        Ok(Self { nodes })
    }
}
