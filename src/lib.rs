#![no_std]
#![cfg_attr(not(test), deny(missing_docs))]

//! Append-only complete binary Merkle tree.
//!
//! [`CBMTree`] keeps a single digest over an ordered, growing list of values. Leaves are filled
//! strictly left to right and the tree is always a complete binary tree: every leaf sits at the
//! same depth, and capacity is always a power of two. When the tree is full the next insertion
//! doubles capacity by wrapping the current tree as the left child of a new root and attaching a
//! freshly materialized placeholder subtree of equal height on the right.
//!
//! Nodes live in an arena addressed by [`NodeId`]. Child links own their targets; the parent
//! link is a separate non-owning reference used only for upward walks, so dropping the tree
//! releases every node exactly once.
//!
//! The digest (`H`), the leaf encoding (`E`), and the placeholder policy (`P`) are type
//! parameters. The defaults hash the `Display` text of each value with [`Sha256`] and give
//! placeholder leaves the fixed digest of the empty byte string.
//!
//! # Complexity
//!
//! * [`CBMTree::insert`] – `O(log n)` to write the leaf, recompute the path to the root, and
//!   move the insertion cursor. An insertion that triggers a capacity doubling additionally
//!   materializes a placeholder subtree of the current capacity, costing `O(n)` for that one
//!   call. Over `n` insertions growth totals `O(n)` (geometric series), so the cost is
//!   amortized constant but bursty: expect a latency spike at every power of two.
//! * [`CBMTree::root_hash`] – `O(1)` time (hashes are cached on each node).
//! * [`CBMTree::next_leaf`] – `O(log n)`, using only parent/child links.
//!
//! The arena always holds exactly `2 * capacity - 1` nodes.
//!
//! # Examples
//!
//! ```
//! use cbmtree::CBMTree;
//! use sha2::{Digest, Sha256};
//!
//! let mut tree = CBMTree::<i32>::new();
//! tree.insert(5).unwrap();
//! tree.insert(7).unwrap();
//!
//! let mut expected = Sha256::new();
//! expected.update(Sha256::digest(b"5"));
//! expected.update(Sha256::digest(b"7"));
//!
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree.capacity(), 2);
//! assert_eq!(tree.root_hash(), expected.finalize());
//! ```

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use sha2::digest::Output;
use sha2::{Digest, Sha256};
use tracing::{debug, trace, warn};

/// Digest output for the default [`Sha256`] hasher used by [`CBMTree`].
pub type Sha256Hash = Output<Sha256>;

/// Digest output of the hasher `H`.
pub type HashOf<H> = Output<H>;

/// Result type returned by fallible tree operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while growing the tree.
///
/// Every error leaves the tree in the state it had before the failing call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The node arena could not reserve room for the next layer.
    #[error("failed to reserve {requested} nodes for a new layer")]
    AllocationFailed {
        /// Number of nodes the growth needed.
        requested: usize,
    },
    /// Doubling capacity again would overflow the address space.
    #[error("a tree with {layers} layers cannot grow any further")]
    CapacityOverflow {
        /// Layer count at the time of the failed growth.
        layers: usize,
    },
}

/// Maps an inserted value to the digest stored in its leaf.
pub trait LeafEncoding<T: ?Sized> {
    /// Computes the leaf digest for `value`.
    fn leaf_hash<H: Digest + Clone>(value: &T) -> HashOf<H>;
}

/// Hashes the [`Display`](fmt::Display) text of a value.
///
/// This is the default encoding: `5_i32` produces `H(b"5")`. The text is streamed into the
/// digest as it is formatted. A `Display` impl that returns an error partway through leaves the
/// leaf with the digest of whatever it wrote before failing; the insert itself still succeeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayEncoding;

impl<T> LeafEncoding<T> for DisplayEncoding
where
    T: fmt::Display + ?Sized,
{
    #[inline]
    fn leaf_hash<H: Digest + Clone>(value: &T) -> HashOf<H> {
        let mut writer = DigestWriter::<H>::new();
        // DigestWriter never fails, so an error here comes from the value's own Display impl.
        if write!(writer, "{value}").is_err() {
            trace!("display impl failed, leaf hashes the text written so far");
        }
        writer.finalize()
    }
}

/// Hashes the raw bytes of a value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BytesEncoding;

impl<T> LeafEncoding<T> for BytesEncoding
where
    T: AsRef<[u8]> + ?Sized,
{
    #[inline(always)]
    fn leaf_hash<H: Digest + Clone>(value: &T) -> HashOf<H> {
        H::digest(value.as_ref())
    }
}

/// Hashes the byte stream a value feeds into [`core::hash::Hasher`].
///
/// Integer encodings follow the platform's native byte order, so roots built with this encoding
/// are only comparable between machines of the same endianness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashEncoding;

impl<T> LeafEncoding<T> for HashEncoding
where
    T: Hash + ?Sized,
{
    #[inline(always)]
    fn leaf_hash<H: Digest + Clone>(value: &T) -> HashOf<H> {
        let mut hasher = DigestHasher::<H>::new();
        value.hash(&mut hasher);
        hasher.finalize()
    }
}

/// Supplies the digest given to each placeholder leaf when capacity grows.
pub trait Placeholder<H: Digest> {
    /// Returns the hash for the next placeholder leaf.
    fn placeholder_hash(&mut self) -> HashOf<H>;
}

/// Gives every placeholder leaf the digest of the empty byte string.
///
/// Roots are reproducible: the same values always produce the same root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyDigest;

impl<H: Digest> Placeholder<H> for EmptyDigest {
    #[inline(always)]
    fn placeholder_hash(&mut self) -> HashOf<H> {
        H::digest(b"")
    }
}

/// Seeds every placeholder leaf with the digest of 32 random bytes.
///
/// Roots of partially filled trees then depend on the generator's state. Use a seeded generator
/// when the same root must be reproduced; a fully filled tree carries no placeholder leaves and
/// is unaffected.
#[cfg(feature = "rand")]
#[derive(Clone, Debug)]
pub struct RandomDigest<R> {
    rng: R,
}

#[cfg(feature = "rand")]
impl<R> RandomDigest<R> {
    /// Wraps a random number generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

#[cfg(feature = "rand")]
impl<H, R> Placeholder<H> for RandomDigest<R>
where
    H: Digest,
    R: rand_core::RngCore,
{
    #[inline]
    fn placeholder_hash(&mut self) -> HashOf<H> {
        let mut seed = [0u8; 32];
        self.rng.fill_bytes(&mut seed);
        H::digest(seed)
    }
}

/// Stable handle to a node of a [`CBMTree`].
///
/// Handles stay valid for the lifetime of the tree; [`CBMTree::clear`] invalidates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the tree's arena.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Non-owning back-reference from a node to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ParentRef(NodeId);

impl ParentRef {
    #[inline(always)]
    fn node(self) -> NodeId {
        self.0
    }
}

#[derive(Clone)]
struct Node<T, H>
where
    H: Digest,
{
    hash: HashOf<H>,
    children: Option<(NodeId, NodeId)>,
    parent: Option<ParentRef>,
    payload: Option<T>,
}

impl<T, H> Node<T, H>
where
    H: Digest,
{
    #[inline(always)]
    fn leaf(hash: HashOf<H>) -> Self {
        Self {
            hash,
            children: None,
            parent: None,
            payload: None,
        }
    }

    #[inline(always)]
    fn internal(hash: HashOf<H>, left: NodeId, right: NodeId) -> Self {
        Self {
            hash,
            children: Some((left, right)),
            parent: None,
            payload: None,
        }
    }
}

/// Root, insertion cursor, and height of a non-empty tree.
#[derive(Clone, Copy, Debug)]
struct Shape {
    root: NodeId,
    cursor: NodeId,
    layers: usize,
}

impl Shape {
    #[inline(always)]
    const fn capacity(&self) -> usize {
        1 << (self.layers - 1)
    }
}

/// Append-only Merkle tree kept in complete binary shape.
///
/// Values are appended with [`CBMTree::insert`]; the `i`-th inserted value always occupies leaf
/// position `i`. Leaves that have not received a value yet hold placeholder digests supplied by
/// `P`, and every internal node stores `H(left.hash ++ right.hash)`.
///
/// # Examples
///
/// ```
/// use cbmtree::CBMTree;
///
/// let mut tree = CBMTree::<&str>::new();
/// for entry in ["login", "read", "logout", "login", "write"] {
///     tree.insert(entry).unwrap();
/// }
///
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.capacity(), 8);
/// assert_eq!(tree.layers(), 4);
/// assert_eq!(tree.get(2), Some(&"logout"));
/// assert_eq!(tree.leaves().filter(|leaf| leaf.payload().is_none()).count(), 3);
/// ```
pub struct CBMTree<T, H = Sha256, E = DisplayEncoding, P = EmptyDigest>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H>,
{
    nodes: Vec<Node<T, H>>,
    shape: Option<Shape>,
    size: usize,
    placeholder: P,
    _encoding: PhantomData<fn() -> E>,
}

impl<T, H, E, P> CBMTree<T, H, E, P>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H>,
{
    /// Creates an empty tree with the default placeholder policy.
    #[inline]
    pub fn new() -> Self
    where
        P: Default,
    {
        Self::with_placeholder(P::default())
    }

    /// Creates an empty tree that draws placeholder digests from `placeholder`.
    #[inline(always)]
    pub const fn with_placeholder(placeholder: P) -> Self {
        Self {
            nodes: Vec::new(),
            shape: None,
            size: 0,
            placeholder,
            _encoding: PhantomData,
        }
    }

    /// Returns the number of inserted values.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns whether no value has been inserted yet.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of node levels from root to leaf inclusive, or `0` when empty.
    #[inline]
    pub fn layers(&self) -> usize {
        self.shape.map_or(0, |shape| shape.layers)
    }

    /// Returns the number of leaves currently provisioned, `2^(layers - 1)`, or `0` when empty.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shape.map_or(0, |shape| shape.capacity())
    }

    /// Returns the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.shape.map(|shape| shape.root)
    }

    /// Returns the current Merkle root of the tree.
    ///
    /// When the tree is empty the zero hash of the digest is returned.
    #[inline]
    pub fn root_hash(&self) -> HashOf<H> {
        self.shape
            .map(|shape| self.slot(shape.root).hash.clone())
            .unwrap_or_else(zero_hash::<H>)
    }

    /// Appends a value to the tree.
    ///
    /// Grows capacity first when the tree is empty or full, then writes the value into the leaf
    /// under the insertion cursor, recomputes the hashes on its path to the root, and moves the
    /// cursor to the next leaf. Only growth can fail; on failure the tree is left exactly as it
    /// was and `value` is dropped.
    pub fn insert(&mut self, value: T) -> Result<()> {
        let shape = match self.shape {
            Some(shape) if self.size < shape.capacity() => shape,
            _ => self.grow_layer()?,
        };

        let leaf = shape.cursor;
        let hash = E::leaf_hash::<H>(&value);
        let node = self.slot_mut(leaf);
        node.hash = hash;
        node.payload = Some(value);
        self.size += 1;
        trace!(leaf = leaf.index(), size = self.size, "wrote leaf");

        self.update_hashes_upward(leaf);

        let cursor = match self.find_next_node(leaf) {
            Some(next) => next,
            None => {
                trace!(size = self.size, "capacity exhausted, cursor parked on root");
                shape.root
            }
        };
        self.shape = Some(Shape { cursor, ..shape });
        Ok(())
    }

    /// Appends every value yielded by `values`, in order.
    ///
    /// Returns the number of values inserted. Stops at the first error and returns it; values
    /// inserted before the failure stay in the tree.
    pub fn insert_batch<I>(&mut self, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let mut inserted = 0usize;
        for value in values {
            self.insert(value)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Returns the value stored at leaf position `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.size {
            return None;
        }
        let shape = self.shape?;
        let mut current = shape.root;
        for level in (0..shape.layers - 1).rev() {
            let (left, right) = self.slot(current).children?;
            current = if (index >> level) & 1 == 0 { left } else { right };
        }
        self.slot(current).payload.as_ref()
    }

    /// Returns a read-only view of the node behind `id`.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, H>> {
        self.nodes.get(id.0).map(|node| NodeRef { id, node })
    }

    /// Returns the leaf immediately to the right of `leaf` in left-to-right order.
    ///
    /// Returns `None` when `leaf` is the last leaf provisioned at the current capacity, or when
    /// `id` does not name a leaf of this tree.
    #[inline]
    pub fn next_leaf(&self, leaf: NodeId) -> Option<NodeId> {
        match self.nodes.get(leaf.0) {
            Some(node) if node.children.is_none() => self.find_next_node(leaf),
            _ => None,
        }
    }

    /// Iterates over every provisioned leaf from left to right, placeholders included.
    #[inline]
    pub fn leaves(&self) -> Leaves<'_, T, H, E, P> {
        Leaves {
            tree: self,
            next: self.shape.map(|shape| self.leftmost_leaf(shape.root)),
        }
    }

    /// Iterates over the inserted values in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.leaves().map_while(|leaf| leaf.payload())
    }

    /// Visits the whole tree in pre-order, yielding each node with its hash.
    ///
    /// An empty tree yields nothing.
    #[inline]
    pub fn traverse(&self) -> Traverse<'_, T, H, E, P> {
        Traverse {
            tree: self,
            stack: self.root().into_iter().collect(),
        }
    }

    /// Visits the subtree rooted at `id` in pre-order, yielding each node with its hash.
    #[inline]
    pub fn traverse_from(&self, id: NodeId) -> Traverse<'_, T, H, E, P> {
        let stack = if id.0 < self.nodes.len() {
            vec![id]
        } else {
            Vec::new()
        };
        Traverse { tree: self, stack }
    }

    /// Removes every node and value, returning the tree to its empty state.
    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.shape = None;
        self.size = 0;
    }

    fn grow_layer(&mut self) -> Result<Shape> {
        let Some(shape) = self.shape else {
            self.reserve(1, 0)?;
            let leaf = self.create_empty_tree(1);
            let shape = Shape {
                root: leaf,
                cursor: leaf,
                layers: 1,
            };
            self.shape = Some(shape);
            debug!(layers = 1, capacity = 1, "planted root leaf");
            return Ok(shape);
        };

        let layers = shape.layers;
        if layers >= usize::BITS as usize - 1 {
            return Err(Error::CapacityOverflow { layers });
        }
        // A placeholder subtree of `capacity` leaves plus the new root.
        let requested = shape
            .capacity()
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow { layers })?;
        self.reserve(requested, layers)?;

        let right = self.create_empty_tree(layers);
        let root = self.link(shape.root, right);
        let shape = Shape {
            root,
            cursor: self.leftmost_leaf(right),
            layers: layers + 1,
        };
        self.shape = Some(shape);
        debug!(
            layers = shape.layers,
            capacity = shape.capacity(),
            nodes = self.nodes.len(),
            "grew tree by one layer"
        );
        Ok(shape)
    }

    // Pushes made after a successful reserve never reallocate, so a subtree is either built in
    // full or not started.
    fn reserve(&mut self, requested: usize, layers: usize) -> Result<()> {
        self.nodes.try_reserve(requested).map_err(|_| {
            warn!(requested, layers, "failed to reserve nodes for a new layer");
            Error::AllocationFailed { requested }
        })
    }

    fn create_empty_tree(&mut self, layers: usize) -> NodeId {
        if layers == 1 {
            let hash = self.placeholder.placeholder_hash();
            return self.push(Node::leaf(hash));
        }
        let left = self.create_empty_tree(layers - 1);
        let right = self.create_empty_tree(layers - 1);
        self.link(left, right)
    }

    fn link(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let hash = node_hash::<H>(&self.slot(left).hash, &self.slot(right).hash);
        let parent = self.push(Node::internal(hash, left, right));
        self.slot_mut(left).parent = Some(ParentRef(parent));
        self.slot_mut(right).parent = Some(ParentRef(parent));
        parent
    }

    fn update_hashes_upward(&mut self, from: NodeId) {
        let mut current = Some(from);
        while let Some(id) = current {
            let children = self.slot(id).children;
            if let Some((left, right)) = children {
                let hash = node_hash::<H>(&self.slot(left).hash, &self.slot(right).hash);
                self.slot_mut(id).hash = hash;
            }
            current = self.slot(id).parent.map(ParentRef::node);
        }
    }

    fn find_next_node(&self, from: NodeId) -> Option<NodeId> {
        let mut last = from;
        let mut current = self.slot(from).parent.map(ParentRef::node);
        while let Some(parent) = current {
            let (_, right) = self.slot(parent).children?;
            if right != last {
                return Some(self.leftmost_leaf(right));
            }
            last = parent;
            current = self.slot(parent).parent.map(ParentRef::node);
        }
        None
    }

    #[inline]
    fn leftmost_leaf(&self, mut current: NodeId) -> NodeId {
        while let Some((left, _)) = self.slot(current).children {
            current = left;
        }
        current
    }

    #[inline(always)]
    fn push(&mut self, node: Node<T, H>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline(always)]
    fn slot(&self, id: NodeId) -> &Node<T, H> {
        &self.nodes[id.0]
    }

    #[inline(always)]
    fn slot_mut(&mut self, id: NodeId) -> &mut Node<T, H> {
        &mut self.nodes[id.0]
    }
}

impl<T, H, E, P> Default for CBMTree<T, H, E, P>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H, E, P> Clone for CBMTree<T, H, E, P>
where
    T: Clone,
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            shape: self.shape,
            size: self.size,
            placeholder: self.placeholder.clone(),
            _encoding: PhantomData,
        }
    }
}

impl<T, H, E, P> fmt::Debug for CBMTree<T, H, E, P>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CBMTree")
            .field("len", &self.size)
            .field("layers", &self.layers())
            .field("capacity", &self.capacity())
            .field("root_hash", &self.root_hash())
            .finish()
    }
}

/// Read-only view of a single tree node.
pub struct NodeRef<'a, T, H>
where
    H: Digest,
{
    id: NodeId,
    node: &'a Node<T, H>,
}

impl<'a, T, H> NodeRef<'a, T, H>
where
    H: Digest,
{
    /// Handle of this node.
    #[inline(always)]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Cached digest of this node.
    #[inline(always)]
    pub fn hash(&self) -> &'a HashOf<H> {
        &self.node.hash
    }

    /// Value stored in this leaf, or `None` for placeholders and internal nodes.
    #[inline(always)]
    pub fn payload(&self) -> Option<&'a T> {
        self.node.payload.as_ref()
    }

    /// Left and right children, or `None` for a leaf.
    #[inline(always)]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.node.children
    }

    /// Parent node, or `None` for the root.
    #[inline(always)]
    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent.map(ParentRef::node)
    }

    /// Returns whether this node is a leaf.
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.node.children.is_none()
    }
}

impl<T, H> Clone for NodeRef<'_, T, H>
where
    H: Digest,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, H> Copy for NodeRef<'_, T, H> where H: Digest {}

impl<T, H> fmt::Debug for NodeRef<'_, T, H>
where
    H: Digest,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("hash", &self.node.hash)
            .field("children", &self.node.children)
            .field("has_payload", &self.node.payload.is_some())
            .finish()
    }
}

/// Left-to-right iterator over the leaves of a [`CBMTree`], created by [`CBMTree::leaves`].
pub struct Leaves<'a, T, H, E, P>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H>,
{
    tree: &'a CBMTree<T, H, E, P>,
    next: Option<NodeId>,
}

impl<'a, T, H, E, P> Iterator for Leaves<'a, T, H, E, P>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H>,
{
    type Item = NodeRef<'a, T, H>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.find_next_node(current);
        self.tree.node(current)
    }
}

/// Pre-order iterator over `(node, hash)` pairs, created by [`CBMTree::traverse`].
pub struct Traverse<'a, T, H, E, P>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H>,
{
    tree: &'a CBMTree<T, H, E, P>,
    stack: Vec<NodeId>,
}

impl<'a, T, H, E, P> Iterator for Traverse<'a, T, H, E, P>
where
    H: Digest + Clone,
    E: LeafEncoding<T>,
    P: Placeholder<H>,
{
    type Item = (NodeId, &'a HashOf<H>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.slot(id);
        if let Some((left, right)) = node.children {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some((id, &node.hash))
    }
}

struct DigestWriter<H>
where
    H: Digest,
{
    digest: H,
}

impl<H> DigestWriter<H>
where
    H: Digest,
{
    #[inline(always)]
    fn new() -> Self {
        Self { digest: H::new() }
    }

    #[inline(always)]
    fn finalize(self) -> HashOf<H> {
        self.digest.finalize()
    }
}

impl<H> fmt::Write for DigestWriter<H>
where
    H: Digest,
{
    #[inline(always)]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.digest.update(s.as_bytes());
        Ok(())
    }
}

struct DigestHasher<H>
where
    H: Digest + Clone,
{
    digest: H,
}

impl<H> DigestHasher<H>
where
    H: Digest + Clone,
{
    #[inline(always)]
    fn new() -> Self {
        Self { digest: H::new() }
    }

    #[inline(always)]
    fn finalize(self) -> HashOf<H> {
        self.digest.finalize()
    }
}

impl<H> Hasher for DigestHasher<H>
where
    H: Digest + Clone,
{
    #[inline(always)]
    fn finish(&self) -> u64 {
        // Big-endian prefix of the digest so far; shorter digests leave the low bytes zero.
        let output = self.digest.clone().finalize();
        let prefix = output
            .iter()
            .take(8)
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
        prefix << (8 * (8 - output.len().min(8)))
    }

    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
    }
}

#[inline(always)]
fn zero_hash<H: Digest>() -> HashOf<H> {
    Output::<H>::default()
}

#[inline(always)]
fn node_hash<H: Digest>(left: &HashOf<H>, right: &HashOf<H>) -> HashOf<H> {
    let mut hasher = H::new();
    hasher.update(left.as_slice());
    hasher.update(right.as_slice());
    hasher.finalize()
}
