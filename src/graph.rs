//! In-memory undirected simple graphs.
//!
//! [`Graph`] is the dense, 1-based form every codec and layout routine works
//! on. [`LabeledGraph`] keeps arbitrary node identifiers in first-insertion
//! order and is what the generators produce; the encoder relabels it through
//! a [`Relabeling`] built once per call.

use crate::partlab_error::PartLabError;
use hashbrown::{HashMap, HashSet};
use std::hash::Hash;

/// Undirected simple graph over the dense vertex range `1..=n`.
///
/// Adjacency lists are kept sorted ascending, so neighbor iteration order is
/// the order the interchange format requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    /// `adjacency[i]` holds the sorted neighbors of vertex `i + 1`.
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Graph with `n` isolated vertices `1..=n`.
    pub fn with_vertices(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
            edge_count: 0,
        }
    }

    /// Build from an edge list, ignoring repeated pairs.
    pub fn from_edges(
        n: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, PartLabError> {
        let mut g = Self::with_vertices(n);
        for (u, v) in edges {
            g.add_edge(u, v)?;
        }
        Ok(g)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterator over `1..=n`.
    pub fn vertices(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.vertex_count()
    }

    /// Whether `v` names a vertex of this graph.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        v >= 1 && v <= self.vertex_count()
    }

    /// Sorted neighbor slice of vertex `v` (empty for unknown vertices).
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        if self.contains(v) {
            &self.adjacency[v - 1]
        } else {
            &[]
        }
    }

    pub fn degree(&self, v: usize) -> usize {
        self.neighbors(v).len()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// Insert the undirected edge `{u, v}`.
    ///
    /// Returns `Ok(false)` if the edge was already present. Self-loops and
    /// endpoints outside `1..=n` are rejected.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool, PartLabError> {
        if !self.contains(u) || !self.contains(v) {
            return Err(PartLabError::InvalidGraph(format!(
                "edge ({u}, {v}) has an endpoint outside 1..={}",
                self.vertex_count()
            )));
        }
        if u == v {
            return Err(PartLabError::InvalidGraph(format!("self-loop on vertex {u}")));
        }
        match self.adjacency[u - 1].binary_search(&v) {
            Ok(_) => Ok(false),
            Err(pos) => {
                self.adjacency[u - 1].insert(pos, v);
                if let Err(back) = self.adjacency[v - 1].binary_search(&u) {
                    self.adjacency[v - 1].insert(back, u);
                }
                self.edge_count += 1;
                Ok(true)
            }
        }
    }

    /// All edges `(u, v)` with `u < v`, in ascending lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.vertices().flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }
}

/// Read-only view of a graph the encoder can relabel.
///
/// Node iteration order defines the dense numbering: the first time a node
/// is yielded it receives the next free id.
pub trait GraphSource {
    /// Node identifier type.
    type NodeId: Clone + Eq + Hash;

    /// Nodes in their stable iteration order.
    fn nodes(&self) -> impl Iterator<Item = Self::NodeId> + '_;

    /// Undirected edges; each unordered pair may appear once or twice.
    fn edges(&self) -> impl Iterator<Item = (Self::NodeId, Self::NodeId)> + '_;
}

impl GraphSource for Graph {
    type NodeId = usize;

    fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices()
    }

    fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        Graph::edges(self)
    }
}

/// Undirected simple graph over arbitrary identifiers, insertion ordered.
#[derive(Debug, Clone)]
pub struct LabeledGraph<N: Clone + Eq + Hash> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    edges: Vec<(usize, usize)>,
    edge_set: HashSet<(usize, usize)>,
}

impl<N: Clone + Eq + Hash> Default for LabeledGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            edge_set: HashSet::new(),
        }
    }
}

impl<N: Clone + Eq + Hash> LabeledGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if unseen; returns its insertion index.
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(node.clone(), i);
        self.nodes.push(node);
        i
    }

    /// Add an undirected edge, adding missing endpoints as nodes.
    ///
    /// Returns `false` for self-loops and already-present edges.
    pub fn add_edge(&mut self, a: N, b: N) -> bool {
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        if ia == ib {
            return false;
        }
        let key = if ia < ib { (ia, ib) } else { (ib, ia) };
        if !self.edge_set.insert(key) {
            return false;
        }
        self.edges.push((ia, ib));
        true
    }

    pub fn has_edge(&self, a: &N, b: &N) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => {
                let key = if ia < ib { (ia, ib) } else { (ib, ia) };
                self.edge_set.contains(&key)
            }
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    pub fn node_list(&self) -> &[N] {
        &self.nodes
    }
}

impl<N: Clone + Eq + Hash> GraphSource for LabeledGraph<N> {
    type NodeId = N;

    fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().cloned()
    }

    fn edges(&self) -> impl Iterator<Item = (N, N)> + '_ {
        self.edges
            .iter()
            .map(|&(a, b)| (self.nodes[a].clone(), self.nodes[b].clone()))
    }
}

/// One-to-one map between source identifiers and dense ids `1..=n`.
#[derive(Debug, Clone)]
pub struct Relabeling<N: Clone + Eq + Hash> {
    order: Vec<N>,
    dense: HashMap<N, usize>,
}

impl<N: Clone + Eq + Hash> Relabeling<N> {
    /// Dense id of `node`, if it was part of the source.
    pub fn dense_id(&self, node: &N) -> Option<usize> {
        self.dense.get(node).copied()
    }

    /// Source identifier for dense id `id` (1-based).
    pub fn original(&self, id: usize) -> Option<&N> {
        id.checked_sub(1).and_then(|i| self.order.get(i))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Relabel `source` onto `1..=n` in first-seen node order.
///
/// The source is only read. Every edge endpoint must appear among the
/// source's nodes and self-loops are rejected.
pub fn relabel<S: GraphSource>(source: &S) -> Result<(Graph, Relabeling<S::NodeId>), PartLabError> {
    let mut order = Vec::new();
    let mut dense: HashMap<S::NodeId, usize> = HashMap::new();
    for node in source.nodes() {
        if !dense.contains_key(&node) {
            order.push(node.clone());
            dense.insert(node, order.len());
        }
    }

    let mut graph = Graph::with_vertices(order.len());
    for (a, b) in source.edges() {
        let (u, v) = match (dense.get(&a), dense.get(&b)) {
            (Some(&u), Some(&v)) => (u, v),
            _ => {
                return Err(PartLabError::InvalidGraph(
                    "edge endpoint is not among the graph's nodes".into(),
                ));
            }
        };
        graph.add_edge(u, v)?;
    }
    log::debug!(
        "relabeled graph onto 1..={} with {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok((graph, Relabeling { order, dense }))
}
