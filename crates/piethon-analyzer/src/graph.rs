use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexMap;

/// A directed graph keyed by vertex value.
///
/// Vertices are identified by equality, kept in insertion order, and each has
/// an ordered list of successors. Parallel edges are kept.
#[derive(Debug, Clone)]
pub struct Digraph<V> {
    adjacency: IndexMap<V, Vec<V>>,
}

impl<V> Default for Digraph<V> {
    fn default() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }
}

impl<V: Eq + Hash + Clone> Digraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `vertex` unless an equal one is already present.
    ///
    /// Returns `true` if the vertex was new.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.adjacency.contains_key(&vertex) {
            return false;
        }
        self.adjacency.insert(vertex, Vec::new());
        true
    }

    /// Add an edge `from -> to`, inserting either endpoint if missing.
    pub fn add_edge(&mut self, from: V, to: V) {
        self.adjacency.entry(from).or_default().push(to.clone());
        self.add_vertex(to);
    }

    /// Look up the stored vertex equal to `key`.
    pub fn get_vertex<Q>(&self, key: &Q) -> Option<&V>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.adjacency.get_key_value(key).map(|(vertex, _)| vertex)
    }

    pub fn contains_vertex<Q>(&self, key: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.adjacency.contains_key(key)
    }

    /// All vertices, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    /// Immediate successors of `vertex` in edge insertion order.
    ///
    /// Empty if the vertex has no outgoing edges or is not in the graph.
    pub fn neighbors<Q>(&self, vertex: &Q) -> &[V]
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.adjacency.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every edge as a `(from, to)` pair, grouped by source vertex.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V)> {
        self.adjacency
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
