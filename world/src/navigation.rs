//! Walkable tile graphs for room footprints and the shortest-path search over them.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap, HashMap, HashSet},
    rc::Rc,
};

use sinking_hotel_core::TileOffset;

/// Undirected 4-neighbour adjacency over the tiles of a room footprint.
///
/// Each tile is linked to the footprint tiles one unit away along a cardinal
/// direction. The graph is immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeGraph {
    adjacency: BTreeMap<TileOffset, Vec<TileOffset>>,
}

impl ShapeGraph {
    /// Builds the adjacency graph for the provided footprint offsets.
    ///
    /// Every tile is linked against the tiles inserted before it, so each
    /// neighbouring pair is joined exactly once regardless of input order.
    #[must_use]
    pub fn build(offsets: &[TileOffset]) -> Self {
        let mut adjacency: BTreeMap<TileOffset, Vec<TileOffset>> = BTreeMap::new();

        for &current in offsets {
            if adjacency.contains_key(&current) {
                continue;
            }

            let mut linked = Vec::with_capacity(4);
            for candidate in current.neighbors() {
                if let Some(edges) = adjacency.get_mut(&candidate) {
                    edges.push(current);
                    linked.push(candidate);
                }
            }
            let _ = adjacency.insert(current, linked);
        }

        Self { adjacency }
    }

    /// Tiles adjacent to the provided tile; empty when the tile is unknown.
    #[must_use]
    pub fn neighbors(&self, tile: TileOffset) -> &[TileOffset] {
        self.adjacency.get(&tile).map_or(&[], Vec::as_slice)
    }

    /// Reports whether the tile belongs to the footprint.
    #[must_use]
    pub fn contains(&self, tile: TileOffset) -> bool {
        self.adjacency.contains_key(&tile)
    }

    /// Number of tiles in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Reports whether the graph holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterator over the tiles in coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = TileOffset> + '_ {
        self.adjacency.keys().copied()
    }
}

/// Computes the shortest walkable path between two tiles, both inclusive.
///
/// The search is seeded at `end` and expands the closest known tile first,
/// breaking distance ties by coordinate order. Returns `[start]` when both
/// tiles match and an empty path when `start` cannot reach `end`.
#[must_use]
pub fn shortest_path(graph: &ShapeGraph, start: TileOffset, end: TileOffset) -> Vec<TileOffset> {
    if start == end {
        return vec![start];
    }

    if !graph.contains(start) || !graph.contains(end) {
        return Vec::new();
    }

    let mut distances: HashMap<TileOffset, u32> = HashMap::with_capacity(graph.len());
    let mut parents: HashMap<TileOffset, TileOffset> = HashMap::with_capacity(graph.len());
    let mut visited: HashSet<TileOffset> = HashSet::with_capacity(graph.len());
    let mut frontier = BinaryHeap::new();

    let _ = distances.insert(end, 0);
    frontier.push(Reverse((0_u32, end)));

    while let Some(Reverse((distance, tile))) = frontier.pop() {
        if !visited.insert(tile) {
            continue;
        }

        if tile == start {
            break;
        }

        let next_distance = distance + 1;
        for &neighbor in graph.neighbors(tile) {
            if visited.contains(&neighbor) {
                continue;
            }

            let improved = distances
                .get(&neighbor)
                .map_or(true, |&known| next_distance < known);
            if improved {
                let _ = distances.insert(neighbor, next_distance);
                let _ = parents.insert(neighbor, tile);
                frontier.push(Reverse((next_distance, neighbor)));
            }
        }
    }

    if !visited.contains(&start) {
        return Vec::new();
    }

    let mut path = vec![start];
    let mut cursor = start;
    while cursor != end {
        let Some(&parent) = parents.get(&cursor) else {
            return Vec::new();
        };
        path.push(parent);
        cursor = parent;
    }
    path
}

/// Memoizes shape graphs so every footprint is only built once.
#[derive(Debug, Default)]
pub struct ShapeGraphCache {
    graphs: HashMap<Vec<TileOffset>, Rc<ShapeGraph>>,
}

impl ShapeGraphCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the graph for the footprint, building it on first use.
    pub fn graph_for(&mut self, offsets: &[TileOffset]) -> Rc<ShapeGraph> {
        if let Some(graph) = self.graphs.get(offsets) {
            return Rc::clone(graph);
        }

        let graph = Rc::new(ShapeGraph::build(offsets));
        let _ = self.graphs.insert(offsets.to_vec(), Rc::clone(&graph));
        graph
    }

    /// Number of distinct footprints built so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Reports whether no footprint has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}
