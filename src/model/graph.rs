//! Vertex/edge registry and the copy-on-query overlay.
//!
//! The base [`Graph`] is immutable once construction (and the one-time
//! network linking pass) finishes, so concurrent queries can share it
//! without synchronization. Each query owns an [`Overlay`]: a small delta of
//! extra vertices and edges layered over the base through a [`GraphView`].

use hashbrown::{HashMap, HashSet};

use crate::model::{Edge, Vertex, VertexId};

#[derive(Debug, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    labels: HashMap<String, VertexId>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Registers a vertex, deduplicating by label: registering a label twice
    /// returns the existing id.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        if let Some(&existing) = self.labels.get(vertex.label()) {
            return existing;
        }
        let id = VertexId(self.vertices.len() as u32);
        self.labels.insert(vertex.label().to_owned(), id);
        self.vertices.push(vertex);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Registers an edge between two already-registered vertices. Unknown
    /// endpoints are a programming error, not a runtime condition.
    pub fn add_edge(&mut self, edge: Edge) {
        assert!(
            edge.from.index() < self.vertices.len() && edge.to.index() < self.vertices.len(),
            "edge endpoints must be registered before the edge"
        );
        let idx = self.edges.len();
        self.outgoing[edge.from.index()].push(idx);
        self.incoming[edge.to.index()].push(idx);
        self.edges.push(edge);
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    pub fn vertex_by_label(&self, label: &str) -> Option<VertexId> {
        self.labels.get(label).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v))
    }

    pub fn outgoing(&self, id: VertexId) -> impl Iterator<Item = &Edge> {
        self.outgoing[id.index()].iter().map(|&i| &self.edges[i])
    }

    pub fn incoming(&self, id: VertexId) -> impl Iterator<Item = &Edge> {
        self.incoming[id.index()].iter().map(|&i| &self.edges[i])
    }

    pub fn view(&self) -> GraphView<'_> {
        GraphView {
            base: self,
            overlay: None,
        }
    }

    /// Installs an overlay delta permanently. Only the network linker calls
    /// this; exclusive access keeps it out of reach of running queries.
    pub(crate) fn absorb(&mut self, delta: OverlayDelta) {
        assert_eq!(
            delta.base_count,
            self.vertices.len(),
            "overlay was built against a different graph"
        );
        for vertex in delta.vertices {
            let id = VertexId(self.vertices.len() as u32);
            let previous = self.labels.insert(vertex.label().to_owned(), id);
            debug_assert!(previous.is_none(), "absorbed vertex label collides");
            self.vertices.push(vertex);
            self.outgoing.push(Vec::new());
            self.incoming.push(Vec::new());
        }
        for edge in delta.edges {
            self.add_edge(edge);
        }
    }
}

/// A split already made on a street vertex, so later splits of the same
/// geometry can reuse and chain to it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitPoint {
    pub fraction: f64,
    pub location: VertexId,
}

/// Exclusively-owned query-time delta over an immutable base graph. Extra
/// vertices get ids continuing past the base count; extra edges may touch
/// base vertices but the base itself is never modified.
#[derive(Debug)]
pub struct Overlay<'g> {
    base: &'g Graph,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    extra_out: HashMap<VertexId, Vec<usize>>,
    extra_in: HashMap<VertexId, Vec<usize>>,
    edge_pairs: HashSet<(VertexId, VertexId)>,
    splits: HashMap<VertexId, Vec<SplitPoint>>,
}

impl<'g> Overlay<'g> {
    pub fn new(base: &'g Graph) -> Self {
        Overlay {
            base,
            vertices: Vec::new(),
            edges: Vec::new(),
            extra_out: HashMap::new(),
            extra_in: HashMap::new(),
            edge_pairs: HashSet::new(),
            splits: HashMap::new(),
        }
    }

    /// The base graph, borrowed for the overlay's whole lifetime.
    pub fn base(&self) -> &'g Graph {
        self.base
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId((self.base.vertex_count() + self.vertices.len()) as u32);
        self.vertices.push(vertex);
        id
    }

    /// Adds an extra edge unless the ordered vertex pair is already
    /// connected in this overlay; returns whether the edge was added.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.edge_pairs.insert((edge.from, edge.to)) {
            return false;
        }
        let idx = self.edges.len();
        self.extra_out.entry(edge.from).or_default().push(idx);
        self.extra_in.entry(edge.to).or_default().push(idx);
        self.edges.push(edge);
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.base.vertex_count() + self.vertices.len()
    }

    pub fn extra_vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Mutable access to an overlay-owned vertex. Base vertices are
    /// immutable during a query; asking for one is a programming error.
    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        let base_count = self.base.vertex_count();
        assert!(
            id.index() >= base_count,
            "base graph vertices are immutable during a query"
        );
        &mut self.vertices[id.index() - base_count]
    }

    pub fn view(&self) -> GraphView<'_> {
        GraphView {
            base: self.base,
            overlay: Some(self),
        }
    }

    /// An existing split of `street` at (almost exactly) this fraction.
    pub(crate) fn split_at(&self, street: VertexId, fraction: f64) -> Option<VertexId> {
        const FRACTION_EPSILON: f64 = 1e-7;
        self.splits.get(&street).and_then(|points| {
            points
                .iter()
                .find(|p| (p.fraction - fraction).abs() < FRACTION_EPSILON)
                .map(|p| p.location)
        })
    }

    /// The splits of `street` immediately before and after `fraction`.
    pub(crate) fn neighbouring_splits(
        &self,
        street: VertexId,
        fraction: f64,
    ) -> (Option<SplitPoint>, Option<SplitPoint>) {
        let Some(points) = self.splits.get(&street) else {
            return (None, None);
        };
        let before = points
            .iter()
            .filter(|p| p.fraction < fraction)
            .max_by(|a, b| a.fraction.total_cmp(&b.fraction));
        let after = points
            .iter()
            .filter(|p| p.fraction > fraction)
            .min_by(|a, b| a.fraction.total_cmp(&b.fraction));
        (before.copied(), after.copied())
    }

    pub(crate) fn record_split(&mut self, street: VertexId, point: SplitPoint) {
        self.splits.entry(street).or_default().push(point);
    }

    /// Consumes the overlay, releasing the base borrow so the delta can be
    /// absorbed into the graph.
    pub fn into_delta(self) -> OverlayDelta {
        OverlayDelta {
            base_count: self.base.vertex_count(),
            vertices: self.vertices,
            edges: self.edges,
        }
    }
}

/// The owned remains of an overlay, ready for [`Graph::absorb`].
#[derive(Debug)]
pub struct OverlayDelta {
    pub(crate) base_count: usize,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
}

impl OverlayDelta {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Read surface for searches: the base graph plus an optional overlay.
#[derive(Clone, Copy)]
pub struct GraphView<'a> {
    base: &'a Graph,
    overlay: Option<&'a Overlay<'a>>,
}

impl<'a> GraphView<'a> {
    pub fn vertex(self, id: VertexId) -> &'a Vertex {
        let base_count = self.base.vertex_count();
        if id.index() < base_count {
            self.base.vertex(id)
        } else {
            let overlay = self
                .overlay
                .expect("overlay vertex id used without its overlay");
            &overlay.vertices[id.index() - base_count]
        }
    }

    pub fn vertex_count(self) -> usize {
        self.overlay
            .map_or(self.base.vertex_count(), Overlay::vertex_count)
    }

    pub fn outgoing(self, id: VertexId) -> impl Iterator<Item = &'a Edge> {
        let base = (id.index() < self.base.vertex_count())
            .then(|| self.base.outgoing(id))
            .into_iter()
            .flatten();
        let extra = self.overlay.into_iter().flat_map(move |overlay| {
            overlay
                .extra_out
                .get(&id)
                .into_iter()
                .flatten()
                .map(|&idx| &overlay.edges[idx])
        });
        base.chain(extra)
    }

    pub fn incoming(self, id: VertexId) -> impl Iterator<Item = &'a Edge> {
        let base = (id.index() < self.base.vertex_count())
            .then(|| self.base.incoming(id))
            .into_iter()
            .flatten();
        let extra = self.overlay.into_iter().flat_map(move |overlay| {
            overlay
                .extra_in
                .get(&id)
                .into_iter()
                .flatten()
                .map(|&idx| &overlay.edges[idx])
        });
        base.chain(extra)
    }
}
