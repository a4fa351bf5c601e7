//! Shortest path tree: settled search states with back-pointers, dominance
//! over (vertex, mode state) pairs, and path extraction.

use hashbrown::HashMap;
use serde_json::json;

use crate::Time;
use crate::error::Error;
use crate::model::{GraphView, VertexId};
use crate::routing::TraverseState;

/// One labelled state reached by the search. States are append-only; back
/// pointers index earlier entries of the same tree.
#[derive(Debug, Clone, Copy)]
pub struct SearchState {
    pub vertex: VertexId,
    pub weight: f64,
    pub time: Time,
    pub mode: TraverseState,
    pub(crate) back: Option<usize>,
}

/// All states settled by one search, indexed for dominance checks.
#[derive(Debug)]
pub struct ShortestPathTree {
    arrive_by: bool,
    states: Vec<SearchState>,
    best: HashMap<(VertexId, TraverseState), usize>,
}

impl ShortestPathTree {
    pub(crate) fn new(arrive_by: bool) -> Self {
        ShortestPathTree {
            arrive_by,
            states: Vec::new(),
            best: HashMap::new(),
        }
    }

    pub fn arrive_by(&self) -> bool {
        self.arrive_by
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub(crate) fn state(&self, index: usize) -> SearchState {
        self.states[index]
    }

    /// Records a state unless an already-known state at the same vertex and
    /// mode is at least as good. Returns the index of the stored state.
    pub(crate) fn relax(&mut self, state: SearchState) -> Option<usize> {
        let key = (state.vertex, state.mode);
        if let Some(&known) = self.best.get(&key) {
            if self.states[known].weight <= state.weight {
                return None;
            }
        }
        let index = self.states.len();
        self.states.push(state);
        self.best.insert(key, index);
        Some(index)
    }

    /// Whether the state at `index` is still the best for its key. Stale
    /// heap entries fail this check and are skipped.
    pub(crate) fn is_current(&self, index: usize) -> bool {
        let state = &self.states[index];
        self.best.get(&(state.vertex, state.mode)) == Some(&index)
    }

    /// The cheapest settled state at a vertex, across mode states.
    pub fn best_state(&self, vertex: VertexId) -> Option<SearchState> {
        self.best
            .iter()
            .filter(|((v, _), _)| *v == vertex)
            .map(|(_, &i)| self.states[i])
            .min_by(|a, b| a.weight.total_cmp(&b.weight))
    }

    /// Reconstructs the path to `vertex` in chronological order. With
    /// `full`, every state is kept; otherwise interior zero-weight hops
    /// (free connectors) are collapsed, keeping the endpoints.
    pub fn get_path(&self, vertex: VertexId, full: bool) -> Option<GraphPath> {
        let end = self.best_state(vertex)?;
        let mut states = Vec::new();
        let mut cursor = Some(end);
        while let Some(state) = cursor {
            states.push(state);
            cursor = state.back.map(|i| self.states[i]);
        }
        if !self.arrive_by {
            // The back-chain runs end-to-origin; a departure search reads
            // forward in time.
            states.reverse();
        }
        if !full && states.len() > 2 {
            let last = states.len() - 1;
            let mut compact = vec![states[0]];
            for (i, state) in states.iter().enumerate().skip(1) {
                let previous = compact
                    .last()
                    .filter(|kept| i < last && kept.weight == state.weight);
                if previous.is_none() {
                    compact.push(*state);
                }
            }
            states = compact;
        }
        Some(GraphPath {
            states,
            arrive_by: self.arrive_by,
        })
    }
}

/// A finished path through the network, states in chronological order.
#[derive(Debug, Clone)]
pub struct GraphPath {
    states: Vec<SearchState>,
    arrive_by: bool,
}

impl GraphPath {
    pub fn states(&self) -> &[SearchState] {
        &self.states
    }

    /// Total search weight of the path.
    pub fn weight(&self) -> f64 {
        self.states
            .iter()
            .map(|s| s.weight)
            .fold(0.0, f64::max)
    }

    pub fn start_time(&self) -> Time {
        self.states.first().map_or(0.0, |s| s.time)
    }

    pub fn end_time(&self) -> Time {
        self.states.last().map_or(0.0, |s| s.time)
    }

    pub fn duration(&self) -> Time {
        self.end_time() - self.start_time()
    }

    pub fn arrive_by(&self) -> bool {
        self.arrive_by
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.states.iter().map(|s| s.vertex)
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.states.iter().any(|s| s.vertex == vertex)
    }

    /// Renders the path as a GeoJSON feature: a line string through the
    /// coordinates of the visited vertices, with timing properties.
    pub fn to_geojson(&self, view: GraphView<'_>) -> Result<geojson::Feature, Error> {
        let coordinates: Vec<[f64; 2]> = self
            .states
            .iter()
            .map(|s| {
                let point = view.vertex(s.vertex).coordinate();
                [point.x(), point.y()]
            })
            .collect();
        let modes: Vec<String> = self
            .states
            .iter()
            .map(|s| format!("{:?}", s.mode))
            .collect();
        let value = json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
            "properties": {
                "weight": self.weight(),
                "duration": self.duration(),
                "start_time": self.start_time(),
                "end_time": self.end_time(),
                "arrive_by": self.arrive_by,
                "modes": modes,
            },
        });
        serde_json::from_value::<geojson::Feature>(value)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    pub fn to_geojson_string(&self, view: GraphView<'_>) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(view)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}
