//! Mode-aware A* over a [`GraphView`], in either time direction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use geo::{Distance, Haversine, Point};

use crate::model::{GraphView, VertexId};
use crate::routing::spt::{SearchState, ShortestPathTree};
use crate::routing::traverse::{TraverseOptions, traverse_edge};
use crate::{HEURISTIC_SLACK, Time};

/// Heap entry. The ordering is reversed so [`BinaryHeap`] behaves as a
/// min-heap, with ties broken by insertion serial: of two equal priorities
/// the earlier push wins, which keeps exploration order deterministic.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    priority: f64,
    serial: u64,
    state: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.serial == other.serial
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.serial.cmp(&self.serial))
    }
}

/// Grows a shortest path tree from `origin` until `target` is provably
/// settled, or the frontier or the optional timeout is exhausted. With
/// `arrive_by` the roles swap: the search runs backwards in time from
/// `target`, and `start_time` is the latest acceptable arrival.
pub fn shortest_path_tree(
    view: GraphView<'_>,
    origin: VertexId,
    target: VertexId,
    start_time: Time,
    options: &TraverseOptions,
) -> ShortestPathTree {
    let (source, goal) = if options.arrive_by {
        (target, origin)
    } else {
        (origin, target)
    };
    let goal_point = view.vertex(goal).coordinate();
    // Zero-cost connectors make the raw distance bound slightly
    // inconsistent; the slack restores admissibility.
    let heuristic = |point: Point<f64>| -> f64 {
        (Haversine.distance(point, goal_point) - HEURISTIC_SLACK).max(0.0) / options.max_speed()
    };

    let deadline = options.timeout.map(|t| Instant::now() + t);
    let mut spt = ShortestPathTree::new(options.arrive_by);
    let mut heap = BinaryHeap::new();
    let mut serial = 0u64;
    let mut best_goal: Option<f64> = None;

    if let Some(index) = spt.relax(SearchState {
        vertex: source,
        weight: 0.0,
        time: start_time,
        mode: options.initial_state(),
        back: None,
    }) {
        heap.push(Frontier {
            priority: heuristic(view.vertex(source).coordinate()),
            serial,
            state: index,
        });
    }

    while let Some(Frontier {
        priority, state, ..
    }) = heap.pop()
    {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                log::debug!("search timed out after {} settled states", spt.len());
                break;
            }
        }
        // With an admissible heuristic no remaining entry can improve on a
        // settled goal once its priority reaches the goal weight.
        if let Some(best) = best_goal {
            if priority >= best {
                break;
            }
        }
        if !spt.is_current(state) {
            continue;
        }
        let current = spt.state(state);
        if current.vertex == goal {
            let best = best_goal.get_or_insert(current.weight);
            *best = best.min(current.weight);
            continue;
        }

        let mut expand = |edge: &crate::model::Edge, next_vertex: VertexId| {
            let Some(traversal) = traverse_edge(view, edge, current.mode, options) else {
                return;
            };
            let time = if options.arrive_by {
                current.time - traversal.duration
            } else {
                current.time + traversal.duration
            };
            let next = SearchState {
                vertex: next_vertex,
                weight: current.weight + traversal.weight,
                time,
                mode: traversal.state,
                back: Some(state),
            };
            if let Some(index) = spt.relax(next) {
                serial += 1;
                heap.push(Frontier {
                    priority: next.weight + heuristic(view.vertex(next_vertex).coordinate()),
                    serial,
                    state: index,
                });
            }
        };
        if options.arrive_by {
            for edge in view.incoming(current.vertex) {
                expand(edge, edge.from);
            }
        } else {
            for edge in view.outgoing(current.vertex) {
                expand(edge, edge.to);
            }
        }
    }
    spt
}
