//! Mode-aware A* search and the shortest path tree it produces.

mod astar;
mod spt;
mod traverse;

pub use astar::shortest_path_tree;
pub use spt::{GraphPath, SearchState, ShortestPathTree};
pub use traverse::{ModeSet, Traversal, TraverseOptions, TraverseState};
pub(crate) use traverse::traversable;
