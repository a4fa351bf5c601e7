//! Per-edge traversal: mode state machine, permissions and costs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Edge, EdgeKind, GraphView, Permission, TraverseMode};
use crate::{DEFAULT_BIKE_SPEED, DEFAULT_SNAP_DISTANCE, DEFAULT_WALK_SPEED, Time};

/// Travel modes a request may use on the street network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSet {
    walk: bool,
    bicycle: bool,
}

impl ModeSet {
    pub fn walking() -> Self {
        ModeSet {
            walk: true,
            bicycle: false,
        }
    }

    pub fn biking() -> Self {
        ModeSet {
            walk: true,
            bicycle: true,
        }
    }

    pub fn walk(&self) -> bool {
        self.walk
    }

    pub fn bicycle(&self) -> bool {
        self.bicycle
    }
}

/// Which vehicle the traveller is currently on. A cyclist barred from a
/// pedestrian-only segment dismounts into [`TraverseState::WalkingBike`] and
/// remounts as soon as a bike-permitted segment allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraverseState {
    Walking,
    Biking,
    WalkingBike,
}

/// Search options shared by every edge traversal of one request.
#[derive(Debug, Clone)]
pub struct TraverseOptions {
    pub modes: ModeSet,
    pub wheelchair: bool,
    pub arrive_by: bool,
    /// Walking speed in metres per second.
    pub walk_speed: f64,
    /// Cycling speed in metres per second.
    pub bike_speed: f64,
    /// Furthest a query point may snap to the network, in metres.
    pub max_snap_distance: f64,
    pub timeout: Option<Duration>,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        TraverseOptions {
            modes: ModeSet::walking(),
            wheelchair: false,
            arrive_by: false,
            walk_speed: DEFAULT_WALK_SPEED,
            bike_speed: DEFAULT_BIKE_SPEED,
            max_snap_distance: DEFAULT_SNAP_DISTANCE,
            timeout: None,
        }
    }
}

impl TraverseOptions {
    pub fn with_modes(modes: ModeSet) -> Self {
        TraverseOptions {
            modes,
            ..TraverseOptions::default()
        }
    }

    /// Fastest speed any state of this request can reach. Keeps the search
    /// heuristic admissible.
    pub fn max_speed(&self) -> f64 {
        if self.modes.bicycle {
            self.bike_speed.max(self.walk_speed)
        } else {
            self.walk_speed
        }
    }

    pub fn initial_state(&self) -> TraverseState {
        if self.modes.bicycle {
            TraverseState::Biking
        } else {
            TraverseState::Walking
        }
    }
}

/// Outcome of traversing one edge.
#[derive(Debug, Clone, Copy)]
pub struct Traversal {
    pub weight: f64,
    pub duration: Time,
    pub state: TraverseState,
}

/// Evaluates one edge under the request options, or `None` if it cannot be
/// traversed. `Out` and `Turn` edges charge the full length of the street
/// vertex they leave; the street vertex itself carries no cost.
pub(crate) fn traverse_edge(
    view: GraphView<'_>,
    edge: &Edge,
    state: TraverseState,
    options: &TraverseOptions,
) -> Option<Traversal> {
    match &edge.kind {
        EdgeKind::Free => Some(Traversal {
            weight: 0.0,
            duration: 0.0,
            state,
        }),
        EdgeKind::Out => {
            let street = street_of(view, edge)?;
            street_traversal(
                street.length,
                street.permission,
                street.wheelchair_accessible,
                0.0,
                options,
            )
        }
        EdgeKind::Turn { cost, restricted } => {
            if *restricted {
                return None;
            }
            let street = street_of(view, edge)?;
            street_traversal(
                street.length,
                street.permission,
                street.wheelchair_accessible,
                *cost,
                options,
            )
        }
        EdgeKind::Partial(partial) => street_traversal(
            partial.length,
            partial.permission,
            partial.wheelchair_accessible,
            partial.turn_cost,
            options,
        ),
    }
}

fn street_of<'a>(view: GraphView<'a>, edge: &Edge) -> Option<&'a crate::model::StreetVertex> {
    view.vertex(edge.from).as_street()
}

/// Costs a stretch of street under the request options. `extra_cost` is a
/// turn penalty in seconds, added after the length is timed.
fn street_traversal(
    length: f64,
    permission: Permission,
    wheelchair_accessible: bool,
    extra_cost: f64,
    options: &TraverseOptions,
) -> Option<Traversal> {
    if options.wheelchair && !wheelchair_accessible {
        return None;
    }
    let (state, speed) = if options.modes.bicycle() {
        if permission.allows(TraverseMode::Bicycle) {
            (TraverseState::Biking, options.bike_speed)
        } else if permission.allows(TraverseMode::Walk) {
            (TraverseState::WalkingBike, options.walk_speed)
        } else {
            return None;
        }
    } else if options.modes.walk() && permission.allows(TraverseMode::Walk) {
        (TraverseState::Walking, options.walk_speed)
    } else {
        return None;
    };
    let duration = length / speed + extra_cost;
    Some(Traversal {
        weight: duration,
        duration,
        state,
    })
}

/// Whether a street with this permission is usable at all under the options.
/// The snapping index uses this to skip candidates the search could never
/// leave from.
pub(crate) fn traversable(
    permission: Permission,
    wheelchair_accessible: bool,
    options: &TraverseOptions,
) -> bool {
    street_traversal(1.0, permission, wheelchair_accessible, 0.0, options).is_some()
}
