use std::{
    collections::VecDeque,
    fmt::{Debug, Display},
    ops::{Deref, DerefMut},
};

use log::{debug, warn};

use crate::error::GridError;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference is inside the map
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Like `is_valid`, but describes why the node is rejected
    fn validate(&self, node: Self::Reference) -> Result<(), GridError>;

    /// Check if the provided node can be stood on
    fn is_passable(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the passable neighbors of the provided node, in a fixed order
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;

    /// Check that a storage covers exactly the nodes of this map
    fn check_storage<T: Default + Copy + Clone + 'static>(
        &self,
        storage: &Self::Storage<T>,
    ) -> Result<(), GridError>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;

    /// Restore every entry to its default value
    fn reset(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitedItem<R> {
    pub distance: usize,
    pub from: Option<R>,
}

/// Search record entry: `None` until the node has been reached
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visited<R>(Option<VisitedItem<R>>);

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<R> Deref for Visited<R> {
    type Target = Option<VisitedItem<R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<R> DerefMut for Visited<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl<R> Display for Visited<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(item) => write!(f, "{:03} ", item.distance),
            None => write!(f, "{:3} ", ""),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    /// Every node from start to goal, both included
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    /// Number of steps, i.e. `path.len() - 1`
    pub distance: usize,
    /// Number of nodes taken off the queue before the goal was reached
    pub expanded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    BudgetExhausted,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Breadth-first search from `start` to `goal` that can be driven one step at a time.
///
/// The search record (distance and predecessor per node) is owned by the finder, so
/// several finders may run over the same map at once. `finish` hands the record back
/// so that it can be inspected or reused through [`PathFinder::with_storage`].
pub struct PathFinder<M: MapTrait> {
    start: M::Reference,
    goal: M::Reference,
    visited: M::Storage<Visited<M::Reference>>,
    visit_list: VecDeque<M::Reference>,
    state: PathFinderState<M::Reference>,
    expanded: usize,
    max_expansions: Option<usize>,
}

impl<M: MapTrait> PathFinder<M> {
    pub fn new(map: &M, start: M::Reference, goal: M::Reference) -> Result<Self, GridError> {
        Self::with_storage(map, start, goal, map.create_storage())
    }

    /// Start a search that records into `visited`, a storage created by `map` (or by a
    /// map of the same size). The storage is reset first, whatever an earlier search
    /// left in it.
    pub fn with_storage(
        map: &M,
        start: M::Reference,
        goal: M::Reference,
        mut visited: M::Storage<Visited<M::Reference>>,
    ) -> Result<Self, GridError> {
        map.validate(start)?;
        map.validate(goal)?;
        map.check_storage(&visited)?;

        visited.reset();
        let mut visit_list = VecDeque::new();

        // a wall endpoint can never be reached, so there is nothing to search
        let state = if map.is_passable(start) && map.is_passable(goal) {
            *visited.get_mut(start) = Visited(Some(VisitedItem {
                distance: 0,
                from: None,
            }));
            visit_list.push_back(start);
            PathFinderState::Computing
        } else {
            debug!("start {:?} or goal {:?} is not passable", start, goal);
            PathFinderState::NoPathFound
        };

        Ok(Self {
            start,
            goal,
            visited,
            visit_list,
            state,
            expanded: 0,
            max_expansions: None,
        })
    }

    /// Give up with [`PathFinderState::BudgetExhausted`] instead of expanding more
    /// than `max` nodes. Dequeuing the goal is always allowed.
    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    pub fn finish(
        mut self,
        map: &M,
    ) -> (
        PathFinderState<M::Reference>,
        M::Storage<Visited<M::Reference>>,
    ) {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return (s, self.visited),
            }
        }
    }

    pub fn step(&mut self, map: &M) -> PathFinderState<M::Reference> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(current) = self.visit_list.pop_front() else {
            debug!(
                "{:?} is unreachable from {:?} ({} nodes expanded)",
                self.goal, self.start, self.expanded
            );
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        };

        let distance = self.visited.get(current).0.map_or(0, |item| item.distance);

        // reaching the goal never counts against the budget
        if current != self.goal && self.max_expansions.is_some_and(|max| self.expanded >= max) {
            warn!(
                "giving up after expanding {} nodes without reaching {:?}",
                self.expanded, self.goal
            );
            self.state = PathFinderState::BudgetExhausted;
            return self.state.clone();
        }
        self.expanded += 1;

        if current == self.goal {
            debug!(
                "found goal {:?}: distance={} expanded={}",
                self.goal, distance, self.expanded
            );

            self.state = PathFinderState::PathFound(PathResult {
                path: self.backtrack(),
                start: self.start,
                goal: self.goal,
                distance,
                expanded: self.expanded,
            });
            return self.state.clone();
        }

        for neighbor in map.neighbors_of(current) {
            if self.visited.get(neighbor).is_none() {
                *self.visited.get_mut(neighbor) = Visited(Some(VisitedItem {
                    distance: distance + 1,
                    from: Some(current),
                }));
                self.visit_list.push_back(neighbor);
            }
        }

        self.state.clone()
    }

    /// Follow the predecessors from the goal back to the start
    fn backtrack(&self) -> Vec<M::Reference> {
        let mut path = vec![self.goal];
        let mut node = self.goal;

        while let Some(VisitedItem {
            from: Some(from), ..
        }) = self.visited.get(node).0
        {
            path.push(from);
            node = from;
        }

        path.reverse();
        path
    }

    pub fn state(&self) -> &PathFinderState<M::Reference> {
        &self.state
    }

    pub fn get_visited(&self) -> &M::Storage<Visited<M::Reference>> {
        &self.visited
    }

    pub fn start(&self) -> M::Reference {
        self.start
    }

    pub fn goal(&self) -> M::Reference {
        self.goal
    }
}

/// Run a search to completion.
///
/// Returns `Ok(None)` when the goal cannot be reached (including when either endpoint
/// is a wall) and an error when an endpoint lies outside the map.
pub fn shortest_path<M: MapTrait>(
    map: &M,
    start: M::Reference,
    goal: M::Reference,
) -> Result<Option<PathResult<M::Reference>>, GridError> {
    let (state, _) = PathFinder::new(map, start, goal)?.finish(map);

    Ok(match state {
        PathFinderState::PathFound(result) => Some(result),
        _ => None,
    })
}
