//! Navigation: entity tabs and per-tab route history.

use crate::components::History;
use crate::routes::EntityRoute;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Actors,
    Environments,
    Mitigations,
    Scenarios,
    Technologies,
    Vulnerabilities,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Actors => "Actors",
            View::Environments => "Environments",
            View::Mitigations => "Mitigations",
            View::Scenarios => "Scenarios",
            View::Technologies => "Technologies",
            View::Vulnerabilities => "Vulnerabilities",
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Actors,
            View::Environments,
            View::Mitigations,
            View::Scenarios,
            View::Technologies,
            View::Vulnerabilities,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let all = Self::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

/// Visited routes within one entity tab. Going back from the first route
/// lands on the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHistory<Id> {
    current: EntityRoute<Id>,
    previous: Vec<EntityRoute<Id>>,
}

impl<Id: Clone> RouteHistory<Id> {
    pub fn new() -> Self {
        Self {
            current: EntityRoute::List,
            previous: Vec::new(),
        }
    }

    pub fn current(&self) -> &EntityRoute<Id> {
        &self.current
    }

    pub fn push(&mut self, route: EntityRoute<Id>) {
        let previous = std::mem::replace(&mut self.current, route);
        self.previous.push(previous);
    }

    /// Replace the current route without recording it.
    pub fn replace(&mut self, route: EntityRoute<Id>) {
        self.current = route;
    }

    pub fn depth(&self) -> usize {
        self.previous.len()
    }
}

impl<Id: Clone> Default for RouteHistory<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone> History for RouteHistory<Id> {
    fn back(&mut self) {
        self.current = self.previous.pop().unwrap_or(EntityRoute::List);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Actors.next(), View::Environments);
        assert_eq!(View::Actors.previous(), View::Vulnerabilities);
        assert_eq!(View::Vulnerabilities.next(), View::Actors);
        for view in View::all() {
            assert_eq!(View::from_index(view.index()), Some(*view));
        }
        assert_eq!(View::from_index(View::all().len()), None);
    }

    #[test]
    fn test_history_back() {
        let mut history = RouteHistory::<i64>::new();
        history.push(EntityRoute::View(1));
        history.push(EntityRoute::Edit(1));
        assert_eq!(history.depth(), 2);
        history.back();
        assert_eq!(history.current(), &EntityRoute::View(1));
        history.back();
        assert_eq!(history.current(), &EntityRoute::List);
        history.back();
        assert_eq!(history.current(), &EntityRoute::List);
    }
}
