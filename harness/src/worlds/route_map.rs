//! `RouteMap`: shortest routes over an undirected road map.
//!
//! States are city names; the action "drive to X" is X's name. Neighbours
//! are offered in the order their roads were declared, which fixes the
//! tie-break order of every search over the map.

use std::collections::BTreeMap;

use waymark_search::problem::{PathCost, Problem};

use crate::contract::SearchWorld;

/// An undirected weighted road.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Road {
    pub from: String,
    pub to: String,
    pub distance: PathCost,
}

/// A road map with a start and a destination city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMap {
    name: String,
    roads: Vec<Road>,
    adjacency: BTreeMap<String, Vec<(String, PathCost)>>,
    straight_line: BTreeMap<String, PathCost>,
    start: String,
    goal: String,
}

impl RouteMap {
    /// Build a map from `(from, to, distance)` triples.
    #[must_use]
    pub fn new(name: &str, roads: &[(&str, &str, PathCost)], start: &str, goal: &str) -> Self {
        let mut adjacency: BTreeMap<String, Vec<(String, PathCost)>> = BTreeMap::new();
        for &(from, to, distance) in roads {
            adjacency
                .entry(from.to_string())
                .or_default()
                .push((to.to_string(), distance));
            adjacency
                .entry(to.to_string())
                .or_default()
                .push((from.to_string(), distance));
        }
        Self {
            name: name.to_string(),
            roads: roads
                .iter()
                .map(|&(from, to, distance)| Road {
                    from: from.to_string(),
                    to: to.to_string(),
                    distance,
                })
                .collect(),
            adjacency,
            straight_line: BTreeMap::new(),
            start: start.to_string(),
            goal: goal.to_string(),
        }
    }

    /// Straight-line distances to the destination, used as the heuristic.
    /// Cities without an entry estimate 0.
    #[must_use]
    pub fn with_straight_line(mut self, distances: &[(&str, PathCost)]) -> Self {
        self.straight_line = distances
            .iter()
            .map(|&(city, d)| (city.to_string(), d))
            .collect();
        self
    }

    /// Same map, different endpoints.
    #[must_use]
    pub fn with_route(mut self, start: &str, goal: &str) -> Self {
        self.start = start.to_string();
        self.goal = goal.to_string();
        self
    }

    #[must_use]
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Total distance along `route` starting from the start city, or `None`
    /// if some hop is not a road.
    #[must_use]
    pub fn route_length(&self, route: &[String]) -> Option<PathCost> {
        let mut at = &self.start;
        let mut total = 0;
        for next in route {
            total += self.distance(at, next)?;
            at = next;
        }
        Some(total)
    }

    fn distance(&self, from: &str, to: &str) -> Option<PathCost> {
        self.adjacency
            .get(from)?
            .iter()
            .find(|(city, _)| city == to)
            .map(|&(_, d)| d)
    }
}

/// Triangle A–B 1, B–C 2, A–C 5, from A to C.
#[must_use]
pub fn abc_triangle() -> RouteMap {
    RouteMap::new("abc_triangle", &[("A", "B", 1), ("B", "C", 2), ("A", "C", 5)], "A", "C")
}

/// Part of the Romanian road map, from Arad to Bucharest, with straight-line
/// distances to Bucharest.
#[must_use]
pub fn romania() -> RouteMap {
    RouteMap::new(
        "romania",
        &[
            ("Arad", "Zerind", 75),
            ("Arad", "Sibiu", 140),
            ("Arad", "Timisoara", 118),
            ("Zerind", "Oradea", 71),
            ("Oradea", "Sibiu", 151),
            ("Timisoara", "Lugoj", 111),
            ("Lugoj", "Mehadia", 70),
            ("Mehadia", "Drobeta", 75),
            ("Drobeta", "Craiova", 120),
            ("Craiova", "RimnicuVilcea", 146),
            ("Craiova", "Pitesti", 138),
            ("Sibiu", "Fagaras", 99),
            ("Sibiu", "RimnicuVilcea", 80),
            ("RimnicuVilcea", "Pitesti", 97),
            ("Fagaras", "Bucharest", 211),
            ("Pitesti", "Bucharest", 101),
            ("Bucharest", "Giurgiu", 90),
            ("Bucharest", "Urziceni", 85),
            ("Urziceni", "Hirsova", 98),
            ("Hirsova", "Eforie", 86),
            ("Urziceni", "Vaslui", 142),
            ("Vaslui", "Iasi", 92),
            ("Iasi", "Neamt", 87),
        ],
        "Arad",
        "Bucharest",
    )
    .with_straight_line(&[
        ("Arad", 366),
        ("Bucharest", 0),
        ("Craiova", 160),
        ("Drobeta", 242),
        ("Eforie", 161),
        ("Fagaras", 176),
        ("Giurgiu", 77),
        ("Hirsova", 151),
        ("Iasi", 226),
        ("Lugoj", 244),
        ("Mehadia", 241),
        ("Neamt", 234),
        ("Oradea", 380),
        ("Pitesti", 100),
        ("RimnicuVilcea", 193),
        ("Sibiu", 253),
        ("Timisoara", 329),
        ("Urziceni", 80),
        ("Vaslui", 199),
        ("Zerind", 374),
    ])
}

impl Problem for RouteMap {
    type State = String;
    type Action = String;

    fn initial_state(&self) -> String {
        self.start.clone()
    }

    fn actions(&self, city: &String) -> Vec<String> {
        self.adjacency
            .get(city)
            .map(|roads| roads.iter().map(|(to, _)| to.clone()).collect())
            .unwrap_or_default()
    }

    fn transition(&self, _city: &String, destination: &String) -> String {
        destination.clone()
    }

    fn is_goal(&self, city: &String) -> bool {
        *city == self.goal
    }

    fn step_cost(&self, from: &String, _action: &String, to: &String) -> PathCost {
        self.distance(from, to).unwrap_or(0)
    }
}

impl SearchWorld for RouteMap {
    fn world_id(&self) -> &str {
        &self.name
    }

    fn fixture(&self) -> serde_json::Value {
        serde_json::json!({
            "goal": self.goal,
            "roads": self
                .roads
                .iter()
                .map(|r| serde_json::json!([r.from, r.to, r.distance]))
                .collect::<Vec<_>>(),
            "start": self.start,
            "straight_line": self.straight_line,
        })
    }

    fn heuristic(&self, city: &String) -> PathCost {
        self.straight_line.get(city).copied().unwrap_or(0)
    }
}
