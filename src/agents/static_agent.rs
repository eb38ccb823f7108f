// src/agents/static_agent.rs
// Control-group policy: distance-only search, fixed scoring weights.

use log::info;

use super::{select_best_path, Agent, Solution, WeightProfile};
use crate::core::Map;
use crate::navigation::{DistanceHeuristic, SearchConfig};

/// Fixed profile of the control group
pub const STATIC_PROFILE: WeightProfile = WeightProfile::new(0.4, 0.2, 0.4);

/// Agent that always scores candidates with the same weights
pub struct StaticAgent {
    name: String,
    weights: WeightProfile,
    search: SearchConfig,
}

impl Default for StaticAgent {
    fn default() -> Self {
        StaticAgent::new(SearchConfig::default())
    }
}

impl StaticAgent {
    /// Static agent with the given search parameters
    pub fn new(search: SearchConfig) -> Self {
        StaticAgent {
            name: "StaticAgent".to_string(),
            weights: STATIC_PROFILE,
            search,
        }
    }

    /// Fixed weight profile
    pub fn weights(&self) -> WeightProfile {
        self.weights
    }
}

impl Agent for StaticAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, map: &Map) -> Solution {
        info!(
            "[{}] Solving map with static weights: {:?}",
            self.name, self.weights
        );
        // Weights only shape the final choice; the search itself is distance-driven
        select_best_path(&self.name, map, &DistanceHeuristic, self.weights, &self.search)
    }
}
