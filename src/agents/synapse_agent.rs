// src/agents/synapse_agent.rs
// Experimental policy: classifies the map's risk first, then lets the chosen
// weight profile drive both the risk-aware search and the final scoring.

use log::info;
use serde::{Deserialize, Serialize};

use super::{select_best_path, Agent, Solution, WeightProfile};
use crate::core::Map;
use crate::navigation::{RiskAwareHeuristic, SearchConfig};

/// Obstacle-covered fraction above which a map is high risk
pub const DENSITY_THRESHOLD: f64 = 0.08;

/// Corridor obstacle count above which a map is high risk
pub const CLUTTER_THRESHOLD: usize = 2;

/// Half-width of the corridor around the straight start-end line
pub const CORRIDOR_BUFFER: f64 = 8.0;

/// Safety-first profile for cluttered maps
pub const HIGH_RISK_PROFILE: WeightProfile = WeightProfile::new(0.1, 0.1, 0.8);

/// Efficiency-first profile for open maps
pub const LOW_RISK_PROFILE: WeightProfile = WeightProfile::new(0.5, 0.4, 0.1);

/// Risk classification of a whole scenario
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Obstacle area over map area
    pub density: f64,
    /// Obstacles intersecting the start-end corridor
    pub corridor_clutter: usize,
}

impl RiskAssessment {
    /// Measure density and corridor clutter of `map`
    pub fn of(map: &Map) -> Self {
        RiskAssessment {
            density: map.obstacle_density(),
            corridor_clutter: map.corridor_clutter(CORRIDOR_BUFFER),
        }
    }

    /// Dense map or cluttered start-end corridor
    pub fn is_high_risk(&self) -> bool {
        self.density > DENSITY_THRESHOLD || self.corridor_clutter > CLUTTER_THRESHOLD
    }

    /// Weight profile for this risk level
    pub fn profile(&self) -> WeightProfile {
        if self.is_high_risk() {
            HIGH_RISK_PROFILE
        } else {
            LOW_RISK_PROFILE
        }
    }
}

/// Agent that adapts its weights to the assessed risk of each map
pub struct SynapseAgent {
    name: String,
    search: SearchConfig,
}

impl Default for SynapseAgent {
    fn default() -> Self {
        SynapseAgent::new(SearchConfig::default())
    }
}

impl SynapseAgent {
    /// SYNAPSE agent with the given search parameters
    pub fn new(search: SearchConfig) -> Self {
        SynapseAgent {
            name: "SYNAPSEAgent".to_string(),
            search,
        }
    }

    /// Pick the weight profile for `map`
    pub fn select_metric_profile(&self, map: &Map) -> WeightProfile {
        let risk = RiskAssessment::of(map);
        if risk.is_high_risk() {
            info!(
                "[{}] High risk detected (Density: {:.2}, Clutter: {}). Prioritizing safety.",
                self.name, risk.density, risk.corridor_clutter
            );
        } else {
            info!(
                "[{}] Low risk detected (Density: {:.2}, Clutter: {}). Prioritizing efficiency.",
                self.name, risk.density, risk.corridor_clutter
            );
        }
        risk.profile()
    }
}

impl Agent for SynapseAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, map: &Map) -> Solution {
        let weights = self.select_metric_profile(map);
        info!(
            "[{}] Solving map with dynamic weights: {:?}",
            self.name, weights
        );

        let heuristic = RiskAwareHeuristic::new(map, weights.safety);
        select_best_path(&self.name, map, &heuristic, weights, &self.search)
    }
}
