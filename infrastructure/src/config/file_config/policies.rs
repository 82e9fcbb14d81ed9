//! Policy configuration from TOML (`[policies]` section)

use serde::{Deserialize, Serialize};
use swarm_domain::{PlanHeuristics, PolicyText};

/// Prompt policies and Plan Review Board keyword lists.
///
/// ```toml
/// [policies]
/// audit = "Approve only reports that cite every figure."
/// complexity_keywords = ["compare", "versus", "trend"]
/// min_strategy_words = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePoliciesConfig {
    #[serde(flatten)]
    pub text: PolicyText,
    #[serde(flatten)]
    pub heuristics: PlanHeuristics,
}
