//! Plan domain
//!
//! Plans, their review verdicts, the local review heuristics and the
//! planner-output parser.

pub mod entities;
pub mod feedback;
pub mod heuristics;
pub mod parser;
pub mod verdict;

pub use entities::{Plan, PlanStep, PlanType, Task};
pub use feedback::FailureFeedback;
pub use heuristics::{HeuristicFinding, PlanHeuristics, mentioned_documents};
pub use parser::{parse_plan, parse_plan_value};
pub use verdict::{OutputVerdict, PlanVerdict, ReviewOutcome};
