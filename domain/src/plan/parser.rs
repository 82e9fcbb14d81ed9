//! Plan parsing from planner output.
//!
//! The planner is asked for JSON of the shape:
//!
//! ```json
//! {
//!   "plan_type": "SIMPLE_FACT | DEEP_ANALYSIS",
//!   "reasoning": "string",
//!   "strategy": "string",
//!   "steps": [
//!     {
//!       "title": "string",
//!       "description": "string",
//!       "tasks": [{ "document": "name", "question": "string", "rationale": "string" }]
//!     }
//!   ]
//! }
//! ```
//!
//! An explicit `"steps": []` is valid (the answer is already in the
//! history). An object with neither `steps` nor `tasks` is not a plan.

use super::entities::{Plan, PlanStep, PlanType, Task};
use crate::core::error::DomainError;
use crate::parsing::parse_structured;
use serde_json::Value;

/// Parse a plan from raw planner text (fenced, truncated, or clean).
pub fn parse_plan(text: &str) -> Result<Plan, DomainError> {
    let value = parse_structured(text)?;
    parse_plan_value(&value)
}

/// Build a [`Plan`] from an already-parsed JSON value.
///
/// Tasks without a document or question are dropped. A missing or unknown
/// `plan_type` is inferred: more than one step or more than one targeted
/// document means deep analysis.
pub fn parse_plan_value(value: &Value) -> Result<Plan, DomainError> {
    let obj = value
        .as_object()
        .ok_or_else(|| DomainError::InvalidPlan("plan is not a JSON object".to_string()))?;

    let reasoning = string_field(value, "reasoning");
    let strategy = string_field(value, "strategy");

    let mut steps = Vec::new();
    if let Some(raw_steps) = obj.get("steps").and_then(Value::as_array) {
        for (index, raw_step) in raw_steps.iter().enumerate() {
            steps.push(parse_step(raw_step, index));
        }
    } else if let Some(raw_tasks) = obj.get("tasks").and_then(Value::as_array) {
        // Flat task list without step grouping
        let mut step = PlanStep::new("Step 1", "");
        step.tasks = raw_tasks.iter().filter_map(parse_task).collect();
        steps.push(step);
    } else if obj.contains_key("steps") {
        return Err(DomainError::InvalidPlan("`steps` is not an array".to_string()));
    } else {
        return Err(DomainError::InvalidPlan("plan has no `steps`".to_string()));
    }

    let declared = obj
        .get("plan_type")
        .and_then(Value::as_str)
        .and_then(PlanType::parse_label);

    let mut plan = Plan::new(PlanType::SimpleFact, reasoning, strategy);
    plan.steps = steps;
    plan.plan_type = declared.unwrap_or_else(|| infer_plan_type(&plan));
    Ok(plan)
}

fn infer_plan_type(plan: &Plan) -> PlanType {
    if plan.steps.len() > 1 || plan.targeted_documents().len() > 1 {
        PlanType::DeepAnalysis
    } else {
        PlanType::SimpleFact
    }
}

fn parse_step(value: &Value, index: usize) -> PlanStep {
    let title = match string_field(value, "title") {
        t if t.is_empty() => format!("Step {}", index + 1),
        t => t,
    };
    let mut step = PlanStep::new(title, string_field(value, "description"));
    if let Some(tasks) = value.get("tasks").and_then(Value::as_array) {
        step.tasks = tasks.iter().filter_map(parse_task).collect();
    }
    step
}

fn parse_task(value: &Value) -> Option<Task> {
    let document = ["document", "document_id", "doc"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    let question = value
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    Some(Task::new(document, question, string_field(value, "rationale")))
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
