//! Response schemas for schema-constrained generation.
//!
//! Written in the OpenAPI subset accepted by `responseSchema`.

use serde_json::{Value, json};

pub fn clarification_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "needs_clarification": { "type": "BOOLEAN" },
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "text": { "type": "STRING" },
                        "allows_multiple": { "type": "BOOLEAN" },
                        "options": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "id": { "type": "STRING" },
                                    "text": { "type": "STRING" },
                                    "is_freeform_slot": { "type": "BOOLEAN" }
                                },
                                "required": ["id", "text"]
                            }
                        }
                    },
                    "required": ["id", "text", "allows_multiple", "options"]
                }
            }
        },
        "required": ["needs_clarification"]
    })
}

pub fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "plan_type": { "type": "STRING", "enum": ["SIMPLE_FACT", "DEEP_ANALYSIS"] },
            "reasoning": { "type": "STRING" },
            "strategy": { "type": "STRING" },
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "tasks": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "document": { "type": "STRING" },
                                    "question": { "type": "STRING" },
                                    "rationale": { "type": "STRING" }
                                },
                                "required": ["document", "question", "rationale"]
                            }
                        }
                    },
                    "required": ["title", "description", "tasks"]
                }
            }
        },
        "required": ["plan_type", "reasoning", "strategy", "steps"]
    })
}

pub fn plan_verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": { "type": "STRING", "enum": ["APPROVED", "REJECTED"] },
            "critique": { "type": "STRING" },
            "directives": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["verdict", "critique"]
    })
}

pub fn output_verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": { "type": "STRING", "enum": ["APPROVED", "REJECTED"] },
            "quality": { "type": "STRING" },
            "missing_data_suspected": { "type": "BOOLEAN" },
            "remediation": { "type": "STRING" }
        },
        "required": ["verdict", "quality", "missing_data_suspected"]
    })
}
