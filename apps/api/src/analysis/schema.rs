//! Response schema handed to the model. Uses Gemini's OpenAPI-subset type names.

use serde_json::{json, Value};

/// Every field of every object is required; the model must fill the whole shape.
pub fn analysis_schema() -> Value {
    let skill = json!({
        "type": "OBJECT",
        "properties": {
            "name": {"type": "STRING", "description": "Name of the skill"},
            "category": {"type": "STRING", "description": "Technical, Soft Skill, Domain, etc."},
            "importance": {"type": "STRING", "enum": ["Critical", "High", "Medium", "Low"]},
            "requiredLevel": {"type": "INTEGER", "description": "1-5 scale required by JD"},
            "observedLevel": {"type": "INTEGER", "description": "1-5 scale observed in candidate"},
            "gap": {"type": "INTEGER", "description": "required - observed, 0 if observed >= required"},
            "reasoning": {
                "type": "STRING",
                "description": "Justification of the score, referencing specific evidence or lack thereof."
            },
            "evidence": {
                "type": "STRING",
                "description": "Direct quote from resume or 'Not explicitly found' or 'Implied by [Skill X]'"
            }
        },
        "required": [
            "name", "category", "importance", "requiredLevel",
            "observedLevel", "gap", "reasoning", "evidence"
        ]
    });

    let learning_action = json!({
        "type": "OBJECT",
        "properties": {
            "action": {"type": "STRING", "description": "Specific action to take"},
            "priority": {"type": "STRING", "enum": ["High", "Medium", "Low"]},
            "timeline": {"type": "STRING", "description": "Estimated time to complete"},
            "resource": {"type": "STRING", "description": "Suggested resource or URL"}
        },
        "required": ["action", "priority", "timeline", "resource"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "matchScore": {"type": "INTEGER", "description": "Overall match percentage (0-100)"},
            "executiveSummary": {
                "type": "STRING",
                "description": "High-level summary of the fit, identifying key strengths and critical missing pieces."
            },
            "skills": {"type": "ARRAY", "items": skill},
            "learningPathway": {"type": "ARRAY", "items": learning_action}
        },
        "required": ["matchScore", "executiveSummary", "skills", "learningPathway"]
    })
}
