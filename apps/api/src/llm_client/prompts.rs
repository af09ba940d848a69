// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Output instruction appended to every structured system prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    OUTPUT INSTRUCTIONS:\n\
    - Return ONLY JSON matching the response schema.\n\
    - Do NOT wrap the JSON in markdown code fences.\n\
    - Do NOT include explanations or apologies outside the JSON object.";

/// Joins a role/task prompt with the shared JSON-only output instruction.
pub fn with_json_only(system: &str) -> String {
    format!("{}\n\n{}", system.trim_end(), JSON_ONLY_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_json_only_appends_instruction() {
        let prompt = with_json_only("You are a recruiter.\n\n");
        assert!(prompt.starts_with("You are a recruiter.\n\nOUTPUT INSTRUCTIONS"));
        assert!(prompt.ends_with("outside the JSON object."));
    }
}
