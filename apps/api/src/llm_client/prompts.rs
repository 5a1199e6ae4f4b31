// Shared prompt fragments. Each collaborator defines its own prompts alongside it;
// this file only holds cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the model from inventing resume content.
pub const FIDELITY_INSTRUCTION: &str = "\
    CRITICAL: Only use information present in the provided resume text or data. \
    Do NOT infer employers, dates, degrees, or metrics that are not stated. \
    If a field is not present, omit it or use null.";

/// Joins a collaborator's role description with the shared JSON-only rule.
pub fn system_prompt(role: &str) -> String {
    format!("{role}\n\n{JSON_ONLY_SYSTEM}")
}
