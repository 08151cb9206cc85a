use crate::types::Step;

/// Render the finished step sequence as a short diagnostic string, e.g.
/// `effect(horn_01) -> donation(2000000) -> qa(normal)`.
pub fn summarize(steps: &[Step]) -> String {
    if steps.is_empty() {
        // Unreachable through `plan` (it errors or falls back first).
        return "(no steps)".to_string();
    }
    steps
        .iter()
        .map(Step::label)
        .collect::<Vec<_>>()
        .join(" -> ")
}
