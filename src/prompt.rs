//! Prompt templates for cultivation advice.

// ---

pub const DEFAULT_QUESTION: &str = "What should I do next based on these readings and trends?";

const SNAPSHOT_TEMPLATE: &str = "
You are an expert cultivation AI assistant specializing in plant growth optimization.
Use the given readings to produce:
1) Diagnosis (short).
2) Next Steps (numbered, specific, measurable).
Readings:
{plant_data}
User question:
{user_question}
";

const HISTORY_TEMPLATE: &str = "
You are an expert cultivation AI assistant specializing in plant growth optimization and gives the user actionable advice they dont need to spend money for.

Inputs:
- Latest readings (snapshot): {plant_data}
- Recent history summary: {history_summary}

Goal:
- Provide actionable advice based on both the latest snapshot and recent trends.
- Interpret the snapshot in the context of the trend. If the trend contradicts the snapshot (e.g., moisture rising fast), adjust your recommendations accordingly.

Rules:
- Be elaborate but concise.
- First compare trend vs snapshot in one sentence.
- Output:

1. Diagnosis:
   - What the latest + trend indicate (e.g., \"Moisture is low and still falling ~4%/h.\")
2. Next Steps:
   1. Specific, measurable actions (e.g., \"Add 150-200 ml water to reach ~50%.\")
   2. Why each action helps.
   3. Timing/checks (e.g., \"recheck in 2h\"; \"shade at noon\").

If history is insufficient, say \"limited history; acting on snapshot.\"
User question:
{user_question}
";

/// Prompt built from the compact snapshot line only.
pub fn render_snapshot(plant_data: &str, user_question: &str) -> String {
    // ---
    SNAPSHOT_TEMPLATE
        .replace("{plant_data}", plant_data)
        .replace("{user_question}", user_question)
}

/// Prompt built from the snapshot line and the history digest.
///
/// The question is substituted last so user text is never re-expanded.
pub fn render_with_history(plant_data: &str, history_summary: &str, user_question: &str) -> String {
    // ---
    HISTORY_TEMPLATE
        .replace("{plant_data}", plant_data)
        .replace("{history_summary}", history_summary)
        .replace("{user_question}", user_question)
}
