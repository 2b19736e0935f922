//! Mutation prompt construction and the text helpers around it.
//!
//! The prompt always ends with the sentence being mutated on its own line, so the
//! sentence can be recovered from the prompt when every mutation attempt fails.

use itertools::Itertools;

pub const INSTRUCTION_PROMPT: &str = "\
You are simulating one single-pass \"telephone game\" mutation of a sentence.
Goal: make a *small, plausible* change that could arise from mishearing or loose paraphrase in a whisper chain.
Constraints:
- Change should be slight (e.g., a homophone/substitution like \"immoral\"→\"immortal\", a near-synonym, a small function-word shift, a light reordering, or one short phrase changed).
- Keep the sentence as one sentence. Preserve approximate length and semantics; do not summarize or expand.
- Avoid profanity, slurs, or adding/removing named entities without reason.
- Output ONLY the mutated sentence (no quotes, no commentary, no prefix/suffix).
";

/// Build the one-step mutation prompt for `sentence`.
///
/// `intensity` is a free-form hint such as `"1-3"`; it is only embedded in the text.
pub fn build_prompt(sentence: &str, intensity: Option<&str>) -> String {
    let mut prompt = String::from(INSTRUCTION_PROMPT);
    if let Some(hint) = intensity.map(str::trim).filter(|h| !h.is_empty()) {
        prompt.push_str(&format!("- Introduce {} small edit(s) in this pass.\n", hint));
    }
    prompt.push_str("Here is the sentence to mutate:\n\n");
    prompt.push_str(&normalize_whitespace(sentence));
    prompt
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// Last non-blank line of `prompt`, trimmed.
pub fn source_sentence(prompt: &str) -> Option<&str> {
    prompt
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
}
