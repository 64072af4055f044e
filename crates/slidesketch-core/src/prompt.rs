//! Fixed instructions sent with every extraction request.

/// System instruction: strict JSON only, in the `{title, bullets, notes}` shape.
pub const SYSTEM_PROMPT: &str = r#"You convert a hand-drawn slide/photo into a clean slide outline.
Return STRICT JSON ONLY in this schema:
{
  "title": "string (<=80 chars)",
  "bullets": ["3-6 concise bullet points"],
  "notes": "short speaker notes (optional)"
}
Rules:
- Preserve the author's intent.
- If handwriting is unclear, keep it short and add "(?)".
- No extra commentary beyond JSON."#;

/// User instruction accompanying the image.
pub const USER_PROMPT: &str =
    "Extract a presentation-ready slide from this sketch. Keep output compact and readable.";

/// Sampling temperature. Kept low so repeated extractions agree.
pub const TEMPERATURE: f32 = 0.2;

/// Output ceiling for the completion.
pub const MAX_TOKENS: u32 = 600;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::TITLE_MAX_CHARS;

    #[test]
    fn system_prompt_names_every_output_field() {
        for field in ["\"title\"", "\"bullets\"", "\"notes\""] {
            assert!(SYSTEM_PROMPT.contains(field), "missing {field}");
        }
    }

    #[test]
    fn system_prompt_carries_title_cap_and_unclear_marker() {
        assert!(SYSTEM_PROMPT.contains(&format!("<={TITLE_MAX_CHARS} chars")));
        assert!(SYSTEM_PROMPT.contains("\"(?)\""));
    }
}
