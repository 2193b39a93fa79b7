// Prompt templates for the token-relevance scorer.

pub const TOKEN_SCORE_SYSTEM: &str = "\
You are a football scouting analyst. \
You rate how strongly each word of a scouting report describes a player's on-pitch skill. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const TOKEN_SCORE_PROMPT: &str = r#"Rate every word of the following scouting report for skill relevance.

REPORT:
{report_text}

RULES:
- Score each word between 0.0 (irrelevant: names, clubs, dates, filler) and 1.0 (a clear football skill or attribute).
- Use the word exactly as it appears, lower-cased.
- Do not invent words that are not in the report.

OUTPUT SCHEMA (return exactly this structure):
{
  "scores": [
    {"token": "string", "score": number}
  ]
}"#;
