// Scouting engine: raw report → tags, insight and a finalized profile.
// Pipeline pieces are pure except the optional model scorer in inference.

pub mod analyze;
pub mod dedup;
pub mod export;
pub mod extractor;
pub mod handlers;
pub mod inference;
pub mod insight;
pub mod matcher;
pub mod prompts;
pub mod scorer;
pub mod vocabulary;
