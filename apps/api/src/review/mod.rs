// Peer review pipeline: rubric selection, upload validation, the reviewer
// seam over the LLM client, and the HTTP handlers that tie them to layout
// and PDF rendering.
// All LLM calls go through llm_client; nothing here talks to the provider directly.

pub mod handlers;
pub mod reviewer;
pub mod rubric;
pub mod upload;
