// Resume analysis: upload intake, staging, text extraction, prompt,
// model call and response normalization.
// All LLM calls go through llm_client: no direct provider calls here.

pub mod extract;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod staging;

#[cfg(test)]
pub(crate) mod fixtures;
