// Gap Analysis
// Builds the schema-constrained model request and validates what comes back.

pub mod handlers;
pub mod prompts;
pub mod provider;
pub mod schema;
