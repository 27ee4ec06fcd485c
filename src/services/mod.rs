pub mod actions;
pub mod llm;
