//! RAG (Retrieval-Augmented Generation) for question answering.
//!
//! A [`RagChain`] retrieves pages for a question, fills the prompt template
//! with them and asks the generator for an answer.

mod chain;
pub mod context;

pub use chain::{clean_answer, RagChain};
