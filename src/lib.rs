//! CozyCraft: measurements in, clothing design prompt and image out.
//!
//! The text model (Gemini) expands a templated instruction into an image prompt,
//! and the image model (Hugging Face) renders it. Both sit behind the traits in
//! [`provider`] so the pipeline can run against test doubles.

pub mod config;
pub mod error;
pub mod form;
pub mod gemini;
pub mod huggingface;
pub mod models;
pub mod pipeline;
pub mod presenter;
pub mod prompt;
pub mod provider;
pub mod routes;
pub mod synthesizer;
