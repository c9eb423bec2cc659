//! Language tooling for AZSL shaders.
//!
//! [`grammar::AzslParser`] turns text into a [`syntax::SyntaxTree`], reusing the
//! untouched declarations of a previous tree after an edit.
//! [`workspace::ShaderWorkspace`] keeps one record per document and answers
//! definition and hover queries across includes.
pub mod grammar;
pub mod include;
pub mod position;
pub mod shader_error;
pub mod shader_text;
pub mod symbols;
pub mod syntax;
pub mod workspace;
