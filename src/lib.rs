//! luadoc: extract structured documentation from annotated Lua sources.
//!
//! A single file parses into one `"global"` namespace; a project
//! configuration maps namespace names to file lists that are parsed and
//! merged per namespace. The result serializes to JSON.

pub mod model;
pub mod parser;
pub mod project;
pub mod render;
