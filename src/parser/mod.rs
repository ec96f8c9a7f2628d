//! Parser module: annotation grammar, line correlation and merging.

pub mod block;
pub mod cursor;
pub mod grammar;
pub mod lua;
pub mod merge;
pub mod registry;
pub mod scan;

pub use grammar::Grammar;
pub use lua::{parse, parse_with};
pub use merge::{merge_class, merge_namespace};

use crate::model::{Documentation, ModelError};

/// Parse a single source into a one-namespace documentation tree.
pub fn parse_document(input: &str) -> Result<Documentation, ModelError> {
    Ok(Documentation {
        namespaces: vec![parse(input)?],
    })
}
