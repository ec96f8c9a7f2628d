//! Documentation model registry: in-progress classes and global functions.

use crate::model::{ClassBuilder, Function, Namespace};
use std::collections::HashMap;

/// Name of the namespace produced for a single source file.
pub const GLOBAL_NAMESPACE: &str = "global";

/// Insertion-ordered class builders plus the global function list.
#[derive(Debug, Default)]
pub struct Registry {
    index: HashMap<String, usize>,
    classes: Vec<ClassBuilder>,
    functions: Vec<Function>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a class builder, creating an empty one on first reference.
    pub fn class_mut(&mut self, name: &str) -> &mut ClassBuilder {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.classes.push(ClassBuilder::new(name));
                let idx = self.classes.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.classes[idx]
    }

    pub fn add_global_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    /// Flatten into a finished namespace, preserving first-seen order.
    pub fn finish(self, name: &str) -> Namespace {
        Namespace {
            name: name.to_string(),
            classes: self.classes.into_iter().map(ClassBuilder::build).collect(),
            functions: self.functions,
            fields: Vec::new(),
        }
    }
}
