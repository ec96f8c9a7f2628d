//! Cross-file merge: combine per-file documentation into one namespace.
//!
//! In project mode every file of a namespace is parsed on its own. Classes
//! that appear in several files (same exact name) are unioned; the file order
//! from the project configuration decides which definition wins.

use crate::model::{Class, Namespace};
use std::collections::{HashMap, HashSet};

/// Merge two versions of the same class. `existing` has priority: its fields
/// and functions come first and win on duplicate names, and its description
/// is kept when present. Names are unique in the result, even when one side
/// already repeats a name.
pub fn merge_class(existing: Class, incoming: Class) -> Class {
    let fields = unique_by_name(existing.fields.into_iter().chain(incoming.fields), |f| &f.name);
    let functions = unique_by_name(
        existing.functions.into_iter().chain(incoming.functions),
        |f| &f.name,
    );

    let description = existing
        .description
        .filter(|d| !d.is_empty())
        .or(incoming.description);

    Class {
        name: existing.name,
        description,
        fields,
        functions,
    }
}

/// Keep the first item for each name, in order.
fn unique_by_name<T>(items: impl Iterator<Item = T>, name: impl Fn(&T) -> &String) -> Vec<T> {
    let mut seen: HashSet<String> = HashSet::new();
    items.filter(|item| seen.insert(name(item).clone())).collect()
}

/// Fold per-file namespaces, in order, into a single namespace called `name`.
///
/// Classes are merged by name; global functions and namespace fields are
/// appended as they come.
pub fn merge_namespace(name: &str, docs: impl IntoIterator<Item = Namespace>) -> Namespace {
    let mut result = Namespace::new(name);
    let mut class_index: HashMap<String, usize> = HashMap::new();

    for doc in docs {
        for class in doc.classes {
            match class_index.get(&class.name) {
                Some(&idx) => {
                    let existing = std::mem::take(&mut result.classes[idx]);
                    result.classes[idx] = merge_class(existing, class);
                }
                None => {
                    class_index.insert(class.name.clone(), result.classes.len());
                    result.classes.push(class);
                }
            }
        }
        result.functions.extend(doc.functions);
        result.fields.extend(doc.fields);
    }

    result
}
