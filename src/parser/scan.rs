//! Forward scans over un-parsed source: enum bodies and return statements.
//!
//! Both scans borrow the driver's cursor and always restore it to where
//! they started, so the driver re-reads every line they looked at.

use super::block::interpret;
use super::cursor::LineCursor;
use super::grammar::{strip_inline_comment, Grammar, COMMENT_MARKER};
use crate::model::{ClassBuilder, FieldBuilder, ModelError};

const TYPE_MARKER: &str = "---@type";

/// Collect the values of an `@enum` table into `class` as static fields.
///
/// `first_line` is the declaration line, which usually holds the opening `{`.
pub fn scan_enum_body(
    grammar: &Grammar,
    cursor: &mut LineCursor<'_>,
    first_line: &str,
    class: &mut ClassBuilder,
) -> Result<(), ModelError> {
    let mark = cursor.checkpoint();
    let result = scan_enum_values(grammar, cursor, first_line, class);
    cursor.restore(mark);
    result
}

fn scan_enum_values(
    grammar: &Grammar,
    cursor: &mut LineCursor<'_>,
    first_line: &str,
    class: &mut ClassBuilder,
) -> Result<(), ModelError> {
    let mut type_comments: Vec<&str> = Vec::new();
    let mut inside = false;

    if let Some(rest) = after_brace(first_line) {
        inside = true;
        if add_value(grammar, rest, &mut type_comments, class)? {
            return Ok(());
        }
    }

    for line in cursor.by_ref() {
        let trimmed = line.trim();

        if !inside {
            if let Some(rest) = after_brace(trimmed) {
                inside = true;
                if add_value(grammar, rest, &mut type_comments, class)? {
                    break;
                }
                continue;
            }
        }

        if trimmed.starts_with('}') {
            break;
        }
        if !inside {
            continue;
        }

        if trimmed.starts_with(TYPE_MARKER) {
            type_comments.push(trimmed);
        } else if trimmed.starts_with(COMMENT_MARKER) || trimmed.is_empty() {
            // other doc comments and plain comments carry nothing
        } else if add_value(grammar, trimmed, &mut type_comments, class)? {
            break;
        }
    }

    Ok(())
}

/// Text after the first `{`, if the line has one.
fn after_brace(line: &str) -> Option<&str> {
    line.find('{').map(|pos| line[pos + 1..].trim())
}

/// Add one enum value from a candidate line. Returns `true` when the line
/// also closes the table.
fn add_value(
    grammar: &Grammar,
    text: &str,
    type_comments: &mut Vec<&str>,
    class: &mut ClassBuilder,
) -> Result<bool, ModelError> {
    if text.is_empty() || text.starts_with(COMMENT_MARKER) {
        return Ok(false);
    }

    let code = strip_inline_comment(text);
    let closes = code.contains('}');
    let code = code.split('}').next().unwrap_or_default();
    let cleaned = code.split(',').next().unwrap_or_default().trim();

    let Some(name) = grammar.enum_value_name(cleaned) else {
        return Ok(closes);
    };

    let mut field = FieldBuilder {
        name: Some(name.to_string()),
        ty: Some("any".to_string()),
        is_static: true,
        description: None,
    };
    if !type_comments.is_empty() {
        if let Some(decl) = interpret(grammar, type_comments.as_slice()).type_decl {
            field.ty = Some(decl.ty);
            field.description = decl.description;
        }
        type_comments.clear();
    }
    class.fields.push(field.build()?);

    Ok(closes)
}

/// Heuristic: does the function declared on `decl_line` return a value?
///
/// Reads the body up to the `end` that balances the declaration. Lines that
/// start with `function` open a nested level; only a line that is exactly
/// `end` closes one, so `if`/`for`/`while` blocks end the scan early.
pub fn has_return_statement(grammar: &Grammar, cursor: &mut LineCursor<'_>, decl_line: &str) -> bool {
    let mark = cursor.checkpoint();

    let decl = strip_inline_comment(decl_line);
    let mut found = decl
        .find("function")
        .is_some_and(|pos| grammar.returns_value(&decl[pos..]));

    let mut depth = 1usize;
    while !found {
        let Some(line) = cursor.next() else { break };
        let trimmed = line.trim();
        if trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }
        let code = strip_inline_comment(trimmed).trim();

        if code.starts_with("function") {
            depth += 1;
        }
        if code == "end" {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
        if grammar.returns_value(code) {
            found = true;
        }
    }

    cursor.restore(mark);
    found
}
