//! Lua annotation parser: line-by-line state machine.
//!
//! Doc-comment lines accumulate into a block. The first code line after the
//! block decides what the block documents: a class, an enum table, a static
//! field assignment or a function. Blank lines end a block with no code line.

use super::block::{interpret, ClassDecl, DeclKind, DocBlock, TypeDecl};
use super::cursor::LineCursor;
use super::grammar::{is_doc_line, Grammar, COMMENT_MARKER};
use super::registry::{Registry, GLOBAL_NAMESPACE};
use super::scan;
use crate::model::{
    FieldBuilder, FunctionBuilder, ModelError, Namespace, ParameterBuilder, ReturnBuilder,
};
use std::collections::HashSet;

// -- Parser state -------------------------------------------------------------

struct ParserState<'a> {
    grammar: &'a Grammar,
    registry: Registry,

    // Pending doc-comment lines (trimmed)
    block: Vec<&'a str>,

    // Names bound by `local` declarations; their members are not public API
    locals: HashSet<String>,
}

impl<'a> ParserState<'a> {
    fn new(grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            registry: Registry::new(),
            block: Vec::new(),
            locals: HashSet::new(),
        }
    }

    fn is_local(&self, name: &str) -> bool {
        self.locals.contains(name)
    }
}

// -- Public API ---------------------------------------------------------------

/// Parse annotated Lua source into the `"global"` namespace.
pub fn parse(input: &str) -> Result<Namespace, ModelError> {
    parse_with(Grammar::shared(), input)
}

/// Parse with an explicit grammar table.
pub fn parse_with(grammar: &Grammar, input: &str) -> Result<Namespace, ModelError> {
    let mut state = ParserState::new(grammar);
    let mut cursor = LineCursor::new(input);

    while let Some(line) = cursor.next() {
        process_line(&mut state, line, &mut cursor)?;
    }

    // A block left open at end of input has no code line, like a blank line.
    end_block(&mut state)?;

    Ok(state.registry.finish(GLOBAL_NAMESPACE))
}

// -- Line processing ----------------------------------------------------------

fn process_line<'a>(
    s: &mut ParserState<'a>,
    line: &'a str,
    cursor: &mut LineCursor<'a>,
) -> Result<(), ModelError> {
    let trimmed = line.trim();

    // 1. Doc comment: accumulate
    if is_doc_line(trimmed) {
        s.block.push(trimmed);
        return Ok(());
    }

    // 2. Blank line: the block ends without a code line
    if trimmed.is_empty() {
        return end_block(s);
    }

    // 3. Plain comment (and `---@meta`): neither extends nor ends the block
    if trimmed.starts_with(COMMENT_MARKER) {
        return Ok(());
    }

    // 4. Code line
    let mut declares_class = false;
    if s.block.is_empty() {
        document_function(s, None, trimmed, cursor)?;
    } else {
        let doc = interpret(s.grammar, &s.block);
        s.block.clear();
        declares_class = doc.declaration.is_some();
        correlate(s, &doc, trimmed, cursor)?;
    }

    // `---@class Foo` + `local Foo = {}` declares the public class table.
    if !declares_class {
        for name in s.grammar.local_bindings(trimmed) {
            s.locals.insert(name.to_string());
        }
    }

    Ok(())
}

/// Interpret a block that is not followed by a code line. Only class and
/// enum declarations are kept; enum values need the table body.
fn end_block(s: &mut ParserState<'_>) -> Result<(), ModelError> {
    if s.block.is_empty() {
        return Ok(());
    }
    let doc = interpret(s.grammar, &s.block);
    s.block.clear();

    if let Some(decl) = &doc.declaration {
        declare_class(s, decl, &doc)?;
    }
    Ok(())
}

// -- Correlation --------------------------------------------------------------

/// Decide what `doc` documents, given the code line that follows it.
fn correlate<'a>(
    s: &mut ParserState<'a>,
    doc: &DocBlock,
    code: &str,
    cursor: &mut LineCursor<'a>,
) -> Result<(), ModelError> {
    if let Some(decl) = doc.class_decl() {
        return declare_class(s, decl, doc);
    }

    if let Some(decl) = doc.enum_decl() {
        declare_class(s, decl, doc)?;
        let grammar = s.grammar;
        let class = s.registry.class_mut(&decl.name);
        return scan::scan_enum_body(grammar, cursor, code, class);
    }

    if let Some(type_decl) = &doc.type_decl {
        return declare_static_field(s, type_decl, code);
    }

    document_function(s, Some(doc), code, cursor)
}

fn declare_class(s: &mut ParserState<'_>, decl: &ClassDecl, doc: &DocBlock) -> Result<(), ModelError> {
    let class = s.registry.class_mut(&decl.name);
    class.describe(doc.description.as_deref());

    if decl.kind == DeclKind::Class {
        for field in &doc.fields {
            let mut field = field.clone();
            field.is_static = false;
            class.fields.push(field.build()?);
        }
    }
    Ok(())
}

/// `---@type T` followed by `Class.field = ...`.
fn declare_static_field(
    s: &mut ParserState<'_>,
    type_decl: &TypeDecl,
    code: &str,
) -> Result<(), ModelError> {
    if s.grammar.is_local(code) {
        return Ok(());
    }
    let Some(target) = s.grammar.assignment_target(code) else {
        return Ok(());
    };
    if s.is_local(target) {
        return Ok(());
    }

    let Some((class_name, field_name)) = target.split_once('.') else {
        return Ok(());
    };
    if field_name.contains('.') || s.is_local(class_name) {
        return Ok(());
    }

    let field = FieldBuilder {
        name: Some(field_name.to_string()),
        ty: Some(type_decl.ty.clone()),
        is_static: true,
        description: type_decl.description.clone(),
    }
    .build()?;
    s.registry.class_mut(class_name).fields.push(field);
    Ok(())
}

/// Record a function declared on `code`. `doc` is `None` for undocumented
/// functions, whose parameters are all typed `any`.
fn document_function<'a>(
    s: &mut ParserState<'a>,
    doc: Option<&DocBlock>,
    code: &str,
    cursor: &mut LineCursor<'a>,
) -> Result<(), ModelError> {
    if s.grammar.is_local(code) {
        return Ok(());
    }
    let Some(decl) = s.grammar.function_decl(code) else {
        return Ok(());
    };
    if let Some(owner) = decl.owner {
        let root = owner.split('.').next().unwrap_or(owner);
        if s.is_local(root) {
            return Ok(());
        }
    }

    let mut func = FunctionBuilder::new(decl.name);
    func.is_static = match doc {
        Some(doc) if doc.non_static => false,
        _ => decl.separator != Some(':'),
    };
    func.description = doc.and_then(|d| d.description.clone());

    for name in decl.param_names() {
        let param = doc
            .and_then(|d| d.param(name))
            .cloned()
            .unwrap_or_else(|| ParameterBuilder::untyped(name));
        func.parameters.push(param.build()?);
    }

    match doc {
        Some(doc) if !doc.returns.is_empty() => {
            func.returns = doc.returns.iter().cloned().map(ReturnBuilder::build).collect();
        }
        _ => {
            if scan::has_return_statement(s.grammar, cursor, code) {
                func.returns.push(ReturnBuilder::any().build());
            }
        }
    }

    let function = func.build();
    match decl.owner {
        Some(owner) => s.registry.class_mut(owner).functions.push(function),
        None => s.registry.add_global_function(function),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Namespace {
        parse(input).unwrap()
    }

    #[test]
    fn parse_vector_example() {
        let input = r#"---@class Vector
---@field x number
---@field y number
local Vector = {}

---@param dx number
---@return number
function Vector:length(dx)
  return dx
end
"#;
        let ns = parse_ok(input);
        assert_eq!(ns.name, "global");
        assert_eq!(ns.classes.len(), 1);

        let vector = &ns.classes[0];
        assert_eq!(vector.name, "Vector");
        assert_eq!(vector.fields.len(), 2);
        assert_eq!(vector.fields[0].name, "x");
        assert_eq!(vector.fields[0].ty, "number");
        assert!(!vector.fields[0].is_static);
        assert_eq!(vector.fields[1].name, "y");

        let length = vector.function("length").unwrap();
        assert!(!length.is_static);
        assert_eq!(length.parameters.len(), 1);
        assert_eq!(length.parameters[0].name, "dx");
        assert_eq!(length.parameters[0].ty, "number");
        assert_eq!(length.returns.len(), 1);
        assert_eq!(length.returns[0].ty, "number");
        assert_eq!(length.returns[0].name, "");
    }

    #[test]
    fn parameters_follow_declaration_order() {
        let input = r#"---@param b string The b
---@param a number The a
---@param ghost boolean Not a parameter
function M.f(a, b, c)
end
"#;
        let ns = parse_ok(input);
        let f = ns.class("M").unwrap().function("f").unwrap();
        let params: Vec<_> = f
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.ty.as_str()))
            .collect();
        assert_eq!(params, vec![("a", "number"), ("b", "string"), ("c", "any")]);
        assert_eq!(f.parameters[2].description, None);
        assert!(f.is_static);
    }

    #[test]
    fn explicit_returns_win_over_lookahead() {
        let input = r#"---@return boolean ok
---@return string? err
function check()
  print("no return here")
end
"#;
        let ns = parse_ok(input);
        let check = &ns.functions[0];
        assert_eq!(check.returns.len(), 2);
        assert_eq!(check.returns[0].ty, "boolean");
        assert_eq!(check.returns[0].name, "ok");
        assert_eq!(check.returns[1].ty, "string");
        assert_eq!(check.returns[1].name, "err");
    }

    #[test]
    fn lookahead_synthesizes_any_return() {
        let input = r#"--- Doubles x
---@param x number
function double(x)
  return x * 2
end

--- Prints x
function show(x)
  print(x)
end
"#;
        let ns = parse_ok(input);
        assert_eq!(ns.functions.len(), 2);
        let double = &ns.functions[0];
        assert_eq!(double.description.as_deref(), Some("Doubles x"));
        assert_eq!(double.returns.len(), 1);
        assert_eq!(double.returns[0].ty, "any");
        assert_eq!(double.returns[0].description, None);
        assert!(ns.functions[1].returns.is_empty());
    }

    #[test]
    fn optional_param_type() {
        let input = "---@param opts table? Options\nfunction setup(opts)\nend\n";
        let ns = parse_ok(input);
        let param = &ns.functions[0].parameters[0];
        assert!(param.optional);
        assert_eq!(param.ty, "table");
        assert_eq!(param.description.as_deref(), Some("Options"));
    }

    #[test]
    fn non_static_annotation_overrides_separator() {
        let input = "---@non-static\nfunction Obj.method(self)\nend\n";
        let ns = parse_ok(input);
        assert!(!ns.classes[0].functions[0].is_static);
    }

    #[test]
    fn early_bare_return_synthesizes_any() {
        let ns = parse_ok("function f(x)\n  if x then return end\n  print(x)\nend\n");
        assert_eq!(ns.functions[0].returns.len(), 1);
        assert_eq!(ns.functions[0].returns[0].ty, "any");
    }

    #[test]
    fn undocumented_functions() {
        let input = "function Util.join(a, b)\n  return a .. b\nend\n\nfunction log(msg)\nend\n";
        let ns = parse_ok(input);
        let join = ns.class("Util").unwrap().function("join").unwrap();
        assert!(join.parameters.iter().all(|p| p.ty == "any"));
        assert_eq!(join.description, None);
        assert_eq!(join.returns.len(), 1);
        assert_eq!(ns.functions[0].name, "log");
        assert!(ns.functions[0].returns.is_empty());
    }

    #[test]
    fn local_functions_and_local_tables_are_skipped() {
        let input = r#"local helpers = {}

---@param x number
function helpers.twice(x)
  return x
end

--- Private
local function secret()
end

---@type number
helpers.count = 0
"#;
        let ns = parse_ok(input);
        assert!(ns.classes.is_empty());
        assert!(ns.functions.is_empty());
    }

    #[test]
    fn static_field_from_type_annotation() {
        let input = r#"---@class Config
Config = {}

---@type string The default name
Config.name = "x"

---@type number
local limit = 10

---@type boolean
flag = true
"#;
        let ns = parse_ok(input);
        assert_eq!(ns.classes.len(), 1);
        let field = ns.classes[0].field("name").unwrap();
        assert!(field.is_static);
        assert_eq!(field.ty, "string");
        assert_eq!(field.description.as_deref(), Some("The default name"));
        assert_eq!(ns.classes[0].fields.len(), 1);
    }

    #[test]
    fn static_field_creates_class_lazily() {
        let input = "---@type number\nSettings.max = 3\n";
        let ns = parse_ok(input);
        assert_eq!(ns.classes[0].name, "Settings");
        assert_eq!(ns.classes[0].fields[0].name, "max");
    }

    #[test]
    fn enum_values_become_fields() {
        let input = "---@enum Color\nColor = { RED = 1, -- comment\n GREEN = 2 }\n";
        let ns = parse_ok(input);
        let color = ns.class("Color").unwrap();
        let names: Vec<_> = color.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN"]);
        assert!(color.fields.iter().all(|f| f.ty == "any"));
    }

    #[test]
    fn enum_body_does_not_leak_declarations() {
        let input = r#"---@enum Level Log levels
local Level = {
  ---@type number Debugging
  DEBUG = 1,
  INFO = 2,
}

function Level.name(value)
  return value
end
"#;
        let ns = parse_ok(input);
        let level = ns.class("Level").unwrap();
        assert_eq!(level.description.as_deref(), Some("Log levels"));
        assert_eq!(level.fields.len(), 2);
        assert_eq!(level.fields[0].ty, "number");
        assert_eq!(level.function("name").unwrap().returns.len(), 1);
    }

    #[test]
    fn class_block_before_blank_line_is_committed() {
        let input = "---@class Shape A shape\n---@field sides integer\n\n---@enum Dir Directions\n\nlocal x = 1\n";
        let ns = parse_ok(input);
        let names: Vec<_> = ns.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Shape", "Dir"]);
        assert_eq!(ns.classes[0].fields.len(), 1);
        assert!(ns.classes[1].fields.is_empty());
        assert_eq!(ns.classes[1].description.as_deref(), Some("Directions"));
    }

    #[test]
    fn class_block_at_end_of_input_is_committed() {
        let ns = parse_ok("---@class Trailing");
        assert_eq!(ns.classes[0].name, "Trailing");
    }

    #[test]
    fn function_block_before_blank_line_is_dropped() {
        let input = "---@param x number\n\nfunction f(x)\nend\n";
        let ns = parse_ok(input);
        assert_eq!(ns.functions[0].parameters[0].ty, "any");
    }

    #[test]
    fn meta_and_plain_comments() {
        let input = "---@meta\n--- Adds\n-- implementation note\n---@param a number\nfunction add(a)\nend\n";
        let ns = parse_ok(input);
        let add = &ns.functions[0];
        assert_eq!(add.description.as_deref(), Some("Adds"));
        assert_eq!(add.parameters[0].ty, "number");
    }

    #[test]
    fn class_description_merges_across_blocks() {
        let input = "---@class A First\nA = {}\n\n---@class A\nA.x = 1\n";
        let ns = parse_ok(input);
        assert_eq!(ns.classes.len(), 1);
        assert_eq!(ns.classes[0].description.as_deref(), Some("First"));
    }

    #[test]
    fn driver_resumes_after_function_declaration() {
        // The body of `outer` holds a documented global function; the
        // lookahead must not swallow it.
        let input = r#"function outer()
  ---@param n number
  function inner(n)
    return n
  end
end
"#;
        let ns = parse_ok(input);
        let names: Vec<_> = ns.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
        assert_eq!(ns.functions[1].parameters[0].ty, "number");
    }
}
