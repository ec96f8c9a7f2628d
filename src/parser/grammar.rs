//! Annotation grammar: the fixed table of recognized doc-comment forms.
//!
//! Doc-comment lines start with `---`. After the marker, a line is either an
//! annotation (`@keyword ...`), an empty separator, or free text. Each known
//! keyword has one match rule; a line whose keyword is known but whose rule
//! does not match is reported as [`Line::Malformed`] and contributes nothing.
//!
//! The table is built once and handed around by reference. [`Grammar::shared`]
//! returns a process-wide instance for callers that do not need their own.

use regex::Regex;
use std::sync::LazyLock;

/// The 3-character doc-comment marker.
pub const DOC_MARKER: &str = "---";

/// Plain Lua comment marker, also the inline-comment marker.
pub const COMMENT_MARKER: &str = "--";

/// One alternative of a type expression: `fun(...)[: RET]` or `name<generic>[]`,
/// optionally followed by `?`.
const TYPE_ALT: &str = r"(?:fun\([^)]*\)(?:\s*:\s*[\w.]+(?:<[^>]+>)?(?:\[\])*)?|[\w.]+(?:<[^>]+>)?(?:\[\])*)\??";

static SHARED: LazyLock<Grammar> = LazyLock::new(Grammar::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Class,
    Enum,
    Field,
    Type,
    Param,
    Return,
    NonStatic,
}

impl AnnotationKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(Self::Class),
            "enum" => Some(Self::Enum),
            "field" => Some(Self::Field),
            "type" => Some(Self::Type),
            "param" => Some(Self::Param),
            "return" => Some(Self::Return),
            "non-static" | "none-static" => Some(Self::NonStatic),
            _ => None,
        }
    }
}

/// Classification of a single doc-comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Class {
        name: &'a str,
        parent: Option<&'a str>,
        description: Option<&'a str>,
    },
    Enum {
        name: &'a str,
        description: Option<&'a str>,
    },
    Field {
        visibility: Option<&'a str>,
        name: &'a str,
        ty: &'a str,
        description: Option<&'a str>,
    },
    Type {
        ty: &'a str,
        description: Option<&'a str>,
    },
    Param {
        name: &'a str,
        ty: &'a str,
        optional: bool,
        description: Option<&'a str>,
    },
    Return {
        ty: &'a str,
        name: Option<&'a str>,
        description: Option<&'a str>,
    },
    NonStatic,
    /// Known keyword, unparseable remainder.
    Malformed(AnnotationKind),
    /// Any other `@word`; content discarded.
    Other(&'a str),
    /// A bare `---` line.
    Empty,
    /// Free text continuation.
    Text(&'a str),
}

/// A function declaration found on a code line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl<'a> {
    pub owner: Option<&'a str>,
    pub separator: Option<char>,
    pub name: &'a str,
    pub params: &'a str,
}

impl FunctionDecl<'_> {
    /// Comma-split positional parameter names, in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Compiled match rules, one per annotation kind, plus the code-line patterns.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<(AnnotationKind, Regex)>,
    keyword: Regex,
    function: Regex,
    assignment: Regex,
    local: Regex,
    local_binding: Regex,
    return_stmt: Regex,
    enum_value: Regex,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        let ty = format!(r"{TYPE_ALT}(?:\s*\|\s*{TYPE_ALT})*");
        let rule = |pattern: String| Regex::new(&pattern).unwrap();

        let rules = vec![
            (
                AnnotationKind::Class,
                rule(r"^@class\s+([\w.]+)(?:\s*:\s*([\w.]+))?\s*(.*)$".to_string()),
            ),
            (
                AnnotationKind::Enum,
                rule(r"^@enum\s+([\w.]+)(?:\s*:\s*([\w.]+))?\s*(.*)$".to_string()),
            ),
            (
                AnnotationKind::Field,
                rule(format!(
                    r"^@field\s+(?:(private|public|protected|package)\s+)?(\w+)\??\s+({ty})\s*(.*)$"
                )),
            ),
            (
                AnnotationKind::Type,
                rule(format!(r"^@type\s+({ty})(?:\s+(.+))?")),
            ),
            (
                AnnotationKind::Param,
                rule(format!(r"^@param\s+(\w+|\.\.\.)(\?)?\s+({ty})(?:\s+(.+))?")),
            ),
            (
                AnnotationKind::Return,
                rule(format!(r"^@return\s+({ty})(?:\s+(\w+))?(?:\s+(.+))?")),
            ),
            (
                AnnotationKind::NonStatic,
                rule(r"^@(?:non|none)-static\b".to_string()),
            ),
        ];

        Self {
            rules,
            keyword: Regex::new(r"^@([\w-]+)").unwrap(),
            function: Regex::new(
                r"\bfunction\s+(?:([A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*)([.:]))?([A-Za-z_]\w*)\s*\(([^)]*)\)",
            )
            .unwrap(),
            assignment: Regex::new(r"^([A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*)\s*=(?:[^=]|$)").unwrap(),
            local: Regex::new(r"^local\s+").unwrap(),
            local_binding: Regex::new(
                r"^local\s+([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)\s*=(?:[^=]|$)",
            )
            .unwrap(),
            return_stmt: Regex::new(r"\breturn\b").unwrap(),
            enum_value: Regex::new(r"^([A-Za-z_]\w*)\s*=").unwrap(),
        }
    }

    /// Process-wide grammar instance.
    pub fn shared() -> &'static Grammar {
        &SHARED
    }

    fn rule(&self, kind: AnnotationKind) -> Option<&Regex> {
        self.rules.iter().find(|(k, _)| *k == kind).map(|(_, re)| re)
    }

    /// Classify the text of a doc-comment line with the `---` marker already removed.
    pub fn classify<'a>(&self, content: &'a str) -> Line<'a> {
        let content = content.trim();
        if content.is_empty() {
            return Line::Empty;
        }
        let Some(caps) = self.keyword.captures(content) else {
            return Line::Text(content);
        };
        let keyword = caps.get(1).map_or("", |m| m.as_str());
        let Some(kind) = AnnotationKind::from_keyword(keyword) else {
            return Line::Other(keyword);
        };
        let Some(caps) = self.rule(kind).and_then(|re| re.captures(content)) else {
            return Line::Malformed(kind);
        };

        let opt = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
        };
        let req = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        match kind {
            AnnotationKind::Class => Line::Class {
                name: req(1),
                parent: opt(2),
                description: opt(3),
            },
            AnnotationKind::Enum => Line::Enum {
                name: req(1),
                description: opt(3),
            },
            AnnotationKind::Field => Line::Field {
                visibility: opt(1),
                name: req(2),
                ty: req(3),
                description: opt(4),
            },
            AnnotationKind::Type => Line::Type {
                ty: req(1),
                description: opt(2),
            },
            AnnotationKind::Param => {
                let (ty, type_optional) = strip_optional(req(3));
                Line::Param {
                    name: req(1),
                    ty,
                    optional: type_optional || caps.get(2).is_some(),
                    description: opt(4),
                }
            }
            AnnotationKind::Return => Line::Return {
                ty: strip_optional(req(1)).0,
                name: opt(2),
                description: opt(3),
            },
            AnnotationKind::NonStatic => Line::NonStatic,
        }
    }

    /// Classify a full doc-comment line (`---...`). Returns `None` for non-doc lines.
    pub fn classify_doc_line<'a>(&self, line: &'a str) -> Option<Line<'a>> {
        line.trim()
            .strip_prefix(DOC_MARKER)
            .map(|content| self.classify(content))
    }

    /// Match `function [Owner(.|:)]name(params)` anywhere on the line.
    pub fn function_decl<'a>(&self, code: &'a str) -> Option<FunctionDecl<'a>> {
        let caps = self.function.captures(code)?;
        Some(FunctionDecl {
            owner: caps.get(1).map(|m| m.as_str()),
            separator: caps.get(2).and_then(|m| m.as_str().chars().next()),
            name: caps.get(3)?.as_str(),
            params: caps.get(4).map_or("", |m| m.as_str()),
        })
    }

    /// Left-hand side of `IDENT(.IDENT)* = ...`.
    pub fn assignment_target<'a>(&self, code: &'a str) -> Option<&'a str> {
        self.assignment
            .captures(code)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn is_local(&self, code: &str) -> bool {
        self.local.is_match(code)
    }

    /// Names bound by `local a[, b...] = ...`.
    pub fn local_bindings<'a>(&self, code: &'a str) -> Vec<&'a str> {
        self.local_binding
            .captures(code)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().split(',').map(str::trim).collect())
            .unwrap_or_default()
    }

    /// Does this (comment-stripped) code contain the `return` keyword?
    pub fn returns_value(&self, code: &str) -> bool {
        self.return_stmt.is_match(code)
    }

    /// Name of an enum value line such as `RED = 1`.
    pub fn enum_value_name<'a>(&self, cleaned: &'a str) -> Option<&'a str> {
        self.enum_value
            .captures(cleaned)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Strip a trailing optional marker from a type token.
fn strip_optional(ty: &str) -> (&str, bool) {
    match ty.strip_suffix('?') {
        Some(clean) => (clean, true),
        None => (ty, false),
    }
}

/// Cut a line at the first inline comment marker.
pub fn strip_inline_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// `true` for doc-comment lines other than `---@meta`.
pub fn is_doc_line(trimmed: &str) -> bool {
    match trimmed.strip_prefix(DOC_MARKER) {
        Some(content) => match content.strip_prefix("@meta") {
            Some(rest) => !(rest.is_empty() || rest.starts_with(char::is_whitespace)),
            None => true,
        },
        None => false,
    }
}
