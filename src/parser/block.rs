//! Doc block interpreter: turns accumulated `---` lines into a [`DocBlock`].

use super::grammar::{Grammar, Line, DOC_MARKER};
use crate::model::{append_line, FieldBuilder, ParameterBuilder, ReturnBuilder};

/// What a `@class` or `@enum` annotation declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub kind: DeclKind,
    pub name: String,
    /// Parsed but not used downstream.
    pub parent: Option<String>,
}

/// `@type` annotation preceding a static assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub ty: String,
    pub description: Option<String>,
}

/// Interpreted doc block.
#[derive(Debug, Default)]
pub struct DocBlock {
    pub declaration: Option<ClassDecl>,
    pub type_decl: Option<TypeDecl>,
    pub fields: Vec<FieldBuilder>,
    pub params: Vec<ParameterBuilder>,
    pub returns: Vec<ReturnBuilder>,
    pub description: Option<String>,
    pub non_static: bool,
}

impl DocBlock {
    pub fn class_decl(&self) -> Option<&ClassDecl> {
        self.declaration.as_ref().filter(|d| d.kind == DeclKind::Class)
    }

    pub fn enum_decl(&self) -> Option<&ClassDecl> {
        self.declaration.as_ref().filter(|d| d.kind == DeclKind::Enum)
    }

    /// Documented parameter with exactly this name.
    pub fn param(&self, name: &str) -> Option<&ParameterBuilder> {
        self.params
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }
}

/// Entry that plain-text continuation lines attach to.
#[derive(Debug, Clone, Copy)]
enum Pending {
    None,
    Field(usize),
    Param(usize),
}

/// Interpret a block of doc-comment lines, in order.
pub fn interpret<S: AsRef<str>>(grammar: &Grammar, lines: &[S]) -> DocBlock {
    let mut block = DocBlock::default();
    let mut pending = Pending::None;

    for raw in lines {
        let trimmed = raw.as_ref().trim();
        let content = trimmed.strip_prefix(DOC_MARKER).unwrap_or(trimmed);

        match grammar.classify(content) {
            Line::Class {
                name,
                parent,
                description,
            } => {
                pending = Pending::None;
                block.declaration = Some(ClassDecl {
                    kind: DeclKind::Class,
                    name: name.to_string(),
                    parent: parent.map(str::to_string),
                });
                if let Some(desc) = description {
                    append_line(&mut block.description, desc);
                }
            }
            Line::Enum { name, description } => {
                pending = Pending::None;
                block.declaration = Some(ClassDecl {
                    kind: DeclKind::Enum,
                    name: name.to_string(),
                    parent: None,
                });
                if let Some(desc) = description {
                    append_line(&mut block.description, desc);
                }
            }
            Line::Field {
                name,
                ty,
                description,
                ..
            } => {
                block.fields.push(FieldBuilder {
                    name: Some(name.to_string()),
                    ty: Some(ty.to_string()),
                    is_static: false,
                    description: description.map(str::to_string),
                });
                pending = Pending::Field(block.fields.len() - 1);
            }
            Line::Type { ty, description } => {
                pending = Pending::None;
                block.type_decl = Some(TypeDecl {
                    ty: ty.to_string(),
                    description: description.map(str::to_string),
                });
            }
            Line::Param {
                name,
                ty,
                optional,
                description,
            } => {
                block.params.push(ParameterBuilder {
                    name: Some(name.to_string()),
                    ty: Some(ty.to_string()),
                    optional,
                    description: description.map(str::to_string),
                });
                pending = Pending::Param(block.params.len() - 1);
            }
            Line::Return {
                ty,
                name,
                description,
            } => {
                pending = Pending::None;
                block.returns.push(ReturnBuilder {
                    ty: ty.to_string(),
                    name: name.map(str::to_string),
                    description: description.map(str::to_string),
                });
            }
            Line::NonStatic => {
                pending = Pending::None;
                block.non_static = true;
            }
            Line::Malformed(_) | Line::Other(_) | Line::Empty => pending = Pending::None,
            Line::Text(text) => match pending {
                Pending::Field(i) => append_line(&mut block.fields[i].description, text),
                Pending::Param(i) => append_line(&mut block.params[i].description, text),
                Pending::None => append_line(&mut block.description, text),
            },
        }
    }

    block
}
