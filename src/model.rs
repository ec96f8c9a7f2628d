//! Data model for extracted documentation: format-agnostic.
//!
//! Finished values (`Class`, `Function`, ...) are immutable once built. The
//! parsing pass mutates only the `*Builder` records and finalizes them with
//! `build()`, which validates the required parts.

use serde::Serialize;
use thiserror::Error;

/// Invariant violations raised while finalizing a builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{entity} must have a name")]
    MissingName { entity: &'static str },
    #[error("{entity} `{name}` must have a type")]
    MissingType { entity: &'static str, name: String },
}

/// Complete documentation tree.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Documentation {
    pub namespaces: Vec<Namespace>,
}

/// Top-level grouping: one per project namespace, or `"global"` for a single file.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Namespace {
    pub name: String,
    pub classes: Vec<Class>,
    pub functions: Vec<Function>,
    pub fields: Vec<Field>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Class {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub functions: Vec<Function>,
}

impl Class {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// A class member, a static assignment or an enum value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(rename = "isStatic")]
    pub is_static: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    #[serde(rename = "isStatic")]
    pub is_static: bool,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub returns: Vec<ReturnValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub optional: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnValue {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub description: Option<String>,
}

// -- Builders -----------------------------------------------------------------

/// Drop empty descriptions so they serialize as `null`.
pub(crate) fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Append a continuation line to a description (newline-joined).
pub(crate) fn append_line(dest: &mut Option<String>, text: &str) {
    match dest {
        Some(existing) if !existing.is_empty() => {
            existing.push('\n');
            existing.push_str(text);
        }
        _ => *dest = Some(text.to_string()),
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClassBuilder {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub functions: Vec<Function>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Replace the description when `description` carries text; keep the old one otherwise.
    pub fn describe(&mut self, description: Option<&str>) {
        if let Some(desc) = non_empty(description.map(str::to_string)) {
            self.description = Some(desc);
        }
    }

    pub fn build(self) -> Class {
        Class {
            name: self.name,
            description: non_empty(self.description),
            fields: self.fields,
            functions: self.functions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldBuilder {
    pub name: Option<String>,
    pub ty: Option<String>,
    pub is_static: bool,
    pub description: Option<String>,
}

impl Default for FieldBuilder {
    fn default() -> Self {
        Self {
            name: None,
            ty: None,
            is_static: true,
            description: None,
        }
    }
}

impl FieldBuilder {
    pub fn build(self) -> Result<Field, ModelError> {
        let name = self.name.ok_or(ModelError::MissingName { entity: "field" })?;
        let ty = self.ty.ok_or_else(|| ModelError::MissingType {
            entity: "field",
            name: name.clone(),
        })?;
        Ok(Field {
            name,
            ty,
            is_static: self.is_static,
            description: non_empty(self.description),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParameterBuilder {
    pub name: Option<String>,
    pub ty: Option<String>,
    pub optional: bool,
    pub description: Option<String>,
}

impl ParameterBuilder {
    /// An undocumented parameter: type `any`, no description.
    pub fn untyped(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ty: Some("any".to_string()),
            ..Default::default()
        }
    }

    pub fn build(self) -> Result<Parameter, ModelError> {
        let name = self
            .name
            .ok_or(ModelError::MissingName { entity: "parameter" })?;
        let ty = self.ty.ok_or_else(|| ModelError::MissingType {
            entity: "parameter",
            name: name.clone(),
        })?;
        Ok(Parameter {
            name,
            ty,
            optional: self.optional,
            description: non_empty(self.description),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct ReturnBuilder {
    pub ty: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ReturnBuilder {
    /// The single return synthesized when a body returns but nothing is documented.
    pub fn any() -> Self {
        Self {
            ty: "any".to_string(),
            ..Default::default()
        }
    }

    pub fn build(self) -> ReturnValue {
        ReturnValue {
            ty: self.ty,
            name: self.name.unwrap_or_default(),
            description: non_empty(self.description),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct FunctionBuilder {
    pub name: String,
    pub is_static: bool,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub returns: Vec<ReturnValue>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: true,
            ..Default::default()
        }
    }

    pub fn build(self) -> Function {
        Function {
            name: self.name,
            is_static: self.is_static,
            description: non_empty(self.description),
            parameters: self.parameters,
            returns: self.returns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_without_type_is_rejected() {
        let builder = FieldBuilder {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(
            builder.build(),
            Err(ModelError::MissingType {
                entity: "field",
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn parameter_without_name_is_rejected() {
        let builder = ParameterBuilder {
            ty: Some("number".to_string()),
            ..Default::default()
        };
        assert_eq!(
            builder.build(),
            Err(ModelError::MissingName { entity: "parameter" })
        );
    }

    #[test]
    fn blank_descriptions_become_none() {
        let field = FieldBuilder {
            name: Some("x".to_string()),
            ty: Some("number".to_string()),
            description: Some("   ".to_string()),
            ..Default::default()
        }
        .build()
        .unwrap();
        assert_eq!(field.description, None);
        assert!(field.is_static);
    }

    #[test]
    fn untyped_parameter_defaults_to_any() {
        let param = ParameterBuilder::untyped("self").build().unwrap();
        assert_eq!(param.ty, "any");
        assert!(!param.optional);
    }

    #[test]
    fn append_line_joins_with_newline() {
        let mut desc = None;
        append_line(&mut desc, "first");
        append_line(&mut desc, "second");
        assert_eq!(desc.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn describe_keeps_existing_when_empty() {
        let mut class = ClassBuilder::new("Foo");
        class.describe(Some("A foo"));
        class.describe(None);
        class.describe(Some(""));
        assert_eq!(class.build().description.as_deref(), Some("A foo"));
    }

    #[test]
    fn serializes_camel_case_keys_and_null_descriptions() {
        let func = FunctionBuilder::new("len").build();
        let json = serde_json::to_string(&func).unwrap();
        assert_eq!(
            json,
            r#"{"name":"len","isStatic":true,"description":null,"parameters":[],"returns":[]}"#
        );
    }
}
