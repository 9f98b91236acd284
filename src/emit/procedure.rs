//! Procedure registry: named slices of the top-level frame sequence.

use std::collections::HashMap;
use std::ops::Range;

use super::error::EmitError;

/// A `proc=name[,length]` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureDecl {
    pub name: String,
    /// Number of frames in the body, starting at the declaring frame.
    pub length: usize,
}

impl ProcedureDecl {
    pub fn parse(raw: &str, line: usize) -> Result<Self, EmitError> {
        let mut parts = raw.split(',');
        let name = parts.next().unwrap_or("").trim().to_string();
        let length = match parts.next() {
            None => 1,
            Some(len) => len
                .trim()
                .parse()
                .map_err(|_| EmitError::InvalidNumericLiteral {
                    line,
                    key: "proc",
                    value: raw.to_string(),
                })?,
        };
        Ok(Self { name, length })
    }
}

/// Procedure name → frame index range, valid for one top-level run.
#[derive(Debug, Clone, Default)]
pub struct ProcedureRegistry {
    bodies: HashMap<String, Range<usize>>,
}

impl ProcedureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `decl` starting at frame `start`, truncating the body at
    /// `frame_count`. A name can only be defined once per run.
    pub fn define(
        &mut self,
        decl: ProcedureDecl,
        start: usize,
        frame_count: usize,
        line: usize,
    ) -> Result<Range<usize>, EmitError> {
        if self.bodies.contains_key(&decl.name) {
            return Err(EmitError::DuplicateProcedure {
                line,
                name: decl.name,
            });
        }
        let end = start.saturating_add(decl.length).min(frame_count);
        let body = start..end.max(start);
        self.bodies.insert(decl.name, body.clone());
        Ok(body)
    }

    pub fn lookup(&self, name: &str, line: usize) -> Result<Range<usize>, EmitError> {
        self.bodies
            .get(name)
            .cloned()
            .ok_or_else(|| EmitError::UndefinedProcedure {
                line,
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decl_defaults_to_one_frame() {
        let decl = ProcedureDecl::parse("riff", 1).unwrap();
        assert_eq!(decl.name, "riff");
        assert_eq!(decl.length, 1);
    }

    #[test]
    fn decl_with_length() {
        let decl = ProcedureDecl::parse(" riff , 4 ", 1).unwrap();
        assert_eq!(decl.name, "riff");
        assert_eq!(decl.length, 4);
    }

    #[test]
    fn decl_with_bad_length() {
        let err = ProcedureDecl::parse("riff,four", 9).unwrap_err();
        assert_eq!(
            err,
            EmitError::InvalidNumericLiteral {
                line: 9,
                key: "proc",
                value: "riff,four".into()
            }
        );
    }

    #[test]
    fn define_and_lookup() {
        let mut registry = ProcedureRegistry::new();
        let decl = ProcedureDecl::parse("riff,3", 1).unwrap();
        registry.define(decl, 2, 10, 3).unwrap();
        assert_eq!(registry.lookup("riff", 5).unwrap(), 2..5);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn body_truncated_at_end() {
        let mut registry = ProcedureRegistry::new();
        let decl = ProcedureDecl::parse("tail,8", 1).unwrap();
        let body = registry.define(decl, 6, 8, 7).unwrap();
        assert_eq!(body, 6..8);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut registry = ProcedureRegistry::new();
        registry
            .define(ProcedureDecl::parse("a", 1).unwrap(), 0, 4, 1)
            .unwrap();
        let err = registry
            .define(ProcedureDecl::parse("a,2", 1).unwrap(), 2, 4, 3)
            .unwrap_err();
        assert_eq!(
            err,
            EmitError::DuplicateProcedure {
                line: 3,
                name: "a".into()
            }
        );
        // First definition survives
        assert_eq!(registry.lookup("a", 4).unwrap(), 0..1);
    }

    #[test]
    fn lookup_undefined() {
        let registry = ProcedureRegistry::new();
        let err = registry.lookup("ghost", 11).unwrap_err();
        assert_eq!(
            err,
            EmitError::UndefinedProcedure {
                line: 11,
                name: "ghost".into()
            }
        );
    }
}
