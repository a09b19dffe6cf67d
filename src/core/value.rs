// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Assemble-time values and the visibility model for scope entries.

use crate::core::tokenizer::Token;

/// Index of a scope inside the session's scope arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

/// CPU registers addressable at assemble time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    X,
    Y,
}

/// CPU status flags addressable at assemble time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Carry,
    Zero,
    Overflow,
    Negative,
}

/// Built-in compile-time functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    TypeOf,
    Exists,
}

/// The closed set of assemble-time value shapes. Exhaustive matching on
/// this replaces the boxed-object-plus-type-enum pattern and its
/// invalid-cast failure modes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    ScopeRef(ScopeId),
    Register(Register),
    Flag(StatusFlag),
    Proc(u16),
    Interrupt(u16),
    Bank(u16),
    Expr(Vec<Token>),
    Function(Builtin),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Text(_) => "string",
            Value::ScopeRef(_) => "scope",
            Value::Register(_) => "reg",
            Value::Flag(_) => "flag",
            Value::Proc(_) => "proc",
            Value::Interrupt(_) => "interrupt",
            Value::Bank(_) => "bank",
            Value::Expr(_) => "exp",
            Value::Function(_) => "function",
        }
    }
}

/// Entry visibility. `Private` entries are only reachable by lookups made
/// with `Private` privilege, i.e. from inside the owning construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public = 0,
    Private = 1,
}

/// One scope binding: the value, whether it is a constant, and who may
/// see it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: Value,
    pub constant: bool,
    pub access: Access,
}

impl Entry {
    pub fn constant(value: Value, access: Access) -> Self {
        Self {
            value,
            constant: true,
            access,
        }
    }

    pub fn variable(value: Value, access: Access) -> Self {
        Self {
            value,
            constant: false,
            access,
        }
    }

    /// A constant text binding, the shape the alias expander substitutes.
    pub fn is_text_substitution(&self) -> bool {
        self.constant && matches!(self.value, Value::Text(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{Access, Entry, Value};

    #[test]
    fn access_orders_public_below_private() {
        assert!(Access::Public < Access::Private);
    }

    #[test]
    fn text_substitution_requires_constant_text() {
        let sub = Entry::constant(Value::Text("lda".to_string()), Access::Public);
        assert!(sub.is_text_substitution());

        let var = Entry::variable(Value::Text("lda".to_string()), Access::Public);
        assert!(!var.is_text_substitution());

        let int = Entry::constant(Value::Int(2), Access::Public);
        assert!(!int.is_text_substitution());
    }

    #[test]
    fn type_names_match_source_keywords() {
        assert_eq!(Value::Int(0).type_name(), "int");
        assert_eq!(Value::Text(String::new()).type_name(), "string");
    }
}
