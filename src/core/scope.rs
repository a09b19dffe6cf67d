// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Scope database: a chain of nested symbol tables with visibility control.
//
// Scopes live in an arena owned by the assembly session. The root scope is
// self-referential: its `self` and `parent` entries both point back at it,
// which terminates upward traversal. Lookups walk the active-scope stack
// innermost first, then the object-search list of explicitly used scopes.

use std::collections::HashMap;

use crate::core::value::{Access, Builtin, Entry, Register, ScopeId, StatusFlag, Value};

pub const ROOT_SCOPE: ScopeId = ScopeId(0);

/// Alias resolution failure. The two cases are distinct on purpose:
/// callers may treat `NotFound` as "defined later" but must never treat
/// `AccessDenied` that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    NotFound,
    AccessDenied,
}

#[derive(Debug, Default)]
struct Scope {
    entries: HashMap<String, Entry>,
}

/// Process-wide assembly state passed by reference into every front-end
/// operation: the scope arena, the active-scope stack, the object-search
/// list, and the alias-expansion ceiling. No hidden statics.
#[derive(Debug)]
pub struct Session {
    scopes: Vec<Scope>,
    active: Vec<ScopeId>,
    search: Vec<ScopeId>,
    pub max_alias_depth: usize,
}

pub const DEFAULT_ALIAS_DEPTH: usize = 64;

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_ALIAS_DEPTH)
    }
}

impl Session {
    /// Create a session with the root scope bootstrapped and built-in
    /// entries bound. Root bootstrap is the first scope operation.
    pub fn new(max_alias_depth: usize) -> Self {
        let mut session = Self {
            scopes: vec![Scope::default()],
            active: vec![ROOT_SCOPE],
            search: Vec::new(),
            max_alias_depth,
        };

        session.bind(
            ROOT_SCOPE,
            "self",
            Entry::constant(Value::ScopeRef(ROOT_SCOPE), Access::Private),
        );
        session.bind(
            ROOT_SCOPE,
            "parent",
            Entry::constant(Value::ScopeRef(ROOT_SCOPE), Access::Private),
        );

        session.bind_builtins();
        session
    }

    fn bind_builtins(&mut self) {
        let registers = [
            ("a", Register::A),
            ("x", Register::X),
            ("y", Register::Y),
        ];
        for (name, register) in registers {
            self.bind(
                ROOT_SCOPE,
                name,
                Entry::constant(Value::Register(register), Access::Public),
            );
        }

        let flags = [
            ("c", StatusFlag::Carry),
            ("z", StatusFlag::Zero),
            ("v", StatusFlag::Overflow),
            ("n", StatusFlag::Negative),
        ];
        for (name, flag) in flags {
            self.bind(
                ROOT_SCOPE,
                name,
                Entry::constant(Value::Flag(flag), Access::Public),
            );
        }

        self.bind(
            ROOT_SCOPE,
            "typeof",
            Entry::constant(Value::Function(Builtin::TypeOf), Access::Public),
        );
        self.bind(
            ROOT_SCOPE,
            "exists",
            Entry::constant(Value::Function(Builtin::Exists), Access::Public),
        );

        // Active message language, rebindable by the driver.
        self.bind(
            ROOT_SCOPE,
            "lang",
            Entry::constant(Value::Text("en".to_string()), Access::Public),
        );
    }

    /// Create a child scope with private `self`/`parent` back-links, the
    /// same shape the root carries.
    pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::default());
        self.bind(
            id,
            "self",
            Entry::constant(Value::ScopeRef(id), Access::Private),
        );
        self.bind(
            id,
            "parent",
            Entry::constant(Value::ScopeRef(parent), Access::Private),
        );
        id
    }

    /// Innermost active scope. Explicit accessor instead of last-element
    /// indexing at call sites.
    pub fn current_scope(&self) -> ScopeId {
        *self.active.last().unwrap_or(&ROOT_SCOPE)
    }

    pub fn enter_scope(&mut self, id: ScopeId) {
        self.active.push(id);
    }

    pub fn leave_scope(&mut self) -> Option<ScopeId> {
        // The root scope stays on the stack for the whole run.
        if self.active.len() > 1 {
            self.active.pop()
        } else {
            None
        }
    }

    /// Append a scope to the object-search list, consulted after the
    /// active-scope stack.
    pub fn add_search_scope(&mut self, id: ScopeId) {
        if !self.search.contains(&id) {
            self.search.push(id);
        }
    }

    /// Insert or overwrite a binding. No shadowing rules beyond normal
    /// nested-scope precedence at lookup time.
    pub fn bind(&mut self, scope: ScopeId, alias: &str, entry: Entry) {
        self.scopes[scope.0].entries.insert(alias.to_string(), entry);
    }

    /// Resolve `alias` with the given privilege. With `extra_scope` the
    /// active-scope stack is bypassed and only that scope is searched
    /// before the object-search list.
    pub fn lookup(
        &self,
        alias: &str,
        access: Access,
        extra_scope: Option<ScopeId>,
    ) -> Result<&Entry, LookupError> {
        let mut searched = Vec::new();
        match extra_scope {
            Some(id) => searched.push(id),
            None => searched.extend(self.active.iter().rev().copied()),
        }
        for id in &self.search {
            if !searched.contains(id) {
                searched.push(*id);
            }
        }

        for id in searched {
            if let Some(entry) = self.scopes[id.0].entries.get(alias) {
                if entry.access > access {
                    return Err(LookupError::AccessDenied);
                }
                return Ok(entry);
            }
        }
        Err(LookupError::NotFound)
    }

    /// Follow `parent` links upward. The root is the unique fixed point.
    pub fn parent_of(&self, scope: ScopeId) -> ScopeId {
        match self.scopes[scope.0].entries.get("parent") {
            Some(Entry {
                value: Value::ScopeRef(parent),
                ..
            }) => *parent,
            _ => ROOT_SCOPE,
        }
    }
}
