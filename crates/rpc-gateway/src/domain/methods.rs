//! Method registry: name → handler + parameter schema.
//!
//! Built once at startup and never mutated afterwards, so lookups are plain
//! `HashMap` reads with no locking.

use serde_json::{json, Value};
use shared_types::Buf32;
use std::collections::HashMap;
use std::fmt;

use crate::domain::error::{HandlerError, RegistryError};
use crate::domain::types::Params;

/// Kind of a positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Non-negative JSON integer that fits in 64 bits.
    U64,
    /// 32-byte id as a hex string, optional `0x` prefix.
    Buf32,
}

impl ParamKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamKind::U64 => value.as_u64().is_some(),
            ParamKind::Buf32 => value
                .as_str()
                .is_some_and(|s| s.parse::<Buf32>().is_ok()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::U64 => "u64",
            ParamKind::Buf32 => "32-byte hex",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler signature. `C` is the shared handler context.
pub type Handler<C> = fn(&C, Params<'_>) -> Result<Value, HandlerError>;

/// A registered method.
pub struct MethodDescriptor<C> {
    pub name: &'static str,
    pub params: &'static [ParamKind],
    pub handler: Handler<C>,
    pub description: &'static str,
}

impl<C> MethodDescriptor<C> {
    pub const fn new(
        name: &'static str,
        params: &'static [ParamKind],
        handler: Handler<C>,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            params,
            handler,
            description,
        }
    }

    /// Catalogue entry served on `GET /methods`.
    pub fn describe(&self) -> Value {
        let params: Vec<&str> = self.params.iter().map(ParamKind::as_str).collect();
        json!({
            "name": self.name,
            "params": params,
            "description": self.description,
        })
    }

    /// Check arity and per-position kinds.
    pub fn check_params(&self, values: &[Value]) -> Result<(), String> {
        if values.len() != self.params.len() {
            return Err(format!(
                "{} expects {} parameter(s), got {}",
                self.name,
                self.params.len(),
                values.len()
            ));
        }
        for (index, (kind, value)) in self.params.iter().zip(values).enumerate() {
            if !kind.matches(value) {
                return Err(format!("parameter {} must be {}", index, kind));
            }
        }
        Ok(())
    }
}

impl<C> Clone for MethodDescriptor<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for MethodDescriptor<C> {}

impl<C> fmt::Debug for MethodDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("description", &self.description)
            .finish()
    }
}

/// Name-keyed method table.
pub struct MethodRegistry<C> {
    methods: HashMap<&'static str, MethodDescriptor<C>>,
}

impl<C> MethodRegistry<C> {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Add a method. Names must be unique.
    pub fn register(&mut self, descriptor: MethodDescriptor<C>) -> Result<(), RegistryError> {
        if self.methods.contains_key(descriptor.name) {
            return Err(RegistryError::DuplicateMethod(descriptor.name.to_string()));
        }
        self.methods.insert(descriptor.name, descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&MethodDescriptor<C>> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered methods, sorted by name.
    pub fn methods(&self) -> Vec<&MethodDescriptor<C>> {
        let mut methods: Vec<_> = self.methods.values().collect();
        methods.sort_unstable_by_key(|d| d.name);
        methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<C> Default for MethodRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
