use std::collections::HashMap;

use log::trace;
use piethon_common::Type;

use crate::ast::ExprId;

/// Resolved type of each expression node, filled in during one traversal.
///
/// Entries are write-once. An expression with no entry reads as
/// [`Type::Error`].
#[derive(Debug, Default, Clone)]
pub struct ExprTypes {
    types: HashMap<ExprId, Type>,
}

impl ExprTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ty` for `id`. A second write for the same id is ignored and
    /// returns `false`.
    pub fn record(&mut self, id: ExprId, ty: Type) -> bool {
        if self.types.contains_key(&id) {
            trace!("type for {:?} already recorded; keeping the first", id);
            return false;
        }
        self.types.insert(id, ty);
        true
    }

    pub fn get(&self, id: ExprId) -> Type {
        self.types.get(&id).copied().unwrap_or(Type::Error)
    }

    /// Whether a type was recorded for `id` (as opposed to defaulting).
    pub fn is_recorded(&self, id: ExprId) -> bool {
        self.types.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
