use piethon_common::{Span, Type};

/// A type annotation as written in the source (e.g. `Int32` in `x : Int32`).
///
/// The text is kept verbatim; resolving it against the closed type set is
/// the checker's job.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub name: String,
    pub span: Span,
}

impl TypeAnnotation {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// The annotated type, or `None` if the text names no known type.
    pub fn resolve(&self) -> Option<Type> {
        Type::from_name(&self.name)
    }
}
