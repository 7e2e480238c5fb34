use piethon_common::Span;

use super::types::TypeAnnotation;

// ============================================================================
// Script (top-level)
// ============================================================================

/// A complete Piethon script: zero or more procedure definitions.
#[derive(Debug, Clone)]
pub struct Script {
    /// Name the script was registered under (used in every span).
    pub source_name: String,
    pub procedures: Vec<ProcDef>,
    pub span: Span,
}

// ============================================================================
// Procedures
// ============================================================================

/// A procedure definition.
///
/// ```piethon
/// def add(a : Int32, b : Int32) : Int32 is
///     return a + b;
/// end
/// ```
#[derive(Debug, Clone)]
pub struct ProcDef {
    pub name: String,
    pub params: Vec<ParamDef>,
    pub return_type: TypeAnnotation,
    /// Immediate statements of the body, in source order.
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A formal parameter: `name : Type`.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub name: String,
    pub type_ann: TypeAnnotation,
    pub span: Span,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone)]
pub enum Stmt {
    VarDef(VarDef),
    Return(ReturnStmt),
    Call(CallStmt),
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::VarDef(s) => &s.span,
            Stmt::Return(s) => &s.span,
            Stmt::Call(s) => &s.span,
            Stmt::Assign(s) => &s.span,
            Stmt::If(s) => &s.span,
            Stmt::While(s) => &s.span,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Stmt::Return(_))
    }
}

/// `var name : Type [:= expr];`
#[derive(Debug, Clone)]
pub struct VarDef {
    pub name: String,
    pub type_ann: TypeAnnotation,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// `return [expr];`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `callee(arg, ...);`
#[derive(Debug, Clone)]
pub struct CallStmt {
    pub callee: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `target := expr;`
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub target: String,
    pub value: Expr,
    pub span: Span,
}

/// `if cond then ... [else ...] end`
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Vec<Stmt>,
    pub else_body: Option<Vec<Stmt>>,
    pub span: Span,
}

/// `while cond do ... end`
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

// ============================================================================
// Expressions
// ============================================================================

/// Identity of an expression node, unique within one parsed script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// A name used as a value.
    VarRef(String),
    BoolLiteral(bool),
    IntLiteral(i32),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}
