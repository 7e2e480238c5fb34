use piethon_common::{Diagnostic, DiagnosticBag, SymbolKind, Type};

use crate::ast::*;

use super::flow;
use super::scope::{LocalScope, ParamEntry, ScopeEntry, VarEntry};
use super::symbols::{ProcedureEntry, ProcedureTable};
use super::types::ExprTypes;

/// State shared across the whole traversal of one script.
///
/// Created fresh for every check and consumed when the result is built.
#[derive(Debug, Default)]
pub(crate) struct CheckContext {
    pub procedures: ProcedureTable,
    pub expr_types: ExprTypes,
    pub diagnostics: DiagnosticBag,
}

impl CheckContext {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn check_script(script: &Script, ctx: &mut CheckContext) {
    for proc_def in &script.procedures {
        check_procedure(proc_def, ctx);
    }
}

fn check_procedure(proc_def: &ProcDef, ctx: &mut CheckContext) {
    let mut scope = LocalScope::new();

    for param in &proc_def.params {
        check_param(param, &mut scope, ctx);
    }
    for stmt in &proc_def.body {
        check_stmt(stmt, &mut scope, ctx);
    }

    // Registered only now, so the body cannot call its own procedure.
    let return_type = resolve_annotation(&proc_def.return_type);
    let entry = ProcedureEntry {
        name: proc_def.name.clone(),
        params: proc_def.params.iter().map(formal_param).collect(),
        return_type,
        loc: proc_def.span.clone(),
    };
    if let Err(rejected) = ctx.procedures.register(entry) {
        ctx.diagnostics.report(Diagnostic::DupSymbol {
            name: rejected.name,
            symbol: SymbolKind::Procedure,
            loc: rejected.loc,
        });
    }

    flow::check_returns(proc_def, return_type, &ctx.expr_types, &mut ctx.diagnostics);
    flow::check_unreachable(proc_def, &mut ctx.diagnostics);
}

fn check_param(param: &ParamDef, scope: &mut LocalScope, ctx: &mut CheckContext) {
    let entry = ScopeEntry::Param(formal_param(param));
    if scope.define(entry).is_err() {
        ctx.diagnostics.report(Diagnostic::DupSymbol {
            name: param.name.clone(),
            symbol: SymbolKind::Parameter,
            loc: param.span.clone(),
        });
    }
}

fn check_stmt(stmt: &Stmt, scope: &mut LocalScope, ctx: &mut CheckContext) {
    match stmt {
        Stmt::VarDef(var) => check_var_def(var, scope, ctx),
        Stmt::Return(ret) => {
            // Checked against the return type when the procedure is exited.
            if let Some(value) = &ret.value {
                resolve_expr(value, scope, ctx);
            }
        }
        Stmt::Call(call) => check_call(call, scope, ctx),
        Stmt::Assign(assign) => check_assign(assign, scope, ctx),
        Stmt::If(if_stmt) => {
            resolve_expr(&if_stmt.condition, scope, ctx);
            for stmt in &if_stmt.then_body {
                check_stmt(stmt, scope, ctx);
            }
            for stmt in if_stmt.else_body.iter().flatten() {
                check_stmt(stmt, scope, ctx);
            }
        }
        Stmt::While(while_stmt) => {
            resolve_expr(&while_stmt.condition, scope, ctx);
            for stmt in &while_stmt.body {
                check_stmt(stmt, scope, ctx);
            }
        }
    }
}

fn check_var_def(var: &VarDef, scope: &mut LocalScope, ctx: &mut CheckContext) {
    if let Some(init) = &var.initializer {
        resolve_expr(init, scope, ctx);
    }

    let declared = resolve_annotation(&var.type_ann);
    let entry = ScopeEntry::Var(VarEntry {
        name: var.name.clone(),
        ty: declared,
        loc: var.span.clone(),
        initialized: var.initializer.is_some(),
    });
    // Only the local scope counts: a variable may share a procedure's name.
    if scope.define(entry).is_err() {
        ctx.diagnostics.report(Diagnostic::DupSymbol {
            name: var.name.clone(),
            symbol: SymbolKind::Variable,
            loc: var.span.clone(),
        });
        return;
    }

    if let Some(init) = &var.initializer {
        let actual = ctx.expr_types.get(init.id);
        if !actual.is_compatible_with(declared) {
            ctx.diagnostics.report(Diagnostic::TypeMismatch {
                expected: declared,
                actual,
                loc: init.span.clone(),
            });
        }
    }
}

fn check_call(call: &CallStmt, scope: &LocalScope, ctx: &mut CheckContext) {
    for arg in &call.args {
        resolve_expr(arg, scope, ctx);
    }

    if scope.contains(&call.callee) {
        return;
    }
    let Some(proc_entry) = ctx.procedures.get(&call.callee) else {
        ctx.diagnostics.report(Diagnostic::NoSuchSymbol {
            name: call.callee.clone(),
            loc: call.span.clone(),
        });
        return;
    };

    if proc_entry.arity() != call.args.len() {
        ctx.diagnostics.report(Diagnostic::ArgCountMismatch {
            expected: proc_entry.arity(),
            actual: call.args.len(),
            loc: call.span.clone(),
        });
        return;
    }

    for (param, arg) in proc_entry.params.iter().zip(&call.args) {
        let actual = ctx.expr_types.get(arg.id);
        if !actual.is_compatible_with(param.ty) {
            ctx.diagnostics.report(Diagnostic::TypeMismatch {
                expected: param.ty,
                actual,
                loc: call.span.clone(),
            });
        }
    }
}

fn check_assign(assign: &AssignStmt, scope: &mut LocalScope, ctx: &mut CheckContext) {
    resolve_expr(&assign.value, scope, ctx);

    let Some(ScopeEntry::Var(var)) = scope.lookup(&assign.target) else {
        return;
    };
    let declared = var.ty;
    let actual = ctx.expr_types.get(assign.value.id);
    if !actual.is_compatible_with(declared) {
        ctx.diagnostics.report(Diagnostic::TypeMismatch {
            expected: declared,
            actual,
            loc: assign.value.span.clone(),
        });
    }
    scope.mark_initialized(&assign.target);
}

/// Resolve sub-expressions first, then the expression itself.
///
/// Only literals and references to variables get a type. Operators and
/// parentheses record nothing, so they read as `Error`.
fn resolve_expr(expr: &Expr, scope: &LocalScope, ctx: &mut CheckContext) {
    match &expr.kind {
        ExprKind::VarRef(name) => {
            if let Some(ScopeEntry::Var(var)) = scope.lookup(name) {
                ctx.expr_types.record(expr.id, var.ty);
            }
        }
        ExprKind::BoolLiteral(_) => {
            ctx.expr_types.record(expr.id, Type::Bool);
        }
        ExprKind::IntLiteral(_) => {
            ctx.expr_types.record(expr.id, Type::Int32);
        }
        ExprKind::Binary { left, right, .. } => {
            resolve_expr(left, scope, ctx);
            resolve_expr(right, scope, ctx);
        }
        ExprKind::Unary { operand, .. } => resolve_expr(operand, scope, ctx),
        ExprKind::Paren(inner) => resolve_expr(inner, scope, ctx),
    }
}

fn formal_param(param: &ParamDef) -> ParamEntry {
    ParamEntry {
        name: param.name.clone(),
        ty: resolve_annotation(&param.type_ann),
        loc: param.span.clone(),
    }
}

/// Unknown names are rejected before checking starts; `Error` is the fallback.
fn resolve_annotation(ann: &TypeAnnotation) -> Type {
    ann.resolve().unwrap_or(Type::Error)
}
