//! Statement and block nodes.

use super::expr::Literal;
use crate::{BlockId, ExprId, Span, StmtId, VarId};

/// An ordered list of statements with its own lexical scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<StmtId>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<StmtId>, span: Span) -> Self {
        Block { stmts, span }
    }
}

/// A switch case selector literal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CaseSelector {
    pub value: Literal,
    pub span: Span,
}

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `lhs = rhs;`
    Assign { lhs: ExprId, rhs: ExprId },
    /// A nested block.
    Block(BlockId),
    Break,
    /// An expression evaluated for its side effects (a call).
    Call(ExprId),
    /// A switch case clause. An empty selector list is the `default` clause.
    Case {
        selectors: Vec<CaseSelector>,
        body: BlockId,
    },
    Continue,
    Discard,
    /// An `else` / `else if` clause. Owned by its `If` statement, not by any
    /// block.
    Else {
        condition: Option<ExprId>,
        body: BlockId,
    },
    Fallthrough,
    If {
        condition: ExprId,
        body: BlockId,
        else_stmts: Vec<StmtId>,
    },
    Loop {
        body: BlockId,
        continuing: Option<BlockId>,
    },
    Return { value: Option<ExprId> },
    Switch { selector: ExprId, cases: Vec<StmtId> },
    /// A local variable or constant declaration.
    VarDecl(VarId),
}
