//! Output AST Module
//!
//! A small AST for the JavaScript this crate generates: attribute bags,
//! guard calls, ternaries and the glue functions. Everything is rendered by
//! [`super::emitter`], which owns all escaping, so no caller ever pastes
//! untrusted text into generated code by hand.

use crate::ast::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    ReadVar(ReadVarExpr),
    ReadProp(ReadPropExpr),
    ReadKey(ReadKeyExpr),
    WriteKey(WriteKeyExpr),
    InvokeFn(InvokeFunctionExpr),
    Literal(LiteralExpr),
    TemplateLiteral(TemplateLiteralExpr),
    LiteralMap(LiteralMapExpr),
    Conditional(ConditionalExpr),
    BinaryOp(BinaryOperatorExpr),
    NotExpr(NotExpr),
    RawCode(RawCodeExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadVarExpr {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeFunctionExpr {
    pub fn_: Box<Expression>,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Bool(bool),
    Null,
    Undefined,
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
}

/// `` `a${b}c` ``: `elements` holds the cooked text between the
/// interpolations, so `elements.len() == expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteralExpr {
    pub elements: Vec<String>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralMapEntry {
    /// `"key": value`; keys are always emitted quoted.
    Property { key: String, value: Box<Expression> },
    /// `...(value)`
    Spread(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapExpr {
    pub entries: Vec<LiteralMapEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Box<Expression>,
    pub true_case: Box<Expression>,
    pub false_case: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Identical,
    And,
    Or,
    In,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperatorExpr {
    pub operator: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotExpr {
    pub condition: Box<Expression>,
}

/// Source text copied verbatim from the template, e.g. a user expression.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCodeExpr {
    pub code: String,
    pub source_span: Option<Span>,
}

//// Statements

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Import(ImportStmt),
    DeclareVar(DeclareVarStmt),
    DeclareFn(DeclareFunctionStmt),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
    IfStmt(IfStmt),
}

/// `import { name as alias } from 'module';`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub name: String,
    pub alias: String,
    pub module_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtModifier {
    None,
    Final,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareVarStmt {
    pub name: String,
    pub value: Option<Box<Expression>>,
    pub modifiers: StmtModifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareFunctionStmt {
    pub name: String,
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    /// JSDoc lines emitted above the declaration.
    pub doc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Box<Expression>,
    pub true_case: Vec<Statement>,
    pub false_case: Vec<Statement>,
}

impl Expression {
    pub fn prop(&self, name: impl Into<String>) -> Box<Expression> {
        Box::new(Expression::ReadProp(ReadPropExpr {
            receiver: Box::new(self.clone()),
            name: name.into(),
        }))
    }

    pub fn key(&self, index: Box<Expression>) -> Box<Expression> {
        Box::new(Expression::ReadKey(ReadKeyExpr {
            receiver: Box::new(self.clone()),
            index,
        }))
    }

    pub fn call_fn(&self, args: Vec<Expression>) -> Box<Expression> {
        Box::new(Expression::InvokeFn(InvokeFunctionExpr {
            fn_: Box::new(self.clone()),
            args,
        }))
    }

    pub fn conditional(&self, true_case: Box<Expression>, false_case: Box<Expression>) -> Box<Expression> {
        Box::new(Expression::Conditional(ConditionalExpr {
            condition: Box::new(self.clone()),
            true_case,
            false_case,
        }))
    }

    pub fn identical(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::Identical, rhs)
    }

    pub fn and(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::And, rhs)
    }

    pub fn or(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::Or, rhs)
    }

    /// `self in rhs`
    pub fn is_in(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::In, rhs)
    }

    fn binary(&self, operator: BinaryOperator, rhs: Box<Expression>) -> Box<Expression> {
        Box::new(Expression::BinaryOp(BinaryOperatorExpr {
            operator,
            lhs: Box::new(self.clone()),
            rhs,
        }))
    }

    /// Turn a key read into an assignment.
    ///
    /// Returns `None` when `self` is not a `ReadKey`.
    pub fn set(&self, value: Box<Expression>) -> Option<Box<Expression>> {
        match self {
            Expression::ReadKey(read_key) => Some(Box::new(Expression::WriteKey(WriteKeyExpr {
                receiver: read_key.receiver.clone(),
                index: read_key.index.clone(),
                value,
            }))),
            _ => None,
        }
    }

    pub fn to_stmt(&self) -> Statement {
        Statement::Expression(ExpressionStatement {
            expr: Box::new(self.clone()),
        })
    }

    pub fn to_return_stmt(&self) -> Statement {
        Statement::Return(ReturnStatement {
            value: Box::new(self.clone()),
        })
    }
}

pub fn variable(name: impl Into<String>) -> Box<Expression> {
    Box::new(Expression::ReadVar(ReadVarExpr { name: name.into() }))
}

pub fn literal(value: impl Into<LiteralValue>) -> Box<Expression> {
    Box::new(Expression::Literal(LiteralExpr { value: value.into() }))
}

pub fn undefined() -> Box<Expression> {
    Box::new(Expression::Literal(LiteralExpr {
        value: LiteralValue::Undefined,
    }))
}

pub fn literal_map(entries: Vec<LiteralMapEntry>) -> Box<Expression> {
    Box::new(Expression::LiteralMap(LiteralMapExpr { entries }))
}

pub fn template_literal(elements: Vec<String>, expressions: Vec<Expression>) -> Box<Expression> {
    Box::new(Expression::TemplateLiteral(TemplateLiteralExpr { elements, expressions }))
}

pub fn raw(code: impl Into<String>, source_span: Option<Span>) -> Box<Expression> {
    Box::new(Expression::RawCode(RawCodeExpr {
        code: code.into(),
        source_span,
    }))
}

pub fn not(expr: Box<Expression>) -> Box<Expression> {
    Box::new(Expression::NotExpr(NotExpr { condition: expr }))
}

pub fn if_stmt(condition: Box<Expression>, true_case: Vec<Statement>) -> Statement {
    Statement::IfStmt(IfStmt {
        condition,
        true_case,
        false_case: vec![],
    })
}

pub fn const_stmt(name: impl Into<String>, value: Box<Expression>) -> Statement {
    Statement::DeclareVar(DeclareVarStmt {
        name: name.into(),
        value: Some(value),
        modifiers: StmtModifier::Final,
    })
}

pub fn fn_decl(name: impl Into<String>, params: &[&str], statements: Vec<Statement>) -> Statement {
    Statement::DeclareFn(DeclareFunctionStmt {
        name: name.into(),
        params: params
            .iter()
            .map(|param| FnParam {
                name: param.to_string(),
            })
            .collect(),
        statements,
        doc: vec![],
    })
}

pub fn import_stmt(
    name: impl Into<String>,
    alias: impl Into<String>,
    module_name: impl Into<String>,
) -> Statement {
    Statement::Import(ImportStmt {
        name: name.into(),
        alias: alias.into(),
        module_name: module_name.into(),
    })
}
