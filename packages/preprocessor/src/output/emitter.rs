//! Emitter Module
//!
//! Renders the output AST to JavaScript source. All string and template
//! literals are escaped here, and operands are parenthesized by precedence.

use once_cell::sync::Lazy;
use regex::Regex;

use super::output_ast as o;

const INDENT_WITH: &str = "  ";

static SIMPLE_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][0-9A-Za-z_$]*(\.[A-Za-z_$][0-9A-Za-z_$]*)*$").unwrap());

// Operator precedence, loosely following the ECMAScript grammar levels.
const PREC_ASSIGN: u8 = 1;
const PREC_CONDITIONAL: u8 = 2;
const PREC_OR: u8 = 4;
const PREC_AND: u8 = 5;
const PREC_EQUALITY: u8 = 9;
const PREC_RELATIONAL: u8 = 10;
const PREC_UNARY: u8 = 15;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

#[derive(Debug, Clone)]
struct EmittedLine {
    parts: Vec<String>,
    indent: usize,
}

impl EmittedLine {
    fn new(indent: usize) -> Self {
        EmittedLine {
            parts: Vec::new(),
            indent,
        }
    }
}

/// Line buffer with indentation tracking.
pub struct EmitterVisitorContext {
    lines: Vec<EmittedLine>,
    indent: usize,
}

impl EmitterVisitorContext {
    pub fn create_root() -> Self {
        EmitterVisitorContext::new(0)
    }

    pub fn new(indent: usize) -> Self {
        EmitterVisitorContext {
            lines: vec![EmittedLine::new(indent)],
            indent,
        }
    }

    fn current_line_mut(&mut self) -> &mut EmittedLine {
        if self.lines.is_empty() {
            self.lines.push(EmittedLine::new(self.indent));
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn line_is_empty(&self) -> bool {
        self.lines.last().map(|line| line.parts.is_empty()).unwrap_or(true)
    }

    pub fn print(&mut self, part: &str, new_line: bool) {
        if !part.is_empty() {
            self.current_line_mut().parts.push(part.to_string());
        }
        if new_line {
            self.lines.push(EmittedLine::new(self.indent));
        }
    }

    pub fn println(&mut self, last_part: &str) {
        self.print(last_part, true);
    }

    pub fn inc_indent(&mut self) {
        self.indent += 1;
        if self.line_is_empty() {
            self.current_line_mut().indent = self.indent;
        }
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        if self.line_is_empty() {
            self.current_line_mut().indent = self.indent;
        }
    }

    pub fn to_source(&self) -> String {
        let mut lines: Vec<String> = self
            .lines
            .iter()
            .map(|line| {
                if line.parts.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", INDENT_WITH.repeat(line.indent), line.parts.join(""))
                }
            })
            .collect();
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}

/// Quote `input` as a double-quoted JavaScript string literal.
pub fn escape_string_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('"');
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            // Keeps `</script>` inside a literal from closing the script block.
            '<' if chars.peek() == Some(&'/') => escaped.push_str("<\\"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

/// Escape cooked text for use between the backticks of a template literal.
pub fn escape_template_text(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '`' => escaped.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => escaped.push_str("\\$"),
            '\r' => escaped.push_str("\\r"),
            '<' if chars.peek() == Some(&'/') => escaped.push_str("<\\"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn is_simple_path(code: &str) -> bool {
    SIMPLE_PATH_RE.is_match(code)
}

fn precedence(expr: &o::Expression) -> u8 {
    match expr {
        o::Expression::WriteKey(_) => PREC_ASSIGN,
        o::Expression::Conditional(_) => PREC_CONDITIONAL,
        o::Expression::BinaryOp(binary) => binary_precedence(binary.operator),
        o::Expression::NotExpr(_) => PREC_UNARY,
        o::Expression::InvokeFn(_) | o::Expression::ReadProp(_) | o::Expression::ReadKey(_) => {
            PREC_CALL
        }
        o::Expression::ReadVar(_)
        | o::Expression::Literal(_)
        | o::Expression::TemplateLiteral(_)
        | o::Expression::LiteralMap(_)
        | o::Expression::RawCode(_) => PREC_PRIMARY,
    }
}

fn binary_precedence(operator: o::BinaryOperator) -> u8 {
    match operator {
        o::BinaryOperator::Or => PREC_OR,
        o::BinaryOperator::And => PREC_AND,
        o::BinaryOperator::Identical => PREC_EQUALITY,
        o::BinaryOperator::In => PREC_RELATIONAL,
    }
}

fn binary_operator(operator: o::BinaryOperator) -> &'static str {
    match operator {
        o::BinaryOperator::Identical => "===",
        o::BinaryOperator::And => "&&",
        o::BinaryOperator::Or => "||",
        o::BinaryOperator::In => "in",
    }
}

/// Render one expression.
pub fn emit_expression(expr: &o::Expression) -> String {
    let mut out = String::new();
    visit_expression(expr, &mut out);
    out
}

fn visit_operand(expr: &o::Expression, min_precedence: u8, out: &mut String) {
    if precedence(expr) < min_precedence {
        out.push('(');
        visit_expression(expr, out);
        out.push(')');
    } else {
        visit_expression(expr, out);
    }
}

/// User code goes in verbatim; anything beyond a dotted path is parenthesized
/// so it cannot bind to the surrounding generated operators.
fn visit_raw_code(code: &str, out: &mut String) {
    let code = code.trim();
    if is_simple_path(code) {
        out.push_str(code);
    } else {
        out.push('(');
        out.push_str(code);
        out.push(')');
    }
}

fn visit_args(args: &[o::Expression], out: &mut String) {
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        visit_operand(arg, PREC_ASSIGN, out);
    }
}

fn visit_expression(expr: &o::Expression, out: &mut String) {
    match expr {
        o::Expression::ReadVar(read) => out.push_str(&read.name),
        o::Expression::ReadProp(read) => {
            visit_operand(&read.receiver, PREC_CALL, out);
            out.push('.');
            out.push_str(&read.name);
        }
        o::Expression::ReadKey(read) => {
            visit_operand(&read.receiver, PREC_CALL, out);
            out.push('[');
            visit_expression(&read.index, out);
            out.push(']');
        }
        o::Expression::WriteKey(write) => {
            visit_operand(&write.receiver, PREC_CALL, out);
            out.push('[');
            visit_expression(&write.index, out);
            out.push_str("] = ");
            visit_operand(&write.value, PREC_ASSIGN, out);
        }
        o::Expression::InvokeFn(invoke) => {
            visit_operand(&invoke.fn_, PREC_CALL, out);
            out.push('(');
            visit_args(&invoke.args, out);
            out.push(')');
        }
        o::Expression::Literal(literal) => match &literal.value {
            o::LiteralValue::String(s) => out.push_str(&escape_string_literal(s)),
            o::LiteralValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            o::LiteralValue::Null => out.push_str("null"),
            o::LiteralValue::Undefined => out.push_str("undefined"),
        },
        o::Expression::TemplateLiteral(template) => {
            out.push('`');
            for (index, element) in template.elements.iter().enumerate() {
                out.push_str(&escape_template_text(element));
                if let Some(expression) = template.expressions.get(index) {
                    out.push_str("${");
                    match expression {
                        o::Expression::RawCode(raw) => out.push_str(raw.code.trim()),
                        other => visit_expression(other, out),
                    }
                    out.push('}');
                }
            }
            out.push('`');
        }
        o::Expression::LiteralMap(map) => {
            out.push('{');
            for (index, entry) in map.entries.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                match entry {
                    o::LiteralMapEntry::Property { key, value } => {
                        out.push_str(&escape_string_literal(key));
                        out.push_str(": ");
                        visit_operand(value, PREC_ASSIGN, out);
                    }
                    o::LiteralMapEntry::Spread(value) => {
                        out.push_str("...(");
                        match value.as_ref() {
                            o::Expression::RawCode(raw) => out.push_str(raw.code.trim()),
                            other => visit_expression(other, out),
                        }
                        out.push(')');
                    }
                }
            }
            out.push('}');
        }
        o::Expression::Conditional(conditional) => {
            visit_operand(&conditional.condition, PREC_CONDITIONAL + 1, out);
            out.push_str(" ? ");
            visit_operand(&conditional.true_case, PREC_CONDITIONAL, out);
            out.push_str(" : ");
            visit_operand(&conditional.false_case, PREC_CONDITIONAL, out);
        }
        o::Expression::BinaryOp(binary) => {
            let prec = binary_precedence(binary.operator);
            visit_operand(&binary.lhs, prec, out);
            out.push(' ');
            out.push_str(binary_operator(binary.operator));
            out.push(' ');
            visit_operand(&binary.rhs, prec + 1, out);
        }
        o::Expression::NotExpr(not) => {
            out.push('!');
            visit_operand(&not.condition, PREC_UNARY, out);
        }
        o::Expression::RawCode(raw) => visit_raw_code(&raw.code, out),
    }
}

/// Render statements, one per line (blocks spanning several lines).
pub fn emit_statements(stmts: &[o::Statement]) -> String {
    let mut ctx = EmitterVisitorContext::create_root();
    for stmt in stmts {
        visit_statement(stmt, &mut ctx);
    }
    ctx.to_source()
}

pub fn emit_statement(stmt: &o::Statement) -> String {
    emit_statements(std::slice::from_ref(stmt))
}

fn visit_block(stmts: &[o::Statement], ctx: &mut EmitterVisitorContext) {
    ctx.inc_indent();
    for stmt in stmts {
        visit_statement(stmt, ctx);
    }
    ctx.dec_indent();
}

fn visit_statement(stmt: &o::Statement, ctx: &mut EmitterVisitorContext) {
    match stmt {
        o::Statement::Import(import) => {
            let binding = if import.name == import.alias {
                import.name.clone()
            } else {
                format!("{} as {}", import.name, import.alias)
            };
            ctx.println(&format!(
                "import {{ {} }} from {};",
                binding,
                escape_string_literal(&import.module_name)
            ));
        }
        o::Statement::DeclareVar(declare) => {
            let keyword = match declare.modifiers {
                o::StmtModifier::Final => "const",
                o::StmtModifier::None => "let",
            };
            match &declare.value {
                Some(value) => ctx.println(&format!(
                    "{} {} = {};",
                    keyword,
                    declare.name,
                    emit_expression(value)
                )),
                None => ctx.println(&format!("{} {};", keyword, declare.name)),
            }
        }
        o::Statement::DeclareFn(declare) => {
            if !declare.doc.is_empty() {
                ctx.println("/**");
                for line in &declare.doc {
                    ctx.println(&format!(" * {}", line));
                }
                ctx.println(" */");
            }
            let params: Vec<&str> = declare.params.iter().map(|p| p.name.as_str()).collect();
            ctx.println(&format!("function {}({}) {{", declare.name, params.join(", ")));
            visit_block(&declare.statements, ctx);
            ctx.println("}");
        }
        o::Statement::Expression(stmt) => ctx.println(&format!("{};", emit_expression(&stmt.expr))),
        o::Statement::Return(stmt) => ctx.println(&format!("return {};", emit_expression(&stmt.value))),
        o::Statement::IfStmt(stmt) => {
            ctx.println(&format!("if ({}) {{", emit_expression(&stmt.condition)));
            visit_block(&stmt.true_case, ctx);
            if stmt.false_case.is_empty() {
                ctx.println("}");
            } else {
                ctx.println("} else {");
                visit_block(&stmt.false_case, ctx);
                ctx.println("}");
            }
        }
    }
}
