//! Attribute Value Serializer
//!
//! Turns attribute values as written in markup into equivalent JavaScript
//! expressions, so an attribute can be moved into a generated attribute bag or
//! wrapped in a translation call without changing what it evaluates to.

use crate::ast::{AttributeValue, DynamicTag, Span, SpreadAttribute, ValueFragment};
use crate::error::SerializationError;
use crate::output::output_ast as o;

type Result<T> = std::result::Result<T, SerializationError>;

/// Convert an attribute value into a runtime expression.
///
/// - a bare attribute becomes `true`;
/// - pure text becomes a string literal;
/// - a single `{expression}` becomes that expression;
/// - anything mixed becomes a template literal, interpolations in order.
pub fn to_runtime_expression(
    attribute_name: &str,
    value: &AttributeValue,
    source: &str,
) -> Result<Box<o::Expression>> {
    let fragments = match value {
        AttributeValue::Boolean => return Ok(o::literal(true)),
        AttributeValue::Fragments(fragments) => fragments,
    };

    match fragments.as_slice() {
        [] => Ok(o::literal("")),
        [ValueFragment::Text { data, .. }] => Ok(o::literal(data.as_str())),
        [ValueFragment::Expression { expression, .. }] => {
            let code = expression_code(attribute_name, *expression, source)?;
            Ok(o::raw(code, Some(*expression)))
        }
        _ => {
            let mut elements = vec![String::new()];
            let mut expressions = Vec::new();
            for fragment in fragments {
                match fragment {
                    ValueFragment::Text { data, .. } => {
                        if let Some(last) = elements.last_mut() {
                            last.push_str(data);
                        }
                    }
                    ValueFragment::Expression { expression, .. } => {
                        let code = expression_code(attribute_name, *expression, source)?;
                        expressions.push(*o::raw(code, Some(*expression)));
                        elements.push(String::new());
                    }
                }
            }
            Ok(o::template_literal(elements, expressions))
        }
    }
}

/// The `...(expression)` entry standing in for a spread attribute.
pub fn spread_entry(spread: &SpreadAttribute, source: &str) -> Result<o::LiteralMapEntry> {
    let code = expression_code("{...}", spread.expression, source)?;
    Ok(o::LiteralMapEntry::Spread(o::raw(code, Some(spread.expression))))
}

/// `<computed tag> === "element_name"`, used to pick a rewrite rule at
/// runtime for elements whose tag is only known then. Computed tags are
/// compared by their string value.
pub fn tag_comparison(tag: &DynamicTag, source: &str, element_name: &str) -> Result<Box<o::Expression>> {
    let computed = match tag {
        DynamicTag::Literal(name) => o::literal(name.as_str()),
        DynamicTag::Expression(expression) => {
            let code = expression_code("this", *expression, source)?;
            o::template_literal(
                vec![String::new(), String::new()],
                vec![*o::raw(code, Some(*expression))],
            )
        }
    };
    Ok(computed.identical(o::literal(element_name)))
}

fn expression_code<'s>(attribute_name: &str, expression: Span, source: &'s str) -> Result<&'s str> {
    let code = expression.slice(source).ok_or_else(|| {
        SerializationError::new(
            attribute_name,
            format!(
                "expression span {}..{} is not a valid range of the source",
                expression.start, expression.end
            ),
        )
    })?;
    if code.trim().is_empty() {
        return Err(SerializationError::new(attribute_name, "empty expression"));
    }
    Ok(code)
}
