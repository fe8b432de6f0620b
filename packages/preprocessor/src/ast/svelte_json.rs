//! Svelte JSON AST adapter
//!
//! Converts the (legacy) AST emitted by `svelte/compiler`'s `parse()` into the
//! typed [`Template`]. Only the shapes the rewrite needs are inspected; any
//! other node that owns children is kept as an opaque [`Block`].
//!
//! The compiler reports `start`/`end` as JavaScript string indices, i.e. in
//! UTF-16 code units. Every offset is translated to a byte offset into the
//! source before it reaches the tree.

use serde_json::{Map, Value};

use super::{
    Attribute, AttributeValue, Block, Directive, DynamicTag, Element, ElementName, ExpressionTag,
    Node, PlainAttribute, Script, Span, SpreadAttribute, Template, Text, ValueFragment,
    DYNAMIC_ELEMENT_TAG,
};
use crate::error::{PreprocessError, Result};

/// Branch objects some blocks keep outside of `children`.
const BRANCH_KEYS: [&str; 4] = ["else", "pending", "then", "catch"];

impl Template {
    /// Parse `json` (the compiler's output for `source`) and convert it.
    pub fn from_svelte_json_str(json: &str, source: &str) -> Result<Template> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| PreprocessError::InvalidTree(format!("not valid JSON: {}", e)))?;
        Template::from_svelte_json(&value, source)
    }

    /// Convert the compiler's AST for `source`. Offsets that do not land on a
    /// character of `source` are reported as [`PreprocessError::InvalidTree`].
    pub fn from_svelte_json(ast: &Value, source: &str) -> Result<Template> {
        let reader = TreeReader {
            offsets: OffsetTable::new(source),
        };
        let root = as_object(ast, "ast")?;

        let fragment = match root.get("html") {
            Some(html) => reader.children_of(as_object(html, "html")?, "html")?,
            None => Vec::new(),
        };

        Ok(Template {
            fragment,
            instance: reader.script(root.get("instance"), "instance")?,
            module: reader.script(root.get("module"), "module")?,
        })
    }
}

/// UTF-16 index to byte offset lookup for one source text.
#[derive(Debug)]
enum OffsetTable {
    /// Both encodings agree on every index up to this length.
    Ascii(usize),
    /// Byte offset per UTF-16 index; `None` for the second half of a
    /// surrogate pair. The last entry is the source length.
    Mapped(Vec<Option<usize>>),
}

impl OffsetTable {
    fn new(source: &str) -> Self {
        if source.is_ascii() {
            return OffsetTable::Ascii(source.len());
        }

        let mut offsets = Vec::with_capacity(source.len() + 1);
        for (byte, c) in source.char_indices() {
            offsets.push(Some(byte));
            if c.len_utf16() == 2 {
                offsets.push(None);
            }
        }
        offsets.push(Some(source.len()));
        OffsetTable::Mapped(offsets)
    }

    fn byte_offset(&self, index: usize) -> Option<usize> {
        match self {
            OffsetTable::Ascii(len) => (index <= *len).then_some(index),
            OffsetTable::Mapped(offsets) => offsets.get(index).copied().flatten(),
        }
    }
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(path, "expected an object"))
}

fn invalid(path: &str, message: &str) -> PreprocessError {
    PreprocessError::InvalidTree(format!("{}: {}", path, message))
}

fn string<'v>(object: &'v Map<String, Value>, key: &str, path: &str) -> Result<&'v str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(path, &format!("missing string `{}`", key)))
}

fn node_type<'v>(object: &'v Map<String, Value>, path: &str) -> Result<&'v str> {
    string(object, "type", path)
}

struct TreeReader {
    offsets: OffsetTable,
}

impl TreeReader {
    fn offset(&self, object: &Map<String, Value>, key: &str, path: &str) -> Result<usize> {
        let index = object
            .get(key)
            .and_then(Value::as_u64)
            .ok_or_else(|| invalid(path, &format!("missing numeric `{}`", key)))?;
        usize::try_from(index)
            .ok()
            .and_then(|index| self.offsets.byte_offset(index))
            .ok_or_else(|| {
                invalid(
                    path,
                    &format!("`{}` index {} is not a character boundary of the source", key, index),
                )
            })
    }

    fn span(&self, object: &Map<String, Value>, path: &str) -> Result<Span> {
        Ok(Span::new(
            self.offset(object, "start", path)?,
            self.offset(object, "end", path)?,
        ))
    }

    /// Span of the `expression` child of a node.
    fn expression_span(&self, object: &Map<String, Value>, path: &str) -> Result<Span> {
        let expression = object
            .get("expression")
            .ok_or_else(|| invalid(path, "missing `expression`"))?;
        self.span(as_object(expression, path)?, &format!("{}.expression", path))
    }

    fn script(&self, value: Option<&Value>, path: &str) -> Result<Option<Script>> {
        let object = match value {
            None | Some(Value::Null) => return Ok(None),
            Some(value) => as_object(value, path)?,
        };
        let content = object
            .get("content")
            .ok_or_else(|| invalid(path, "missing `content`"))?;

        Ok(Some(Script {
            span: self.span(object, path)?,
            content: self.span(as_object(content, path)?, &format!("{}.content", path))?,
        }))
    }

    fn children_of(&self, object: &Map<String, Value>, path: &str) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        if let Some(children) = object.get("children") {
            let children = children
                .as_array()
                .ok_or_else(|| invalid(path, "`children` must be an array"))?;
            for (index, child) in children.iter().enumerate() {
                let child_path = format!("{}.children[{}]", path, index);
                nodes.push(self.node(as_object(child, &child_path)?, &child_path)?);
            }
        }
        Ok(nodes)
    }

    fn node(&self, object: &Map<String, Value>, path: &str) -> Result<Node> {
        match node_type(object, path)? {
            "Element" => self.element(object, path).map(Node::Element),
            "Text" => Ok(Node::Text(Text {
                data: string(object, "data", path)?.to_string(),
                span: self.span(object, path)?,
            })),
            "MustacheTag" | "RawMustacheTag" => Ok(Node::Expression(ExpressionTag {
                expression: self.expression_span(object, path)?,
                span: self.span(object, path)?,
            })),
            kind => {
                let mut children = self.children_of(object, path)?;
                for key in BRANCH_KEYS {
                    if let Some(branch @ Value::Object(_)) = object.get(key) {
                        let branch_path = format!("{}.{}", path, key);
                        children.push(self.node(as_object(branch, &branch_path)?, &branch_path)?);
                    }
                }
                Ok(Node::Block(Block {
                    kind: kind.to_string(),
                    span: self.span(object, path)?,
                    children,
                }))
            }
        }
    }

    fn element(&self, object: &Map<String, Value>, path: &str) -> Result<Element> {
        let tag_name = string(object, "name", path)?;
        let name = if tag_name == DYNAMIC_ELEMENT_TAG {
            let tag = match object.get("tag") {
                Some(Value::String(literal)) => DynamicTag::Literal(literal.clone()),
                Some(expression @ Value::Object(_)) => DynamicTag::Expression(
                    self.span(as_object(expression, path)?, &format!("{}.tag", path))?,
                ),
                _ => return Err(invalid(path, "`svelte:element` without a `tag`")),
            };
            ElementName::Dynamic(tag)
        } else {
            ElementName::Static(tag_name.to_string())
        };

        let mut attributes = Vec::new();
        if let Some(list) = object.get("attributes") {
            let list = list
                .as_array()
                .ok_or_else(|| invalid(path, "`attributes` must be an array"))?;
            for (index, item) in list.iter().enumerate() {
                let attribute_path = format!("{}.attributes[{}]", path, index);
                attributes.push(self.attribute(as_object(item, &attribute_path)?, &attribute_path)?);
            }
        }

        Ok(Element {
            name,
            attributes,
            children: self.children_of(object, path)?,
            span: self.span(object, path)?,
        })
    }

    fn attribute(&self, object: &Map<String, Value>, path: &str) -> Result<Attribute> {
        let span = self.span(object, path)?;
        match node_type(object, path)? {
            "Attribute" => Ok(Attribute::Plain(PlainAttribute {
                name: string(object, "name", path)?.to_string(),
                value: self.attribute_value(object.get("value"), path)?,
                span,
            })),
            "Spread" => Ok(Attribute::Spread(SpreadAttribute {
                expression: self.expression_span(object, path)?,
                span,
            })),
            kind => Ok(Attribute::Directive(Directive {
                kind: kind.to_string(),
                name: object
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                span,
            })),
        }
    }

    fn attribute_value(&self, value: Option<&Value>, path: &str) -> Result<AttributeValue> {
        let fragments = match value {
            None | Some(Value::Bool(true)) => return Ok(AttributeValue::Boolean),
            Some(Value::Array(fragments)) => fragments,
            Some(_) => return Err(invalid(path, "attribute `value` must be `true` or an array")),
        };

        let mut result = Vec::with_capacity(fragments.len());
        for (index, fragment) in fragments.iter().enumerate() {
            let fragment_path = format!("{}.value[{}]", path, index);
            let object = as_object(fragment, &fragment_path)?;
            let fragment = match node_type(object, &fragment_path)? {
                "Text" => ValueFragment::Text {
                    data: string(object, "data", &fragment_path)?.to_string(),
                    span: self.span(object, &fragment_path)?,
                },
                "MustacheTag" | "AttributeShorthand" => ValueFragment::Expression {
                    expression: self.expression_span(object, &fragment_path)?,
                    span: self.span(object, &fragment_path)?,
                },
                other => {
                    return Err(invalid(
                        &fragment_path,
                        &format!("unsupported attribute value fragment `{}`", other),
                    ))
                }
            };
            result.push(fragment);
        }
        Ok(AttributeValue::Fragments(result))
    }
}
