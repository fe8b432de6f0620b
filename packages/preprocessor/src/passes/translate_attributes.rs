//! Translate-attribute pass
//!
//! Routes configured attributes (`<a href>`, `<form action>`, ...) through the
//! runtime translation hook.
//!
//! On elements with a static tag, every attribute and spread is moved into
//! one bag that goes through the generated `handle_attributes` guard, so
//! attributes that only arrive through a spread are translated too. On
//! `<svelte:element>` the tag is only known at runtime, and the target
//! attribute is wrapped in a ternary that translates it when the tag matches.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use crate::ast::query::{find_attribute, find_dynamic_elements, find_elements};
use crate::ast::{Attribute, Element, ElementName, Span, DYNAMIC_ELEMENT_TAG};
use crate::config::{AttributeTranslation, PreprocessorConfig, DEFAULT_CONTEXT_KEY, DEFAULT_OPT_OUT_ATTRIBUTE};
use crate::error::Result;
use crate::glue::{build_glue, GlueNames, GlueOptions};
use crate::identifier::IdentifierAllocator;
use crate::logging::LogLevel;
use crate::output::emit_expression;
use crate::output::output_ast as o;
use crate::pipeline::{PassContext, PreprocessingPass, ScriptAdditions};
use crate::serializer::{spread_entry, tag_comparison, to_runtime_expression};

pub const TRANSLATE_ATTRIBUTE_PASS: &str = "translate_attribute_pass";

// `{...x}` and `{ ...x}`
static SPREAD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\s*\.\.\.").unwrap());

type RuleGroup<'r> = SmallVec<[&'r AttributeTranslation; 2]>;

#[derive(Debug, Clone)]
pub struct TranslateAttributePass {
    rules: Vec<AttributeTranslation>,
    context_key: String,
    opt_out_attribute: String,
}

impl TranslateAttributePass {
    pub fn new(rules: Vec<AttributeTranslation>) -> Self {
        TranslateAttributePass {
            rules,
            context_key: DEFAULT_CONTEXT_KEY.to_string(),
            opt_out_attribute: DEFAULT_OPT_OUT_ATTRIBUTE.to_string(),
        }
    }

    pub fn from_config(config: &PreprocessorConfig) -> Self {
        TranslateAttributePass::new(config.attribute_translations.clone())
            .with_context_key(config.context_key.clone())
            .with_opt_out_attribute(config.opt_out_attribute.clone())
    }

    pub fn with_context_key(mut self, context_key: impl Into<String>) -> Self {
        self.context_key = context_key.into();
        self
    }

    pub fn with_opt_out_attribute(mut self, opt_out_attribute: impl Into<String>) -> Self {
        self.opt_out_attribute = opt_out_attribute.into();
        self
    }

    pub fn rules(&self) -> &[AttributeTranslation] {
        &self.rules
    }

    /// Rules sharing an element name rewrite the same bag, so they are applied
    /// together, in declaration order.
    fn rules_by_element(&self) -> IndexMap<&str, RuleGroup<'_>> {
        let mut groups: IndexMap<&str, RuleGroup<'_>> = IndexMap::new();
        for rule in &self.rules {
            groups.entry(rule.element_name.as_str()).or_default().push(rule);
        }
        groups
    }

    /// Rules sharing an attribute name overwrite the same attribute of a
    /// dynamic element, so their conditions are chained.
    fn rules_by_attribute(&self) -> IndexMap<&str, RuleGroup<'_>> {
        let mut groups: IndexMap<&str, RuleGroup<'_>> = IndexMap::new();
        for rule in &self.rules {
            groups.entry(rule.attribute_name.as_str()).or_default().push(rule);
        }
        groups
    }

    /// `<a href="/x" {...rest}>` becomes
    /// `<a {...(handle({"href": "/x", ...(rest)}, "href", "hreflang"))}>`.
    fn rewrite_static_element(
        &self,
        ctx: &mut PassContext<'_>,
        names: &mut Option<GlueNames>,
        element: &Element,
        rules: &[&AttributeTranslation],
    ) -> Result<bool> {
        let has_spread = element
            .attributes
            .iter()
            .any(|attribute| matches!(attribute, Attribute::Spread(_)));
        let applicable: RuleGroup<'_> = rules
            .iter()
            .copied()
            .filter(|rule| has_spread || find_attribute(element, &rule.attribute_name).is_some())
            .collect();
        if applicable.is_empty() {
            return Ok(false);
        }

        let mut entries = Vec::with_capacity(element.attributes.len());
        let mut replaced: SmallVec<[Span; 4]> = SmallVec::new();
        for attribute in &element.attributes {
            match attribute {
                Attribute::Plain(plain) => {
                    entries.push(o::LiteralMapEntry::Property {
                        key: plain.name.clone(),
                        value: to_runtime_expression(&plain.name, &plain.value, ctx.source)?,
                    });
                    replaced.push(plain.span);
                }
                Attribute::Spread(spread) => {
                    entries.push(spread_entry(spread, ctx.source)?);
                    replaced.push(spread.span);
                }
                Attribute::Directive(_) => {}
            }
        }

        let handle = o::variable(&glue_names(names, &mut ctx.ids).handle_attributes);
        let mut bag = o::literal_map(entries);
        for rule in &applicable {
            let lang_attribute_name = match &rule.lang_attribute_name {
                Some(name) => o::literal(name.as_str()),
                None => o::undefined(),
            };
            bag = handle.call_fn(vec![*bag, *o::literal(rule.attribute_name.as_str()), *lang_attribute_name]);
        }

        let tag_name_end = element.tag_name_end();
        for span in replaced {
            let start = with_leading_whitespace(ctx.source, span.start, tag_name_end);
            ctx.code.remove(start, span.end)?;
        }
        ctx.code
            .insert_after(tag_name_end, format!(" {{...({})}}", emit_expression(&bag)));
        Ok(true)
    }

    /// `<svelte:element this={tag} href="/x">` becomes
    /// `<svelte:element this={tag} href={`${tag}` === "a" ? translate("/x", undefined) : "/x"}>`.
    fn rewrite_dynamic_element(
        &self,
        ctx: &mut PassContext<'_>,
        names: &mut Option<GlueNames>,
        element: &Element,
        attribute_name: &str,
        rules: &[&AttributeTranslation],
    ) -> Result<bool> {
        let ElementName::Dynamic(tag) = &element.name else {
            return Ok(false);
        };
        let Some(attribute) = find_attribute(element, attribute_name) else {
            return Ok(false);
        };

        let value = to_runtime_expression(attribute_name, &attribute.value, ctx.source)?;
        let translate = o::variable(&glue_names(names, &mut ctx.ids).translate_href);

        let mut expr = value.clone();
        for rule in rules.iter().rev() {
            let companion = match rule
                .lang_attribute_name
                .as_deref()
                .and_then(|lang| find_attribute(element, lang))
            {
                Some(lang) => to_runtime_expression(&lang.name, &lang.value, ctx.source)?,
                None => o::undefined(),
            };
            let condition = tag_comparison(tag, ctx.source, &rule.element_name)?;
            expr = condition.conditional(translate.call_fn(vec![*value.clone(), *companion]), expr);
        }

        ctx.code.overwrite(
            attribute.span.start,
            attribute.span.end,
            format!("{}={{{}}}", attribute_name, emit_expression(&expr)),
        )?;
        Ok(true)
    }
}

/// Move `start` back over the whitespace separating an attribute from
/// whatever precedes it, never past `floor`.
fn with_leading_whitespace(source: &str, start: usize, floor: usize) -> usize {
    match source.get(floor..start) {
        Some(between) => floor + between.trim_end_matches(|c: char| c.is_ascii_whitespace()).len(),
        None => start,
    }
}

fn glue_names<'n>(slot: &'n mut Option<GlueNames>, ids: &mut IdentifierAllocator<'_>) -> &'n GlueNames {
    slot.get_or_insert_with(|| GlueNames::allocate(ids))
}

impl PreprocessingPass for TranslateAttributePass {
    fn name(&self) -> &str {
        TRANSLATE_ATTRIBUTE_PASS
    }

    fn condition(&self, source: &str) -> bool {
        let has_spread = SPREAD_RE.is_match(source);
        let has_dynamic_element = source.contains(&format!("<{}", DYNAMIC_ELEMENT_TAG));

        self.rules.iter().any(|rule| {
            (has_spread || source.contains(rule.attribute_name.as_str()))
                && (has_dynamic_element || source.contains(rule.element_name.as_str()))
        })
    }

    fn apply(&self, ctx: &mut PassContext<'_>) -> Result<ScriptAdditions> {
        let template = ctx.template;
        let mut names: Option<GlueNames> = None;

        for (element_name, rules) in self.rules_by_element() {
            for element in find_elements(template, element_name) {
                if self.rewrite_static_element(ctx, &mut names, element, &rules)?
                    && ctx.logger.is_enabled(LogLevel::Debug)
                {
                    ctx.logger.debug(&format!(
                        "{}: rewrote <{}> at {}",
                        TRANSLATE_ATTRIBUTE_PASS, element_name, element.span.start
                    ));
                }
            }
        }

        let dynamic_elements = find_dynamic_elements(template);
        if !dynamic_elements.is_empty() {
            for (attribute_name, rules) in self.rules_by_attribute() {
                for element in &dynamic_elements {
                    if self.rewrite_dynamic_element(ctx, &mut names, element, attribute_name, &rules)?
                        && ctx.logger.is_enabled(LogLevel::Debug)
                    {
                        ctx.logger.debug(&format!(
                            "{}: rewrote `{}` on <{}> at {}",
                            TRANSLATE_ATTRIBUTE_PASS, attribute_name, DYNAMIC_ELEMENT_TAG, element.span.start
                        ));
                    }
                }
            }
        }

        let Some(names) = names else {
            return Ok(ScriptAdditions::default());
        };
        let glue = build_glue(
            &names,
            &GlueOptions {
                context_key: &self.context_key,
                opt_out_attribute: &self.opt_out_attribute,
            },
        );
        Ok(glue.to_script_additions())
    }
}
