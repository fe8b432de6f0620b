//! Glue Code Emitter
//!
//! Builds the script code that connects rewritten markup to the runtime
//! translation hook. The hook is looked up once per component instance from
//! the component context; a missing context turns every call into a
//! pass-through.

use crate::identifier::IdentifierAllocator;
use crate::output::emitter::{emit_statement, emit_statements};
use crate::output::output_ast as o;
use crate::pipeline::ScriptAdditions;

/// Module the context lookup function is imported from.
pub const CONTEXT_MODULE: &str = "svelte";
/// Name of the context lookup function in [`CONTEXT_MODULE`].
pub const CONTEXT_LOOKUP_FN: &str = "getContext";
/// Method called on the context to translate a value.
pub const TRANSLATE_METHOD: &str = "translateHref";

/// Knobs of the generated glue.
#[derive(Debug, Clone, Copy)]
pub struct GlueOptions<'a> {
    /// Key the translation context is registered under.
    pub context_key: &'a str,
    /// Attribute that, when truthy on a bag, disables translation.
    pub opt_out_attribute: &'a str,
}

/// Identifiers the glue declares, as seen by rewritten markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlueNames {
    pub get_context: String,
    pub context: String,
    pub translate_href: String,
    pub handle_attributes: String,
}

impl GlueNames {
    pub fn allocate(ids: &mut IdentifierAllocator<'_>) -> Self {
        GlueNames {
            get_context: ids.identifier(CONTEXT_LOOKUP_FN),
            context: ids.identifier("context"),
            translate_href: ids.identifier("translateHref"),
            handle_attributes: ids.identifier("handle_attributes"),
        }
    }
}

/// Glue statements for the beginning and the end of the component script.
#[derive(Debug, Clone, PartialEq)]
pub struct GlueCode {
    pub before: Vec<o::Statement>,
    pub after: Vec<o::Statement>,
}

impl GlueCode {
    /// `before` keeps one fragment per import; `after` is a single fragment.
    pub fn to_script_additions(&self) -> ScriptAdditions {
        ScriptAdditions {
            before: self.before.iter().map(emit_statement).collect(),
            after: vec![emit_statements(&self.after)],
        }
    }
}

pub fn build_glue(names: &GlueNames, options: &GlueOptions<'_>) -> GlueCode {
    let before = vec![o::import_stmt(CONTEXT_LOOKUP_FN, &names.get_context, CONTEXT_MODULE)];

    let context = o::variable(&names.context);
    let lookup = o::const_stmt(
        &names.context,
        o::variable(&names.get_context).call_fn(vec![*o::literal(options.context_key)]),
    );

    // function translateHref(href, hreflang) {
    //   if (!context) return href;
    //   return context.translateHref(href, hreflang);
    // }
    let translate_href = o::fn_decl(
        &names.translate_href,
        &["href", "hreflang"],
        vec![
            o::if_stmt(o::not(context.clone()), vec![o::variable("href").to_return_stmt()]),
            context
                .prop(TRANSLATE_METHOD)
                .call_fn(vec![*o::variable("href"), *o::variable("hreflang")])
                .to_return_stmt(),
        ],
    );

    let attrs = o::variable("attrs");
    let attribute_name = o::variable("attribute_name");
    let lang_attribute_name = o::variable("lang_attribute_name");
    let current = attrs.key(attribute_name.clone());
    let assign = current
        .set(o::variable(&names.translate_href).call_fn(vec![*o::variable("attr"), *o::variable("hreflang")]))
        .map(|assign| assign.to_stmt());

    let mut translate_present = vec![
        o::const_stmt("attr", current.clone()),
        o::const_stmt(
            "hreflang",
            lang_attribute_name.conditional(attrs.key(lang_attribute_name.clone()), o::undefined()),
        ),
    ];
    translate_present.extend(assign);

    let mut handle_attributes = o::fn_decl(
        &names.handle_attributes,
        &["attrs", "attribute_name", "lang_attribute_name"],
        vec![
            o::if_stmt(
                attrs.key(o::literal(options.opt_out_attribute)),
                vec![attrs.to_return_stmt()],
            ),
            o::if_stmt(attribute_name.is_in(attrs.clone()), translate_present),
            attrs.to_return_stmt(),
        ],
    );
    if let o::Statement::DeclareFn(declare) = &mut handle_attributes {
        declare.doc = vec![
            "@param {Record<string, any>} attrs".to_string(),
            "@param {string} attribute_name".to_string(),
            "@param {string | undefined} lang_attribute_name".to_string(),
        ];
    }

    GlueCode {
        before,
        after: vec![lookup, translate_href, handle_attributes],
    }
}
