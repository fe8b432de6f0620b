//! Glue Runtime Tests
//!
//! Evaluates the generated glue with and without a translation context.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use translate_preprocessor::glue::{build_glue, GlueNames, GlueOptions};
use translate_preprocessor::identifier::{IdentifierAllocator, ReservedNames};
use translate_preprocessor::output::output_ast as o;

#[path = "../support/eval.rs"]
mod eval;

use eval::{Runtime, Value};

const OPT_OUT: &str = "data-no-translate";

fn glue_names() -> GlueNames {
    let mut reserved = ReservedNames::default();
    let mut ids = IdentifierAllocator::new("translate_attribute_pass", &mut reserved);
    GlueNames::allocate(&mut ids)
}

/// A runtime with the glue loaded, optionally with a context that prefixes
/// hrefs with their language.
fn load(with_context: bool) -> (Runtime, GlueNames, Rc<RefCell<Vec<(Value, Value)>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let recorded = calls.clone();
    let mut runtime = if with_context {
        let context = Value::object(vec![(
            "translateHref",
            Value::native(move |args| {
                let href = args.first().cloned().unwrap_or(Value::Undefined);
                let lang = args.get(1).cloned().unwrap_or(Value::Undefined);
                recorded.borrow_mut().push((href.clone(), lang.clone()));
                let lang = lang.as_str().unwrap_or("en").to_string();
                Value::str(format!("/{}{}", lang, href.as_str().unwrap_or_default()))
            }),
        )]);
        Runtime::with_contexts(vec![("paraglide", context)])
    } else {
        Runtime::without_context()
    };

    let names = glue_names();
    let glue = build_glue(
        &names,
        &GlueOptions {
            context_key: "paraglide",
            opt_out_attribute: OPT_OUT,
        },
    );
    runtime.load(&glue.before);
    runtime.load(&glue.after);
    (runtime, names, calls)
}

fn handle(runtime: &Runtime, names: &GlueNames, attrs: &Value, attribute: &str, lang: Option<&str>) -> Value {
    runtime.call(
        &names.handle_attributes,
        vec![
            attrs.clone(),
            Value::str(attribute),
            lang.map(Value::str).unwrap_or(Value::Undefined),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    mod without_context {
        use super::*;

        #[test]
        fn should_bind_missing_context_to_undefined() {
            let (runtime, names, _) = load(false);
            assert_eq!(runtime.global(&names.context), Value::Undefined);
        }

        #[test]
        fn should_leave_attribute_bag_untouched() {
            let (runtime, names, _) = load(false);
            let attrs = Value::object(vec![("href", Value::str("/about")), ("hreflang", Value::str("de"))]);

            let result = handle(&runtime, &names, &attrs, "href", Some("hreflang"));

            assert_eq!(result, attrs);
            assert_eq!(result.get("href"), Value::str("/about"));
        }
    }

    mod with_context {
        use super::*;

        #[test]
        fn should_translate_target_attribute() {
            let (runtime, names, calls) = load(true);
            let attrs = Value::object(vec![("href", Value::str("/about")), ("class", Value::str("nav"))]);

            let result = handle(&runtime, &names, &attrs, "href", Some("hreflang"));

            assert_eq!(result.get("href"), Value::str("/en/about"));
            assert_eq!(result.get("class"), Value::str("nav"));
            assert_eq!(calls.borrow().len(), 1);
        }

        #[test]
        fn should_pass_companion_value() {
            let (runtime, names, calls) = load(true);
            let attrs = Value::object(vec![("href", Value::str("/about")), ("hreflang", Value::str("de"))]);

            let result = handle(&runtime, &names, &attrs, "href", Some("hreflang"));

            assert_eq!(result.get("href"), Value::str("/de/about"));
            assert_eq!(calls.borrow()[0], (Value::str("/about"), Value::str("de")));
        }

        #[test]
        fn should_pass_undefined_companion_without_companion_name() {
            let (runtime, names, calls) = load(true);
            let attrs = Value::object(vec![("action", Value::str("/search")), ("hreflang", Value::str("de"))]);

            handle(&runtime, &names, &attrs, "action", None);

            assert_eq!(calls.borrow()[0].1, Value::Undefined);
        }

        #[test]
        fn should_not_add_missing_attribute() {
            let (runtime, names, calls) = load(true);
            let attrs = Value::object(vec![("class", Value::str("nav"))]);

            let result = handle(&runtime, &names, &attrs, "href", Some("hreflang"));

            assert_eq!(result.get("href"), Value::Undefined);
            assert!(calls.borrow().is_empty());
        }

        #[test]
        fn should_respect_opt_out_marker() {
            let (runtime, names, calls) = load(true);
            for marker in [Value::Bool(true), Value::str("yes")] {
                let attrs = Value::object(vec![("href", Value::str("/about")), (OPT_OUT, marker)]);
                let result = handle(&runtime, &names, &attrs, "href", Some("hreflang"));
                assert_eq!(result.get("href"), Value::str("/about"));
            }
            assert!(calls.borrow().is_empty());
        }

        #[test]
        fn should_ignore_falsy_opt_out_marker() {
            let (runtime, names, _) = load(true);
            let attrs = Value::object(vec![("href", Value::str("/about")), (OPT_OUT, Value::Bool(false))]);

            let result = handle(&runtime, &names, &attrs, "href", None);
            assert_eq!(result.get("href"), Value::str("/en/about"));
        }

        #[test]
        fn should_translate_attributes_arriving_through_spreads() {
            let (mut runtime, names, _) = load(true);
            runtime.set_global("props", Value::object(vec![("href", Value::str("/spread"))]));
            let bag = o::literal_map(vec![
                o::LiteralMapEntry::Spread(o::raw("props", None)),
                o::LiteralMapEntry::Property {
                    key: "class".to_string(),
                    value: o::literal("x"),
                },
            ]);
            let call = o::variable(&names.handle_attributes).call_fn(vec![
                *bag,
                *o::literal("href"),
                *o::literal("hreflang"),
            ]);

            let result = runtime.eval_global(&call);
            assert_eq!(result.get("href"), Value::str("/en/spread"));
            assert_eq!(result.get("class"), Value::str("x"));
        }
    }

    proptest! {
        #[test]
        fn translate_href_passes_through_without_context(href in ".*", lang in proptest::option::of("[a-z]{2}")) {
            let (runtime, names, _) = load(false);
            let lang = lang.map(Value::str).unwrap_or(Value::Undefined);

            let result = runtime.call(&names.translate_href, vec![Value::str(href.clone()), lang]);

            prop_assert_eq!(result, Value::str(href));
        }

        #[test]
        fn opt_out_wins_over_context(href in ".*", other in "data-[a-z]{1,8}") {
            let (runtime, names, calls) = load(true);
            let attrs = Value::object(vec![
                ("href", Value::str(href.clone())),
                (other.as_str(), Value::str("v")),
                (OPT_OUT, Value::Bool(true)),
            ]);

            let result = handle(&runtime, &names, &attrs, "href", Some("hreflang"));

            prop_assert_eq!(result.get("href"), Value::str(href));
            prop_assert!(calls.borrow().is_empty());
        }
    }
}
