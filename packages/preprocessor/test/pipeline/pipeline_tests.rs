//! Pass Pipeline Tests

use std::sync::{Arc, Mutex};

use translate_preprocessor::config::{AttributeTranslation, PreprocessorConfig};
use translate_preprocessor::error::{PreprocessError, Result};
use translate_preprocessor::logging::{LogLevel, Logger, NullLogger};
use translate_preprocessor::pipeline::{
    process_batch, run, run_batch, PassContext, Pipeline, PreprocessingPass, ScriptAdditions, SourceFile,
};
use translate_preprocessor::{preprocess, TranslateAttributePass};

#[path = "../support/markup.rs"]
mod markup;

/// Overwrites a fixed range and declares one identifier.
struct OverwritePass {
    name: &'static str,
    start: usize,
    end: usize,
    text: &'static str,
}

impl PreprocessingPass for OverwritePass {
    fn name(&self) -> &str {
        self.name
    }

    fn condition(&self, _source: &str) -> bool {
        true
    }

    fn apply(&self, ctx: &mut PassContext<'_>) -> Result<ScriptAdditions> {
        ctx.code.overwrite(self.start, self.end, self.text)?;
        let name = ctx.ids.identifier("value");
        Ok(ScriptAdditions {
            before: vec![format!("let {};", name)],
            after: vec![format!("{} = 1;", name)],
        })
    }
}

/// Never applicable; applying it is a bug.
struct NeverPass;

impl PreprocessingPass for NeverPass {
    fn name(&self) -> &str {
        "never"
    }

    fn condition(&self, _source: &str) -> bool {
        false
    }

    fn apply(&self, _ctx: &mut PassContext<'_>) -> Result<ScriptAdditions> {
        panic!("apply must not run when the condition fails");
    }
}

#[derive(Default)]
struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingLogger {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn write(&self, level: LogLevel, msg: &str) {
        self.messages.lock().unwrap().push(format!("{}: {}", level, msg));
    }
}

fn translate_pass() -> Box<dyn PreprocessingPass> {
    Box::new(TranslateAttributePass::from_config(&PreprocessorConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod runner {
        use super::*;

        #[test]
        fn should_be_identity_without_passes() {
            let source = r#"<a href="/">x</a>"#;
            let output = run(&[], &markup::parse(source), source, &NullLogger).unwrap();

            assert_eq!(output.code, source);
            assert!(output.before.is_empty() && output.after.is_empty());
        }

        #[test]
        fn should_be_identity_when_nothing_matches() {
            let source = "<script>let x = 1;</script>\n<p class=\"intro\">{x}</p>";
            let pipeline = Pipeline::from_config(&PreprocessorConfig::default());
            let output = pipeline.run(&markup::parse(source), source).unwrap();

            assert_eq!(output.code, source);
            assert!(output.before.is_empty() && output.after.is_empty());
            assert_eq!(pipeline.process(&markup::parse(source), source).unwrap(), source);
        }

        #[test]
        fn should_be_identity_when_disabled() {
            let source = r#"<a href="/">x</a>"#;
            let config = PreprocessorConfig {
                enabled: false,
                ..PreprocessorConfig::default()
            };
            let pipeline = Pipeline::from_config(&config);

            assert!(pipeline.passes().is_empty());
            assert_eq!(pipeline.process(&markup::parse(source), source).unwrap(), source);
        }

        #[test]
        fn should_skip_passes_whose_condition_fails() {
            let source = "<p>x</p>";
            let logger = RecordingLogger::default();
            let passes: Vec<Box<dyn PreprocessingPass>> = vec![Box::new(NeverPass)];

            let output = run(&passes, &markup::parse(source), source, &logger).unwrap();

            assert_eq!(output.code, source);
            assert!(logger
                .messages()
                .contains(&"debug: skipping pass `never`: condition not met".to_string()));
        }

        #[test]
        fn should_concatenate_glue_in_pass_order() {
            let source = "abcdef";
            let passes: Vec<Box<dyn PreprocessingPass>> = vec![
                Box::new(OverwritePass {
                    name: "first",
                    start: 0,
                    end: 1,
                    text: "A",
                }),
                Box::new(OverwritePass {
                    name: "second",
                    start: 4,
                    end: 6,
                    text: "EF",
                }),
            ];

            let output = run(&passes, &Default::default(), source, &NullLogger).unwrap();

            assert_eq!(output.code, "AbcdEF");
            assert_eq!(output.before, vec!["let first_value;", "let second_value;"]);
            assert_eq!(output.after, vec!["first_value = 1;", "second_value = 1;"]);
        }

        #[test]
        fn should_give_passes_with_equal_names_distinct_scopes() {
            let passes: Vec<Box<dyn PreprocessingPass>> = vec![
                Box::new(OverwritePass {
                    name: "p",
                    start: 0,
                    end: 1,
                    text: "x",
                }),
                Box::new(OverwritePass {
                    name: "p",
                    start: 1,
                    end: 2,
                    text: "y",
                }),
                Box::new(OverwritePass {
                    name: "p1",
                    start: 2,
                    end: 3,
                    text: "z",
                }),
            ];

            let output = run(&passes, &Default::default(), "abc", &NullLogger).unwrap();

            assert_eq!(output.before, vec!["let p_value;", "let p1_value;", "let p11_value;"]);
        }
    }

    mod disjointness {
        use super::*;

        #[test]
        fn should_fail_on_overlapping_edits_from_two_passes() {
            let source = r#"<a href="/about">About</a>"#;
            let passes: Vec<Box<dyn PreprocessingPass>> = vec![
                translate_pass(),
                Box::new(OverwritePass {
                    name: "rename_href",
                    start: 3,
                    end: 7,
                    text: "xref",
                }),
            ];

            let err = run(&passes, &markup::parse(source), source, &NullLogger).unwrap_err();

            match err {
                PreprocessError::ConflictingEdit(conflict) => {
                    assert_eq!(conflict.first, 2..16);
                    assert_eq!(conflict.first_origin, "translate_attribute_pass");
                    assert_eq!(conflict.second, 3..7);
                    assert_eq!(conflict.second_origin, "rename_href");
                }
                other => panic!("expected a conflict, got {:?}", other),
            }
        }

        #[test]
        fn should_combine_disjoint_edits_on_one_element() {
            let source = r#"<a href="/about">About</a>"#;
            let passes: Vec<Box<dyn PreprocessingPass>> = vec![
                translate_pass(),
                Box::new(OverwritePass {
                    name: "upper",
                    start: 17,
                    end: 22,
                    text: "ABOUT",
                }),
            ];

            let output = run(&passes, &markup::parse(source), source, &NullLogger).unwrap();

            assert!(output.code.starts_with("<a {...(translate_attribute_pass_handle_attributes("));
            assert!(output.code.ends_with("\"hreflang\"))}>ABOUT</a>"));
        }

        #[test]
        fn should_not_return_partial_output_on_conflict() {
            let passes: Vec<Box<dyn PreprocessingPass>> = vec![
                Box::new(OverwritePass {
                    name: "a",
                    start: 0,
                    end: 3,
                    text: "x",
                }),
                Box::new(OverwritePass {
                    name: "b",
                    start: 2,
                    end: 4,
                    text: "y",
                }),
            ];
            let logger = RecordingLogger::default();

            assert!(run(&passes, &Default::default(), "abcd", &logger).is_err());
            assert!(logger.messages().iter().any(|m| m.starts_with("error: conflicting edits")));
        }
    }

    mod splicing {
        use super::*;

        #[test]
        fn should_splice_glue_into_existing_instance_script() {
            let source = "<script>\n  export let url;\n</script>\n<a href={url}>x</a>";
            let output = preprocess(&PreprocessorConfig::default(), &markup::parse(source), source).unwrap();

            let script_end = output.find("</script>").unwrap();
            let script = &output[..script_end];
            assert!(script.starts_with(
                "<script>\nimport { getContext as translate_attribute_pass_getContext } from \"svelte\";\n\n  export let url;\n"
            ));
            assert!(script.contains("function translate_attribute_pass_handle_attributes("));
            assert_eq!(output.matches("<script>").count(), 1);
            assert!(output.ends_with(
                "<a {...(translate_attribute_pass_handle_attributes({\"href\": url}, \"href\", \"hreflang\"))}>x</a>"
            ));
        }

        #[test]
        fn should_create_instance_script_when_missing() {
            let source = r#"<a href="/">x</a>"#;
            let output = preprocess(&PreprocessorConfig::default(), &markup::parse(source), source).unwrap();

            assert!(output.starts_with(
                "<script>\nimport { getContext as translate_attribute_pass_getContext } from \"svelte\";\nconst translate_attribute_pass_context"
            ));
            assert!(output.contains("}\n</script>\n<a {...("));
        }

        #[test]
        fn should_reject_invalid_config_before_rewriting() {
            let source = r#"<a href="/">x</a>"#;
            let config = PreprocessorConfig {
                attribute_translations: vec![AttributeTranslation::new("a", "", None)],
                ..PreprocessorConfig::default()
            };

            let err = preprocess(&config, &markup::parse(source), source).unwrap_err();
            assert!(matches!(err, PreprocessError::Config(ref message) if message.contains("attribute_name")));
            assert!(Pipeline::try_from_config(&config).is_err());
            assert!(Pipeline::try_from_config(&PreprocessorConfig::default()).is_ok());
        }

        #[test]
        fn should_ignore_module_scripts() {
            let source = "<script context=\"module\">export const x = 1;</script><a href=\"/\">x</a>";
            let template = markup::parse(source);
            assert!(template.instance.is_none());

            let output = preprocess(&PreprocessorConfig::default(), &template, source).unwrap();
            assert!(output.starts_with("<script>\nimport"));
            assert!(output.contains("<script context=\"module\">export const x = 1;</script>"));
        }
    }

    mod batch {
        use super::*;

        fn files() -> Vec<SourceFile> {
            vec![
                (r#"<a href="/1">1</a>"#, "one.svelte"),
                ("<p>plain</p>", "two.svelte"),
                (r#"<svelte:element this={t} href="/3" />"#, "three.svelte"),
            ]
            .into_iter()
            .map(|(source, filename)| SourceFile::new(filename, markup::parse(source), source))
            .collect()
        }

        #[test]
        fn should_keep_results_in_input_order() {
            let pipeline = Pipeline::from_config(&PreprocessorConfig::default());
            let files = files();
            let results = run_batch(&pipeline, &files);

            assert_eq!(results.len(), 3);
            for (file, result) in files.iter().zip(&results) {
                let expected = pipeline.run(&file.template, &file.source).unwrap();
                assert_eq!(result.as_ref().unwrap(), &expected);
            }
            assert_eq!(results[1].as_ref().unwrap().code, "<p>plain</p>");
        }

        #[test]
        fn should_process_files_independently() {
            let logger = Arc::new(RecordingLogger::default());
            let pipeline = Pipeline::from_config(&PreprocessorConfig::default()).with_logger(logger.clone());
            let results = process_batch(&pipeline, &files());

            assert!(results.iter().all(|result| result.is_ok()));
            assert_eq!(results[1].as_ref().unwrap(), "<p>plain</p>");
            assert!(results[0].as_ref().unwrap().starts_with("<script>"));
            assert!(logger
                .messages()
                .contains(&"info: preprocessing 3 file(s)".to_string()));
        }
    }
}
