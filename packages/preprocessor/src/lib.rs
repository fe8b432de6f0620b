#![deny(clippy::all)]

/**
 * Translate Preprocessor
 *
 * Rewrites component markup so that link targets and similar attributes go
 * through a runtime translation hook, and produces the script glue that
 * provides the hook.
 */

// Tree
pub mod ast;

// Rewriting engine
pub mod code_buffer;
pub mod identifier;
pub mod output;
pub mod pipeline;

// Translate-attribute rewrite
pub mod glue;
pub mod passes;
pub mod serializer;

// Ambient
pub mod config;
pub mod error;
pub mod logging;

pub use ast::Template;
pub use code_buffer::CodeBuffer;
pub use config::{AttributeTranslation, PreprocessorConfig};
pub use error::{PreprocessError, Result};
pub use passes::TranslateAttributePass;
pub use pipeline::{Pipeline, PipelineOutput, PreprocessingPass, ScriptAdditions};

/// Validate `config`, run the passes it describes over one file and splice
/// the glue into its instance script.
pub fn preprocess(config: &PreprocessorConfig, template: &Template, source: &str) -> Result<String> {
    config.validate()?;
    Pipeline::from_config(config).process(template, source)
}
