//! Pass Pipeline Runner
//!
//! Runs an ordered list of passes over one file. Passes whose pre-check fails
//! are skipped; the rest share one `CodeBuffer`, which is rendered once at the
//! end so that every pass works against original offsets.

use std::collections::HashSet;
use std::sync::Arc;

use super::pass::{PassContext, PreprocessingPass, ScriptAdditions};
use super::splice::splice_script_additions;
use crate::ast::Template;
use crate::code_buffer::CodeBuffer;
use crate::config::PreprocessorConfig;
use crate::error::Result;
use crate::identifier::{sanitize_identifier, IdentifierAllocator, ReservedNames};
use crate::logging::{LogLevel, Logger, NullLogger};
use crate::passes::TranslateAttributePass;

/// Result of running the pipeline on one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// The rewritten markup.
    pub code: String,
    /// Fragments for the top of the component script, in pass order.
    pub before: Vec<String>,
    /// Fragments for the end of the component script, in pass order.
    pub after: Vec<String>,
}

pub struct Pipeline {
    passes: Vec<Box<dyn PreprocessingPass>>,
    logger: Arc<dyn Logger>,
}

impl Pipeline {
    pub fn new(passes: Vec<Box<dyn PreprocessingPass>>) -> Self {
        Pipeline {
            passes,
            logger: Arc::new(NullLogger::new()),
        }
    }

    /// The passes described by `config`; a disabled config gives an identity
    /// pipeline. `config` is taken as is; see [`Pipeline::try_from_config`].
    pub fn from_config(config: &PreprocessorConfig) -> Self {
        let mut passes: Vec<Box<dyn PreprocessingPass>> = Vec::new();
        if config.enabled && !config.attribute_translations.is_empty() {
            passes.push(Box::new(TranslateAttributePass::from_config(config)));
        }
        Pipeline::new(passes)
    }

    /// [`Pipeline::from_config`] for a config that passes
    /// [`PreprocessorConfig::validate`].
    pub fn try_from_config(config: &PreprocessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline::from_config(config))
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn passes(&self) -> &[Box<dyn PreprocessingPass>] {
        &self.passes
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn run(&self, template: &Template, source: &str) -> Result<PipelineOutput> {
        run(&self.passes, template, source, self.logger.as_ref())
    }

    /// Like [`Pipeline::run`], but also splices the script additions into the
    /// instance script, returning the complete component source.
    pub fn process(&self, template: &Template, source: &str) -> Result<String> {
        let (mut code, additions) = apply_passes(&self.passes, template, source, self.logger.as_ref())?;
        splice_script_additions(template, &mut code, &additions);
        render(&code, source, self.logger.as_ref())
    }
}

pub fn run(
    passes: &[Box<dyn PreprocessingPass>],
    template: &Template,
    source: &str,
    logger: &dyn Logger,
) -> Result<PipelineOutput> {
    let (code, additions) = apply_passes(passes, template, source, logger)?;
    Ok(PipelineOutput {
        code: render(&code, source, logger)?,
        before: additions.before,
        after: additions.after,
    })
}

fn render(code: &CodeBuffer, source: &str, logger: &dyn Logger) -> Result<String> {
    code.render(source).map_err(|err| {
        logger.log(LogLevel::Error, &err.to_string());
        err
    })
}

fn apply_passes(
    passes: &[Box<dyn PreprocessingPass>],
    template: &Template,
    source: &str,
    logger: &dyn Logger,
) -> Result<(CodeBuffer, ScriptAdditions)> {
    let mut code = CodeBuffer::new();
    let mut additions = ScriptAdditions::default();
    let mut reserved: Option<ReservedNames> = None;
    let mut scopes: HashSet<String> = HashSet::new();

    for pass in passes {
        if !pass.condition(source) {
            logger.log(
                LogLevel::Debug,
                &format!("skipping pass `{}`: condition not met", pass.name()),
            );
            continue;
        }

        let scope = unique_scope(&mut scopes, pass.name());
        code.set_origin(pass.name());
        let edits_before = code.len();

        let result = {
            let mut ctx = PassContext {
                template,
                source,
                code: &mut code,
                ids: IdentifierAllocator::new(
                    &scope,
                    reserved.get_or_insert_with(|| ReservedNames::from_source(source)),
                ),
                logger,
            };
            pass.apply(&mut ctx)
        };
        let pass_additions = result.map_err(|err| {
            logger.log(LogLevel::Error, &format!("pass `{}` failed: {}", pass.name(), err));
            err
        })?;

        logger.log(
            LogLevel::Debug,
            &format!("pass `{}` recorded {} edit(s)", pass.name(), code.len() - edits_before),
        );
        additions.extend(pass_additions);
    }

    Ok((code, additions))
}

/// Passes sharing a name still get distinct identifier scopes.
fn unique_scope(claimed: &mut HashSet<String>, name: &str) -> String {
    let preferred = sanitize_identifier(name);
    let mut candidate = preferred.clone();
    let mut suffix = 0;
    while !claimed.insert(candidate.clone()) {
        suffix += 1;
        candidate = format!("{}{}", preferred, suffix);
    }
    candidate
}
