//! Batch processing
//!
//! Runs one pipeline over many files in parallel. Every file gets its own
//! buffer and identifier scopes; the only shared state is the pipeline itself,
//! which is immutable.

use rayon::prelude::*;

use super::runner::{Pipeline, PipelineOutput};
use crate::ast::Template;
use crate::error::Result;

/// One component file handed to the batch runner.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: String,
    pub template: Template,
    pub source: String,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, template: Template, source: impl Into<String>) -> Self {
        SourceFile {
            filename: filename.into(),
            template,
            source: source.into(),
        }
    }
}

/// [`Pipeline::run`] for every file. Results are in input order, and a failure
/// in one file does not affect the others.
pub fn run_batch(pipeline: &Pipeline, files: &[SourceFile]) -> Vec<Result<PipelineOutput>> {
    pipeline.logger().info(&format!("preprocessing {} file(s)", files.len()));
    files
        .par_iter()
        .map(|file| {
            pipeline.run(&file.template, &file.source).map_err(|err| {
                pipeline.logger().error(&format!("{}: {}", file.filename, err));
                err
            })
        })
        .collect()
}

/// [`Pipeline::process`] for every file, in input order.
pub fn process_batch(pipeline: &Pipeline, files: &[SourceFile]) -> Vec<Result<String>> {
    pipeline.logger().info(&format!("preprocessing {} file(s)", files.len()));
    files
        .par_iter()
        .map(|file| {
            pipeline.process(&file.template, &file.source).map_err(|err| {
                pipeline.logger().error(&format!("{}: {}", file.filename, err));
                err
            })
        })
        .collect()
}
