//! Pass Pipeline
//!
//! Per-file orchestration of preprocessing passes: pre-filtering, shared edit
//! buffer, identifier scopes, glue collection and script splicing.

mod batch;
mod pass;
mod runner;
mod splice;

pub use batch::{process_batch, run_batch, SourceFile};
pub use pass::{PassContext, PreprocessingPass, ScriptAdditions};
pub use runner::{run, Pipeline, PipelineOutput};
pub use splice::{splice_script_additions, SCRIPT_SPLICE_ORIGIN};
