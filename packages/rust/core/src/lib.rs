//! Core pipeline and domain logic for gradio-md.
//!
//! Ties the repository browser, the bounded-concurrency scheduler and the
//! frontmatter parser together: order resolution, natural path ordering,
//! document assembly, and the atomic output write.

pub mod assembler;
pub mod natural;
pub mod order;
pub mod output;
pub mod pipeline;

pub use assembler::{AssembleOptions, SECTION_SEPARATOR, assemble, sort_records};
pub use output::{resolve_output_path, write_output};
pub use pipeline::{ProgressReporter, RunResult, SilentProgress, run};
