//! Instruction builders for the external collaborators.
//!
//! Every function here is pure: same inputs, same output, no I/O. The
//! session and orchestration layers feed the results to the text-generation
//! service or the diagram subprocess verbatim.

pub mod composer;
pub mod report;

pub use composer::{
    build_analysis_prompt, build_chat_prompt, build_diagram_prompt, strip_example_suffix,
};
pub use report::render_report;
