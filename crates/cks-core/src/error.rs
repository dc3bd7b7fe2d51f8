#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Text-generation API key is not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("No architecture tree to render; design an architecture first")]
    EmptyTree,

    #[error("Diagram tool '{0}' is not installed")]
    ToolNotInstalled(String),

    #[error("Diagram tool execution failed: {0}")]
    ToolExecError(String),

    #[error("Diagram generation timed out after {secs}s")]
    DiagramTimeout { secs: u64 },
}
