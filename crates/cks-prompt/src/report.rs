//! Markdown report combining the tree, the analysis, and its timestamp.

/// Render the downloadable security report.
///
/// `timestamp` is the preformatted analysis capture time; `None` renders an
/// "unknown" marker so a report can be produced before any analysis ran.
pub fn render_report(tree: &str, analysis: &str, timestamp: Option<&str>) -> String {
    let tree = if tree.is_empty() {
        "No architecture tree was designed."
    } else {
        tree
    };
    let analysis = if analysis.is_empty() {
        "No security analysis has been run."
    } else {
        analysis
    };

    format!(
        "# AWS Security Architecture Report\n\n\
         ## Architecture\n\
         ```\n{tree}\n```\n\n\
         ## Security analysis\n\
         {analysis}\n\n\
         ## Generated\n\
         {}\n",
        timestamp.unwrap_or("unknown")
    )
}
