//! Prompt composition for chat, diagram generation, and security analysis.

use std::fmt::Write as _;

/// Labels may carry an example suffix ("WAF configured (e.g., AWS WAF)");
/// everything from this delimiter on is dropped before prompting.
const EXAMPLE_SUFFIX_DELIMITER: &str = " (e.g.,";

/// Strip a trailing parenthetical example from a checklist label.
pub fn strip_example_suffix(label: &str) -> &str {
    match label.find(EXAMPLE_SUFFIX_DELIMITER) {
        Some(idx) => &label[..idx],
        None => label,
    }
}

/// Build the chat instruction for one user utterance.
///
/// When a tree already exists it is quoted verbatim so the model keeps the
/// single live tree consistent across turns.
pub fn build_chat_prompt(user_message: &str, existing_tree: &str) -> String {
    let context = if existing_tree.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nExisting architecture (for reference):\n{existing_tree}\n\n\
             Build on this structure when handling the new request. Keep the \
             result consistent with it while applying or extending the \
             requested changes.\n"
        )
    };

    format!(
        "User request: {user_message}\n\n\
         Answer as an AWS cloud architecture expert.{context}\n\n\
         Requirements:\n\
         1. Design a cloud architecture that matches the request\n\
         2. Always express the architecture as a tree structure (using the \u{251c}\u{2500}, \u{2502}, \u{2514}\u{2500} connector glyphs)\n\
         3. Show the tree structure exactly once per reply\n\
         4. Clearly mark each component's role and its connections\n\
         5. Ask a follow-up question when the request is ambiguous\n\
         6. Do not add components the user did not ask for\n\n\
         Important rules:\n\
         - Always use official AWS service names (EC2, S3, RDS, VPC, IAM, CloudFront, Lambda, ECS, EKS, ...)\n\
         - Every node in the tree must use the official service name\n\
         - When an existing architecture is given, keep the new design consistent with it\n"
    )
}

/// Build the diagram-generation instruction for the external CLI tool.
///
/// The tree is embedded verbatim; a numbered security block is appended
/// only when at least one label is given.
pub fn build_diagram_prompt(tree: &str, security_labels: &[&str], output_dir: &str) -> String {
    let security = format_security_requirements(security_labels);
    format!(
        "Generate an AWS cloud architecture diagram.\n\n\
         Architecture:\n{tree}{security}\n\n\
         Requirements:\n\
         1. Use AWS service icons to draw the diagram\n\
         2. Clearly mark the connections between services\n\
         3. Save the result as a PNG file in the {output_dir} folder\n\n\
         Generate and save the diagram."
    )
}

/// Build the security-analysis instruction for the text-generation service.
pub fn build_analysis_prompt(tree: &str, applied_labels: &[&str]) -> String {
    let mut applied = String::new();
    if applied_labels.is_empty() {
        applied.push_str("\n\nCurrently applied security elements: none");
    } else {
        applied.push_str("\n\nCurrently applied security elements:\n");
        for (i, label) in applied_labels.iter().enumerate() {
            let _ = writeln!(applied, "{}. {}", i + 1, label);
        }
    }

    format!(
        "Analyze the security posture of the following AWS cloud architecture:\n\n\
         Architecture:\n{tree}{applied}\n\n\
         Analysis requests:\n\
         1. Explain the role each security element plays in the current architecture\n\
         2. Point out vulnerabilities or weaknesses in the current configuration\n\
         3. Recommend additional security elements worth adding\n\
         4. Rate the importance and priority of each element\n\n\
         Response format:\n\
         - Current security elements\n\
         - Vulnerabilities and improvements\n\
         - Recommended additions\n\
         - Hardening priority\n\n\
         Base the advice on AWS security best practices."
    )
}

/// Numbered security-requirements block, empty when no labels are checked.
fn format_security_requirements(labels: &[&str]) -> String {
    if labels.is_empty() {
        return String::new();
    }

    let mut block = String::from(
        "\n\nSecurity requirements:\n\
         Include the following security elements in the diagram and mark each \
         one clearly with '*' labels:\n",
    );
    for (i, label) in labels.iter().enumerate() {
        let _ = writeln!(block, "{}. {}", i + 1, strip_example_suffix(label));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_example_suffix() {
        assert_eq!(strip_example_suffix("WAF configured (e.g., AWS WAF)"), "WAF configured");
        assert_eq!(strip_example_suffix("VPC applied"), "VPC applied");
        assert_eq!(strip_example_suffix(""), "");
    }

    #[test]
    fn test_diagram_prompt_without_security_section() {
        let prompt = build_diagram_prompt("\u{251c}\u{2500} EC2", &[], "generated-diagrams");
        assert!(prompt.contains("\u{251c}\u{2500} EC2"));
        assert!(!prompt.contains("Security requirements:"));
        assert!(prompt.contains("generated-diagrams folder"));
    }

    #[test]
    fn test_diagram_prompt_numbers_and_strips_labels() {
        let prompt = build_diagram_prompt(
            "\u{251c}\u{2500} EC2",
            &["VPC applied", "WAF configured (e.g., AWS WAF)"],
            "generated-diagrams",
        );
        assert!(prompt.contains("Security requirements:"));
        assert!(prompt.contains("1. VPC applied"));
        assert!(prompt.contains("2. WAF configured\n"));
        assert!(!prompt.contains("(e.g., AWS WAF)"));
    }

    #[test]
    fn test_chat_prompt_without_tree_has_no_context_block() {
        let prompt = build_chat_prompt("two EC2 instances", "");
        assert!(prompt.contains("User request: two EC2 instances"));
        assert!(!prompt.contains("Existing architecture"));
        assert!(prompt.contains("exactly once per reply"));
        assert!(prompt.contains("official AWS service names"));
    }

    #[test]
    fn test_chat_prompt_quotes_existing_tree_verbatim() {
        let tree = "\u{251c}\u{2500} VPC\n\u{2514}\u{2500} EC2";
        let prompt = build_chat_prompt("add a database", tree);
        assert!(prompt.contains(tree));
        assert!(prompt.contains("consistent"));
    }

    #[test]
    fn test_chat_prompt_is_deterministic() {
        let a = build_chat_prompt("msg", "tree");
        let b = build_chat_prompt("msg", "tree");
        assert_eq!(a, b);
    }

    #[test]
    fn test_analysis_prompt_with_items() {
        let prompt = build_analysis_prompt("\u{2514}\u{2500} S3", &["VPC applied", "Data encryption"]);
        assert!(prompt.contains("1. VPC applied"));
        assert!(prompt.contains("2. Data encryption"));
        assert!(prompt.contains("Hardening priority"));
        assert!(!prompt.contains("none"));
    }

    #[test]
    fn test_analysis_prompt_marks_empty_checklist() {
        let prompt = build_analysis_prompt("\u{2514}\u{2500} S3", &[]);
        assert!(prompt.contains("Currently applied security elements: none"));
    }
}
