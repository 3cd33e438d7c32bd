use crate::models::EvidenceNode;

pub const NO_CLUE_SELECTED: &str = "No specific clue selected.";

/// Render the selected clues into the `Context Clues` block of the prompt.
pub fn format_evidence(nodes: &[EvidenceNode]) -> String {
    match nodes {
        [] => NO_CLUE_SELECTED.to_string(),
        [node] => format!(
            "INVESTIGATING SINGLE CLUE: \"{}\"\nContext: {}",
            node.title, node.insight
        ),
        _ => {
            let names = nodes
                .iter()
                .map(|n| format!("\"{}\"", n.title))
                .collect::<Vec<_>>()
                .join(" + ");
            let details = nodes
                .iter()
                .map(|n| format!("- {}: {}", n.title, n.insight))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "SYNTHESIZING EVIDENCE: {names}\nDetails:\n{details}\n\
                 (The user wants to find the hidden connection between these clues.)"
            )
        }
    }
}
