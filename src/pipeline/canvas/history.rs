use crate::models::{ChatTurn, TurnRole};

pub const USER_LABEL: &str = "Witness (User)";
pub const ASSISTANT_LABEL: &str = "Inner Canvas (AI)";

/// Render prior turns as a labeled transcript, one line per turn.
pub fn format_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| {
            let label = match turn.role {
                TurnRole::User => USER_LABEL,
                TurnRole::Assistant => ASSISTANT_LABEL,
            };
            format!("{label}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
