//! Prompt framing for the completion endpoint.

/// Prefix the instruction with the system prompt, if any.
pub fn frame_prompt(system_prompt: Option<&str>, instruction: &str) -> String {
    let mut prompt = String::new();

    if let Some(system) = system_prompt.filter(|s| !s.trim().is_empty()) {
        prompt.push_str("System: ");
        prompt.push_str(system.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str("User: ");
    prompt.push_str(instruction.trim());
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_system_and_user_turns() {
        assert_eq!(
            frame_prompt(Some("You tell stories."), "  Tell one.  "),
            "System: You tell stories.\n\nUser: Tell one.\n"
        );
    }

    #[test]
    fn omits_blank_system_prompt() {
        assert_eq!(frame_prompt(Some("  "), "Hi"), "User: Hi\n");
        assert_eq!(frame_prompt(None, "Hi"), "User: Hi\n");
    }
}
