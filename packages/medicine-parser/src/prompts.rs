//! Prompt templates for the model service.

pub const COMPONENTS_SYSTEM_PROMPT: &str = "You are an expert in parsing medical product names and understanding pharmaceutical formulations.";

pub const DURATION_SYSTEM_PROMPT: &str =
    "You are an expert in pharmaceutical patches. Only respond with duration in format: X days or Y hours";

/// Ask for name, strength, formulation and (for patches) wear time as JSON.
pub fn format_components_prompt(medicine: &str) -> String {
    format!(
        r#"Given the medicine name "{medicine}", extract the following components:
1. Medicine name (without strength and formulation)
2. Strength (with units)
3. Formulation
4. If it's a patch, what is its duration in hours or days?

Return the result in JSON format like this:
{{
    "name": "medicine name",
    "strength": "strength with units",
    "formulation": "formulation type",
    "duration": "X hours or Y days for patches"
}}

Be precise and only include exact information from the input, except for patch duration which can come from medical knowledge."#
    )
}

/// Ask only for the wear time of a patch.
pub fn format_duration_prompt(medicine: &str) -> String {
    format!(
        r#"For the medicine patch "{medicine}", what is its duration?
Reply ONLY with the number followed by either 'hours' or 'days'.
For example: '7 days' or '24 hours'.
If unsure, reply with 'unknown'."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_prompt_embeds_name_and_keys() {
        let prompt = format_components_prompt("Aspirin 75mg tablets");
        assert!(prompt.contains("\"Aspirin 75mg tablets\""));
        for key in ["\"name\"", "\"strength\"", "\"formulation\"", "\"duration\""] {
            assert!(prompt.contains(key), "missing {}", key);
        }
        assert!(prompt.contains("JSON"));
    }

    #[test]
    fn test_duration_prompt_mentions_unknown() {
        let prompt = format_duration_prompt("Estradiol patch");
        assert!(prompt.contains("\"Estradiol patch\""));
        assert!(prompt.contains("'unknown'"));
    }
}
