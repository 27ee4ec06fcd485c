use super::schema::{ImplementationIntentionInput, InterventionInput, UrgeSurfingInput};

const PRINCIPLE_EXAMPLE: &str = "This works because even a small replacement habit can rewire your cue→routine→reward loop.";

pub fn intervention_prompt(input: &InterventionInput) -> String {
    format!(
        "You are an AI habit change assistant. Based on the user's motivation and ability levels, \
suggest a micro-action intervention and explain why it's helpful, citing relevant principles.

Urge Type: {urge}
Motivation Level: {motivation} (1-10)
Ability Level: {ability} (1-10)
Context: {context}

Consider these principles:
- High Motivation + Low Ability: suggest very easy micro-action (1 pushup, sip water, 30-sec breath).
- High Motivation + High Ability: suggest stronger action (10 min walk, call a friend, cold shower).
- Low Motivation: give motivational testimonial, visualization, or CBT reframe.

Always cite the principle briefly (eg: \"{PRINCIPLE_EXAMPLE}\")

Respond with a JSON object with the fields \"intervention\" (the suggested micro-action) \
and \"explanation\" (why it is suggested, citing the relevant principle).",
        urge = input.urge_type.prompt_term(),
        motivation = input.motivation_level,
        ability = input.ability_level,
        context = input.context_text().unwrap_or("none given"),
    )
}

pub fn implementation_intention_prompt(input: &ImplementationIntentionInput) -> String {
    format!(
        "You are a clinically-informed habit change assistant. Based on the user's logged triggers, \
generate a personalized implementation intention in the format 'If X, then I will Y,' where X is a \
specific trigger and Y is a replacement behavior.

The user is trying to change a habit related to: {category}.

Here are the user's logged triggers: {triggers}

Remember to cite the principle briefly (eg: \"{PRINCIPLE_EXAMPLE}\")
Make the replacement behavior specific, measurable, achievable, relevant, and time-bound (SMART).
Make the implementation intention as easy as possible to follow.

Respond with a JSON object with the single field \"implementationIntention\".",
        category = input.habit_category.trim(),
        triggers = input.logged_triggers.trim(),
    )
}

pub fn urge_surfing_prompt(input: &UrgeSurfingInput) -> String {
    format!(
        "You are a mindfulness expert guiding a user through urge-surfing.

The user is experiencing an urge of type: {urge} with an initial intensity of {intensity}.

Provide a short (30 sec - 3 min) guided mindfulness script to help the user ride the urge without acting on it.
The script should encourage the user to:
- Notice the physical sensations of the urge in their body without judgment.
- Acknowledge the urge as a temporary experience that will pass.
- Visualize the urge as a wave, rising and falling, without being swept away by it.
- Focus on their breath and the present moment.

After the script, ask the user to rate the intensity of the urge again (1-10) and record it in the intensityAfter field.

Respond with a JSON object with the fields \"script\" and \"intensityAfter\".",
        urge = input.urge_type.trim(),
        intensity = input.intensity_before,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::types::UrgeType;

    #[test]
    fn intervention_prompt_interpolates_levels() {
        let prompt = intervention_prompt(&InterventionInput {
            urge_type: UrgeType::ValidationSeeking,
            motivation_level: 3,
            ability_level: 7,
            context: Some("  ".into()),
        });
        assert!(prompt.contains("Urge Type: validation-seeking"));
        assert!(prompt.contains("Motivation Level: 3 (1-10)"));
        assert!(prompt.contains("Ability Level: 7 (1-10)"));
        assert!(prompt.contains("Context: none given"));
    }
}
