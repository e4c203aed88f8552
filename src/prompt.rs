use crate::media::MediaKind;

/// System prompt for the ingredient extraction call.
///
/// The prompts live in `src/prompts/*.txt` and are embedded at compile time
/// with `include_str!`, so they can be edited without touching Rust string syntax.
pub const EXTRACTION_SYSTEM_PROMPT: &str = include_str!("prompts/extraction_system.txt");

/// Task instructions sent alongside the media; `{media}` is replaced with "image" or "video".
pub const EXTRACTION_INSTRUCTIONS: &str = include_str!("prompts/extraction_instructions.txt");

/// Recipe prompt; `{ingredients}` is replaced with the combined ingredient text.
pub const RECIPE_PROMPT: &str = include_str!("prompts/recipe.txt");

pub fn build_extraction_instructions(kind: MediaKind) -> String {
    EXTRACTION_INSTRUCTIONS
        .trim_end()
        .replace("{media}", kind.as_str())
}

pub fn build_recipe_prompt(combined_input: &str) -> String {
    RECIPE_PROMPT
        .trim_end()
        .replace("{ingredients}", combined_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_embedded() {
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("food ingredients"));
        assert!(EXTRACTION_INSTRUCTIONS.contains("{media}"));
        assert!(EXTRACTION_INSTRUCTIONS.contains("Identified Ingredients"));
        assert!(RECIPE_PROMPT.contains("{ingredients}"));
    }

    #[test]
    fn test_extraction_instructions_name_the_media() {
        let video = build_extraction_instructions(MediaKind::Video);
        assert!(video.contains("visible in the video"));
        assert!(!video.contains("{media}"));

        let image = build_extraction_instructions(MediaKind::Image);
        assert!(image.contains("visible in the image"));
        assert!(image.contains("non-edible"));
    }

    #[test]
    fn test_recipe_prompt_embeds_ingredients() {
        let prompt = build_recipe_prompt("- 3 eggs\n- 1 onion");
        assert!(prompt.contains("Available ingredients: - 3 eggs\n- 1 onion"));
        assert!(prompt.contains("Nutritional value"));
        assert!(prompt.contains("Step-by-step"));
        assert!(!prompt.contains("{ingredients}"));
    }
}
