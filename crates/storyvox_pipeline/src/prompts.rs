//! Instruction templates for the three text generation stages.

use regex::Regex;
use storyvox_error::{ConfigError, StoryvoxError, StoryvoxResult};

use crate::PromptSettings;

const STORY_TEMPLATE: &str = "\
Write a {genre} story based on this storyline:

{storyline}

Give the story a clear beginning, middle and end, and keep it true to the {genre} genre.
Keep it under 100 words.
Respond with the story text only, with no title, preamble or closing remarks.";

const SEGMENTATION_TEMPLATE: &str = "\
Split the story below into sentences and label each sentence with the one emotion it should be read with.
Write one line per sentence in exactly this form:
Sentence: <sentence text> | Emotion: <emotion>

Use only these emotions: angry, calm, disgust, fear, happy, neutral, sad, surprise.
Respond with those lines only.

Story:
{story}";

const SCENE_PLANNING_TEMPLATE: &str = "\
The story below is narrated in {duration} seconds. Divide it into 3 to 5 scenes that cover 0 to {duration} seconds in order, and write an image prompt for each scene.
Use exactly this form for every scene:

Scene 1 (Duration 0-X seconds):
Image prompt: <detailed visual description>

Scene 2 (Duration X-Y seconds):
Image prompt: <detailed visual description>

Respond with the scenes only.

Story:
{story}";

const STORY_PLACEHOLDERS: &[&str] = &["storyline", "genre"];
const SEGMENTATION_PLACEHOLDERS: &[&str] = &["story"];
const SCENE_PLANNING_PLACEHOLDERS: &[&str] = &["story", "duration"];

/// The instructions sent to the text generator.
///
/// # Examples
///
/// ```
/// use storyvox_pipeline::PromptTemplates;
///
/// let prompts = PromptTemplates::default();
/// let instruction = prompts.story("a lost kite", "fable");
/// assert!(instruction.contains("a lost kite"));
/// assert!(instruction.contains("fable story"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PromptTemplates {
    /// Story generation template
    story_template: String,
    /// Segmentation template
    segmentation_template: String,
    /// Scene-planning template
    scene_planning_template: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            story_template: STORY_TEMPLATE.to_string(),
            segmentation_template: SEGMENTATION_TEMPLATE.to_string(),
            scene_planning_template: SCENE_PLANNING_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Built-in templates with any configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an override uses a placeholder its
    /// stage cannot fill.
    pub fn from_settings(settings: &PromptSettings) -> StoryvoxResult<Self> {
        let placeholder = Regex::new(r"\{([A-Za-z_]+)\}").map_err(|e| {
            StoryvoxError::from(ConfigError::new(format!(
                "Invalid placeholder pattern: {}",
                e
            )))
        })?;

        let mut templates = Self::default();
        if let Some(story) = &settings.story {
            check_placeholders(&placeholder, "story", story, STORY_PLACEHOLDERS)?;
            templates.story_template = story.clone();
        }
        if let Some(segmentation) = &settings.segmentation {
            check_placeholders(
                &placeholder,
                "segmentation",
                segmentation,
                SEGMENTATION_PLACEHOLDERS,
            )?;
            templates.segmentation_template = segmentation.clone();
        }
        if let Some(scene_planning) = &settings.scene_planning {
            check_placeholders(
                &placeholder,
                "scene_planning",
                scene_planning,
                SCENE_PLANNING_PLACEHOLDERS,
            )?;
            templates.scene_planning_template = scene_planning.clone();
        }
        Ok(templates)
    }

    /// Instruction for the story stage.
    pub fn story(&self, storyline: &str, genre: &str) -> String {
        render(
            &self.story_template,
            &[("storyline", storyline.trim()), ("genre", genre.trim())],
        )
    }

    /// Instruction for the segmentation stage.
    pub fn segmentation(&self, story: &str) -> String {
        render(&self.segmentation_template, &[("story", story.trim())])
    }

    /// Instruction for the scene-planning stage, anchored to the narration
    /// length.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyvox_pipeline::PromptTemplates;
    ///
    /// let instruction = PromptTemplates::default().scene_planning("Once...", 42.26);
    /// assert!(instruction.contains("narrated in 42.3 seconds"));
    /// ```
    pub fn scene_planning(&self, story: &str, duration_seconds: f64) -> String {
        let duration = format!("{:.1}", duration_seconds);
        render(
            &self.scene_planning_template,
            &[("story", story.trim()), ("duration", duration.as_str())],
        )
    }
}

fn check_placeholders(
    placeholder: &Regex,
    stage: &str,
    template: &str,
    allowed: &[&str],
) -> StoryvoxResult<()> {
    for captures in placeholder.captures_iter(template) {
        let name = &captures[1];
        if !allowed.contains(&name) {
            return Err(ConfigError::new(format!(
                "prompts.{} uses unknown placeholder {{{}}}; expected one of {:?}",
                stage, name, allowed
            ))
            .into());
        }
    }
    Ok(())
}

// Values are substituted in one pass so text inside a value is never
// mistaken for a placeholder.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let substituted = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match substituted {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_leaves_unknown_braces() {
        let out = render("{a} and {b} and {", &[("a", "x")]);
        assert_eq!(out, "x and {b} and {");
    }

    #[test]
    fn render_does_not_expand_inside_values() {
        let out = render("{story}!", &[("story", "{duration}")]);
        assert_eq!(out, "{duration}!");
    }
}
