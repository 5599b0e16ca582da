//! Scene-planning output parsing.

use storyvox_core::ScenePlan;
use tracing::{debug, instrument, trace};

const SCENE_PREFIX: &str = "scene ";
const DURATION_MARKER: &str = "duration";
const PROMPT_LABEL: &str = "image prompt:";

/// Where the parser is between lines.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// No scene open; non-header lines are noise
    AwaitingHeader,
    /// A header opened a scene that has no prompt yet
    Open {
        start: f64,
        end: f64,
        /// An empty `Image prompt:` line was seen; the next line is the prompt
        prompt_follows: bool,
    },
    /// The last emitted scene accepts wrapped prompt lines until a blank
    /// line or a header of any kind
    Collecting,
}

/// What a single line looks like.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    Header(Option<(f64, f64)>),
    Prompt(&'a str),
    Text(&'a str),
}

/// Parser for `Scene N (Duration A-B seconds):` / `Image prompt:` blocks.
///
/// Scenes are numbered densely in emission order: the model's own labels are
/// ignored and skipped headers leave no gaps. Lines directly under an
/// `Image prompt:` line continue that prompt; a blank line ends it. Ranges are surfaced as written,
/// including inverted or out-of-order ones.
///
/// # Examples
///
/// ```
/// use storyvox_parsing::ScenePlanParser;
///
/// let raw = "Scene 1 (Duration 0-10 seconds):\n\
///            Image prompt: a quiet forest at dawn\n\
///            Scene 2 (Duration 10-25 seconds):\n\
///            Image prompt: a roaring waterfall";
///
/// let scenes = ScenePlanParser::new().parse(raw, 25.0);
/// assert_eq!(scenes.len(), 2);
/// assert_eq!(scenes[1].index, 2);
/// assert_eq!((scenes[1].start, scenes[1].end), (10.0, 25.0));
/// assert_eq!(scenes[1].prompt, "a roaring waterfall");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenePlanParser;

impl ScenePlanParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse raw scene-planning output.
    ///
    /// `total_duration_seconds` is the narration length the plan was anchored
    /// to. It is recorded for diagnostics only; ranges are not clamped to it.
    #[instrument(
        skip_all,
        fields(raw_len = raw.len(), total_duration_seconds = total_duration_seconds)
    )]
    pub fn parse(&self, raw: &str, total_duration_seconds: f64) -> Vec<ScenePlan> {
        let mut scenes: Vec<ScenePlan> = Vec::new();
        let mut state = State::AwaitingHeader;

        for (index, raw_line) in raw.lines().enumerate() {
            let line_no = index + 1;

            state = match (classify(raw_line), state) {
                (Line::Blank, State::Collecting) => State::AwaitingHeader,
                (Line::Blank, state) => state,
                (Line::Header(Some((start, end))), state) => {
                    if matches!(state, State::Open { .. }) {
                        debug!(line = line_no, "Abandoning scene without image prompt");
                    }
                    State::Open {
                        start,
                        end,
                        prompt_follows: false,
                    }
                }
                (Line::Header(None), state) => {
                    debug!(line = line_no, "Skipping scene header with unparsable duration");
                    match state {
                        State::Collecting => State::AwaitingHeader,
                        state => state,
                    }
                }
                (Line::Prompt(""), State::Open { start, end, .. }) => State::Open {
                    start,
                    end,
                    prompt_follows: true,
                },
                (Line::Prompt(prompt), State::Open { start, end, .. })
                | (
                    Line::Text(prompt),
                    State::Open {
                        start,
                        end,
                        prompt_follows: true,
                    },
                ) => {
                    let index = scenes.len() as u32 + 1;
                    scenes.push(ScenePlan::new(index, start, end, prompt));
                    State::Collecting
                }
                (Line::Text(text), State::Collecting) => {
                    if let Some(scene) = scenes.last_mut() {
                        scene.prompt.push(' ');
                        scene.prompt.push_str(text);
                    }
                    State::Collecting
                }
                (Line::Prompt(_), State::Collecting) => {
                    trace!(line = line_no, "Dropping image prompt outside a scene");
                    State::AwaitingHeader
                }
                (_, state) => {
                    trace!(line = line_no, "Dropping line outside a scene");
                    state
                }
            };
        }

        if matches!(state, State::Open { .. }) {
            debug!("Output ended inside a scene without image prompt");
        }
        debug!(scenes = scenes.len(), "Parsed scene plan");
        scenes
    }
}

/// Classify one line of scene-planning output.
fn classify(raw_line: &str) -> Line<'_> {
    let line = strip_decoration(raw_line);
    if line.is_empty() {
        return Line::Blank;
    }

    let lower = line.to_ascii_lowercase();
    if lower.starts_with(SCENE_PREFIX) && lower.contains(DURATION_MARKER) {
        return Line::Header(parse_range(line, &lower));
    }

    if lower.starts_with(PROMPT_LABEL) {
        let prompt = strip_decoration(&line[PROMPT_LABEL.len()..]);
        return Line::Prompt(prompt);
    }

    Line::Text(line)
}

/// Trim whitespace and markdown emphasis/heading markers.
fn strip_decoration(line: &str) -> &str {
    line.trim_matches(|c: char| c == '*' || c == '#' || c == '_' || c.is_whitespace())
}

/// Extract `A-B` from the text following `Duration` in a header.
fn parse_range(line: &str, lower: &str) -> Option<(f64, f64)> {
    let after = lower.find(DURATION_MARKER)? + DURATION_MARKER.len();
    let tail = &line[after..];
    let tail_lower = &lower[after..];

    let stop = [tail_lower.find(')'), tail_lower.find("sec")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(tail.len());
    let range = tail[..stop].trim().trim_start_matches(':').trim();

    let (start, end) = range.split_once(['-', '–'])?;
    let start = start.trim().parse::<f64>().ok()?;
    let end = end
        .trim()
        .trim_end_matches(|c: char| c.is_alphabetic())
        .trim()
        .parse::<f64>()
        .ok()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_ranges() {
        let line = "Scene 3 (Duration 12.5-20 seconds):";
        assert_eq!(
            parse_range(line, &line.to_ascii_lowercase()),
            Some((12.5, 20.0))
        );
    }

    #[test]
    fn tolerates_spacing_and_units() {
        let line = "Scene 2 (Duration: 10 – 25s):";
        assert_eq!(
            parse_range(line, &line.to_ascii_lowercase()),
            Some((10.0, 25.0))
        );
    }

    #[test]
    fn rejects_unparsable_ranges() {
        for line in [
            "Scene 2 (Duration abc seconds):",
            "Scene 2 (Duration X+1-Y seconds):",
            "Scene 2 (Duration 10 seconds):",
        ] {
            assert_eq!(parse_range(line, &line.to_ascii_lowercase()), None, "{line}");
        }
    }

    #[test]
    fn classifies_decorated_lines() {
        assert_eq!(
            classify("**Image prompt:** a lighthouse"),
            Line::Prompt("a lighthouse")
        );
        assert_eq!(
            classify("## Scene 1 (Duration 0-5 seconds):"),
            Line::Header(Some((0.0, 5.0)))
        );
        assert_eq!(classify("   "), Line::Blank);
    }
}
