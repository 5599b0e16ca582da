use storyvox_core::ScenePlan;
use storyvox_parsing::ScenePlanParser;

#[test]
fn parses_scene_blocks() {
    let raw = "Scene 1 (Duration 0-10 seconds):\n\
               Image prompt: a quiet forest at dawn\n\
               Scene 2 (Duration 10-25 seconds):\n\
               Image prompt: a roaring waterfall";

    let scenes = ScenePlanParser::new().parse(raw, 25.0);

    assert_eq!(
        scenes,
        vec![
            ScenePlan::new(1, 0.0, 10.0, "a quiet forest at dawn"),
            ScenePlan::new(2, 10.0, 25.0, "a roaring waterfall"),
        ]
    );
}

#[test]
fn skips_malformed_headers() {
    let raw = "Scene 1 (Duration 0-10 seconds):\n\
               Image prompt: a quiet forest at dawn\n\
               Scene 2 (Duration ten to twenty seconds):\n\
               Image prompt: lost with its header\n\
               Scene 3 (Duration 20-30 seconds):\n\
               Image prompt: a roaring waterfall";

    let scenes = ScenePlanParser::new().parse(raw, 30.0);

    assert_eq!(
        scenes,
        vec![
            ScenePlan::new(1, 0.0, 10.0, "a quiet forest at dawn"),
            ScenePlan::new(2, 20.0, 30.0, "a roaring waterfall"),
        ]
    );
}

#[test]
fn malformed_header_keeps_open_scene() {
    let raw = "Scene 1 (Duration 0-10 seconds):\n\
               Scene 1b (Duration ? seconds):\n\
               Image prompt: still scene one";

    let scenes = ScenePlanParser::new().parse(raw, 10.0);
    assert_eq!(scenes, vec![ScenePlan::new(1, 0.0, 10.0, "still scene one")]);
}

#[test]
fn ignores_model_numbering_and_keeps_emission_order() {
    let raw = "Scene 7 (Duration 30-40 seconds):\n\
               Image prompt: the ending\n\
               Scene 2 (Duration 0-30 seconds):\n\
               Image prompt: the beginning";

    let scenes = ScenePlanParser::new().parse(raw, 40.0);

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].index, 1);
    assert_eq!(scenes[0].start, 30.0);
    assert_eq!(scenes[1].index, 2);
    assert_eq!(scenes[1].start, 0.0);
}

#[test]
fn appends_wrapped_prompt_lines() {
    let raw = "Scene 1 (Duration 0-12 seconds):\n\
               Image prompt: a lighthouse on a cliff,\n\
               waves crashing below,\n\
               storm clouds overhead\n\
               Scene 2 (Duration 12-20 seconds):\n\
               Image prompt: calm sea";

    let scenes = ScenePlanParser::new().parse(raw, 20.0);

    assert_eq!(
        scenes[0].prompt,
        "a lighthouse on a cliff, waves crashing below, storm clouds overhead"
    );
    assert_eq!(scenes[1].prompt, "calm sea");
}

#[test]
fn blank_line_ends_a_wrapped_prompt() {
    let raw = "Scene 1 (Duration 0-12 seconds):\n\
               Image prompt: a lighthouse on a cliff,\n\
               waves crashing below\n\
               \n\
               These scenes follow the rhythm of the narration.";

    let scenes = ScenePlanParser::new().parse(raw, 12.0);
    assert_eq!(
        scenes,
        vec![ScenePlan::new(
            1,
            0.0,
            12.0,
            "a lighthouse on a cliff, waves crashing below"
        )]
    );
}

#[test]
fn closing_remarks_stay_out_of_the_last_prompt() {
    let raw = "Scene 1 (Duration 0-10 seconds):\n\
               Image prompt: a quiet forest at dawn\n\
               \n\
               Let me know if you would like any changes!";

    let scenes = ScenePlanParser::new().parse(raw, 10.0);
    assert_eq!(
        scenes,
        vec![ScenePlan::new(1, 0.0, 10.0, "a quiet forest at dawn")]
    );
}

#[test]
fn malformed_header_after_a_finished_scene_ends_its_prompt() {
    let raw = "Scene 1 (Duration 0-10 seconds):\n\
               Image prompt: a quiet forest at dawn\n\
               Scene 2 (Duration later seconds):\n\
               a deer drinking from the stream\n\
               Scene 3 (Duration 20-30 seconds):\n\
               Image prompt: a roaring waterfall";

    let scenes = ScenePlanParser::new().parse(raw, 30.0);
    assert_eq!(
        scenes,
        vec![
            ScenePlan::new(1, 0.0, 10.0, "a quiet forest at dawn"),
            ScenePlan::new(2, 20.0, 30.0, "a roaring waterfall"),
        ]
    );
}

#[test]
fn prompt_on_following_line() {
    let raw = "Scene 1 (Duration 0-8 seconds):\n\
               Image prompt:\n\
               a fox in the snow";

    let scenes = ScenePlanParser::new().parse(raw, 8.0);
    assert_eq!(scenes, vec![ScenePlan::new(1, 0.0, 8.0, "a fox in the snow")]);
}

#[test]
fn drops_noise_outside_scenes() {
    let raw = "Here are your scenes!\n\
               Image prompt: orphan prompt\n\
               **Scene 1 (Duration 0-5 seconds):**\n\
               Some commentary before the prompt\n\
               **Image prompt:** a red balloon";

    let scenes = ScenePlanParser::new().parse(raw, 5.0);
    assert_eq!(scenes, vec![ScenePlan::new(1, 0.0, 5.0, "a red balloon")]);
}

#[test]
fn surfaces_degenerate_ranges() {
    let raw = "Scene 1 (Duration 15-5 seconds):\nImage prompt: backwards";
    let scenes = ScenePlanParser::new().parse(raw, 5.0);
    assert_eq!(scenes, vec![ScenePlan::new(1, 15.0, 5.0, "backwards")]);
}

#[test]
fn abandons_scene_without_prompt() {
    let raw = "Scene 1 (Duration 0-5 seconds):\n\
               Scene 2 (Duration 5-9 seconds):\n\
               Image prompt: only the second";

    let scenes = ScenePlanParser::new().parse(raw, 9.0);
    assert_eq!(scenes, vec![ScenePlan::new(1, 5.0, 9.0, "only the second")]);
}

#[test]
fn empty_output_yields_no_scenes() {
    assert!(ScenePlanParser::new().parse("", 0.0).is_empty());
    assert!(
        ScenePlanParser::new()
            .parse("I cannot help with that.", 12.0)
            .is_empty()
    );
}
