mod helpers;

use helpers::World;
use things::handler::pipeline;
use things::storage::{self, Row, RowQuery};

fn stored(world: &World, namespace: &str, kind: &str) -> Vec<Row> {
    storage::query(&world.conn, namespace, &RowQuery::new().kind(kind)).unwrap()
}

#[test]
fn note_without_save_only_queries() {
    let world = World::new();
    let html = world.tell("ns", "note hello world");

    assert!(stored(&world, "ns", "note").is_empty());
    assert!(!html.contains("saved!"));
}

#[test]
fn note_with_save_is_stored_and_rendered() {
    let world = World::new();
    let html = world.tell("ns", "note hello **world** !save");

    let notes = stored(&world, "ns", "note");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].summary, "hello **world**");
    assert!(html.contains("saved!"));
    assert!(html.contains("<section class=\"thing note\">"));
    assert!(html.contains("<strong>world</strong>"));
}

#[test]
fn note_query_narrows_by_text() {
    let world = World::new();
    world.tell("ns", "note buy milk !save");
    world.tell("ns", "note call bob !save");

    let html = world.tell("ns", "note milk");
    assert!(html.contains("buy milk"));
    assert!(!html.contains("call bob"));

    let all = world.tell("ns", "note");
    assert!(all.contains("buy milk"));
    assert!(all.contains("call bob"));
}

#[test]
fn saved_rows_stay_in_their_namespace() {
    let world = World::new();
    world.tell("alice", "note secret plan !save");

    let html = world.tell("bob", "note");
    assert!(!html.contains("secret plan"));
}

#[test]
fn task_renders_toggle_once_stored() {
    let world = World::new();
    let preview = world.tell("ns", "task buy milk");
    assert!(!preview.contains("hx-post"));

    let html = world.tell("ns", "task buy milk !save");
    let task = &stored(&world, "ns", "task")[0];
    assert_eq!(task.bool, Some(false));
    assert!(html.contains(&format!("hx-post=\"/ns/task/{}\"", task.id)));
    assert!(html.contains("name=\"bool\" value=\"false\""));
}

#[test]
fn toggle_marks_task_done() {
    let world = World::new();
    world.tell("ns", "task water plants !save");
    let id = stored(&world, "ns", "task")[0].id;

    let rendered = pipeline::toggle(&world.ctx("ns"), "task", id, true)
        .unwrap()
        .unwrap()
        .to_html();
    assert!(rendered.contains("class=\"done\""));
    assert!(rendered.contains(" checked"));
    assert_eq!(stored(&world, "ns", "task")[0].bool, Some(true));

    assert!(pipeline::toggle(&world.ctx("other"), "task", id, false)
        .unwrap()
        .is_none());
}

#[test]
fn track_query_filters_by_category() {
    let world = World::new();
    world.tell("ns", "track sleep 7.5 !save");
    world.tell("ns", "track weight 70 !save");

    let html = world.tell("ns", "track sleep");
    assert!(html.contains("7.50hrs"));
    assert!(!html.contains("70.00kg"));

    let all = world.tell("ns", "track");
    assert!(all.contains("7.50hrs"));
    assert!(all.contains("70.00kg"));
}

#[test]
fn track_with_bad_number_shows_error_and_is_not_saved() {
    let world = World::new();
    let html = world.tell("ns", "track sleep lots !save");

    assert!(html.contains("class=\"error\""));
    assert!(html.contains("not a number"));
    assert!(stored(&world, "ns", "track").is_empty());
}

#[test]
fn mood_sets_opacity() {
    let world = World::new();
    let html = world.tell("ns", "track mood 80 !save");
    assert!(html.contains("opacity: calc(80/100)"));
}

#[test]
fn setting_token_is_masked() {
    let world = World::new();
    world.tell("ns", "setting namespace.token hunter2 !save");
    world.tell("ns", "setting theme dark !save");

    let html = world.tell("ns", "setting");
    assert!(html.contains("namespace.token: ********"));
    assert!(!html.contains("hunter2"));
    assert!(html.contains("theme: dark"));
}

#[test]
fn setting_usage_error() {
    let world = World::new();
    let html = world.tell("ns", "setting theme");
    assert!(html.contains("usage: setting &lt;key&gt; &lt;value...&gt;"));
}

#[test]
fn math_answers_without_storing() {
    let world = World::new();
    let html = world.tell("ns", "3 * (4 + 1)");
    assert!(html.contains("3 * (4 + 1) = 15"));

    let refused = world.tell("ns", "1 + 1 !save");
    assert!(refused.contains("math can&#39;t be saved"));
    assert!(storage::query(&world.conn, "ns", &RowQuery::new()).unwrap().is_empty());
}

#[test]
fn help_lists_handlers() {
    let world = World::new();
    let html = world.tell("ns", "help");
    assert!(html.contains("try one of these"));
    assert!(html.contains("note &lt;text&gt;"));
    assert!(html.contains("track &lt;category&gt;"));
}

#[test]
fn unknown_input_apologizes_and_shows_recent_rows() {
    let world = World::new();
    world.tell("ns", "note remember this !save");

    let html = world.tell("ns", "what is this");
    assert!(html.contains("don't know that thing, sorry."));
    assert!(html.contains("remember this"));
}

#[test]
fn empty_input_shows_overview_only() {
    let world = World::new();
    world.tell("ns", "task first !save");
    world.tell("ns", "note second !save");

    let html = world.tell("ns", "");
    assert!(!html.contains("sorry"));
    assert!(html.contains("thing task"));
    assert!(html.contains("thing note"));
}

#[test]
fn search_is_a_stub_listing_everything() {
    let world = World::new();
    world.tell("ns", "note alpha !save");
    world.tell("ns", "task beta !save");

    let html = world.tell("ns", "search alpha");
    assert!(html.contains("searching..."));
    assert!(html.contains("alpha"));
    assert!(html.contains("beta"));
}

#[test]
fn date_lists_rows_of_that_day() {
    let world = World::new();
    let mut old = Row::new("note", "from the past");
    old.date_created = chrono::DateTime::parse_from_rfc3339("2023-05-04T10:00:00Z")
        .unwrap()
        .into();
    world.insert("ns", old);
    world.tell("ns", "note from today !save");

    let html = world.tell("ns", "2023-05");
    assert!(html.contains("<h2 class=\"date\">2023-05</h2>"));
    assert!(html.contains("from the past"));
    assert!(!html.contains("from today"));
}

#[test]
fn unknown_kinds_render_with_generic_form() {
    let world = World::new();
    world.insert("ns", Row::new("bookmark", "https://example.com"));

    let html = world.tell("ns", "");
    assert!(html.contains("<section class=\"thing bookmark\">"));
    assert!(html.contains("<form method=\"POST\""));
}

#[test]
fn reminders_live_in_memory() {
    let world = World::new();
    let html = world.tell("ns", "remind 2h water plants !save");
    assert!(html.contains("saved!"));
    assert!(html.contains("water plants"));

    // Not written to the database.
    assert!(stored(&world, "ns", "remind").is_empty());

    let list = world.tell("ns", "remind");
    assert!(!list.contains("usage: remind"));
    assert!(list.contains("water plants"));
    assert!(list.contains("in 1h"));

    assert!(!world.tell("other", "remind").contains("water plants"));
}

#[test]
fn javascript_renders_editor_without_frame() {
    let world = World::new();
    let html = world.tell("ns", "js !save");
    assert!(html.contains("<section class=\"thing js\">"));
    assert!(html.contains("your code here"));
    assert!(!html.contains("date-created"));
}

#[test]
fn tags_link_to_tag_pages() {
    let world = World::new();
    let html = world.tell("ns", "note groceries #shopping !save");
    assert!(html.contains("<a href=\"/tag/shopping\">#shopping</a>"));
}

#[test]
fn bare_remind_save_shows_usage_instead_of_failing() {
    let world = World::new();
    let html = world.tell("ns", "remind !save");
    assert!(html.contains("usage: remind"));
    assert!(!html.contains("saved!"));
    assert!(world.reminders.list("ns").unwrap().is_empty());
}

#[test]
fn huge_reminder_duration_is_a_parse_error() {
    let world = World::new();
    for input in ["remind 9999999999h tea", "remind 9999999999h tea !save"] {
        let html = world.tell("ns", input);
        assert!(html.contains("not a duration"), "{input}");
    }
    assert!(world.reminders.list("ns").unwrap().is_empty());
}

#[test]
fn deeply_nested_math_is_a_parse_error() {
    let world = World::new();
    let input = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
    let html = world.tell("ns", &input);
    assert!(html.contains("nested too deeply"));
}

#[test]
fn script_links_in_notes_are_neutralized() {
    let world = World::new();
    let html = world.tell("ns", "note [click](javascript:alert(1)) javascript://%0aalert(1) !save");
    assert!(html.contains("saved!"));
    assert!(!html.contains("href=\"javascript:"));
    assert!(!html.contains("class=\"about\""));
}
