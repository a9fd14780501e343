mod common;

use chiptrack_core::dialogs::{EntityProperties, ProjectProperties};
use chiptrack_core::explorer::{ExplorerEvent, PointerEvent};
use chiptrack_types::{Color, ExpansionType, Project, TempoMode};

use common::{Harness, ROW};

#[test]
fn adding_an_expansion_reinitializes_audio() {
    let mut h = Harness::new(Project::new());
    let mut props = ProjectProperties::from_project(&h.project);
    props.name = "Overworld".into();
    props.expansions.insert(ExpansionType::Vrc6);
    h.dialogs.project_edit = Some(props);

    h.double_click(40, 5);

    assert_eq!(h.project.name, "Overworld");
    assert!(h.project.expansions.contains(&ExpansionType::Vrc6));
    let audio = h.transactions.inner.take_audio_request();
    assert!(audio.reinitialize_audio);
    assert!(h.events().contains(&ExplorerEvent::ProjectModified));
    assert_eq!(h.explorer.rows()[0].text, "Overworld");
}

#[test]
fn removing_an_expansion_needs_confirmation() {
    let mut project = Project::new();
    project.set_expansions([ExpansionType::Fds].into_iter().collect(), 1);
    let fds = project.create_instrument(ExpansionType::Fds);
    let mut h = Harness::new(project);

    let mut props = ProjectProperties::from_project(&h.project);
    props.expansions.clear();
    h.dialogs.project_edit = Some(props.clone());
    h.dialogs.answer = false;
    h.double_click(40, 5);
    assert!(h.project.instrument(fds).is_some());
    assert_eq!(h.transactions.begins, 0);
    assert_eq!(h.dialogs.confirms, vec!["Change expansion audio"]);

    h.dialogs.project_edit = Some(props);
    h.dialogs.answer = true;
    h.double_click(40, 5);
    assert!(h.project.instrument(fds).is_none());
    assert!(h.project.expansions.is_empty());
    assert_eq!(h.explorer.selected_instrument(), None);

    h.transactions.inner.undo(&mut h.project);
    assert!(h.project.instrument(fds).is_some());
}

#[test]
fn pal_needs_plain_famistudio_project() {
    let mut project = Project::new();
    project.set_expansions([ExpansionType::Vrc7].into_iter().collect(), 1);
    let mut h = Harness::new(project);

    let mut props = ProjectProperties::from_project(&h.project);
    props.pal_mode = true;
    h.dialogs.project_edit = Some(props);
    h.double_click(40, 5);
    assert!(!h.project.pal_mode);

    let mut props = ProjectProperties::from_project(&h.project);
    props.expansions.clear();
    h.dialogs.project_edit = Some(props);
    h.double_click(40, 5);

    let mut props = ProjectProperties::from_project(&h.project);
    props.pal_mode = true;
    h.dialogs.project_edit = Some(props);
    h.double_click(40, 5);
    assert_eq!(h.project.tempo_mode, TempoMode::FamiStudio);
    assert!(h.project.pal_mode);
}

#[test]
fn tempo_change_stops_audio_only() {
    let mut h = Harness::new(Project::new());
    let mut props = ProjectProperties::from_project(&h.project);
    props.tempo_mode = TempoMode::FamiTracker;
    h.dialogs.project_edit = Some(props);
    h.double_click(40, 5);

    assert_eq!(h.project.tempo_mode, TempoMode::FamiTracker);
    let audio = h.transactions.inner.take_audio_request();
    assert!(audio.stop_audio);
    assert!(!audio.reinitialize_audio);
}

#[test]
fn cancelled_dialog_changes_nothing() {
    let mut h = Harness::new(Project::new());
    h.double_click(40, 5);
    h.double_click(40, 2 * ROW + 5);
    assert_eq!(h.transactions.begins, 0);
    assert!(h.events().is_empty());
}

#[test]
fn instrument_rename_and_color() {
    let mut project = Project::new();
    let a = project.create_instrument(ExpansionType::None);
    let b = project.create_instrument(ExpansionType::None);
    let mut h = Harness::new(project);
    let taken = h.project.instrument(b).unwrap().name.clone();

    h.dialogs.entity_edit = Some(EntityProperties {
        name: taken,
        color: Color::rgb(1, 2, 3),
    });
    h.double_click(50, 5 * ROW + 5);
    assert_eq!(h.dialogs.beeps, 1);
    assert_ne!(h.project.instrument(a).unwrap().color, Color::rgb(1, 2, 3));

    h.dialogs.entity_edit = Some(EntityProperties {
        name: "Lead".into(),
        color: Color::rgb(1, 2, 3),
    });
    h.double_click(50, 5 * ROW + 5);
    assert_eq!(h.project.instrument(a).unwrap().name, "Lead");
    assert_eq!(h.project.instrument(a).unwrap().color, Color::rgb(1, 2, 3));
    assert!(h.events().contains(&ExplorerEvent::InstrumentColorChanged(a)));
    assert_eq!(h.explorer.rows()[5].text, "Lead");
}

#[test]
fn double_click_aborts_an_open_slider_edit() {
    let mut project = Project::new();
    let id = project.add_sample("kick", chiptrack_types::SampleSource::Dmc(vec![0; 16]), None);
    let mut h = Harness::new(project);
    h.click(5, 6 * ROW + 5);

    let y = 10 * ROW + 8;
    h.down(PointerEvent::left(188, y));
    h.move_to(PointerEvent::left(140, y));
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 0);

    h.double_click(188, y);
    assert!(!h.explorer.is_capturing());
    assert_eq!(h.transactions.aborts, 1);
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 64);
    assert!(!h.transactions.inner.can_undo());
}

fn many_songs(count: usize) -> Project {
    let mut project = Project::new();
    for _ in 1..count {
        project.create_song();
    }
    project
}

#[test]
fn wheel_scrolls_three_rows_and_clamps() {
    let mut h = Harness::with_size(many_songs(40), 240, 200);
    let max = h.explorer.geometry().content_height - 200;

    h.explorer.wheel(-1);
    assert_eq!(h.explorer.scroll_offset(), 3 * ROW);
    h.explorer.wheel(1);
    h.explorer.wheel(1);
    assert_eq!(h.explorer.scroll_offset(), 0);

    for _ in 0..100 {
        h.explorer.wheel(-1);
    }
    assert_eq!(h.explorer.scroll_offset(), max);
}

#[test]
fn hit_rows_follow_scroll() {
    let mut h = Harness::with_size(many_songs(40), 240, 200);
    h.explorer.scroll_to(5 * ROW);
    let fifth = h.project.songs[4].id;
    // Row 6 is "Song 5" and sits at widget y = ROW after scrolling.
    h.click(50, ROW + 5);
    assert_eq!(h.explorer.selected_song(), Some(fifth));
}

#[test]
fn middle_button_pans() {
    let mut h = Harness::with_size(many_songs(40), 240, 200);
    h.down(PointerEvent::middle(50, 150));
    h.move_to(PointerEvent::middle(50, 100));
    assert_eq!(h.explorer.scroll_offset(), 50);
    h.move_to(PointerEvent::middle(50, 400));
    assert_eq!(h.explorer.scroll_offset(), 0);
}

#[test]
fn scroll_bar_thumb_drag() {
    let mut h = Harness::with_size(many_songs(40), 240, 200);
    let g = h.explorer.geometry().clone();
    assert!(g.has_scroll_bar());
    let bar_x = g.usable_width + 2;

    h.down(PointerEvent::left(bar_x, 2));
    assert!(h.explorer.is_capturing());
    h.move_to(PointerEvent::left(bar_x, 52));
    let moved = h.explorer.scroll_offset();
    assert!(moved > 0);
    h.up(PointerEvent::left(bar_x, 52));
    assert!(!h.explorer.is_capturing());

    // Paging below the thumb.
    h.down(PointerEvent::left(bar_x, 199));
    h.up(PointerEvent::left(bar_x, 199));
    assert!(h.explorer.scroll_offset() > moved);
    assert_eq!(h.transactions.begins, 0);
}

#[test]
fn state_survives_a_round_trip() {
    let mut project = many_songs(12);
    let inst = project.create_instrument(ExpansionType::None);
    let mut h = Harness::with_size(project, 240, 150);
    h.click(50, 5 * ROW + 5);
    h.explorer.scroll_to(4 * ROW);
    h.explorer.select_instrument(Some(inst));

    let json = h.explorer.save_state().unwrap();
    let mut other = Harness::with_size(h.project.clone(), 240, 150);
    other.explorer.load_state(&json, &other.project).unwrap();

    assert_eq!(other.explorer.state(), h.explorer.state());
    assert_eq!(other.explorer.scroll_offset(), 4 * ROW);
    assert_eq!(other.explorer.selected_song(), Some(h.project.songs[3].id));
}

#[test]
fn hover_reports_instrument_area_changes_once() {
    let mut project = Project::new();
    project.create_instrument(ExpansionType::None);
    let mut h = Harness::new(project);

    h.move_to(PointerEvent::hover(50, 4 * ROW + 5));
    h.move_to(PointerEvent::hover(60, 5 * ROW + 5));
    h.move_to(PointerEvent::hover(60, 2 * ROW + 5));
    assert_eq!(
        h.events(),
        vec![
            ExplorerEvent::InstrumentsHovered(true),
            ExplorerEvent::InstrumentsHovered(false),
        ]
    );
    h.explorer.pointer_leave();
    assert!(h.events().is_empty());
}
