mod common;

use chiptrack_core::explorer::{PointerEvent, RowKind};
use chiptrack_core::transaction::TransactionScope;
use chiptrack_types::{Project, SampleId, SampleSource};

use common::{Harness, ROW};

const SAMPLE_ROW: usize = 6;
const PADDING_ROW: usize = 9;
const DMC_INITIAL_ROW: usize = 10;
const REVERSE_BITS_ROW: usize = 12;

fn expanded_sample() -> (Harness, SampleId) {
    let mut project = Project::new();
    let id = project.add_sample("kick", SampleSource::Dmc(vec![0x55; 64]), None);
    let mut h = Harness::new(project);
    h.click(5, SAMPLE_ROW as i32 * ROW + 5);
    assert_eq!(h.explorer.expanded_sample(), Some(id));
    h.events();
    (h, id)
}

#[test]
fn expanding_a_sample_inserts_its_params() {
    let (h, _) = expanded_sample();
    let rows = h.explorer.rows();
    assert_eq!(rows[PADDING_ROW].kind, RowKind::ParamCycleList);
    assert_eq!(rows[PADDING_ROW].text, "Padding Mode");
    assert_eq!(rows[DMC_INITIAL_ROW].kind, RowKind::ParamSlider);
    assert_eq!(rows[REVERSE_BITS_ROW].kind, RowKind::ParamCheckbox);
    assert_eq!(rows[14].kind, RowKind::ArpeggioSectionHeader);
    assert_eq!(h.transactions.begins, 0);
}

#[test]
fn checkbox_toggles_in_its_own_transaction() {
    let (mut h, id) = expanded_sample();
    let y = REVERSE_BITS_ROW as i32 * ROW + 5;
    let before = h.project.sample(id).unwrap().processed.clone();

    h.click(225, y);
    assert!(h.project.sample(id).unwrap().params.reverse_bits);
    assert_ne!(h.project.sample(id).unwrap().processed, before);
    assert_eq!(h.transactions.scopes, vec![TransactionScope::Sample(id)]);

    h.click(225, y);
    assert!(!h.project.sample(id).unwrap().params.reverse_bits);
    assert_eq!(h.transactions.begins, 2);
    assert_eq!(h.transactions.ends, 2);

    h.transactions.inner.undo(&mut h.project);
    assert!(h.project.sample(id).unwrap().params.reverse_bits);
    h.transactions.inner.undo(&mut h.project);
    assert!(!h.project.sample(id).unwrap().params.reverse_bits);
    assert_eq!(h.project.sample(id).unwrap().processed, before);
}

#[test]
fn checkbox_ignores_presses_left_of_the_box() {
    let (mut h, id) = expanded_sample();
    h.click(150, REVERSE_BITS_ROW as i32 * ROW + 5);
    assert!(!h.project.sample(id).unwrap().params.reverse_bits);
    assert_eq!(h.transactions.begins, 0);
}

#[test]
fn slider_drag_is_one_transaction() {
    let (mut h, id) = expanded_sample();
    let y = DMC_INITIAL_ROW as i32 * ROW + 8;

    h.down(PointerEvent::left(188, y));
    assert!(h.explorer.is_capturing());
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 64);

    h.move_to(PointerEvent::left(140, y));
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 0);
    // Vertical travel does not matter once the slider is grabbed.
    h.move_to(PointerEvent::left(236, y + 200));
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 127);
    h.move_to(PointerEvent::left(500, y));
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 127);

    h.up(PointerEvent::left(500, y));
    assert!(!h.explorer.is_capturing());
    assert_eq!(h.transactions.begins, 1);
    assert_eq!(h.transactions.ends, 1);
    assert_eq!(h.transactions.inner.undo_depth(), 1);

    h.transactions.inner.undo(&mut h.project);
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 64);
}

#[test]
fn slider_fine_adjust_steps_by_pixels() {
    let (mut h, id) = expanded_sample();
    let y = DMC_INITIAL_ROW as i32 * ROW + 8;

    h.down(PointerEvent::left(188, y).with_shift());
    h.move_to(PointerEvent::left(196, y).with_shift());
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 66);
    h.move_to(PointerEvent::left(198, y).with_shift());
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 66);
    h.up(PointerEvent::left(198, y));
    assert_eq!(h.transactions.ends, 1);
}

#[test]
fn press_outside_slider_starts_nothing() {
    let (mut h, id) = expanded_sample();
    let y = DMC_INITIAL_ROW as i32 * ROW + 8;

    h.down(PointerEvent::left(100, y));
    assert!(!h.explorer.is_capturing());
    assert_eq!(h.transactions.begins, 0);

    // On the slider edge row padding, not strictly inside.
    h.down(PointerEvent::left(188, DMC_INITIAL_ROW as i32 * ROW + 1));
    assert!(!h.explorer.is_capturing());
    assert_eq!(h.transactions.begins, 0);
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 64);
}

#[test]
fn slider_right_click_resets_to_default() {
    let (mut h, id) = expanded_sample();
    let y = DMC_INITIAL_ROW as i32 * ROW + 8;
    h.drag((188, y), (140, y));
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 0);

    h.right_click(120, y);
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 0);
    h.right_click(160, y);
    assert_eq!(h.project.sample(id).unwrap().params.dmc_initial_value, 64);
    assert_eq!(h.transactions.begins, 2);
}

#[test]
fn list_arrows_step_and_clamp() {
    let (mut h, id) = expanded_sample();
    let y = PADDING_ROW as i32 * ROW + 8;
    let padding = |h: &Harness| h.project.sample(id).unwrap().params.padding_mode;

    h.click(145, y);
    assert_eq!(padding(&h), 1);
    h.click(230, y);
    assert_eq!(padding(&h), 2);
    h.click(230, y);
    h.click(230, y);
    assert_eq!(padding(&h), 4);
    h.click(230, y);
    assert_eq!(padding(&h), 4);

    // Between the arrows nothing happens.
    h.click(190, y);
    assert_eq!(padding(&h), 4);

    h.right_click(150, y);
    assert_eq!(padding(&h), 2);
    assert_eq!(h.transactions.begins, 6);
    // The clamped press changed nothing and left no undo entry.
    assert_eq!(h.transactions.inner.undo_depth(), 5);
}

#[test]
fn collapsing_removes_param_rows() {
    let (mut h, _) = expanded_sample();
    let expanded = h.explorer.rows().len();
    h.click(5, SAMPLE_ROW as i32 * ROW + 5);
    assert_eq!(h.explorer.expanded_sample(), None);
    assert_eq!(h.explorer.rows().len(), expanded - 7);
}
