//! The single pointer capture slot: start, threshold, update, commit, abort.

use chiptrack_types::{ArpeggioId, EnvelopeType, InstrumentId, Project, SampleId, SongId};

use super::controls;
use super::events::{ExplorerEvent, Point, PointerEvent};
use super::rows::RowKind;
use super::{ExplorerEnv, ProjectExplorer};
use crate::transaction::{TransactionFlags, TransactionScope, Transactions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOperation {
    DragSong,
    DragInstrument,
    DragArpeggio,
    DragSample,
    MoveSlider,
    ScrollBar,
}

impl CaptureOperation {
    /// Operations that wait for the pointer to travel before acting.
    pub fn needs_threshold(self) -> bool {
        matches!(
            self,
            CaptureOperation::DragInstrument
                | CaptureOperation::DragArpeggio
                | CaptureOperation::DragSample
        )
    }

    pub fn is_drag(self) -> bool {
        matches!(
            self,
            CaptureOperation::DragSong
                | CaptureOperation::DragInstrument
                | CaptureOperation::DragArpeggio
                | CaptureOperation::DragSample
        )
    }
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPayload {
    None,
    Song(SongId),
    /// `envelope` is set when a single envelope icon was grabbed.
    Instrument {
        id: InstrumentId,
        envelope: Option<EnvelopeType>,
    },
    /// `id: None` is the "None" row; `envelope` when the icon was grabbed.
    Arpeggio {
        id: Option<ArpeggioId>,
        envelope: bool,
    },
    Sample(SampleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub op: CaptureOperation,
    pub anchor: Point,
    pub threshold_met: bool,
    pub row: Option<usize>,
    /// Pointer offset inside the grabbed row or sub-button.
    pub rel: Point,
    pub payload: DragPayload,
    pub scroll_anchor: i32,
    /// Fine-adjust anchor for slider drags.
    pub last_x: i32,
}

impl Capture {
    pub fn new(
        op: CaptureOperation,
        anchor: Point,
        row: Option<usize>,
        rel: Point,
        payload: DragPayload,
        scroll_anchor: i32,
    ) -> Self {
        Self {
            op,
            anchor,
            threshold_met: !op.needs_threshold(),
            row,
            rel,
            payload,
            scroll_anchor,
            last_x: anchor.x,
        }
    }

    /// Strictly more than `threshold` pixels on either axis.
    pub fn crossed_threshold(&self, p: Point, threshold: i32) -> bool {
        (p.x - self.anchor.x).abs() > threshold || (p.y - self.anchor.y).abs() > threshold
    }
}

impl ProjectExplorer {
    /// Refused while another capture is active.
    pub(super) fn start_capture(&mut self, capture: Capture) -> bool {
        if let Some(active) = &self.capture {
            debug_assert!(false, "capture {:?} started while {:?} is active", capture.op, active.op);
            log::warn!(target: "explorer", "refusing capture {:?}, {:?} is active", capture.op, active.op);
            return false;
        }
        log::debug!(target: "explorer", "capture {:?} at {:?}", capture.op, capture.anchor);
        self.capture = Some(capture);
        true
    }

    pub(super) fn capture_pointer_move(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        if !capture.threshold_met {
            if !capture.crossed_threshold(ev.pos(), self.settings.drag_threshold) {
                return;
            }
            capture.threshold_met = true;
            log::debug!(target: "explorer", "{:?} crossed threshold", capture.op);
        }
        self.update_capture(env, ev);
    }

    fn update_capture(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent) {
        let Some(capture) = self.capture else {
            return;
        };
        match capture.op {
            CaptureOperation::MoveSlider => {
                let Some(row) = capture.row else {
                    return;
                };
                let mut last_x = capture.last_x;
                if !self.update_slider_value(env.project, row, ev, false, &mut last_x) {
                    log::warn!(target: "explorer", "slider row {} out of sync, aborting", row);
                    self.abort_capture(env.transactions, env.project);
                    return;
                }
                if let Some(c) = self.capture.as_mut() {
                    c.last_x = last_x;
                }
            }
            CaptureOperation::ScrollBar => {
                self.scroll.drag_from(capture.scroll_anchor, ev.y - capture.anchor.y);
            }
            CaptureOperation::DragSample => {
                if let DragPayload::Sample(id) = capture.payload {
                    if !self.geometry.inside(ev.x, ev.y) {
                        let pos = self.to_screen(ev.pos());
                        self.emit(ExplorerEvent::SampleDraggedOutside { id, pos });
                    }
                }
            }
            // Drawn by the render pass from the pointer position.
            CaptureOperation::DragSong
            | CaptureOperation::DragInstrument
            | CaptureOperation::DragArpeggio => {}
        }
    }

    /// Set a slider from the pointer. Returns false when the row is not a
    /// slider or, with `must_be_inside`, the pointer is outside the box.
    pub(super) fn update_slider_value(
        &self,
        project: &mut Project,
        row: usize,
        ev: &PointerEvent,
        must_be_inside: bool,
        last_x: &mut i32,
    ) -> bool {
        let Some(param) = self
            .rows
            .get(row)
            .filter(|r| r.kind == RowKind::ParamSlider)
            .and_then(|r| r.param.clone())
        else {
            return false;
        };
        let rel_y = ev.y - self.row_top(row);
        if must_be_inside && !controls::inside_slider(&self.geometry, ev.x, rel_y) {
            return false;
        }
        let Some(current) = param.value(project) else {
            return false;
        };

        let value = if ev.modifiers.shift {
            match controls::fine_adjust(
                &param.info,
                current,
                ev.x,
                *last_x,
                self.settings.fine_adjust_divisor,
            ) {
                Some(v) => {
                    *last_x = ev.x;
                    v
                }
                None => current,
            }
        } else {
            *last_x = ev.x;
            controls::slider_value(
                &param.info,
                ev.x,
                self.geometry.slider_left(),
                self.geometry.slider_size_x,
            )
        };

        if value != current {
            param.set_value(project, value);
        }
        true
    }

    pub(super) fn capture_pointer_up(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent) {
        let Some(capture) = self.capture.take() else {
            return;
        };
        if capture.threshold_met {
            log::debug!(target: "explorer", "commit {:?}", capture.op);
            self.commit_capture(env, &capture, ev);
        } else {
            log::debug!(target: "explorer", "discard {:?} below threshold", capture.op);
        }
    }

    fn commit_capture(&mut self, env: &mut ExplorerEnv, capture: &Capture, ev: &PointerEvent) {
        match (capture.op, capture.payload) {
            (CaptureOperation::DragSong, DragPayload::Song(id)) => self.drop_song(env, id, ev),
            (CaptureOperation::DragInstrument, DragPayload::Instrument { id, envelope }) => {
                self.drop_instrument(env, id, envelope, ev)
            }
            (CaptureOperation::DragArpeggio, DragPayload::Arpeggio { id, envelope }) => {
                self.drop_arpeggio(env, id, envelope, ev)
            }
            (CaptureOperation::DragSample, DragPayload::Sample(id)) => self.drop_sample(env, id, ev),
            (CaptureOperation::MoveSlider, _) => {
                if env.transactions.in_progress() {
                    env.transactions.end(env.project);
                }
            }
            (CaptureOperation::ScrollBar, _) => {}
            (op, payload) => {
                log::warn!(target: "explorer", "{:?} carried unexpected payload {:?}", op, payload);
            }
        }
    }

    /// Insert after the row half a row above the pointer; the song header
    /// means first.
    fn drop_song(&mut self, env: &mut ExplorerEnv, id: SongId, ev: &PointerEvent) {
        let Some(previous) = self.song_drop_target(env.project, ev.x, ev.y) else {
            return;
        };
        let current_previous = env
            .project
            .songs
            .iter()
            .position(|s| s.id == id)
            .and_then(|i| i.checked_sub(1))
            .map(|i| env.project.songs[i].id);
        if previous == Some(id) || previous == current_previous {
            return;
        }
        if env
            .transactions
            .begin(env.project, TransactionScope::ProjectNoSamples, TransactionFlags::NONE)
        {
            env.project.move_song(id, previous);
            env.transactions.end(env.project);
        }
        self.rebuild(env.project);
    }

    /// `Some(previous)` when the pointer designates an insertion point.
    pub(super) fn song_drop_target(&self, project: &Project, x: i32, y: i32) -> Option<Option<SongId>> {
        let hit = self.hit_test(project, x, y - self.geometry.row_height / 2)?;
        let row = self.rows.get(hit.row)?;
        match row.kind {
            RowKind::Song => Some(row.entity.song()),
            RowKind::SongSectionHeader => Some(None),
            _ => None,
        }
    }

    fn drop_instrument(
        &mut self,
        env: &mut ExplorerEnv,
        src: InstrumentId,
        envelope: Option<EnvelopeType>,
        ev: &PointerEvent,
    ) {
        if !self.geometry.inside(ev.x, ev.y) {
            let pos = self.to_screen(ev.pos());
            self.emit(ExplorerEvent::InstrumentDroppedOutside { id: src, pos });
            return;
        }

        let Some(dst) = self
            .hit_test(env.project, ev.x, ev.y)
            .and_then(|hit| self.rows.get(hit.row))
            .filter(|row| row.kind == RowKind::Instrument)
            .and_then(|row| row.entity.instrument())
        else {
            return;
        };
        if dst == src {
            return;
        }
        let (Some(src_inst), Some(dst_inst)) = (env.project.instrument(src), env.project.instrument(dst))
        else {
            return;
        };
        if src_inst.expansion != dst_inst.expansion {
            env.dialogs.warn("Incompatible audio expansion!");
            log::info!(target: "explorer", "rejected drop of {} on {}: expansion mismatch", src, dst);
            return;
        }
        let src_name = src_inst.name.clone();
        let dst_name = dst_inst.name.clone();

        match envelope {
            None => {
                let message = format!(
                    "Are you sure you want to replace all notes of instrument '{}' with '{}'?",
                    dst_name, src_name
                );
                if !env.dialogs.confirm("Replace instrument", &message) {
                    return;
                }
                if env.transactions.begin(
                    env.project,
                    TransactionScope::ProjectNoSamples,
                    TransactionFlags::NONE,
                ) {
                    env.project.replace_instrument(dst, src);
                    env.transactions.end(env.project);
                    self.emit(ExplorerEvent::InstrumentReplaced(dst));
                }
            }
            Some(kind) => {
                let message = format!(
                    "Are you sure you want to copy the {} envelope of instrument '{}' to '{}'?",
                    kind.name(),
                    src_name,
                    dst_name
                );
                if !env.dialogs.confirm("Copy Envelope", &message) {
                    return;
                }
                let Some(source) = env.project.instrument(src).cloned() else {
                    return;
                };
                if !env.transactions.begin(
                    env.project,
                    TransactionScope::Instrument(dst),
                    TransactionFlags::NONE,
                ) {
                    return;
                }
                let copied = env.project.instrument_mut(dst).is_some_and(|inst| {
                    let ok = inst.copy_envelope_from(&source, kind);
                    if let Some(copy) = inst.envelope_mut(kind) {
                        copy.clamp_to_valid_range(kind);
                    }
                    ok
                });
                if copied {
                    env.transactions.end(env.project);
                    self.emit(ExplorerEvent::InstrumentEdited {
                        id: Some(dst),
                        envelope: Some(kind),
                    });
                } else {
                    env.transactions.abort(env.project);
                }
            }
        }
    }

    fn drop_arpeggio(
        &mut self,
        env: &mut ExplorerEnv,
        src: Option<ArpeggioId>,
        envelope: bool,
        ev: &PointerEvent,
    ) {
        if !self.geometry.inside(ev.x, ev.y) {
            let pos = self.to_screen(ev.pos());
            self.emit(ExplorerEvent::ArpeggioDroppedOutside { id: src, pos });
            return;
        }
        let Some(src) = src else {
            return;
        };

        let Some(dst) = self
            .hit_test(env.project, ev.x, ev.y)
            .and_then(|hit| self.rows.get(hit.row))
            .filter(|row| row.kind == RowKind::Arpeggio)
            .and_then(|row| row.entity.arpeggio())
        else {
            return;
        };
        if dst == src {
            return;
        }
        let (Some(src_arp), Some(dst_arp)) = (env.project.arpeggio(src), env.project.arpeggio(dst))
        else {
            return;
        };
        let src_name = src_arp.name.clone();
        let dst_name = dst_arp.name.clone();
        let values = src_arp.envelope.clone();

        if envelope {
            let message = format!(
                "Are you sure you want to copy the arpeggio values from '{}' to '{}'?",
                src_name, dst_name
            );
            if !env.dialogs.confirm("Copy Arpeggio", &message) {
                return;
            }
            if env
                .transactions
                .begin(env.project, TransactionScope::Arpeggio(dst), TransactionFlags::NONE)
            {
                if let Some(arp) = env.project.arpeggio_mut(dst) {
                    arp.envelope = values;
                }
                env.transactions.end(env.project);
                self.emit(ExplorerEvent::ArpeggioEdited(dst));
            }
        } else {
            let message = format!(
                "Are you sure you want to replace all notes using arpeggio '{}' with '{}'?",
                dst_name, src_name
            );
            if !env.dialogs.confirm("Replace arpeggio", &message) {
                return;
            }
            if env.transactions.begin(
                env.project,
                TransactionScope::ProjectNoSamples,
                TransactionFlags::NONE,
            ) {
                env.project.replace_arpeggio(dst, src);
                env.transactions.end(env.project);
            }
        }
    }

    /// Released over the sample mapping strip: map the sample to that note.
    fn drop_sample(&mut self, env: &mut ExplorerEnv, id: SampleId, ev: &PointerEvent) {
        if self.geometry.inside(ev.x, ev.y) {
            return;
        }
        let pos = self.to_screen(ev.pos());
        let Some(note) = env.drop_targets.sample_mapping_note_at(pos) else {
            return;
        };
        if !env.project.note_supports_dpcm(note) {
            log::info!(target: "explorer", "note {} cannot hold a DPCM sample", note);
            return;
        }
        if !env.transactions.begin(
            env.project,
            TransactionScope::SamplesMapping,
            TransactionFlags::STOP_AUDIO,
        ) {
            return;
        }
        env.project.unmap_sample(note);
        if env.project.map_sample(note, id) {
            env.transactions.end(env.project);
            self.emit(ExplorerEvent::SampleMapped { id, note });
            self.rebuild(env.project);
        } else {
            env.transactions.abort(env.project);
        }
    }

    /// Drop the capture, rolling back any edit it had open.
    pub fn abort_capture(&mut self, transactions: &mut dyn Transactions, project: &mut Project) {
        if transactions.in_progress() {
            transactions.abort(project);
        }
        if let Some(capture) = self.capture.take() {
            log::debug!(target: "explorer", "abort {:?}", capture.op);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::ExplorerSettings;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn explorer() -> (Project, ProjectExplorer) {
        let project = Project::new();
        let explorer = ProjectExplorer::new(ExplorerSettings::default(), 200, 300, &project);
        (project, explorer)
    }

    #[test]
    fn threshold_is_strict_per_axis() {
        let c = Capture::new(
            CaptureOperation::DragSample,
            Point::new(10, 10),
            Some(3),
            Point::default(),
            DragPayload::None,
            0,
        );
        assert!(!c.threshold_met);
        assert!(!c.crossed_threshold(Point::new(14, 6), 4));
        assert!(c.crossed_threshold(Point::new(15, 10), 4));
        assert!(c.crossed_threshold(Point::new(10, 5), 4));
    }

    #[test]
    fn exempt_operations_start_armed() {
        for op in [
            CaptureOperation::DragSong,
            CaptureOperation::MoveSlider,
            CaptureOperation::ScrollBar,
        ] {
            let c = Capture::new(op, Point::default(), None, Point::default(), DragPayload::None, 0);
            assert!(c.threshold_met, "{:?}", op);
        }
    }

    #[test]
    fn second_capture_is_refused() {
        let (_project, mut explorer) = explorer();
        let first = Capture::new(
            CaptureOperation::ScrollBar,
            Point::new(195, 40),
            None,
            Point::default(),
            DragPayload::None,
            0,
        );
        assert!(explorer.start_capture(first));

        let second = Capture::new(
            CaptureOperation::DragSong,
            Point::new(20, 50),
            Some(2),
            Point::default(),
            DragPayload::None,
            0,
        );
        let result = catch_unwind(AssertUnwindSafe(|| explorer.start_capture(second)));
        if cfg!(debug_assertions) {
            assert!(result.is_err());
        } else {
            assert_eq!(result.ok(), Some(false));
        }
        assert_eq!(explorer.capture(), Some(&first));
    }

    #[test]
    fn abort_clears_capture() {
        let (mut project, mut explorer) = explorer();
        let mut undo = crate::transaction::UndoRedoManager::default();
        explorer.start_capture(Capture::new(
            CaptureOperation::MoveSlider,
            Point::default(),
            Some(0),
            Point::default(),
            DragPayload::None,
            0,
        ));
        undo.begin(&project, TransactionScope::ProjectNoSamples, TransactionFlags::NONE);
        project.create_song();
        explorer.abort_capture(&mut undo, &mut project);

        assert!(!explorer.is_capturing());
        assert!(!undo.in_progress());
        assert_eq!(project.songs.len(), 1);
    }
}
