//! Hover help. Text uses `{MouseLeft}`-style placeholders the host swaps
//! for its own glyphs.

use chiptrack_types::Project;

use super::rows::{RowEntity, RowKind, SubButton};
use super::ProjectExplorer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub text: String,
    /// Shown in the warning color.
    pub warning: bool,
}

impl Tooltip {
    fn help(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warning: false,
        }
    }
}

impl ProjectExplorer {
    /// Tooltip for a widget-local position, `None` where there is nothing to say.
    pub fn tooltip_at(&self, project: &Project, x: i32, y: i32) -> Option<Tooltip> {
        let g = &self.geometry;
        let Some(hit) = self.hit_test(project, x, y) else {
            if g.in_scroll_bar(x) {
                return Some(Tooltip::help("{MouseLeft} {Drag} Scroll"));
            }
            return None;
        };
        let row = self.rows.get(hit.row)?;

        let text = match (row.kind, hit.sub) {
            (RowKind::SongSectionHeader, Some(SubButton::Add)) => "{MouseLeft} Add new song".into(),
            (RowKind::SongSectionHeader, Some(SubButton::Load)) => {
                "{MouseLeft} Import/merge song from another project".into()
            }
            (RowKind::Song, _) => "{MouseLeft} Make song current - {MouseLeft}{MouseLeft} Song properties - {MouseRight} Delete song\n{MouseLeft} {Drag} Re-order song".into(),
            (RowKind::InstrumentSectionHeader, Some(SubButton::Add)) => {
                "{MouseLeft} Add new instrument".into()
            }
            (RowKind::InstrumentSectionHeader, Some(SubButton::Load)) => {
                "{MouseLeft} Import/merge instrument from another project".into()
            }
            (RowKind::ArpeggioSectionHeader, Some(SubButton::Add)) => {
                "{MouseLeft} Add new arpeggio".into()
            }
            (RowKind::ProjectHeader, _) => "{MouseLeft}{MouseLeft} Project properties".into(),
            (RowKind::ParamCheckbox, _) if x >= g.check_box_left() => {
                "{MouseLeft} Toggle value\n{MouseRight} Reset to default value".into()
            }
            (RowKind::ParamSlider, _) if x >= g.slider_left() => {
                "{MouseLeft} {Drag} Change value - {Shift} {MouseLeft} {Drag} Change value (fine)\n{MouseRight} Reset to default value".into()
            }
            (RowKind::ParamCycleList, _) if x >= g.slider_left() => {
                "{MouseLeft} Change value\n{MouseRight} Reset to default value".into()
            }
            (RowKind::ParamCheckbox | RowKind::ParamSlider | RowKind::ParamCycleList, _) => {
                row.param.as_ref().map(|p| p.info.tooltip)?.to_string()
            }
            (RowKind::Instrument, None) => match row.entity {
                RowEntity::Instrument(_) => "{MouseLeft} Select instrument - {MouseLeft}{MouseLeft} Instrument properties\n{MouseRight} Delete instrument - {MouseLeft} {Drag} Replace instrument".into(),
                _ => "{MouseLeft} Select instrument".into(),
            },
            (RowKind::Instrument, Some(SubButton::Dpcm)) => "{MouseLeft} Edit DPCM samples".into(),
            (RowKind::Instrument, Some(SubButton::Envelope(kind))) => format!(
                "{{MouseLeft}} Edit {} envelope - {{MouseRight}} Delete envelope - {{MouseLeft}} {{Drag}} Copy envelope",
                kind.name().to_lowercase()
            ),
            (RowKind::Instrument, Some(SubButton::Overflow)) => {
                return Some(Tooltip {
                    text: "DPCM sample limit size limit is 16384 bytes. Some samples will not play correctly.".into(),
                    warning: true,
                });
            }
            (RowKind::DpcmSample, Some(SubButton::Play)) => {
                "{MouseLeft} Preview processed DPCM sample\n{MouseRight} Play source sample".into()
            }
            (RowKind::DpcmSample, Some(SubButton::EditWave)) => "{MouseLeft} Edit waveform".into(),
            (RowKind::DpcmSample, Some(SubButton::Reload)) => {
                "{MouseLeft} Reload source data (if available)\nOnly possible when data was loaded from a DMC/WAV file".into()
            }
            (RowKind::DpcmSample, Some(SubButton::Save)) => {
                "{MouseLeft} Export processed DMC file\n{MouseRight} Export source data (DMC or WAV)".into()
            }
            (RowKind::DpcmSample, None) => {
                "{MouseLeft}{MouseLeft} Edit properties\n{MouseRight} Delete sample".into()
            }
            (RowKind::DpcmSectionHeader, Some(SubButton::Load)) => {
                "{MouseLeft} Load DPCM sample from WAV or DMC file".into()
            }
            _ => return None,
        };

        if text.is_empty() {
            None
        } else {
            Some(Tooltip::help(text))
        }
    }
}
