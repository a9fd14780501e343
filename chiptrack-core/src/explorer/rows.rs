//! The flat row list and the per-row derived state (sub-buttons, labels,
//! fonts, icons). Rows hold only passive data; everything that depends on
//! the project is computed by the free functions here.

use chiptrack_types::{
    instrument_params, sample_params, ArpeggioId, Color, EnvelopeType, ExpansionType,
    InstrumentId, ParamInfo, Project, SampleId, SongId, MAX_MAPPED_SAMPLE_SIZE,
};

use crate::transaction::TransactionScope;

const PROJECT_HEADER_COLOR: Color = Color::rgb(205, 205, 205);
const SECTION_HEADER_COLOR: Color = Color::rgb(165, 165, 165);
const DPCM_ROW_COLOR: Color = Color::rgb(220, 220, 220);
const NO_ARPEGGIO_COLOR: Color = Color::rgb(220, 220, 220);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    ProjectHeader,
    SongSectionHeader,
    Song,
    InstrumentSectionHeader,
    /// Entity instrument, or the DPCM row when the entity is `None`.
    Instrument,
    DpcmSectionHeader,
    DpcmSample,
    ArpeggioSectionHeader,
    /// Entity arpeggio, or the "None" row.
    Arpeggio,
    ParamCheckbox,
    ParamSlider,
    ParamCycleList,
}

impl RowKind {
    pub fn is_param(self) -> bool {
        matches!(
            self,
            RowKind::ParamCheckbox | RowKind::ParamSlider | RowKind::ParamCycleList
        )
    }

    /// Rows whose content shifts right to make room for the expand column.
    pub fn is_left_aligned(self) -> bool {
        matches!(
            self,
            RowKind::Song
                | RowKind::Instrument
                | RowKind::DpcmSample
                | RowKind::Arpeggio
                | RowKind::ParamCheckbox
                | RowKind::ParamSlider
                | RowKind::ParamCycleList
        )
    }

    fn for_param(info: &ParamInfo) -> Self {
        if info.is_list() {
            RowKind::ParamCycleList
        } else if info.is_checkbox() {
            RowKind::ParamCheckbox
        } else {
            RowKind::ParamSlider
        }
    }
}

/// Weak reference to the entity a row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEntity {
    None,
    Song(SongId),
    Instrument(InstrumentId),
    Arpeggio(ArpeggioId),
    Sample(SampleId),
}

impl RowEntity {
    pub fn song(self) -> Option<SongId> {
        match self {
            RowEntity::Song(id) => Some(id),
            _ => None,
        }
    }

    pub fn instrument(self) -> Option<InstrumentId> {
        match self {
            RowEntity::Instrument(id) => Some(id),
            _ => None,
        }
    }

    pub fn arpeggio(self) -> Option<ArpeggioId> {
        match self {
            RowEntity::Arpeggio(id) => Some(id),
            _ => None,
        }
    }

    pub fn sample(self) -> Option<SampleId> {
        match self {
            RowEntity::Sample(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamOwner {
    Instrument(InstrumentId),
    Sample(SampleId),
}

/// Descriptor plus owner of an inline parameter row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRow {
    pub owner: ParamOwner,
    pub info: ParamInfo,
}

impl ParamRow {
    pub fn scope(&self) -> TransactionScope {
        match self.owner {
            ParamOwner::Instrument(id) => TransactionScope::Instrument(id),
            ParamOwner::Sample(id) => TransactionScope::Sample(id),
        }
    }

    pub fn value(&self, project: &Project) -> Option<i32> {
        match self.owner {
            ParamOwner::Instrument(id) => project.instrument(id).map(|i| i.param_value(self.info.field)),
            ParamOwner::Sample(id) => project.sample(id).map(|s| s.param_value(self.info.field)),
        }
    }

    /// Write a value already snapped and clamped. False if the owner is gone.
    pub fn set_value(&self, project: &mut Project, value: i32) -> bool {
        match self.owner {
            ParamOwner::Instrument(id) => project
                .instrument_mut(id)
                .map(|i| i.set_param_value(self.info.field, value))
                .is_some(),
            ParamOwner::Sample(id) => project
                .sample_mut(id)
                .map(|s| s.set_param_value(self.info.field, value))
                .is_some(),
        }
    }

    pub fn enabled(&self, project: &Project) -> bool {
        match self.owner {
            ParamOwner::Instrument(id) => project
                .instrument(id)
                .is_some_and(|i| i.param_enabled(self.info.field)),
            ParamOwner::Sample(id) => project
                .sample(id)
                .is_some_and(|s| s.param_enabled(self.info.field)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Music,
    Instrument(ExpansionType),
    Dpcm,
    Arpeggio,
    Sample,
    Add,
    Load,
    Save,
    Reload,
    Play,
    EditWave,
    Expand,
    Expanded,
    Overflow,
    Envelope(EnvelopeType),
    CheckBoxOn,
    CheckBoxOff,
    ListLeft,
    ListRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub entity: RowEntity,
    pub text: String,
    pub color: Color,
    pub icon: Option<Icon>,
    pub param: Option<ParamRow>,
}

impl Row {
    fn plain(kind: RowKind, text: &str, color: Color) -> Self {
        Self {
            kind,
            entity: RowEntity::None,
            text: text.to_string(),
            color,
            icon: None,
            param: None,
        }
    }

    fn entity(kind: RowKind, entity: RowEntity, text: &str, color: Color, icon: Icon) -> Self {
        Self {
            kind,
            entity,
            text: text.to_string(),
            color,
            icon: Some(icon),
            param: None,
        }
    }

    fn param(owner: ParamOwner, info: ParamInfo, color: Color) -> Self {
        Self {
            kind: RowKind::for_param(&info),
            entity: RowEntity::None,
            text: info.name.to_string(),
            color,
            icon: None,
            param: Some(ParamRow { owner, info }),
        }
    }
}

/// Current song/instrument/arpeggio selection. `None` for instrument and
/// arpeggio means the DPCM row and the "None" arpeggio row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub song: Option<SongId>,
    pub instrument: Option<InstrumentId>,
    pub arpeggio: Option<ArpeggioId>,
}

/// Build the row list from scratch.
pub fn build_rows(
    project: &Project,
    expanded_instrument: Option<InstrumentId>,
    expanded_sample: Option<SampleId>,
) -> Vec<Row> {
    let mut rows = Vec::new();

    let title = if project.author.is_empty() {
        project.name.clone()
    } else {
        format!("{} ({})", project.name, project.author)
    };
    rows.push(Row::plain(RowKind::ProjectHeader, &title, PROJECT_HEADER_COLOR));

    rows.push(Row::plain(RowKind::SongSectionHeader, "Songs", SECTION_HEADER_COLOR));
    for song in &project.songs {
        rows.push(Row::entity(
            RowKind::Song,
            RowEntity::Song(song.id),
            &song.name,
            song.color,
            Icon::Music,
        ));
    }

    rows.push(Row::plain(RowKind::InstrumentSectionHeader, "Instruments", SECTION_HEADER_COLOR));
    rows.push(Row {
        icon: Some(Icon::Dpcm),
        ..Row::plain(RowKind::Instrument, "DPCM Instrument", DPCM_ROW_COLOR)
    });
    for inst in &project.instruments {
        rows.push(Row::entity(
            RowKind::Instrument,
            RowEntity::Instrument(inst.id),
            &inst.name,
            inst.color,
            Icon::Instrument(inst.expansion),
        ));
        if expanded_instrument == Some(inst.id) {
            for info in instrument_params(inst) {
                rows.push(Row::param(ParamOwner::Instrument(inst.id), info, inst.color));
            }
        }
    }

    rows.push(Row::plain(RowKind::DpcmSectionHeader, "DPCM Samples", SECTION_HEADER_COLOR));
    for sample in &project.samples {
        rows.push(Row::entity(
            RowKind::DpcmSample,
            RowEntity::Sample(sample.id),
            &sample.name,
            sample.color,
            Icon::Sample,
        ));
        if expanded_sample == Some(sample.id) {
            for info in sample_params(sample) {
                rows.push(Row::param(ParamOwner::Sample(sample.id), info, sample.color));
            }
        }
    }

    rows.push(Row::plain(RowKind::ArpeggioSectionHeader, "Arpeggios", SECTION_HEADER_COLOR));
    rows.push(Row {
        icon: Some(Icon::Arpeggio),
        ..Row::plain(RowKind::Arpeggio, "None", NO_ARPEGGIO_COLOR)
    });
    for arp in &project.arpeggios {
        rows.push(Row::entity(
            RowKind::Arpeggio,
            RowEntity::Arpeggio(arp.id),
            &arp.name,
            arp.color,
            Icon::Arpeggio,
        ));
    }

    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubButton {
    Add,
    Load,
    Dpcm,
    Overflow,
    Envelope(EnvelopeType),
    ArpeggioEnvelope,
    EditWave,
    Save,
    Reload,
    Play,
    Expand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubButtonSlot {
    pub button: SubButton,
    pub active: bool,
}

impl SubButtonSlot {
    fn on(button: SubButton) -> Self {
        Self { button, active: true }
    }
}

/// Order envelope icons appear in, rightmost first.
pub const ENVELOPE_DISPLAY_ORDER: [EnvelopeType; EnvelopeType::COUNT] = [
    EnvelopeType::Arpeggio,
    EnvelopeType::Pitch,
    EnvelopeType::Volume,
    EnvelopeType::DutyCycle,
    EnvelopeType::FdsModulation,
    EnvelopeType::FdsWaveform,
    EnvelopeType::N163Waveform,
];

/// The expand column shows on every row as soon as anything can expand.
pub fn show_expand_buttons(project: &Project) -> bool {
    !project.samples.is_empty() || project.instruments.iter().any(|i| i.has_extra_params())
}

pub fn is_expand_eligible(row: &Row, project: &Project) -> bool {
    match (row.kind, row.entity) {
        (RowKind::Instrument, RowEntity::Instrument(id)) => {
            project.instrument(id).is_some_and(|i| i.has_extra_params())
        }
        (RowKind::DpcmSample, RowEntity::Sample(_)) => true,
        _ => false,
    }
}

/// Sub-buttons of a row, rightmost first.
pub fn sub_buttons(row: &Row, project: &Project, show_expand: bool) -> Vec<SubButtonSlot> {
    use SubButton::*;

    match (row.kind, row.entity) {
        (RowKind::SongSectionHeader, _) | (RowKind::InstrumentSectionHeader, _) => {
            vec![SubButtonSlot::on(Add), SubButtonSlot::on(Load)]
        }
        (RowKind::ArpeggioSectionHeader, _) => vec![SubButtonSlot::on(Add)],
        (RowKind::DpcmSectionHeader, _) => vec![SubButtonSlot::on(Load)],
        (RowKind::Instrument, RowEntity::None) => {
            let mut slots = vec![SubButtonSlot::on(Dpcm)];
            if project.total_mapped_sample_size() > MAX_MAPPED_SAMPLE_SIZE {
                slots.push(SubButtonSlot::on(Overflow));
            }
            slots
        }
        (RowKind::Instrument, RowEntity::Instrument(id)) => {
            let Some(inst) = project.instrument(id) else {
                return Vec::new();
            };
            let mut slots: Vec<SubButtonSlot> = ENVELOPE_DISPLAY_ORDER
                .iter()
                .filter(|&&kind| inst.envelope(kind).is_some())
                .map(|&kind| SubButtonSlot {
                    button: Envelope(kind),
                    active: inst.envelope_in_use(kind),
                })
                .collect();
            if show_expand && inst.has_extra_params() {
                slots.push(SubButtonSlot::on(Expand));
            }
            slots
        }
        (RowKind::Arpeggio, RowEntity::Arpeggio(id)) => match project.arpeggio(id) {
            Some(_) => vec![SubButtonSlot::on(ArpeggioEnvelope)],
            None => Vec::new(),
        },
        (RowKind::DpcmSample, RowEntity::Sample(id)) => {
            let reloadable = project
                .sample(id)
                .is_some_and(|s| s.has_reloadable_source());
            vec![
                SubButtonSlot::on(EditWave),
                SubButtonSlot::on(Save),
                SubButtonSlot {
                    button: Reload,
                    active: reloadable,
                },
                SubButtonSlot::on(Play),
                SubButtonSlot::on(Expand),
            ]
        }
        _ => Vec::new(),
    }
}

pub fn envelope_icon(kind: EnvelopeType) -> Icon {
    Icon::Envelope(kind)
}

pub fn sub_button_icon(button: SubButton, expanded: bool) -> Icon {
    match button {
        SubButton::Add => Icon::Add,
        SubButton::Load => Icon::Load,
        SubButton::Dpcm => Icon::Dpcm,
        SubButton::Overflow => Icon::Overflow,
        SubButton::Envelope(kind) => envelope_icon(kind),
        SubButton::ArpeggioEnvelope => envelope_icon(EnvelopeType::Arpeggio),
        SubButton::EditWave => Icon::EditWave,
        SubButton::Save => Icon::Save,
        SubButton::Reload => Icon::Reload,
        SubButton::Play => Icon::Play,
        SubButton::Expand if expanded => Icon::Expanded,
        SubButton::Expand => Icon::Expand,
    }
}

/// Label as drawn. Sizes are read live since sample edits do not rebuild.
pub fn display_text(row: &Row, project: &Project) -> String {
    match (row.kind, row.entity) {
        (RowKind::Instrument, RowEntity::None) => {
            let size = project.total_mapped_sample_size();
            if size > 0 {
                format!("{} ({} Bytes)", row.text, size)
            } else {
                row.text.clone()
            }
        }
        (RowKind::DpcmSample, RowEntity::Sample(id)) => match project.sample(id) {
            Some(sample) => format!("{} ({} Bytes)", sample.name, sample.processed_size()),
            None => row.text.clone(),
        },
        _ => row.text.clone(),
    }
}

pub fn display_font(row: &Row, selection: &Selection) -> FontWeight {
    let bold = match row.kind {
        RowKind::ProjectHeader
        | RowKind::SongSectionHeader
        | RowKind::InstrumentSectionHeader
        | RowKind::DpcmSectionHeader
        | RowKind::ArpeggioSectionHeader => true,
        RowKind::Song => row.entity.song().is_some() && row.entity.song() == selection.song,
        RowKind::Instrument => row.entity.instrument() == selection.instrument,
        RowKind::Arpeggio => row.entity.arpeggio() == selection.arpeggio,
        _ => false,
    };
    if bold {
        FontWeight::Bold
    } else {
        FontWeight::Regular
    }
}
