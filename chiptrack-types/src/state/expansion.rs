use serde::{Deserialize, Serialize};

use super::envelope::EnvelopeType;

/// Sound chip an instrument targets. `None` is the stock 2A03.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ExpansionType {
    #[default]
    None,
    Vrc6,
    Vrc7,
    Fds,
    Mmc5,
    N163,
    S5B,
}

const SLOTS_2A03: &[EnvelopeType] = &[
    EnvelopeType::Volume,
    EnvelopeType::Arpeggio,
    EnvelopeType::Pitch,
    EnvelopeType::DutyCycle,
];

const SLOTS_BASIC: &[EnvelopeType] = &[
    EnvelopeType::Volume,
    EnvelopeType::Arpeggio,
    EnvelopeType::Pitch,
];

const SLOTS_FDS: &[EnvelopeType] = &[
    EnvelopeType::Volume,
    EnvelopeType::Arpeggio,
    EnvelopeType::Pitch,
    EnvelopeType::FdsWaveform,
    EnvelopeType::FdsModulation,
];

const SLOTS_N163: &[EnvelopeType] = &[
    EnvelopeType::Volume,
    EnvelopeType::Arpeggio,
    EnvelopeType::Pitch,
    EnvelopeType::N163Waveform,
];

impl ExpansionType {
    /// Audio expansions a project can enable, 2A03 excluded.
    pub const EXPANSIONS: [ExpansionType; 6] = [
        ExpansionType::Vrc6,
        ExpansionType::Vrc7,
        ExpansionType::Fds,
        ExpansionType::Mmc5,
        ExpansionType::N163,
        ExpansionType::S5B,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExpansionType::None => "2A03",
            ExpansionType::Vrc6 => "VRC6",
            ExpansionType::Vrc7 => "VRC7",
            ExpansionType::Fds => "FDS",
            ExpansionType::Mmc5 => "MMC5",
            ExpansionType::N163 => "N163",
            ExpansionType::S5B => "S5B",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::EXPANSIONS
            .iter()
            .copied()
            .chain(std::iter::once(ExpansionType::None))
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// MMC5 plays through 2A03 instruments, every other expansion has its own.
    pub fn needs_own_instruments(self) -> bool {
        !matches!(self, ExpansionType::None | ExpansionType::Mmc5)
    }

    /// Envelope slots an instrument of this chip owns.
    pub fn envelope_slots(self) -> &'static [EnvelopeType] {
        match self {
            ExpansionType::None | ExpansionType::Mmc5 | ExpansionType::Vrc6 => SLOTS_2A03,
            ExpansionType::Vrc7 | ExpansionType::S5B => SLOTS_BASIC,
            ExpansionType::Fds => SLOTS_FDS,
            ExpansionType::N163 => SLOTS_N163,
        }
    }

    pub fn has_envelope(self, kind: EnvelopeType) -> bool {
        self.envelope_slots().contains(&kind)
    }
}

impl std::fmt::Display for ExpansionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_envelope_slots() {
        assert!(ExpansionType::None.has_envelope(EnvelopeType::DutyCycle));
        assert!(ExpansionType::Vrc6.has_envelope(EnvelopeType::DutyCycle));
        assert!(!ExpansionType::Vrc7.has_envelope(EnvelopeType::DutyCycle));
        assert!(ExpansionType::Fds.has_envelope(EnvelopeType::FdsModulation));
        assert!(!ExpansionType::Fds.has_envelope(EnvelopeType::N163Waveform));
        assert!(ExpansionType::N163.has_envelope(EnvelopeType::N163Waveform));
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(ExpansionType::from_name("fds"), Some(ExpansionType::Fds));
        assert_eq!(ExpansionType::from_name("2A03"), Some(ExpansionType::None));
        assert_eq!(ExpansionType::from_name("SID"), None);
    }

    #[test]
    fn mmc5_shares_2a03_instruments() {
        assert!(!ExpansionType::Mmc5.needs_own_instruments());
        assert!(ExpansionType::S5B.needs_own_instruments());
    }
}
