use serde::{Deserialize, Serialize};

use super::envelope::{Envelope, EnvelopeType};
use crate::{ArpeggioId, Color};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arpeggio {
    pub id: ArpeggioId,
    pub name: String,
    pub color: Color,
    pub envelope: Envelope,
}

impl Arpeggio {
    pub fn new(id: ArpeggioId, name: &str, color: Color) -> Self {
        let mut envelope = Envelope::new(EnvelopeType::Arpeggio);
        // Major chord, looping.
        envelope.set_length(3, EnvelopeType::Arpeggio);
        envelope.values = vec![0, 4, 7];
        envelope.loop_point = Some(0);
        Self {
            id,
            name: name.to_string(),
            color,
            envelope,
        }
    }
}
