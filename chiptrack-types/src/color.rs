use serde::{Deserialize, Serialize};

/// RGBA color attached to project entities and used by the explorer theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

/// Colors handed out to newly created entities, in rotation.
const PALETTE: [Color; 8] = [
    Color::rgb(196, 122, 122),
    Color::rgb(196, 166, 122),
    Color::rgb(179, 196, 122),
    Color::rgb(122, 196, 135),
    Color::rgb(122, 196, 191),
    Color::rgb(122, 152, 196),
    Color::rgb(150, 122, 196),
    Color::rgb(196, 122, 179),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Palette color for the n-th created entity.
    pub fn from_palette(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }
}

impl Default for Color {
    fn default() -> Self {
        PALETTE[0]
    }
}
