pub mod arpeggio;
pub mod envelope;
pub mod expansion;
pub mod instrument;
pub mod project;
pub mod sample;
pub mod song;

pub use arpeggio::*;
pub use envelope::*;
pub use expansion::*;
pub use instrument::*;
pub use project::*;
pub use sample::*;
pub use song::*;
