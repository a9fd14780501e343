//! chiptrack-core: the project explorer panel and the services it drives.
//!
//! - [`explorer`]: row model, geometry, hit-testing, scrolling, pointer
//!   capture, inline parameter controls, render pass and persisted state.
//! - [`transaction`]: scoped undo/redo.
//! - [`dialogs`]: collaborator traits for modal prompts and external drop targets.
//! - [`sample_io`]: DPCM/WAV sample file loading and saving.
//! - [`config`]: embedded defaults merged with the user's config file.

pub mod config;
pub mod dialogs;
pub mod explorer;
pub mod sample_io;
pub mod transaction;
