pub mod preset;
pub mod state;
pub mod tui;

pub use preset::{match_option, PresetPicker};
pub use state::{arrange, with_default_list, PickerState, Resolution};
pub use tui::TerminalPicker;

use anyhow::Result;

use crate::models::{PickKind, SelectOption};

/// Lets the user choose one option. `Ok(None)` means the round was closed
/// without a choice.
pub trait Picker {
    fn pick(&mut self, kind: PickKind, options: Vec<SelectOption>) -> Result<Option<SelectOption>>;
}
