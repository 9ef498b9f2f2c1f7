//! Reusable widgets for the focuskit TUI.

pub mod label_input;
pub mod status_bar;
pub mod tabs;

pub use label_input::{LabelInput, LabelInputState};
pub use status_bar::{KeyHint, StatusBar};
pub use tabs::{TabItem, Tabs};
