pub mod button;
pub mod dialog;
pub mod input;
pub mod label;
pub mod spinner;
pub mod tooltip;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use button::*;
pub use dialog::*;
pub use input::*;
pub use label::*;
pub use spinner::*;
pub use tooltip::*;
