pub mod board;
pub mod dialogs;
pub mod ui;
