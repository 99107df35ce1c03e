/// UI module exports
pub mod components;
pub mod controls;
pub mod side_panel;
