pub mod data_loading;
pub mod grid;
pub mod panel;
pub mod screens;

pub use data_loading::reduce_data_loading;
pub use grid::{reduce_filters, reduce_grid};
pub use panel::reduce_panel;
pub use screens::reduce_screens;
