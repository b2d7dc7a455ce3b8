mod state;

pub use state::{AppState, ExportCache};
