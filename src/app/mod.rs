pub mod orchestrator;
pub mod state;
pub mod ui;
pub mod viewport;

pub use orchestrator::ChartState;
pub use state::{App, AppWrapper, ExportJob};
pub use viewport::Viewport;
