pub mod chart;
pub mod table_renderer;

pub use chart::{Chart, ChartKind, ChartRenderer, ConsoleChartRenderer};
pub use table_renderer::{Alignment, Table, TableColumn};
