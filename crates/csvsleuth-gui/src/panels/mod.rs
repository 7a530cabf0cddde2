/// UI panels for CsvSleuth.

pub mod generate_panel;
pub mod history_panel;
pub mod upload_panel;
