/// UI widgets for CsvSleuth.

pub mod highlights;
pub mod history_modal;
pub mod status_bar;
pub mod toolbar;
