pub mod export_panel;
pub mod header;
pub mod loading_overlay;
pub mod shift_info_form;
pub mod stats_panel;
pub mod status_badge;
pub mod status_chart;
pub mod train_table;
