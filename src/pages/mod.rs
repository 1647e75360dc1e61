pub mod shift_report;
