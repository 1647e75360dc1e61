//! Pure state-to-view transformation for the train table and counters.

use crate::model::{status_text, RecordField, Stats, Status, TrainRecord};

/// One column of the train table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Position,
    Field(RecordField),
    DepartureStatus,
    ArrivalStatus,
    Actions,
}

pub const COLUMNS: [Column; 12] = [
    Column::Position,
    Column::Field(RecordField::TrainId),
    Column::Field(RecordField::Origin),
    Column::Field(RecordField::ScheduledDeparture),
    Column::Field(RecordField::Destination),
    Column::Field(RecordField::ScheduledArrival),
    Column::Field(RecordField::ActualDeparture),
    Column::DepartureStatus,
    Column::Field(RecordField::ActualArrival),
    Column::ArrivalStatus,
    Column::Field(RecordField::Notes),
    Column::Actions,
];

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::Position => "#",
            Column::Field(RecordField::TrainId) => "Trem",
            Column::Field(RecordField::Origin) => "Origem",
            Column::Field(RecordField::ScheduledDeparture) => "Partida Prog.",
            Column::Field(RecordField::Destination) => "Destino",
            Column::Field(RecordField::ScheduledArrival) => "Chegada Prog.",
            Column::Field(RecordField::ActualDeparture) => "Partida Real",
            Column::DepartureStatus => "Status Partida",
            Column::Field(RecordField::ActualArrival) => "Chegada Real",
            Column::ArrivalStatus => "Status Chegada",
            Column::Field(RecordField::Notes) => "Observações",
            Column::Actions => "Ações",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCell {
    /// Raw server key, kept so the row reads back unchanged.
    pub key: String,
    pub label: &'static str,
    pub class: String,
}

impl StatusCell {
    fn new(key: &str) -> Self {
        let status = Status::from_key_or_default(key);
        Self {
            key: key.to_string(),
            label: status_text(key),
            class: status.css_class(),
        }
    }
}

/// Everything needed to paint one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub number: String,
    pub cells: Vec<(RecordField, String)>,
    pub departure_status: StatusCell,
    pub arrival_status: StatusCell,
}

impl RowView {
    pub fn from_record(index: usize, record: &TrainRecord) -> Self {
        Self {
            index,
            number: record.number.clone(),
            cells: RecordField::ALL
                .iter()
                .map(|f| (*f, record.get(*f).to_string()))
                .collect(),
            departure_status: StatusCell::new(&record.departure_status),
            arrival_status: StatusCell::new(&record.arrival_status),
        }
    }

    /// 1-based label shown in the first column.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn value(&self, field: RecordField) -> &str {
        self.cells
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }
}

pub fn rows(records: &[TrainRecord]) -> Vec<RowView> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| RowView::from_record(i, r))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCounter {
    pub id: String,
    pub label: &'static str,
    pub value: u32,
    pub class: String,
}

/// The five counters in display order, with their DOM ids.
pub fn stat_counters(stats: &Stats) -> Vec<StatCounter> {
    Status::ALL
        .iter()
        .map(|s| StatCounter {
            id: format!("stat-{}", s.key().replace('_', "-")),
            label: s.label(),
            value: stats.count(*s),
            class: s.css_class(),
        })
        .collect()
}
