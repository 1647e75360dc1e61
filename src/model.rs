//! Shift report data as exchanged with the backend.
//!
//! Field names on the wire are the backend's (Portuguese) keys; the Rust
//! side uses descriptive names and maps them with serde renames.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Whether the shift falls on a public holiday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Holiday {
    Yes,
    #[default]
    No,
    /// Any other value the server has stored.
    Other(String),
}

impl Holiday {
    pub const ALL: [Holiday; 2] = [Holiday::No, Holiday::Yes];

    pub fn as_str(&self) -> &str {
        match self {
            Holiday::Yes => "Sim",
            Holiday::No => "Não",
            Holiday::Other(value) => value,
        }
    }
}

impl From<String> for Holiday {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Sim" => Holiday::Yes,
            "Não" => Holiday::No,
            _ => Holiday::Other(value),
        }
    }
}

impl From<Holiday> for String {
    fn from(holiday: Holiday) -> Self {
        match holiday {
            Holiday::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

/// Period of the day covered by the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftPeriod {
    #[default]
    Day,
    Night,
    /// Any other value the server has stored.
    Other(String),
}

impl ShiftPeriod {
    pub const ALL: [ShiftPeriod; 2] = [ShiftPeriod::Day, ShiftPeriod::Night];

    pub fn as_str(&self) -> &str {
        match self {
            ShiftPeriod::Day => "Dia",
            ShiftPeriod::Night => "Noite",
            ShiftPeriod::Other(value) => value,
        }
    }
}

impl From<String> for ShiftPeriod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Dia" => ShiftPeriod::Day,
            "Noite" => ShiftPeriod::Night,
            _ => ShiftPeriod::Other(value),
        }
    }
}

impl From<ShiftPeriod> for String {
    fn from(shift: ShiftPeriod) -> Self {
        match shift {
            ShiftPeriod::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

/// The backend stores whatever JSON it is sent, so `null` reads as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata about who is reporting and for which shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShiftInfo {
    #[serde(rename = "agente", deserialize_with = "null_as_default")]
    pub agent: String,
    #[serde(rename = "dia", deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "feriado", deserialize_with = "null_as_default")]
    pub holiday: Holiday,
    #[serde(rename = "turno", deserialize_with = "null_as_default")]
    pub shift: ShiftPeriod,
}

impl ShiftInfo {
    /// Set the date field in the `YYYY-MM-DD` form a date input expects.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date.format("%Y-%m-%d").to_string();
    }
}

/// One row of the report. Addressed by its position in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrainRecord {
    #[serde(rename = "numero", deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(rename = "trem", deserialize_with = "null_as_default")]
    pub train_id: String,
    #[serde(rename = "origem", deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(rename = "partida_programada", deserialize_with = "null_as_default")]
    pub scheduled_departure: String,
    #[serde(rename = "destino", deserialize_with = "null_as_default")]
    pub destination: String,
    #[serde(rename = "chegada_programada", deserialize_with = "null_as_default")]
    pub scheduled_arrival: String,
    #[serde(rename = "partida_real", deserialize_with = "null_as_default")]
    pub actual_departure: String,
    /// Raw status key assigned by the server.
    #[serde(rename = "status_partida", deserialize_with = "null_as_default")]
    pub departure_status: String,
    #[serde(rename = "chegada_real", deserialize_with = "null_as_default")]
    pub actual_arrival: String,
    #[serde(rename = "status_chegada", deserialize_with = "null_as_default")]
    pub arrival_status: String,
    #[serde(rename = "observacoes", deserialize_with = "null_as_default")]
    pub notes: String,
}

/// The user-editable columns of a [`TrainRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    TrainId,
    Origin,
    ScheduledDeparture,
    Destination,
    ScheduledArrival,
    ActualDeparture,
    ActualArrival,
    Notes,
}

impl RecordField {
    /// Column order of the table.
    pub const ALL: [RecordField; 8] = [
        RecordField::TrainId,
        RecordField::Origin,
        RecordField::ScheduledDeparture,
        RecordField::Destination,
        RecordField::ScheduledArrival,
        RecordField::ActualDeparture,
        RecordField::ActualArrival,
        RecordField::Notes,
    ];

    /// Editing an actual time asks the server to reclassify the record.
    pub fn triggers_status(self) -> bool {
        matches!(self, RecordField::ActualDeparture | RecordField::ActualArrival)
    }

    pub fn is_time(self) -> bool {
        matches!(
            self,
            RecordField::ScheduledDeparture
                | RecordField::ScheduledArrival
                | RecordField::ActualDeparture
                | RecordField::ActualArrival
        )
    }

    /// Backend key of the column.
    pub fn key(self) -> &'static str {
        match self {
            RecordField::TrainId => "trem",
            RecordField::Origin => "origem",
            RecordField::ScheduledDeparture => "partida_programada",
            RecordField::Destination => "destino",
            RecordField::ScheduledArrival => "chegada_programada",
            RecordField::ActualDeparture => "partida_real",
            RecordField::ActualArrival => "chegada_real",
            RecordField::Notes => "observacoes",
        }
    }
}

impl TrainRecord {
    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::TrainId => &self.train_id,
            RecordField::Origin => &self.origin,
            RecordField::ScheduledDeparture => &self.scheduled_departure,
            RecordField::Destination => &self.destination,
            RecordField::ScheduledArrival => &self.scheduled_arrival,
            RecordField::ActualDeparture => &self.actual_departure,
            RecordField::ActualArrival => &self.actual_arrival,
            RecordField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: RecordField, value: String) {
        let slot = match field {
            RecordField::TrainId => &mut self.train_id,
            RecordField::Origin => &mut self.origin,
            RecordField::ScheduledDeparture => &mut self.scheduled_departure,
            RecordField::Destination => &mut self.destination,
            RecordField::ScheduledArrival => &mut self.scheduled_arrival,
            RecordField::ActualDeparture => &mut self.actual_departure,
            RecordField::ActualArrival => &mut self.actual_arrival,
            RecordField::Notes => &mut self.notes,
        };
        *slot = value;
    }
}

/// Server-side punctuality classification of a departure or arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Delayed,
    OnTime,
    PendingDeparture,
    InTransit,
    Extra,
}

impl Status {
    /// Fixed display order, shared by counters and chart.
    pub const ALL: [Status; 5] = [
        Status::Delayed,
        Status::OnTime,
        Status::PendingDeparture,
        Status::InTransit,
        Status::Extra,
    ];

    pub fn from_key(key: &str) -> Option<Status> {
        match key {
            "atrasado" => Some(Status::Delayed),
            "ontime" => Some(Status::OnTime),
            "para_circular" => Some(Status::PendingDeparture),
            "circulando" => Some(Status::InTransit),
            "extra" => Some(Status::Extra),
            _ => None,
        }
    }

    /// Unknown or empty keys read as pending departure.
    pub fn from_key_or_default(key: &str) -> Status {
        Status::from_key(key).unwrap_or(Status::PendingDeparture)
    }

    pub fn key(self) -> &'static str {
        match self {
            Status::Delayed => "atrasado",
            Status::OnTime => "ontime",
            Status::PendingDeparture => "para_circular",
            Status::InTransit => "circulando",
            Status::Extra => "extra",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Delayed => "Atrasado",
            Status::OnTime => "OnTime",
            Status::PendingDeparture => "Para Circular",
            Status::InTransit => "Circulando",
            Status::Extra => "Extra",
        }
    }

    /// CSS class of a status cell, e.g. `status-para-circular`.
    pub fn css_class(self) -> String {
        format!("status-{}", self.key().replace('_', "-"))
    }

    pub fn color(self) -> &'static str {
        match self {
            Status::Delayed => "#e74c3c",
            Status::OnTime => "#2ecc71",
            Status::PendingDeparture => "#f39c12",
            Status::InTransit => "#3498db",
            Status::Extra => "#95a5a6",
        }
    }
}

/// Display label for a raw status key.
pub fn status_text(key: &str) -> &'static str {
    Status::from_key_or_default(key).label()
}

/// Aggregate counts computed by the server over the whole list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Stats {
    #[serde(rename = "atrasado")]
    pub delayed: u32,
    #[serde(rename = "ontime")]
    pub on_time: u32,
    #[serde(rename = "para_circular")]
    pub pending_departure: u32,
    #[serde(rename = "circulando")]
    pub in_transit: u32,
    pub extra: u32,
}

impl Stats {
    pub fn count(&self, status: Status) -> u32 {
        match status {
            Status::Delayed => self.delayed,
            Status::OnTime => self.on_time,
            Status::PendingDeparture => self.pending_departure,
            Status::InTransit => self.in_transit,
            Status::Extra => self.extra,
        }
    }

    pub fn total(&self) -> u64 {
        Status::ALL.iter().map(|s| u64::from(self.count(*s))).sum()
    }
}
