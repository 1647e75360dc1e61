//! Form controller: owns the session state and drives every user action.
//!
//! The controller never touches the DOM. It talks to the backend through a
//! [`ShiftApi`] and to the page through a [`Host`], so the whole flow runs
//! under test without a browser.

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use crate::api::{ReportFile, ReportKind, ShiftApi};
use crate::error::ApiError;
use crate::model::{RecordField, ShiftInfo, Stats, TrainRecord};

pub const CONFIRM_REMOVE: &str = "Tem certeza que deseja remover este trem?";
pub const CONFIRM_CLEAR: &str =
    "Tem certeza que deseja limpar todos os dados? Esta ação não pode ser desfeita.";
pub const SAVE_SUCCESS: &str = "Dados salvos com sucesso!";
pub const SAVE_FAILURE: &str = "Erro ao salvar dados";

pub fn report_failure_message(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Pdf => "Erro ao gerar PDF",
        ReportKind::Image => "Erro ao gerar imagem",
    }
}

/// What the controller needs from the page it drives.
pub trait Host {
    /// Replace the whole table body with rows for `records`.
    fn render_records(&self, records: &[TrainRecord]);
    fn show_shift_info(&self, info: &ShiftInfo);
    fn show_stats(&self, stats: &Stats);
    /// Current values of the four shift form fields.
    fn read_shift_info(&self) -> ShiftInfo;
    fn set_loading(&self, visible: bool);
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    fn download(&self, file: &ReportFile, filename: &str) -> Result<(), String>;
    fn today(&self) -> NaiveDate;
}

/// Everything the form knows about the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub shift_info: ShiftInfo,
    pub records: Vec<TrainRecord>,
}

/// Shows the loading overlay for as long as it is alive.
pub struct LoadingGuard<'a, H: Host> {
    host: &'a H,
}

impl<'a, H: Host> LoadingGuard<'a, H> {
    pub fn show(host: &'a H) -> Self {
        host.set_loading(true);
        Self { host }
    }
}

impl<H: Host> Drop for LoadingGuard<'_, H> {
    fn drop(&mut self) {
        self.host.set_loading(false);
    }
}

/// At most one save per resource in flight. A request arriving meanwhile
/// is folded into a single follow-up save of the latest state.
#[derive(Debug, Default)]
struct SingleFlight {
    in_flight: Cell<bool>,
    pending: Cell<bool>,
}

impl SingleFlight {
    /// Returns false when a save is already running.
    fn begin(&self) -> bool {
        if self.in_flight.replace(true) {
            self.pending.set(true);
            false
        } else {
            self.pending.set(false);
            true
        }
    }

    fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    fn finish(&self) {
        self.in_flight.set(false);
    }
}

pub struct FormController<A, H> {
    api: A,
    host: H,
    state: RefCell<AppState>,
    shift_save: SingleFlight,
    records_save: SingleFlight,
}

impl<A: ShiftApi, H: Host> FormController<A, H> {
    pub fn new(api: A, host: H) -> Self {
        Self {
            api,
            host,
            state: RefCell::new(AppState::default()),
            shift_save: SingleFlight::default(),
            records_save: SingleFlight::default(),
        }
    }

    /// Page start-up: default the date field to today, then load.
    pub async fn start(&self) {
        let info = {
            let mut state = self.state.borrow_mut();
            state.shift_info.set_date(self.host.today());
            state.shift_info.clone()
        };
        self.host.show_shift_info(&info);
        self.load_data().await;
    }

    /// Replace local state with the server's. The shift info and the record
    /// list load independently; a failure on either is logged and leaves that
    /// part of the form as it was.
    pub async fn load_data(&self) {
        match self.api.get_shift_info().await {
            Ok(info) => {
                self.state.borrow_mut().shift_info = info.clone();
                self.host.show_shift_info(&info);
            }
            Err(e) => error!("Failed to load shift info: {}", e),
        }

        match self.api.get_records().await {
            Ok(records) => {
                self.state.borrow_mut().records = records.clone();
                self.host.render_records(&records);
                self.refresh_stats().await;
            }
            Err(e) => error!("Failed to load trains: {}", e),
        }
    }

    /// Persist the shift form. Fire-and-forget.
    pub async fn save_shift_info(&self) {
        self.state.borrow_mut().shift_info = self.host.read_shift_info();

        if !self.shift_save.begin() {
            debug!("Shift info save already in flight, coalescing");
            return;
        }
        loop {
            let snapshot = self.state.borrow().shift_info.clone();
            if let Err(e) = self.api.save_shift_info(&snapshot).await {
                error!("Failed to save shift info: {}", e);
            }
            if !self.shift_save.take_pending() {
                break;
            }
        }
        self.shift_save.finish();
    }

    /// Persist the full record list, then refresh stats. Fire-and-forget.
    pub async fn save_records(&self) {
        if !self.records_save.begin() {
            debug!("Records save already in flight, coalescing");
            return;
        }
        loop {
            let snapshot = self.state.borrow().records.clone();
            match self.api.save_records(&snapshot).await {
                Ok(()) => self.refresh_stats().await,
                Err(e) if e.is_status() => {
                    error!("Failed to save records: {}", e);
                    self.refresh_stats().await;
                }
                Err(e) => error!("Failed to save records: {}", e),
            }
            if !self.records_save.take_pending() {
                break;
            }
        }
        self.records_save.finish();
    }

    /// Apply an inline edit. Actual-time edits go through the server's
    /// status classification first.
    pub async fn update_field(&self, index: usize, field: RecordField, value: String) {
        if field.triggers_status() {
            self.update_field_with_status(index, field, value).await;
        } else {
            self.update_plain_field(index, field, value).await;
        }
    }

    fn set_field(&self, index: usize, field: RecordField, value: String) -> Option<TrainRecord> {
        let mut state = self.state.borrow_mut();
        match state.records.get_mut(index) {
            Some(record) => {
                record.set(field, value);
                Some(record.clone())
            }
            None => {
                warn!("Ignoring edit of {} on missing record {}", field.key(), index);
                None
            }
        }
    }

    async fn update_plain_field(&self, index: usize, field: RecordField, value: String) {
        if self.set_field(index, field, value).is_some() {
            self.save_records().await;
        }
    }

    async fn update_field_with_status(&self, index: usize, field: RecordField, value: String) {
        let Some(record) = self.set_field(index, field, value) else {
            return;
        };

        match self.api.calculate_status(&record).await {
            Ok(updated) => {
                let records = {
                    let mut state = self.state.borrow_mut();
                    match state.records.get_mut(index) {
                        Some(slot) => {
                            *slot = updated;
                            Some(state.records.clone())
                        }
                        None => None,
                    }
                };
                match records {
                    Some(records) => self.host.render_records(&records),
                    None => warn!("Record {} disappeared while its status was computed", index),
                }
            }
            Err(e) => error!("Failed to calculate status: {}", e),
        }

        self.save_records().await;
    }

    pub async fn refresh_stats(&self) {
        match self.api.get_stats().await {
            Ok(stats) => self.host.show_stats(&stats),
            Err(e) => error!("Failed to update statistics: {}", e),
        }
    }

    /// Ask the server for a document and hand it to the browser as a download.
    pub async fn generate_report(&self, kind: ReportKind) {
        let _loading = LoadingGuard::show(&self.host);

        match self.api.generate_report(kind).await {
            Ok(file) => {
                let filename = kind.filename(self.host.today());
                if let Err(e) = self.host.download(&file, &filename) {
                    error!("Failed to download {}: {}", filename, e);
                    self.host.alert(report_failure_message(kind));
                }
            }
            Err(e) => {
                error!("Failed to generate {:?} report: {}", kind, e);
                self.host.alert(report_failure_message(kind));
            }
        }
    }

    /// Explicit save of both resources. Unlike the background saves, errors
    /// reach the user.
    pub async fn save_all(&self) {
        let _loading = LoadingGuard::show(&self.host);

        match self.try_save_all().await {
            Ok(()) => self.host.alert(SAVE_SUCCESS),
            Err(e) => {
                error!("Failed to save data: {}", e);
                self.host.alert(SAVE_FAILURE);
            }
        }
    }

    async fn try_save_all(&self) -> Result<(), ApiError> {
        let info = self.host.read_shift_info();
        self.state.borrow_mut().shift_info = info.clone();
        self.api.save_shift_info(&info).await?;

        let records = self.state.borrow().records.clone();
        self.api.save_records(&records).await?;
        self.refresh_stats().await;
        Ok(())
    }

    pub async fn add_record(&self) {
        match self.api.add_record().await {
            Ok(()) => self.load_data().await,
            Err(e) => error!("Failed to add train: {}", e),
        }
    }

    pub async fn remove_record(&self, index: usize) {
        if !self.host.confirm(CONFIRM_REMOVE) {
            return;
        }
        match self.api.remove_record(index).await {
            Ok(()) => self.load_data().await,
            Err(e) => error!("Failed to remove train {}: {}", index, e),
        }
    }

    pub async fn clear_all(&self) {
        if !self.host.confirm(CONFIRM_CLEAR) {
            return;
        }
        match self.api.clear_data().await {
            Ok(()) => self.load_data().await,
            Err(e) => error!("Failed to clear data: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        GetShiftInfo,
        SaveShiftInfo(ShiftInfo),
        GetRecords,
        SaveRecords(Vec<TrainRecord>),
        AddRecord,
        RemoveRecord(usize),
        CalculateStatus(TrainRecord),
        ClearData,
        GetStats,
        GenerateReport(ReportKind),
    }

    #[derive(Debug, Clone, Copy)]
    enum Failure {
        Network,
        Status,
    }

    /// In-memory backend that records every request.
    #[derive(Default)]
    struct MockApi {
        calls: RefCell<Vec<Call>>,
        info: RefCell<ShiftInfo>,
        records: RefCell<Vec<TrainRecord>>,
        stats: Cell<Stats>,
        failing: RefCell<HashSet<&'static str>>,
        failure: Cell<Option<Failure>>,
        yield_on_save: Cell<bool>,
    }

    impl MockApi {
        fn with_records(records: Vec<TrainRecord>) -> Self {
            let api = Self::default();
            *api.records.borrow_mut() = records;
            api
        }

        fn fail(&self, op: &'static str, failure: Failure) {
            self.failing.borrow_mut().insert(op);
            self.failure.set(Some(failure));
        }

        fn check(&self, op: &'static str) -> Result<(), ApiError> {
            if !self.failing.borrow().contains(op) {
                return Ok(());
            }
            match self.failure.get() {
                Some(Failure::Status) => Err(ApiError::Status {
                    status: 500,
                    url: format!("/api/{}", op),
                }),
                _ => Err(ApiError::Network("connection refused".to_string())),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.borrow().iter().filter(|c| pred(c)).count()
        }

        fn stats_calls(&self) -> usize {
            self.count(|c| *c == Call::GetStats)
        }

        fn status_calls(&self) -> usize {
            self.count(|c| matches!(c, Call::CalculateStatus(_)))
        }
    }

    impl ShiftApi for MockApi {
        async fn get_shift_info(&self) -> Result<ShiftInfo, ApiError> {
            self.calls.borrow_mut().push(Call::GetShiftInfo);
            self.check("info-turno")?;
            Ok(self.info.borrow().clone())
        }

        async fn save_shift_info(&self, info: &ShiftInfo) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::SaveShiftInfo(info.clone()));
            if self.yield_on_save.get() {
                tokio::task::yield_now().await;
            }
            self.check("save-info-turno")?;
            *self.info.borrow_mut() = info.clone();
            Ok(())
        }

        async fn get_records(&self) -> Result<Vec<TrainRecord>, ApiError> {
            self.calls.borrow_mut().push(Call::GetRecords);
            self.check("trens")?;
            Ok(self.records.borrow().clone())
        }

        async fn save_records(&self, records: &[TrainRecord]) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::SaveRecords(records.to_vec()));
            if self.yield_on_save.get() {
                tokio::task::yield_now().await;
            }
            self.check("save-trens")?;
            *self.records.borrow_mut() = records.to_vec();
            Ok(())
        }

        async fn add_record(&self) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::AddRecord);
            self.check("trens/adicionar")?;
            self.records.borrow_mut().push(TrainRecord {
                departure_status: "para_circular".to_string(),
                arrival_status: "para_circular".to_string(),
                ..TrainRecord::default()
            });
            Ok(())
        }

        async fn remove_record(&self, index: usize) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::RemoveRecord(index));
            self.check("remove-trem")?;
            let mut records = self.records.borrow_mut();
            if index >= records.len() {
                return Err(ApiError::Status {
                    status: 404,
                    url: format!("/api/trens/{}", index),
                });
            }
            records.remove(index);
            Ok(())
        }

        async fn calculate_status(&self, record: &TrainRecord) -> Result<TrainRecord, ApiError> {
            self.calls.borrow_mut().push(Call::CalculateStatus(record.clone()));
            self.check("calcular-status")?;
            let mut updated = record.clone();
            if !updated.actual_departure.is_empty() {
                updated.departure_status = "atrasado".to_string();
            }
            if !updated.actual_arrival.is_empty() {
                updated.arrival_status = "ontime".to_string();
            }
            Ok(updated)
        }

        async fn clear_data(&self) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::ClearData);
            self.check("limpar-dados")?;
            self.records.borrow_mut().clear();
            Ok(())
        }

        async fn get_stats(&self) -> Result<Stats, ApiError> {
            self.calls.borrow_mut().push(Call::GetStats);
            self.check("estatisticas")?;
            Ok(self.stats.get())
        }

        async fn generate_report(&self, kind: ReportKind) -> Result<ReportFile, ApiError> {
            self.calls.borrow_mut().push(Call::GenerateReport(kind));
            self.check(match kind {
                ReportKind::Pdf => "gerar-pdf",
                ReportKind::Image => "gerar-imagem",
            })?;
            Ok(ReportFile {
                bytes: b"%PDF-1.4".to_vec(),
                content_type: kind.mime_type().to_string(),
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Render(Vec<TrainRecord>),
        ShiftInfo(ShiftInfo),
        Stats(Stats),
        Loading(bool),
        Alert(String),
        Confirm(String),
        Download(String),
    }

    struct MockHost {
        events: RefCell<Vec<Event>>,
        form: RefCell<ShiftInfo>,
        confirm_answer: Cell<bool>,
        download_fails: Cell<bool>,
    }

    impl Default for MockHost {
        fn default() -> Self {
            Self {
                events: RefCell::new(vec![]),
                form: RefCell::new(ShiftInfo::default()),
                confirm_answer: Cell::new(true),
                download_fails: Cell::new(false),
            }
        }
    }

    impl MockHost {
        fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        fn renders(&self) -> usize {
            self.events
                .borrow()
                .iter()
                .filter(|e| matches!(e, Event::Render(_)))
                .count()
        }

        fn alerts(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Event::Alert(msg) => Some(msg.clone()),
                    _ => None,
                })
                .collect()
        }

        fn loading_events(&self) -> Vec<bool> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Event::Loading(v) => Some(*v),
                    _ => None,
                })
                .collect()
        }
    }

    impl Host for MockHost {
        fn render_records(&self, records: &[TrainRecord]) {
            self.events.borrow_mut().push(Event::Render(records.to_vec()));
        }

        fn show_shift_info(&self, info: &ShiftInfo) {
            self.events.borrow_mut().push(Event::ShiftInfo(info.clone()));
        }

        fn show_stats(&self, stats: &Stats) {
            self.events.borrow_mut().push(Event::Stats(*stats));
        }

        fn read_shift_info(&self) -> ShiftInfo {
            self.form.borrow().clone()
        }

        fn set_loading(&self, visible: bool) {
            self.events.borrow_mut().push(Event::Loading(visible));
        }

        fn alert(&self, message: &str) {
            self.events.borrow_mut().push(Event::Alert(message.to_string()));
        }

        fn confirm(&self, message: &str) -> bool {
            self.events.borrow_mut().push(Event::Confirm(message.to_string()));
            self.confirm_answer.get()
        }

        fn download(&self, _file: &ReportFile, filename: &str) -> Result<(), String> {
            if self.download_fails.get() {
                return Err("anchor click blocked".to_string());
            }
            self.events.borrow_mut().push(Event::Download(filename.to_string()));
            Ok(())
        }

        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        }
    }

    fn make_record(train: &str) -> TrainRecord {
        TrainRecord {
            train_id: train.to_string(),
            origin: "Central".to_string(),
            scheduled_departure: "08:00".to_string(),
            destination: "Norte".to_string(),
            scheduled_arrival: "09:30".to_string(),
            departure_status: "para_circular".to_string(),
            arrival_status: "para_circular".to_string(),
            ..TrainRecord::default()
        }
    }

    fn make_records(n: usize) -> Vec<TrainRecord> {
        (0..n).map(|i| make_record(&format!("T-{}", 100 + i))).collect()
    }

    async fn loaded_controller(records: Vec<TrainRecord>) -> FormController<MockApi, MockHost> {
        let controller = FormController::new(MockApi::with_records(records), MockHost::default());
        controller.load_data().await;
        controller.api.calls.borrow_mut().clear();
        controller.host.events.borrow_mut().clear();
        controller
    }

    #[tokio::test]
    async fn test_start_defaults_date_then_loads() {
        let api = MockApi::with_records(make_records(2));
        api.info.borrow_mut().agent = "Ana".to_string();
        api.stats.set(Stats {
            pending_departure: 2,
            ..Stats::default()
        });
        let controller = FormController::new(api, MockHost::default());

        controller.start().await;

        let events = controller.host.events();
        match &events[0] {
            Event::ShiftInfo(info) => assert_eq!(info.date, "2026-10-19"),
            other => panic!("expected shift info first, got {:?}", other),
        }
        assert_eq!(
            controller.api.calls(),
            vec![Call::GetShiftInfo, Call::GetRecords, Call::GetStats]
        );
        let state = controller.state.borrow();
        assert_eq!(state.shift_info.agent, "Ana");
        assert_eq!(state.records.len(), 2);
        assert_eq!(controller.host.renders(), 1);
        assert!(events.contains(&Event::Stats(Stats {
            pending_departure: 2,
            ..Stats::default()
        })));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_state() {
        let controller = loaded_controller(make_records(3)).await;
        controller.api.fail("trens", Failure::Network);
        controller.api.records.borrow_mut().clear();

        controller.load_data().await;

        assert_eq!(controller.state.borrow().records.len(), 3);
        assert_eq!(controller.host.renders(), 0);
        assert_eq!(controller.api.stats_calls(), 0);
        assert!(controller.host.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_info_failure_still_loads_records() {
        let controller = loaded_controller(vec![]).await;
        controller.api.fail("info-turno", Failure::Status);
        *controller.api.records.borrow_mut() = make_records(3);

        controller.load_data().await;

        assert_eq!(
            controller.api.calls(),
            vec![Call::GetShiftInfo, Call::GetRecords, Call::GetStats]
        );
        assert_eq!(controller.state.borrow().records.len(), 3);
        assert_eq!(controller.host.renders(), 1);
        assert!(!controller
            .host
            .events()
            .iter()
            .any(|e| matches!(e, Event::ShiftInfo(_))));
    }

    #[tokio::test]
    async fn test_add_record_reloads_table_when_info_fails() {
        let controller = loaded_controller(make_records(1)).await;
        controller.api.fail("info-turno", Failure::Network);

        controller.add_record().await;

        assert_eq!(controller.state.borrow().records.len(), 2);
        assert_eq!(controller.host.renders(), 1);
        assert_eq!(controller.api.stats_calls(), 1);
    }

    #[tokio::test]
    async fn test_plain_edit_never_requests_status() {
        let controller = loaded_controller(make_records(3)).await;

        for field in RecordField::ALL.iter().filter(|f| !f.triggers_status()) {
            controller.update_field(1, *field, "x".to_string()).await;
        }

        assert_eq!(controller.api.status_calls(), 0);
        assert_eq!(controller.host.renders(), 0);
        let record = &controller.state.borrow().records[1];
        assert_eq!(record.train_id, "x");
        assert_eq!(record.notes, "x");
    }

    #[tokio::test]
    async fn test_plain_edit_saves_full_list_and_refreshes_stats_once() {
        let controller = loaded_controller(make_records(3)).await;

        controller
            .update_field(0, RecordField::Notes, "atraso na via".to_string())
            .await;

        let calls = controller.api.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            Call::SaveRecords(records) => {
                assert_eq!(records.len(), 3);
                assert_eq!(records[0].notes, "atraso na via");
            }
            other => panic!("expected records save, got {:?}", other),
        }
        assert_eq!(calls[1], Call::GetStats);
    }

    #[tokio::test]
    async fn test_actual_time_edit_recalculates_status_once() {
        let controller = loaded_controller(make_records(4)).await;

        controller
            .update_field(2, RecordField::ActualDeparture, "08:15".to_string())
            .await;

        assert_eq!(controller.api.status_calls(), 1);
        let mut expected = make_record("T-102");
        expected.actual_departure = "08:15".to_string();
        assert_eq!(controller.api.calls()[0], Call::CalculateStatus(expected.clone()));

        expected.departure_status = "atrasado".to_string();
        let state = controller.state.borrow();
        assert_eq!(state.records[2], expected);

        let events = controller.host.events();
        match &events[0] {
            Event::Render(rows) => {
                assert_eq!(rows.len(), 4);
                assert_eq!(rows[2], expected);
            }
            other => panic!("expected full re-render, got {:?}", other),
        }
        assert_eq!(controller.api.stats_calls(), 1);
    }

    #[tokio::test]
    async fn test_actual_arrival_edit_also_recalculates() {
        let controller = loaded_controller(make_records(1)).await;

        controller
            .update_field(0, RecordField::ActualArrival, "09:31".to_string())
            .await;

        assert_eq!(controller.api.status_calls(), 1);
        assert_eq!(controller.state.borrow().records[0].arrival_status, "ontime");
    }

    #[tokio::test]
    async fn test_status_failure_still_saves_edit() {
        let controller = loaded_controller(make_records(2)).await;
        controller.api.fail("calcular-status", Failure::Status);

        controller
            .update_field(1, RecordField::ActualDeparture, "08:02".to_string())
            .await;

        assert_eq!(controller.host.renders(), 0);
        let saved = controller
            .api
            .calls()
            .into_iter()
            .find_map(|c| match c {
                Call::SaveRecords(r) => Some(r),
                _ => None,
            })
            .unwrap();
        assert_eq!(saved[1].actual_departure, "08:02");
        assert_eq!(saved[1].departure_status, "para_circular");
        assert_eq!(controller.api.stats_calls(), 1);
    }

    #[tokio::test]
    async fn test_edit_of_missing_record_is_ignored() {
        let controller = loaded_controller(make_records(2)).await;

        controller
            .update_field(5, RecordField::ActualDeparture, "10:00".to_string())
            .await;
        controller.update_field(5, RecordField::Origin, "Sul".to_string()).await;

        assert!(controller.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_record_reloads_and_refreshes_stats_once() {
        let controller = loaded_controller(make_records(2)).await;

        controller.add_record().await;

        assert_eq!(
            controller.api.calls(),
            vec![Call::AddRecord, Call::GetShiftInfo, Call::GetRecords, Call::GetStats]
        );
        assert_eq!(controller.state.borrow().records.len(), 3);
    }

    #[tokio::test]
    async fn test_add_record_failure_skips_reload() {
        let controller = loaded_controller(make_records(2)).await;
        controller.api.fail("trens/adicionar", Failure::Network);

        controller.add_record().await;

        assert_eq!(controller.api.calls(), vec![Call::AddRecord]);
        assert_eq!(controller.state.borrow().records.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_record_requires_confirmation() {
        let controller = loaded_controller(make_records(3)).await;
        controller.host.confirm_answer.set(false);

        controller.remove_record(1).await;

        assert_eq!(
            controller.host.events(),
            vec![Event::Confirm(CONFIRM_REMOVE.to_string())]
        );
        assert!(controller.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_remove_record_confirmed_deletes_by_index() {
        let controller = loaded_controller(make_records(3)).await;

        controller.remove_record(1).await;

        assert_eq!(controller.api.calls()[0], Call::RemoveRecord(1));
        assert_eq!(controller.api.stats_calls(), 1);
        let state = controller.state.borrow();
        let trains: Vec<_> = state.records.iter().map(|r| r.train_id.as_str()).collect();
        assert_eq!(trains, vec!["T-100", "T-102"]);
    }

    #[tokio::test]
    async fn test_clear_all_confirmed_wipes_and_reloads() {
        let controller = loaded_controller(make_records(3)).await;

        controller.clear_all().await;

        assert_eq!(
            controller.host.events()[0],
            Event::Confirm(CONFIRM_CLEAR.to_string())
        );
        assert_eq!(controller.api.calls()[0], Call::ClearData);
        assert_eq!(controller.api.stats_calls(), 1);
        assert!(controller.state.borrow().records.is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_declined_sends_nothing() {
        let controller = loaded_controller(make_records(3)).await;
        controller.host.confirm_answer.set(false);

        controller.clear_all().await;

        assert!(controller.api.calls().is_empty());
        assert_eq!(controller.state.borrow().records.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_pdf_downloads_with_dated_name() {
        let controller = loaded_controller(vec![]).await;

        controller.generate_report(ReportKind::Pdf).await;

        assert_eq!(
            controller.host.events(),
            vec![
                Event::Loading(true),
                Event::Download("relatorio_trens_2026-10-19.pdf".to_string()),
                Event::Loading(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_image_failure_alerts_and_hides_loading() {
        let controller = loaded_controller(vec![]).await;
        controller.api.fail("gerar-imagem", Failure::Status);

        controller.generate_report(ReportKind::Image).await;

        assert_eq!(
            controller.host.events(),
            vec![
                Event::Loading(true),
                Event::Alert("Erro ao gerar imagem".to_string()),
                Event::Loading(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_download_failure_alerts() {
        let controller = loaded_controller(vec![]).await;
        controller.host.download_fails.set(true);

        controller.generate_report(ReportKind::Pdf).await;

        assert_eq!(controller.host.alerts(), vec!["Erro ao gerar PDF".to_string()]);
        assert_eq!(controller.host.loading_events(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_loading_always_paired() {
        let controller = loaded_controller(make_records(1)).await;
        controller.generate_report(ReportKind::Pdf).await;
        controller.api.fail("gerar-pdf", Failure::Network);
        controller.generate_report(ReportKind::Pdf).await;
        controller.save_all().await;
        controller.api.fail("save-trens", Failure::Status);
        controller.save_all().await;

        let loading = controller.host.loading_events();
        assert_eq!(loading.len(), 8);
        for pair in loading.chunks(2) {
            assert_eq!(pair, &[true, false]);
        }
    }

    #[tokio::test]
    async fn test_save_all_success() {
        let controller = loaded_controller(make_records(2)).await;
        controller.host.form.borrow_mut().agent = "Bruno".to_string();

        controller.save_all().await;

        let calls = controller.api.calls();
        match &calls[0] {
            Call::SaveShiftInfo(info) => assert_eq!(info.agent, "Bruno"),
            other => panic!("expected shift info save first, got {:?}", other),
        }
        assert!(matches!(calls[1], Call::SaveRecords(_)));
        assert_eq!(calls[2], Call::GetStats);
        assert_eq!(controller.host.alerts(), vec![SAVE_SUCCESS.to_string()]);
    }

    #[tokio::test]
    async fn test_save_all_stops_on_shift_info_failure() {
        let controller = loaded_controller(make_records(2)).await;
        controller.api.fail("save-info-turno", Failure::Network);

        controller.save_all().await;

        assert_eq!(controller.api.calls().len(), 1);
        assert_eq!(controller.host.alerts(), vec![SAVE_FAILURE.to_string()]);
    }

    #[tokio::test]
    async fn test_save_records_network_failure_skips_stats() {
        let controller = loaded_controller(make_records(1)).await;
        controller.api.fail("save-trens", Failure::Network);

        controller.save_records().await;

        assert_eq!(controller.api.stats_calls(), 0);
        assert!(controller.host.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_save_records_error_status_still_refreshes_stats() {
        let controller = loaded_controller(make_records(1)).await;
        controller.api.fail("save-trens", Failure::Status);

        controller.save_records().await;

        assert_eq!(controller.api.stats_calls(), 1);
        assert!(controller.host.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_save_shift_info_reads_form() {
        let controller = loaded_controller(vec![]).await;
        *controller.host.form.borrow_mut() = ShiftInfo {
            agent: "Carla".to_string(),
            date: "2026-10-18".to_string(),
            holiday: crate::model::Holiday::Yes,
            shift: crate::model::ShiftPeriod::Night,
        };

        controller.save_shift_info().await;

        let form = controller.host.form.borrow().clone();
        assert_eq!(controller.api.calls(), vec![Call::SaveShiftInfo(form.clone())]);
        assert_eq!(controller.state.borrow().shift_info, form);
    }

    #[tokio::test]
    async fn test_rapid_saves_are_coalesced() {
        let controller = loaded_controller(make_records(2)).await;
        controller.api.yield_on_save.set(true);

        let first = async {
            controller
                .update_field(0, RecordField::Origin, "A".to_string())
                .await
        };
        let second = async {
            controller
                .update_field(0, RecordField::Origin, "B".to_string())
                .await
        };
        let third = async {
            controller
                .update_field(1, RecordField::Notes, "C".to_string())
                .await
        };
        tokio::join!(first, second, third);

        let saves: Vec<Vec<TrainRecord>> = controller
            .api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SaveRecords(r) => Some(r),
                _ => None,
            })
            .collect();
        assert_eq!(saves.len(), 2);
        let last = saves.last().unwrap();
        assert_eq!(last[0].origin, "B");
        assert_eq!(last[1].notes, "C");
        assert_eq!(*controller.api.records.borrow(), *last);
    }

    #[tokio::test]
    async fn test_rapid_shift_info_saves_are_coalesced() {
        let controller = loaded_controller(vec![]).await;
        controller.api.yield_on_save.set(true);

        let first = async {
            controller.host.form.borrow_mut().agent = "Ana".to_string();
            controller.save_shift_info().await
        };
        let second = async {
            controller.host.form.borrow_mut().agent = "Bruno".to_string();
            controller.save_shift_info().await
        };
        let third = async {
            controller.host.form.borrow_mut().agent = "Carla".to_string();
            controller.save_shift_info().await
        };
        tokio::join!(first, second, third);

        let agents: Vec<String> = controller
            .api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SaveShiftInfo(info) => Some(info.agent),
                _ => None,
            })
            .collect();
        assert_eq!(agents, vec!["Ana".to_string(), "Carla".to_string()]);
        assert_eq!(controller.api.info.borrow().agent, "Carla");
        assert_eq!(controller.state.borrow().shift_info.agent, "Carla");
    }
}
