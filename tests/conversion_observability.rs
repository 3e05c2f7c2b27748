mod common;

use std::sync::{Arc, Mutex};

use common::{tmp_file, write_trips, write_trips_without_tpep};
use parquet_csv_converter::convert::{convert, ConvertOptions, ConvertReport};
use parquet_csv_converter::observability::{
    ConversionContext, ConversionObserver, ConversionSeverity, ConversionStage, FileObserver, StageStats,
};
use parquet_csv_converter::processing::MissingColumnPolicy;
use parquet_csv_converter::ConvertError;

#[derive(Default)]
struct RecordingObserver {
    stages: Mutex<Vec<(ConversionStage, StageStats)>>,
    successes: Mutex<usize>,
    failures: Mutex<Vec<ConversionSeverity>>,
    alerts: Mutex<Vec<ConversionSeverity>>,
}

impl ConversionObserver for RecordingObserver {
    fn on_stage(&self, _ctx: &ConversionContext, stage: ConversionStage, stats: StageStats) {
        self.stages.lock().unwrap().push((stage, stats));
    }

    fn on_success(&self, _ctx: &ConversionContext, _report: &ConvertReport) {
        *self.successes.lock().unwrap() += 1;
    }

    fn on_failure(&self, _ctx: &ConversionContext, severity: ConversionSeverity, _error: &ConvertError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ConversionContext, severity: ConversionSeverity, _error: &ConvertError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_sees_each_stage_in_order() {
    let input = tmp_file("obs-stages", "parquet");
    let output = tmp_file("obs-stages", "csv");
    write_trips(&input);

    let obs = Arc::new(RecordingObserver::default());
    convert(ConvertOptions {
        input: input.clone(),
        output: output.clone(),
        observer: Some(obs.clone()),
        ..Default::default()
    })
    .unwrap();

    let stages = obs.stages.lock().unwrap().clone();
    let names: Vec<ConversionStage> = stages.iter().map(|(s, _)| *s).collect();
    assert_eq!(
        names,
        vec![
            ConversionStage::Loaded,
            ConversionStage::Renamed,
            ConversionStage::Tagged,
            ConversionStage::Written,
        ]
    );
    assert_eq!(stages[0].1, StageStats { rows: 3, columns: 3 });
    assert_eq!(stages[3].1, StageStats { rows: 3, columns: 4 });
    assert_eq!(*obs.successes.lock().unwrap(), 1);
    assert!(obs.failures.lock().unwrap().is_empty());

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn observer_receives_failure_and_alert_on_missing_input() {
    let obs = Arc::new(RecordingObserver::default());
    let _ = convert(ConvertOptions {
        input: tmp_file("obs-missing", "parquet"),
        output: tmp_file("obs-missing", "csv"),
        observer: Some(obs.clone()),
        alert_at_or_above: ConversionSeverity::Critical,
        ..Default::default()
    })
    .unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![ConversionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![ConversionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_strict_mismatch() {
    let input = tmp_file("obs-strict", "parquet");
    write_trips_without_tpep(&input);

    let obs = Arc::new(RecordingObserver::default());
    let _ = convert(ConvertOptions {
        input: input.clone(),
        output: tmp_file("obs-strict", "csv"),
        missing_columns: MissingColumnPolicy::Fail,
        observer: Some(obs.clone()),
        ..Default::default()
    })
    .unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![ConversionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());

    let _ = std::fs::remove_file(&input);
}

#[test]
fn file_observer_appends_one_line_per_event() {
    let input = tmp_file("obs-file", "parquet");
    let output = tmp_file("obs-file", "csv");
    let log = tmp_file("obs-file", "log");
    write_trips(&input);

    convert(ConvertOptions {
        input: input.clone(),
        output: output.clone(),
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    })
    .unwrap();

    let text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // four stages + success
    assert_eq!(lines.len(), 5);
    assert!(lines[0].contains("stage=Loaded"));
    assert!(lines[4].contains("ok report="));
    assert!(lines[4].contains("\"rows_written\":3"));

    for p in [&input, &output, &log] {
        let _ = std::fs::remove_file(p);
    }
}
