mod common;

use common::{event_header, momentum, synthetic_trace, timestep_block};
use pretty_assertions::assert_eq;
use urqmd_trace::commands::{execute_parse, execute_run, ParseArgs, RunArgs};
use urqmd_trace::output::parquet::{event_column, float_column};
use urqmd_trace::output::{read_event_table, WriteOutcome};
use urqmd_trace::parser::{
    extract_event, normalize_line, ColumnSet, EtaPolicy, ExtractOptions, NoopObserver, ParsePolicy,
    SliceProgress, Trace,
};
use urqmd_trace::utils::error::ParseError;

fn eta_of(px: f64, py: f64, pz: f64) -> f64 {
    let p = (px * px + py * py + pz * pz).sqrt();
    ((p + pz) / (p - pz)).ln()
}

#[test]
fn test_out_of_range_before_extraction() {
    let trace = Trace::from_text(&synthetic_trace(2, 3, 2, 5.0));
    let mut calls = 0;
    let mut observer = |_: &SliceProgress| calls += 1;

    let err = extract_event(&trace, 3, &ExtractOptions::default(), &mut observer).unwrap_err();

    assert_eq!(
        err,
        ParseError::OutOfRange {
            requested: 3,
            available: 2
        }
    );
    assert_eq!(calls, 0);
}

#[test]
fn test_huge_slice_count_fails_without_panic() {
    let mut text = String::new();
    for event in 1..=3 {
        text.push_str(&event_header(event, 1e30, 1.0));
        text.push_str(&timestep_block(1, 1.0, 0));
    }
    let trace = Trace::from_text(&text);

    let first = extract_event(&trace, 1, &ExtractOptions::default(), &mut NoopObserver).unwrap();
    assert_eq!(first.table.slice_count(), 3);

    let err = extract_event(&trace, 3, &ExtractOptions::default(), &mut NoopObserver).unwrap_err();
    assert!(matches!(err, ParseError::InvalidTimestep { .. }));
}

#[test]
fn test_second_event_of_two() {
    let n = 4;
    let trace = Trace::from_text(&synthetic_trace(2, 3, n, 5.0));

    let extraction = extract_event(&trace, 2, &ExtractOptions::default(), &mut NoopObserver).unwrap();

    assert_eq!(extraction.slices_requested, 3);
    assert_eq!(extraction.table.slice_count(), 3);
    for slice in extraction.table.slices() {
        assert_eq!(slice.len(), n);
        assert!(slice.records.iter().all(|r| r.nev == 2));
    }

    let times: Vec<f64> = extraction.table.slices().iter().filter_map(|s| s.time).collect();
    assert_eq!(times, vec![5.0, 10.0, 15.0]);
}

#[test]
fn test_emits_exactly_slices_per_event() {
    // Header says 10 / 5 = 2 slices, the event carries 4 timesteps.
    let mut text = event_header(1, 10.0, 5.0);
    for step in 0..4 {
        text.push_str(&timestep_block(1, (step + 1) as f64 * 5.0, step));
    }
    let trace = Trace::from_text(&text);

    let mut notified = Vec::new();
    let mut observer = |p: &SliceProgress| notified.push(p.completed);
    let extraction = extract_event(&trace, 1, &ExtractOptions::default(), &mut observer).unwrap();

    assert_eq!(extraction.table.slice_count(), 2);
    assert_eq!(notified, vec![1, 2]);
}

#[test]
fn test_eta_matches_formula() {
    let trace = Trace::from_text(&synthetic_trace(1, 3, 5, 5.0));
    let extraction = extract_event(&trace, 1, &ExtractOptions::default(), &mut NoopObserver).unwrap();

    for (step, slice) in extraction.table.slices().iter().enumerate() {
        for (i, record) in slice.records.iter().enumerate() {
            let (px, py, pz) = momentum(step, i);
            assert!((record.eta - eta_of(px, py, pz)).abs() < 1e-9);
            assert!((record.momentum() - (px * px + py * py + pz * pz).sqrt()).abs() < 1e-12);
        }
    }
}

fn beam_axis_trace() -> Trace {
    let mut text = event_header(1, 5.0, 5.0);
    text.push_str("2 5\n0 0 0 0 0 0 0 0\n");
    text.push_str("5 0 0 0 3.0 0 0 3.0 0.938 1 1 1 0 0 0\n");
    text.push_str("5 0 0 0 3.0 0.1 0.1 3.0 0.938 1 1 1 0 0 0\n");
    Trace::from_text(&text)
}

#[test]
fn test_beam_axis_sentinel_policy() {
    let extraction =
        extract_event(&beam_axis_trace(), 1, &ExtractOptions::default(), &mut NoopObserver).unwrap();

    let records = &extraction.table.slices()[0].records;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].eta, -999.0);
    assert!(records[1].eta.is_finite());
    assert_eq!(extraction.undefined_eta, 1);
}

#[test]
fn test_beam_axis_error_policy_strict_and_lenient() {
    let strict = ExtractOptions {
        eta_policy: EtaPolicy::Error,
        ..ExtractOptions::default()
    };
    let err = extract_event(&beam_axis_trace(), 1, &strict, &mut NoopObserver).unwrap_err();
    assert_eq!(err, ParseError::UndefinedEta { row: 8 });

    let lenient = ExtractOptions {
        eta_policy: EtaPolicy::Error,
        parse_policy: ParsePolicy::Lenient,
        ..ExtractOptions::default()
    };
    let extraction = extract_event(&beam_axis_trace(), 1, &lenient, &mut NoopObserver).unwrap();
    assert_eq!(extraction.table.slice_count(), 0);
    assert_eq!(extraction.skipped.len(), 1);
}

#[test]
fn test_concrete_two_slice_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace_reduced.csv");

    let mut text = event_header(1, 10.0, 5.0);
    text.push_str(&timestep_block(2, 5.0, 0));
    text.push_str(&timestep_block(2, 10.0, 1));
    text.push_str(&synthetic_trace(1, 2, 2, 5.0));
    std::fs::write(&input, text).unwrap();

    let output = dir.path().join("event_1.parquet");
    let args = ParseArgs {
        input,
        event_number: 1,
        output: output.clone(),
        ..ParseArgs::default()
    };
    let report = execute_parse(&args).unwrap();

    assert_eq!(report.slices_requested, 2);
    assert!(matches!(report.outcome, WriteOutcome::Written { rows: 4, .. }));

    let batches = read_event_table(&output).unwrap();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 4);

    let names: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(names, vec!["t", "x", "y", "z", "m", "ityp", "eta", "nev"]);

    let t = float_column(batch, "t").unwrap();
    assert_eq!(t.values().to_vec(), vec![5.0, 5.0, 10.0, 10.0]);
    assert!(event_column(batch).unwrap().values().iter().all(|&nev| nev == 1));

    let eta = float_column(batch, "eta").unwrap();
    for row in 0..4 {
        let (px, py, pz) = momentum(row / 2, row % 2);
        assert!((eta.value(row) - eta_of(px, py, pz)).abs() < 1e-9);
    }
}

#[test]
fn test_parse_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace_reduced.csv");
    std::fs::write(&input, synthetic_trace(2, 3, 3, 5.0)).unwrap();

    let output = dir.path().join("event_2.parquet");
    let args = ParseArgs {
        input,
        event_number: 2,
        output: output.clone(),
        columns: ColumnSet::Full,
        ..ParseArgs::default()
    };

    execute_parse(&args).unwrap();
    let first = read_event_table(&output).unwrap();
    execute_parse(&args).unwrap();
    let second = read_event_table(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_out_of_range_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace_reduced.csv");
    std::fs::write(&input, synthetic_trace(1, 2, 2, 5.0)).unwrap();

    let output = dir.path().join("event_5.parquet");
    let args = ParseArgs {
        input,
        event_number: 5,
        output: output.clone(),
        ..ParseArgs::default()
    };

    let err = execute_parse(&args).unwrap_err();
    assert!(err.chain().any(|e| e.to_string().contains("out of range")));
    assert!(!output.exists());
}

#[test]
fn test_event_without_slices_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace_reduced.csv");
    std::fs::write(&input, event_header(1, 10.0, 5.0)).unwrap();

    let output = dir.path().join("event_1.parquet");
    let args = ParseArgs {
        input,
        event_number: 1,
        output: output.clone(),
        ..ParseArgs::default()
    };

    let report = execute_parse(&args).unwrap();
    assert_eq!(report.outcome, WriteOutcome::NoData);
    assert!(!output.exists());
}

#[test]
fn test_particle_free_slices_write_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trace_reduced.csv");
    let mut text = event_header(1, 10.0, 5.0);
    text.push_str(&timestep_block(0, 5.0, 0));
    text.push_str(&timestep_block(0, 10.0, 1));
    std::fs::write(&input, text).unwrap();

    let output = dir.path().join("event_1.parquet");
    let args = ParseArgs {
        input,
        event_number: 1,
        output: output.clone(),
        ..ParseArgs::default()
    };

    let report = execute_parse(&args).unwrap();
    assert!(matches!(report.outcome, WriteOutcome::Written { rows: 0, .. }));

    let rows: usize = read_event_table(&output)
        .unwrap()
        .iter()
        .map(|b| b.num_rows())
        .sum();
    assert_eq!(rows, 0);
}

#[test]
fn test_normalizer_idempotence() {
    let raw = "     0.500E+01  0.1234E+01   -0.2E+00  0.0   ";
    let once = normalize_line(raw);
    assert_eq!(once, "0.500E+01 0.1234E+01 -0.2E+00 0.0");
    assert_eq!(normalize_line(&once), once);
}

#[test]
fn test_run_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("urqmd_1_14.f14");

    // Pad every field the way raw file-14 output does.
    let padded: String = synthetic_trace(2, 3, 2, 5.0)
        .lines()
        .map(|line| format!("  {}   \n", line.replace(' ', "    ")))
        .collect();
    std::fs::write(&input, padded).unwrap();

    let args = RunArgs {
        input,
        event_number: 2,
        event_name: "event".to_string(),
        parquet_folder: dir.path().join("parquet"),
        csv_folder: dir.path().join("csv"),
        columns: ColumnSet::Standard,
        parse_policy: ParsePolicy::Strict,
        eta_policy: EtaPolicy::default(),
        max_bytes: None,
        show_progress: false,
    };
    execute_run(&args).unwrap();

    assert!(dir.path().join("urqmd_1_14_reduced.csv").exists());
    assert!(dir.path().join("parquet/event_2.parquet").exists());
    for frame in 0..3 {
        let csv = dir.path().join(format!("csv/event2_frame_{frame}.csv"));
        let content = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
