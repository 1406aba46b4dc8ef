//! Benchmarks for the text report parsers
//!
//! Signoff timing reports grow with the number of reported paths. These benchmarks build
//! synthetic `max.rpt` and `power.rpt` files of increasing size and measure the parsers on
//! them, including the worst case where the markers only appear at the end.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use flowmetrics::extract::{power::parse_power_report, timing::parse_timing_report};

/// Number of timing paths in each synthetic report
const PATH_COUNTS: &[usize] = &[1, 100, 1_000, 10_000];

/// Build a setup report with `paths` paths, the worst one first
fn timing_report(paths: usize) -> String {
    let mut report = String::from("report_checks -path_delay max (Setup)\n");
    for i in 0..paths {
        let arrival = 8.0 + i as f64 * 0.001;
        report.push_str(&format!(
            "Startpoint: _{i}_ (rising edge-triggered flip-flop clocked by clk)\n\
             \x20                 {arrival:.6}   data arrival time\n\
             \x20                20.000000   data required time\n\
             \x20                {:.6}   slack (MET)\n\n",
            20.0 - arrival
        ));
    }
    report
}

/// Build a power report whose `Total` row follows `groups` group rows
fn power_report(groups: usize) -> String {
    let mut report = String::from("Group Internal Switching Leakage Total\n");
    for i in 0..groups {
        report.push_str(&format!(
            "Group{i} 1.20e-04 1.31e-05 1.02e-09 1.33e-04 0.1%\n"
        ));
    }
    report.push_str("Total 2.06e-04 1.36e-04 4.00e-09 3.42e-04 100.0%\n");
    report
}

/// Benchmark the timing parser, which stops at the first path
fn bench_timing_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing_report");

    for &paths in PATH_COUNTS {
        let report = timing_report(paths);
        group.throughput(Throughput::Bytes(report.len() as u64));

        group.bench_with_input(BenchmarkId::new("first_path", paths), &report, |b, report| {
            b.iter(|| black_box(parse_timing_report(black_box(report))))
        });
    }

    // No slack anywhere forces a full scan
    for &paths in PATH_COUNTS {
        let report = timing_report(paths).replace("slack", "margin");
        group.throughput(Throughput::Bytes(report.len() as u64));

        group.bench_with_input(BenchmarkId::new("full_scan", paths), &report, |b, report| {
            b.iter(|| black_box(parse_timing_report(black_box(report))))
        });
    }

    group.finish();
}

/// Benchmark the power parser with the `Total` row at the end
fn bench_power_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("power_report");

    for &groups in PATH_COUNTS {
        let report = power_report(groups);
        group.throughput(Throughput::Bytes(report.len() as u64));

        group.bench_with_input(BenchmarkId::new("total_row", groups), &report, |b, report| {
            b.iter(|| black_box(parse_power_report(black_box(report))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_timing_parser, bench_power_parser);

criterion_main!(benches);
