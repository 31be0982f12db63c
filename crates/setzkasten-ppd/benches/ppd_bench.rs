// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parser benchmarks — a driver tree holds a few thousand PPDs, so
// per-file parse cost dominates a cold index build.

use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use setzkasten_ppd::info::DriverInfo;
use setzkasten_ppd::parser::parse_ppd_reader;

/// A realistic header followed by the capability body the parser skips.
fn sample_ppd() -> String {
    let mut text = String::from(
        "*PPD-Adobe: \"4.3\"\n\
         *FormatVersion: \"4.3\"\n\
         *FileVersion: \"1.1\"\n\
         *LanguageVersion: English\n\
         *Manufacturer: \"Hewlett-Packard\"\n\
         *ModelName: \"HP LaserJet 4\"\n\
         *NickName: \"HP LaserJet 4 Postscript\"\n\
         *Product: \"(LaserJet 4)\"\n",
    );
    for i in 0..400 {
        text.push_str(&format!(
            "*PageSize Size{i}: \"<</PageSize[595 842]>>setpagedevice\"\n"
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = sample_ppd();

    c.bench_function("parse_ppd_header", |b| {
        b.iter(|| {
            let header =
                parse_ppd_reader(Cursor::new(black_box(text.as_bytes())), "bench").unwrap();
            black_box(header)
        })
    });

    let header = parse_ppd_reader(Cursor::new(text.as_bytes()), "bench").unwrap();
    c.bench_function("derive_driver_info", |b| {
        b.iter(|| black_box(DriverInfo::derive(black_box(&header), "hp4.ppd")))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
