//! Performance benchmarks for libpkgres.
//!
//! Run with: cargo bench -p libpkgres
//!
//! Covers:
//! - .pc file parsing
//! - Variable substitution
//! - Version comparison
//! - Spec list scanning

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::collections::HashMap;

use libpkgres::dependency::parse_spec_list;
use libpkgres::pcfile::parse_pc_file_lines;
use libpkgres::substitute::substitute;
use libpkgres::version::VersionValue;

const GLIB_LIKE: &[&str] = &[
    "prefix=/usr",
    "exec_prefix=${prefix}",
    "libdir=${exec_prefix}/lib",
    "includedir=${prefix}/include",
    "datadir=${prefix}/share",
    "",
    "Name: GLib",
    "Description: C Utility Library",
    "Version: 2.76.1",
    "Requires: libpcre2-8 >= 10.32",
    "Requires.private: libffi",
    "Libs: -L${libdir} -lglib-2.0",
    "Libs.private: -lm",
    "Cflags: -I${includedir}/glib-2.0 -I${libdir}/glib-2.0/include",
    "URL: https://www.gtk.org",
];

fn bench_parse_pc_lines(c: &mut Criterion) {
    let globals = HashMap::new();
    c.bench_function("parse/glib-like", |b| {
        b.iter(|| {
            let record = parse_pc_file_lines(black_box(GLIB_LIKE), &globals).unwrap();
            black_box(record);
        });
    });
}

fn bench_substitute(c: &mut Criterion) {
    let mut vars = HashMap::new();
    vars.insert("prefix".to_string(), "/usr".to_string());
    vars.insert("libdir".to_string(), "/usr/lib".to_string());
    vars.insert("includedir".to_string(), "/usr/include".to_string());
    let globals = HashMap::new();

    c.bench_function("substitute/three-refs", |b| {
        b.iter(|| {
            let out = substitute(
                black_box("-I${includedir} -L${libdir} -Wl,-rpath,${prefix}/lib"),
                &vars,
                &globals,
            )
            .unwrap();
            black_box(out);
        });
    });
}

fn bench_version_compare(c: &mut Criterion) {
    c.bench_function("version/parse-and-compare", |b| {
        b.iter(|| {
            let a = VersionValue::parse(black_box("2.76.1"));
            let b_ = VersionValue::parse(black_box("2.75.0"));
            black_box(a > b_);
        });
    });

    let a = VersionValue::parse("3.22.19");
    let b_ = VersionValue::parse("3.22.2");
    c.bench_function("version/compare-parsed", |b| {
        b.iter(|| black_box(black_box(&a) > black_box(&b_)));
    });
}

fn bench_spec_list(c: &mut Criterion) {
    c.bench_function("speclist/mixed", |b| {
        b.iter(|| {
            let deps = parse_spec_list(black_box(
                "glib-2.0 >= 2.50, gio-2.0, gtk+-3.0 = 3.24.0 zlib != 1.2.11",
            ));
            black_box(deps);
        });
    });
}

criterion_group!(
    benches,
    bench_parse_pc_lines,
    bench_substitute,
    bench_version_compare,
    bench_spec_list
);
criterion_main!(benches);
