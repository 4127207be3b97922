use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use unbare_core::{rewrite_with, scan_declarations, OsFileSystem, RewriteOptions};

/// Source with `n` declarations mixing bare, relative and built-in specifiers,
/// plus comments and strings the scanner has to skip.
fn source(n: usize) -> String {
    let mut s = String::from("#!/usr/bin/env node\n/* generated */\n");
    for i in 0..n {
        match i % 4 {
            0 => s.push_str(&format!("import pkg{i} from 'pkg{}'\n", i % 8)),
            1 => s.push_str(&format!("import {{ a{i} }} from './local{i}.js'\n")),
            2 => s.push_str(&format!("export * from \"pkg{}/lib/util.js\"\n", i % 8)),
            _ => s.push_str("import path from 'node:path' // import x from 'x'\n"),
        }
        s.push_str("const re = /from 'y'/g; const t = `${'import z from \"z\"'}`;\n");
    }
    s
}

/// Store with eight packages, alternating `exports` and `main` entries.
fn store() -> TempDir {
    let dir = tempdir().unwrap();
    for i in 0..8 {
        let pkg = dir.path().join("node_modules").join(format!("pkg{i}"));
        fs::create_dir_all(pkg.join("lib")).unwrap();
        let manifest = if i % 2 == 0 {
            r#"{"exports": {".": {"import": "./index.mjs"}}}"#
        } else {
            r#"{"main": "index"}"#
        };
        fs::write(pkg.join("package.json"), manifest).unwrap();
        fs::write(pkg.join("index.mjs"), "").unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();
        fs::write(pkg.join("lib/util.js"), "").unwrap();
    }
    dir
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_declarations");

    for n in [10, 100, 1000] {
        let src = source(n);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &src, |b, src| {
            b.iter(|| scan_declarations(black_box(src)));
        });
    }

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_with");
    let project = store();
    let importer = project.path().join("src").join("main.js");
    let options = RewriteOptions::default();

    for n in [10, 100] {
        let src = source(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &src, |b, src| {
            b.iter(|| rewrite_with(black_box(src), &importer, &options, &OsFileSystem));
        });
    }

    group.finish();
}

fn bench_rewrite_no_store(c: &mut Criterion) {
    let src = source(100);
    let options = RewriteOptions::default().with_store_dir("unbare_bench_missing_store");

    c.bench_function("rewrite_with/no_store", |b| {
        b.iter(|| {
            rewrite_with(
                black_box(&src),
                Path::new("/tmp/unbare-bench/main.js"),
                &options,
                &OsFileSystem,
            )
        });
    });
}

criterion_group!(benches, bench_scan, bench_rewrite, bench_rewrite_no_store);
criterion_main!(benches);
