//! Benchmarks for document parsing, fragment injection and navigation
//!
//! Run with: cargo bench

use canteen::config::BUILTIN_SHELL;
use canteen::document::Document;
use canteen::navigation::{NavigationController, PageToken};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const NAVBAR: &str = include_str!("../assets/includes/navbar.html");
const DASHBOARD: &str = include_str!("../assets/pages/dashboard.html");

const PAGES: [&str; 4] = ["dashboard", "menu", "pesanan", "struk"];

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    group.throughput(Throughput::Bytes(BUILTIN_SHELL.len() as u64));
    group.bench_function("parse_shell", |b| {
        b.iter(|| Document::parse(black_box(BUILTIN_SHELL)))
    });

    group.throughput(Throughput::Bytes(DASHBOARD.len() as u64));
    group.bench_function("parse_dashboard_page", |b| {
        b.iter(|| Document::parse(black_box(DASHBOARD)))
    });

    group.bench_function("inject_navbar", |b| {
        let mut doc = Document::parse(BUILTIN_SHELL);
        let mount = doc.element_by_id("navbar").unwrap();
        b.iter(|| doc.set_inner_html(mount, black_box(NAVBAR)))
    });

    group.bench_function("serialize_loaded_shell", |b| {
        let mut doc = Document::parse(BUILTIN_SHELL);
        let mount = doc.element_by_id("dashboardPage").unwrap();
        doc.set_inner_html(mount, DASHBOARD);
        b.iter(|| black_box(&doc).to_html())
    });

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    let rt = tokio::runtime::Runtime::new().unwrap();

    let document = Arc::new(RwLock::new(Document::parse(BUILTIN_SHELL)));
    let pages: Vec<PageToken> = PAGES.iter().map(|p| PageToken::parse(p).unwrap()).collect();
    let nav = NavigationController::new(
        document,
        pages.clone(),
        pages[0].clone(),
        Duration::ZERO,
    );

    group.bench_function("begin_complete_cycle", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let token = pages[i % pages.len()].clone();
            i += 1;
            rt.block_on(async {
                let pending = nav.begin(token).await;
                nav.complete(pending).await
            })
        })
    });

    group.bench_function("handle_hash_unknown", |b| {
        b.iter(|| rt.block_on(nav.handle_hash(black_box("#laporan"))))
    });

    group.finish();
}

criterion_group!(benches, bench_document, bench_navigation);
criterion_main!(benches);
