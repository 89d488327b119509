// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use okane::app::Okane;
use okane::config::AppConfig;
use okane::repo::MemoryRepository;
use okane::{cli, commands::exporter};
use tempfile::tempdir;

fn setup() -> Okane<MemoryRepository> {
    let wednesday = NaiveDate::from_ymd_opt(2024, 10, 16).unwrap();
    Okane::load(MemoryRepository::seeded(), &AppConfig::default(), wednesday).unwrap()
}

fn export(app: &Okane<MemoryRepository>, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "okane",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    match matches.subcommand() {
        Some(("export", export_m)) => exporter::handle(app, export_m),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_transactions_writes_pretty_json() {
    let app = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    export(&app, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["title"], "Allowance");
    assert_eq!(items[0]["category"], "income");
    assert_eq!(items[4]["amount"], 330);
    assert_eq!(items[4]["balance"], 9700);
}

#[test]
fn export_transactions_writes_csv() {
    let app = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export(&app, "CSV", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "timestamp", "title", "amount", "category", "balance", "note"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[3][6], "Extra task");
    assert_eq!(&rows[4][5], "9700");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let app = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    assert!(export(&app, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
