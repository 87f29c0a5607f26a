//! End-to-end flows: ingest, reconcile, rank.

use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use timbra_core::Catalog;
use timbra_engine::{rank, reconcile, CandidateSet, FingerprintConfig, Ingestor};
use zip::write::SimpleFileOptions;

fn write_wav(path: &Path, sample_rate: u32, samples: &[i16]) {
    let data_len = (samples.len() * 2) as u32;
    let mut bytes = Vec::with_capacity(44 + samples.len() * 2);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for &s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    std::fs::write(path, bytes).unwrap();
}

fn sine(sample_rate: u32, freq: f64, len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = i as f64 / f64::from(sample_rate);
            (16000.0 * (freq * 2.0 * std::f64::consts::PI * t).sin()) as i16
        })
        .collect()
}

#[test]
fn ingest_single_file_registers_stem_name() {
    let dir = TempDir::new().unwrap();
    let upload = dir.path().join("alice.wav");
    write_wav(&upload, 22050, &sine(22050, 440.0, 4000));

    let catalog = Catalog::open_in_memory().unwrap();
    let ingestor = Ingestor::new(dir.path().join("store")).unwrap();

    let stored = ingestor.ingest_path(&upload).unwrap();
    assert_eq!(stored.len(), 1);
    for path in &stored {
        catalog
            .register(&timbra_core::model::display_name(path), path)
            .unwrap();
    }

    let entries = catalog.list_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "alice");
    assert!(entries[0].path.to_string_lossy().ends_with("alice.wav"));
    assert!(entries[0].path.is_absolute());
}

#[test]
fn ingest_duplicate_name_disambiguates() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("one").join("alice.wav");
    let second = dir.path().join("two").join("alice.wav");
    std::fs::create_dir_all(first.parent().unwrap()).unwrap();
    std::fs::create_dir_all(second.parent().unwrap()).unwrap();
    write_wav(&first, 22050, &sine(22050, 440.0, 4000));
    write_wav(&second, 22050, &sine(22050, 880.0, 4000));

    let catalog = Catalog::open_in_memory().unwrap();
    let ingestor = Ingestor::new(dir.path().join("store")).unwrap();

    let mut stored = ingestor.ingest_path(&first).unwrap();
    stored.extend(ingestor.ingest_path(&second).unwrap());
    for path in &stored {
        catalog
            .register(&timbra_core::model::display_name(path), path)
            .unwrap();
    }

    let entries = catalog.list_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].path.to_string_lossy().ends_with("alice.wav"));
    assert!(entries[1].path.to_string_lossy().ends_with("alice_1.wav"));
}

#[test]
fn archive_ingest_then_reconcile_is_stable() {
    let dir = TempDir::new().unwrap();
    let zip_path = dir.path().join("batch.zip");

    let wav_bytes = {
        let tone = dir.path().join("tone.wav");
        write_wav(&tone, 22050, &sine(22050, 660.0, 4000));
        std::fs::read(&tone).unwrap()
    };

    let file = std::fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.add_directory("data/", options).unwrap();
    writer.start_file("bob.mp3", options).unwrap();
    writer.write_all(&wav_bytes).unwrap();
    writer.start_file("readme.txt", options).unwrap();
    writer.write_all(b"not audio").unwrap();
    writer.finish().unwrap();

    let catalog = Catalog::open_in_memory().unwrap();
    let store = dir.path().join("store");
    let ingestor = Ingestor::new(&store).unwrap();

    let stored = ingestor.ingest_path(&zip_path).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].file_name().unwrap(), "bob.mp3");

    // Reconcile registers the extracted file, then settles.
    assert_eq!(reconcile(&catalog, &store).unwrap(), 1);
    assert_eq!(reconcile(&catalog, &store).unwrap(), 0);

    let entries = catalog.list_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "bob");
}

#[test]
fn rank_over_reconciled_store_excludes_stale_rows() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store");
    std::fs::create_dir_all(&store).unwrap();

    write_wav(&store.join("near.wav"), 22050, &sine(22050, 450.0, 6000));
    write_wav(&store.join("far.wav"), 22050, &sine(22050, 3520.0, 6000));
    let doomed = store.join("doomed.wav");
    write_wav(&doomed, 22050, &sine(22050, 900.0, 6000));

    let catalog = Catalog::open_in_memory().unwrap();
    assert_eq!(reconcile(&catalog, &store).unwrap(), 3);

    // The file vanishes after registration; its row stays but it can
    // no longer be compared.
    std::fs::remove_file(&doomed).unwrap();

    let query = dir.path().join("query.wav");
    write_wav(&query, 22050, &sine(22050, 440.0, 6000));

    let mut candidates = CandidateSet::new();
    for entry in catalog.list_all().unwrap() {
        candidates.insert(entry.name, entry.path);
    }
    assert_eq!(candidates.len(), 3);

    let cfg = FingerprintConfig::default();
    let outcome = rank(&query, &candidates, f64::INFINITY, 10, &cfg);

    assert_eq!(outcome.comparisons, 2);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].name, "near");
    assert!(outcome.results.iter().all(|r| r.name != "doomed"));
}

#[test]
fn candidate_union_prefers_store_scan_names() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store");
    std::fs::create_dir_all(&store).unwrap();

    let sample = store.join("sample.wav");
    write_wav(&sample, 22050, &sine(22050, 500.0, 4000));

    let catalog = Catalog::open_in_memory().unwrap();
    let normalized = std::path::absolute(&sample).unwrap();
    catalog.register("legacy label", &normalized).unwrap();

    let mut candidates = CandidateSet::new();
    for entry in catalog.list_all().unwrap() {
        candidates.insert(entry.name, entry.path);
    }
    for path in timbra_engine::scan_store(&store) {
        let name = timbra_core::model::display_name(&path);
        candidates.insert(name, path);
    }

    assert_eq!(candidates.len(), 1);
    let (name, _) = candidates.iter().next().unwrap();
    assert_eq!(name, "sample");
}
