//! End-to-end scans over generated gzip trees.

use flate2::write::GzEncoder;
use flate2::Compression;
use logscan_core::{ArchiveResult, ScanSummary, ScanningConfig};
use logscan_detect::Catalog;
use logscan_scanner::{
    ArchiveProcessor, ArchiveTask, CancellationToken, ScanError, ScanOrchestrator,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const APP_LOG: &str = "2024-06-01 INFO login user=ravi email=ravi@example.com\n\
                       2024-06-01 INFO heartbeat ok\n\
                       \x20 2024-06-01 WARN payment card 4111111111111111  \n";

const APP_EXTRACT: &str = "2024-06-01 INFO login user=ravi email=ravi@example.com;\
                           ravi@example.com;EMAIL_REGEX\n\
                           2024-06-01 WARN payment card 4111111111111111;\
                           4111111111111111;CARD_REGEX\n";

const NET_LOG: &str = "2024-06-02 DEBUG client 10.1.2.3 connected\r\n\
                       2024-06-02 INFO job finished in 35ms\r\n";

fn write_gz(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().expect("archive has a parent")).unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(contents).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

fn config_in(tmp: &TempDir) -> ScanningConfig {
    ScanningConfig {
        output_root: tmp.path().join("path_processed"),
        indicator_dir: tmp.path().to_path_buf(),
        ..ScanningConfig::default()
    }
}

fn orchestrator(tmp: &TempDir) -> ScanOrchestrator {
    ScanOrchestrator::new(Catalog::builtin(), config_in(tmp))
}

/// Build `logs/` with archives at three depths plus a non-archive file.
fn build_tree(tmp: &TempDir) -> PathBuf {
    let root = tmp.path().join("logs");
    write_gz(&root.join("app.log.gz"), APP_LOG.as_bytes());
    write_gz(&root.join("east/net.log.gz"), NET_LOG.as_bytes());
    write_gz(&root.join("east/rack1/quiet.log.gz"), b"nothing to see\n");
    fs::write(root.join("east/README.txt"), "not an archive").unwrap();
    root
}

#[tokio::test]
async fn test_scan_mirrors_tree_and_sums_counts() {
    let tmp = TempDir::new().unwrap();
    let root = build_tree(&tmp);

    let report = orchestrator(&tmp).run_scan(&root).await.expect("scan");

    assert_eq!(
        report.summary,
        ScanSummary {
            total_files_parsed: 3,
            total_lines_parsed: 6,
            total_lines_with_pii: 3,
        }
    );

    let out = tmp.path().join("path_processed/logs");
    assert_eq!(report.output_root, out);
    assert_eq!(
        fs::read_to_string(out.join("app.log.txt")).unwrap(),
        APP_EXTRACT
    );
    assert_eq!(
        fs::read_to_string(out.join("east/net.log.txt")).unwrap(),
        "2024-06-02 DEBUG client 10.1.2.3 connected;10.1.2.3;IP_REGEX\n"
    );
    // Archives without PII still get an (empty) extract.
    assert_eq!(
        fs::read_to_string(out.join("east/rack1/quiet.log.txt")).unwrap(),
        ""
    );
    assert!(!out.join("east/README.txt").exists());
}

#[tokio::test]
async fn test_scan_writes_indicator_file() {
    let tmp = TempDir::new().unwrap();
    let root = build_tree(&tmp);

    let report = orchestrator(&tmp).run_scan(&root).await.expect("scan");

    let indicator = tmp.path().join("logs_all_done.txt");
    assert_eq!(report.indicator.as_deref(), Some(indicator.as_path()));
    let contents = fs::read_to_string(indicator).unwrap();
    assert!(contents.starts_with(
        "--- PII Scan Summary ---\n\
         Total files parsed: 3\n\
         Total lines parsed: 6\n\
         Total lines containing PII: 3\n"
    ));
    assert!(contents.contains("SCAN COMPLETE!"));
}

#[tokio::test]
async fn test_corrupt_archive_contributes_nothing() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("logs");
    write_gz(&root.join("good.gz"), APP_LOG.as_bytes());
    fs::write(root.join("bad.gz"), "call 9876543210\nthis is not gzip\n").unwrap();

    let report = orchestrator(&tmp).run_scan(&root).await.expect("scan");

    assert_eq!(
        report.summary,
        ScanSummary {
            total_files_parsed: 1,
            total_lines_parsed: 3,
            total_lines_with_pii: 2,
        }
    );

    let out = tmp.path().join("path_processed/logs");
    assert!(out.join("good.txt").exists());
    for name in ["bad.txt", "bad.txt.partial"] {
        assert!(!out.join(name).exists(), "{name} should not exist");
    }
}

#[tokio::test]
async fn test_invalid_root_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain.txt");
    fs::write(&file, "not a directory").unwrap();

    for root in [tmp.path().join("missing"), file] {
        let result = orchestrator(&tmp).run_scan(&root).await;
        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }

    assert!(!tmp.path().join("path_processed").exists());
    assert!(!tmp.path().join("missing_all_done.txt").exists());
}

#[tokio::test]
async fn test_rescan_is_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let root = build_tree(&tmp);

    let first = orchestrator(&tmp).run_scan(&root).await.expect("first scan");

    let mut config = config_in(&tmp);
    config.output_root = tmp.path().join("second");
    let second = ScanOrchestrator::new(Catalog::builtin(), config)
        .with_max_concurrent_archives(1)
        .run_scan(&root)
        .await
        .expect("second scan");

    assert_eq!(first.summary, second.summary);
    for relative in ["app.log.txt", "east/net.log.txt", "east/rack1/quiet.log.txt"] {
        assert_eq!(
            fs::read(first.output_root.join(relative)).unwrap(),
            fs::read(second.output_root.join(relative)).unwrap(),
            "{relative} differs"
        );
    }
}

#[tokio::test]
async fn test_many_archives_with_small_pool() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("bulk");
    for i in 0..24 {
        write_gz(&root.join(format!("d{}/part-{i}.gz", i % 4)), APP_LOG.as_bytes());
    }

    let report = orchestrator(&tmp)
        .with_max_concurrent_archives(2)
        .run_scan(&root)
        .await
        .expect("scan");

    assert_eq!(
        report.summary,
        ScanSummary {
            total_files_parsed: 24,
            total_lines_parsed: 72,
            total_lines_with_pii: 48,
        }
    );
}

#[test]
fn test_processor_drops_invalid_bytes() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in/mixed.gz");
    write_gz(&input, b"caf\xc3\xa9 name \xff\xfeAsha\nplain\rsecond\n");

    let processor = ArchiveProcessor::new(Catalog::builtin(), &ScanningConfig::default());
    let task = ArchiveTask {
        input,
        output_dir: tmp.path().join("out"),
    };
    let result = processor
        .try_process(&task, &CancellationToken::new())
        .expect("process");

    assert_eq!(result, ArchiveResult::completed(3, 1));
    assert_eq!(
        fs::read_to_string(tmp.path().join("out/mixed.txt")).unwrap(),
        "caf\u{e9} name Asha;name;NAME_KEYWORD\n"
    );
}

#[test]
fn test_processor_reads_concatenated_members() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("multi.gz");

    let mut bytes = Vec::new();
    for member in ["call 9876543210\n", "quiet line\n"] {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(member.as_bytes()).unwrap();
        bytes.extend(encoder.finish().unwrap());
    }
    fs::write(&input, bytes).unwrap();

    let processor = ArchiveProcessor::new(Catalog::builtin(), &ScanningConfig::default());
    let task = ArchiveTask {
        input,
        output_dir: tmp.path().join("out"),
    };
    let result = processor.process(&task, &CancellationToken::new());
    assert_eq!(result, ArchiveResult::completed(2, 1));
}

#[test]
fn test_processor_missing_archive() {
    let tmp = TempDir::new().unwrap();
    let processor = ArchiveProcessor::new(Catalog::builtin(), &ScanningConfig::default());
    let task = ArchiveTask {
        input: tmp.path().join("absent.gz"),
        output_dir: tmp.path().join("out"),
    };

    let err = processor
        .try_process(&task, &CancellationToken::new())
        .unwrap_err();
    assert!(matches!(err, ScanError::ArchiveRead { .. }));
    assert_eq!(
        processor.process(&task, &CancellationToken::new()),
        ArchiveResult::failed()
    );
    assert!(!tmp.path().join("out/absent.txt").exists());
}

#[test]
fn test_processor_honours_cancellation() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("app.gz");
    write_gz(&input, APP_LOG.as_bytes());

    let processor = ArchiveProcessor::new(Catalog::builtin(), &ScanningConfig::default());
    let task = ArchiveTask {
        input,
        output_dir: tmp.path().join("out"),
    };
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = processor.try_process(&task, &cancel).unwrap_err();
    assert!(matches!(err, ScanError::Cancelled { .. }));
    assert!(!tmp.path().join("out/app.txt").exists());
    assert!(!tmp.path().join("out/app.txt.partial").exists());
}

#[test]
fn test_processor_empty_archive() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("rotated.log.gz");
    fs::write(&input, b"").unwrap();

    let processor = ArchiveProcessor::new(Catalog::builtin(), &ScanningConfig::default());
    let task = ArchiveTask {
        input,
        output_dir: tmp.path().join("out"),
    };

    let result = processor
        .try_process(&task, &CancellationToken::new())
        .expect("empty archive is a valid empty stream");
    assert_eq!(result, ArchiveResult::completed(0, 0));
    assert_eq!(
        fs::read_to_string(tmp.path().join("out/rotated.log.txt")).unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_scan_counts_empty_archives() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("logs");
    write_gz(&root.join("app.log.gz"), APP_LOG.as_bytes());
    fs::write(root.join("app.log.1.gz"), b"").unwrap();

    let report = orchestrator(&tmp).run_scan(&root).await.expect("scan");

    assert_eq!(
        report.summary,
        ScanSummary {
            total_files_parsed: 2,
            total_lines_parsed: 3,
            total_lines_with_pii: 2,
        }
    );
    assert!(tmp.path().join("path_processed/logs/app.log.1.txt").exists());
}
