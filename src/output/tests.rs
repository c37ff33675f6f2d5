//! Tests for output module

use super::*;
use arrow::array::{Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::path::Path;
use tempfile::tempdir;

fn row(review: &str, meta: &str, parent_asin: &str) -> OutputRow {
    OutputRow {
        review: review.to_string(),
        meta: meta.to_string(),
        parent_asin: parent_asin.to_string(),
    }
}

fn tsv_string(rows: &[OutputRow]) -> String {
    let mut writer = TsvWriter::new(Vec::new()).unwrap();
    for r in rows {
        writer.write_row(r).unwrap();
    }
    assert_eq!(writer.rows_written(), rows.len());
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

// ============================================================================
// TSV Tests
// ============================================================================

#[test]
fn test_tsv_header_only_when_empty() {
    assert_eq!(tsv_string(&[]), "review\tmeta\tparent_asin\n");
}

#[test]
fn test_tsv_rows() {
    let output = tsv_string(&[
        row("Great pad, no lag at all", "Wireless Controller Black", "B01"),
        row("Second review text", "Another item", "B02"),
    ]);
    assert_eq!(
        output,
        "review\tmeta\tparent_asin\n\
         Great pad, no lag at all\tWireless Controller Black\tB01\n\
         Second review text\tAnother item\tB02\n"
    );
}

#[test]
fn test_tsv_quotes_only_when_needed() {
    let output = tsv_string(&[row(r#"The "pro" model"#, "plain meta", "B01")]);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "\"The \"\"pro\"\" model\"\tplain meta\tB01");
}

#[test]
fn test_tsv_reads_back() {
    let rows = vec![
        row(r#"He said "fine""#, "meta, with comma", "B01"),
        row("x", "y", "B02"),
    ];
    let output = tsv_string(&rows);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(output.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        crate::types::OUTPUT_COLUMNS.to_vec()
    );

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], r#"He said "fine""#);
    assert_eq!(&records[0][1], "meta, with comma");
    assert_eq!(&records[1][2], "B02");
}

#[test]
fn test_tsv_file_sink() {
    let dir = tempdir().unwrap();
    let config = OutputConfig {
        path: dir.path().join("nested/out/clean_review_meta.tsv"),
        format: OutputFormat::Tsv,
    };

    let mut sink = create_sink(&config).unwrap();
    sink.write_row(&row("review text", "meta text", "B01")).unwrap();
    assert_eq!(sink.finish().unwrap(), 1);

    let content = std::fs::read_to_string(&config.path).unwrap();
    assert_eq!(
        content,
        "review\tmeta\tparent_asin\nreview text\tmeta text\tB01\n"
    );
}

#[test]
fn test_unfinished_sink_keeps_previous_output() {
    let dir = tempdir().unwrap();
    let config = OutputConfig {
        path: dir.path().join("clean_review_meta.tsv"),
        format: OutputFormat::Tsv,
    };
    std::fs::write(&config.path, "previous run\n").unwrap();

    let mut sink = create_sink(&config).unwrap();
    sink.write_row(&row("review text", "meta text", "B01")).unwrap();
    assert!(partial_path(&config.path).exists());
    drop(sink);

    assert_eq!(
        std::fs::read_to_string(&config.path).unwrap(),
        "previous run\n"
    );
    assert!(!partial_path(&config.path).exists());
}

#[test]
fn test_finished_sink_replaces_output() {
    let dir = tempdir().unwrap();
    let config = OutputConfig {
        path: dir.path().join("clean_review_meta.tsv"),
        format: OutputFormat::Tsv,
    };
    std::fs::write(&config.path, "previous run\n").unwrap();

    let sink = create_sink(&config).unwrap();
    assert_eq!(sink.finish().unwrap(), 0);

    assert_eq!(
        std::fs::read_to_string(&config.path).unwrap(),
        "review\tmeta\tparent_asin\n"
    );
    assert!(!partial_path(&config.path).exists());
}

#[test]
fn test_partial_path() {
    assert_eq!(
        partial_path(Path::new("/data/out.tsv")),
        PathBuf::from("/data/out.tsv.part")
    );
}

// ============================================================================
// Parquet Tests
// ============================================================================

fn row_tuple(review: &str, meta: &str, parent_asin: &str) -> (String, String, String) {
    (review.to_string(), meta.to_string(), parent_asin.to_string())
}

fn read_parquet(path: &Path) -> Vec<(String, String, String)> {
    let file = File::open(path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.unwrap();
        let column = |i: usize| {
            batch
                .column(i)
                .as_any()
                .downcast_ref::<StringArray>()
                .unwrap()
                .clone()
        };
        let (review, meta, asin) = (column(0), column(1), column(2));
        for i in 0..batch.num_rows() {
            rows.push((
                review.value(i).to_string(),
                meta.value(i).to_string(),
                asin.value(i).to_string(),
            ));
        }
    }
    rows
}

#[test]
fn test_output_schema() {
    let schema = output_schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["review", "meta", "parent_asin"]);
    assert!(schema
        .fields()
        .iter()
        .all(|f| f.data_type() == &DataType::Utf8 && !f.is_nullable()));
}

#[test]
fn test_parquet_roundtrip_across_batches() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pairs.parquet");
    let config = ParquetWriterConfig::new().with_batch_size(2);

    let mut writer: Box<dyn RowSink> =
        Box::new(ParquetRowWriter::create(&path, &config).unwrap());
    for i in 0..5 {
        writer
            .write_row(&row(&format!("review {i}"), &format!("meta {i}"), &format!("B{i}")))
            .unwrap();
    }
    assert_eq!(writer.finish().unwrap(), 5);

    let rows = read_parquet(&path);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0], row_tuple("review 0", "meta 0", "B0"));
    assert_eq!(rows[4], row_tuple("review 4", "meta 4", "B4"));
}

#[test]
fn test_parquet_empty_file_is_valid() {
    let dir = tempdir().unwrap();
    let config = OutputConfig {
        path: dir.path().join("empty.parquet"),
        format: OutputFormat::Parquet,
    };

    let sink = create_sink(&config).unwrap();
    assert_eq!(sink.finish().unwrap(), 0);
    assert!(read_parquet(&config.path).is_empty());
}

#[test]
fn test_unfinished_parquet_leaves_no_file() {
    let dir = tempdir().unwrap();
    let config = OutputConfig {
        path: dir.path().join("pairs.parquet"),
        format: OutputFormat::Parquet,
    };

    let mut sink = create_sink(&config).unwrap();
    sink.write_row(&row("review text", "meta text", "B01")).unwrap();
    drop(sink);

    assert!(!config.path.exists());
    assert!(!partial_path(&config.path).exists());
}

#[test]
fn test_parquet_writer_config() {
    let config = ParquetWriterConfig::new()
        .with_row_group_size(1000)
        .with_batch_size(0);
    assert_eq!(config.row_group_size(), 1000);
    assert_eq!(config.batch_size(), 1);
}
