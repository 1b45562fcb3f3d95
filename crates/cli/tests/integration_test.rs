use std::fs;

use tempfile::tempdir;
use fvecs_transcode::fixtures::{constant_records, fvecs_bytes, push_record, ramp_records, write_fvecs};
use fvecs_transcode::{ConversionParams, QuantizeParams};
use fvecs_transcode_cli::commands::{convert, corpus, inspect};

#[test]
fn test_convert_creates_output_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("base.fvecs");
    write_fvecs(&input, &ramp_records(5, 4)).unwrap();

    // Nested directory does not exist yet.
    let output = dir.path().join("data").join("sift").join("base.bin");
    let summary = convert::run(&input, &output, &ConversionParams::new(4)).unwrap();

    assert_eq!(summary.metadata.vectors, 5);
    assert_eq!(fs::metadata(&output).unwrap().len(), 5 * 16);
    assert!(dir.path().join("data/sift/base.meta").exists());
}

#[test]
fn test_convert_reports_record_index_on_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.fvecs");
    let mut bytes = fvecs_bytes(&ramp_records(2, 4));
    push_record(&mut bytes, 8, &[0.0; 8]);
    fs::write(&input, bytes).unwrap();

    let err = convert::run(&input, &dir.path().join("bad.bin"), &ConversionParams::new(4)).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("Vector 2 has dim=8, expected 4"), "{}", chain);
}

#[test]
fn test_corpus_job_file() {
    let dir = tempdir().unwrap();
    write_fvecs(dir.path().join("base.fvecs"), &ramp_records(12, 8)).unwrap();
    write_fvecs(dir.path().join("query.fvecs"), &constant_records(2, 8, -1.0)).unwrap();

    let d = dir.path().display();
    let job_file = dir.path().join("jobs.json");
    fs::write(
        &job_file,
        format!(
            r#"{{ "jobs": [
                {{ "input": "{d}/base.fvecs", "output": "{d}/out/base.bin",
                   "params": {{ "expected_dim": 8, "limit": 10 }} }},
                {{ "input": "{d}/query.fvecs", "output": "{d}/out/query.bin",
                   "params": {{ "expected_dim": 8, "quantize": {{ "clip_abs": 0.5 }} }} }}
            ] }}"#
        ),
    )
    .unwrap();

    corpus::run(&job_file).unwrap();

    let base_meta = fs::read_to_string(dir.path().join("out/base.meta")).unwrap();
    assert!(base_meta.starts_with("vectors=10\ndimension=8\nbytes=320\n"));

    let query_meta = fs::read_to_string(dir.path().join("out/query.meta")).unwrap();
    assert!(query_meta.contains("max_abs_fixed=32768\n"));
    assert!(query_meta.contains("clip_abs=0.5\n"));
}

#[test]
fn test_inspect_converted_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("query.fvecs");
    let output = dir.path().join("query.bin");
    write_fvecs(&input, &ramp_records(3, 16)).unwrap();

    let params = ConversionParams::new(16).with_quantization(QuantizeParams::q16_16());
    convert::run(&input, &output, &params).unwrap();

    assert!(inspect::run(&output, None, None).is_ok());
    assert!(inspect::run(&output, None, Some(2)).is_ok());
    assert!(inspect::run(&output, None, Some(3)).is_err());
    assert!(inspect::run(&dir.path().join("missing.bin"), None, None).is_err());
}
