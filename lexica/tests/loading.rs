//! 辞書ファイルの読み込みに関するテスト
//!
//! 一時ディレクトリに辞書とストップワードを書き出し、パスからの読み込みと
//! エラーの種類を検証します。

use std::fs;
use std::path::PathBuf;

use tempfile::{tempdir, TempDir};

use lexica::errors::LexicaError;
use lexica::{AnnotatorBuilder, PresetAnnotatorKind, Stopwords};

fn write_resources() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let dict_path = dir.path().join(PresetAnnotatorKind::FirstNames.file_name());
    fs::write(
        &dict_path,
        "mark\tMark\n\n  mary \t Mary \nwill\tWill\n{\"mention\": \"x\"}\n",
    )
    .unwrap();
    let stopwords_path = dir.path().join("stopwords.txt");
    fs::write(&stopwords_path, "WILL\n  shall \n").unwrap();
    (dir, dict_path, stopwords_path)
}

#[test]
fn test_load_path() {
    let (_dir, dict_path, _) = write_resources();
    let mut builder = AnnotatorBuilder::from_preset(PresetAnnotatorKind::FirstNames);
    let stats = builder.load_path(&dict_path).unwrap();
    assert_eq!(stats.lines, 4);
    assert_eq!(stats.mentions, 3);
    assert_eq!(stats.skipped, 1);

    let annotator = builder.build().unwrap();
    let anns = annotator.annotate("Mary and MARK");
    assert_eq!(anns.len(), 2);
    assert_eq!(anns[1].text(), "MARK");
    assert_eq!(anns[1].values(), Some(&["Mark".to_string()][..]));
}

#[test]
fn test_load_stopwords_from_path() {
    let (_dir, dict_path, stopwords_path) = write_resources();
    let stopwords = Stopwords::from_path(&stopwords_path).unwrap();
    assert_eq!(stopwords.len(), 2);
    assert!(stopwords.contains("Shall"));

    let mut builder =
        AnnotatorBuilder::from_preset(PresetAnnotatorKind::FirstNames).stopwords(stopwords);
    builder.load_path(&dict_path).unwrap();
    let annotator = builder.build().unwrap();
    assert_eq!(annotator.num_mentions(), 2);
    assert!(!annotator.contains("will"));
}

#[test]
fn test_load_directory() {
    let dir = tempdir().unwrap();
    let mut builder = AnnotatorBuilder::new("x");
    let result = builder.load_path(dir.path());
    assert!(matches!(result, Err(LexicaError::PathIsDirectory(_))));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let mut builder = AnnotatorBuilder::new("x");
    let result = builder.load_path(dir.path().join("missing.dict"));
    assert!(matches!(result, Err(LexicaError::Io(_))));
    assert!(Stopwords::from_path(dir.path().join("missing.txt")).is_err());
}

#[test]
fn test_load_multiple_files() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.dict");
    let b = dir.path().join("b.dict");
    fs::write(&a, "kosoglow\n").unwrap();
    fs::write(&b, "smith\n").unwrap();

    let mut builder = AnnotatorBuilder::from_preset(PresetAnnotatorKind::LastNames);
    builder.load_path(&a).unwrap();
    builder.load_path(&b).unwrap();
    assert_eq!(builder.num_mentions(), 2);
    let annotator = builder.build().unwrap();
    let anns = annotator.annotate("Kosoglow, Smith");
    assert_eq!(anns.len(), 2);
}
