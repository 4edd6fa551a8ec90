mod common;

use common::{TestPdf, page_markers, page_rotations};
use pdf_recompose::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_pdf(dir: &TempDir, source: &TestPdf<'_>) -> PathBuf {
    let path = dir.path().join(format!("{}.pdf", source.label));
    std::fs::write(&path, source.bytes()).unwrap();
    path
}

#[test]
fn test_page_spec_parse() {
    let spec: PageSpec = "2:3@90".parse().unwrap();
    assert_eq!(
        spec,
        PageSpec {
            file: 2,
            page: 3,
            rotation: Rotation::Clockwise90
        }
    );

    let spec: PageSpec = " 1 : 4 ".parse().unwrap();
    assert_eq!(spec.rotation, Rotation::None);

    let spec: PageSpec = "1:1@-90".parse().unwrap();
    assert_eq!(spec.rotation, Rotation::Clockwise270);

    assert!("1".parse::<PageSpec>().is_err());
    assert!("x:1".parse::<PageSpec>().is_err());
    assert!(matches!(
        "1:1@45".parse::<PageSpec>(),
        Err(RecomposeError::InvalidRotation(45))
    ));
}

#[test]
fn test_validate() {
    let mut options = MergeOptions::default();
    assert!(matches!(options.validate(), Err(RecomposeError::Config(_))));

    options.input_files.push("a.pdf".into());
    assert!(options.validate().is_ok());

    options.pages.push("2:1".parse().unwrap());
    assert!(options.validate().is_err());

    options.pages = vec!["1:0".parse().unwrap()];
    assert!(options.validate().is_err());
}

#[tokio::test]
async fn test_save_and_load_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.json");

    let options = MergeOptions {
        input_files: vec!["a.pdf".into(), "b.pdf".into()],
        pages: vec!["2:1@180".parse().unwrap(), "1:3".parse().unwrap()],
    };
    options.save(&path).await.unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"rotation\": 180"));

    let loaded = MergeOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_load_options_without_pages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.json");
    std::fs::write(&path, r#"{ "input_files": ["a.pdf"] }"#).unwrap();

    let loaded = MergeOptions::load(&path).await.unwrap();
    assert!(loaded.pages.is_empty());

    std::fs::write(&path, r#"{ "input_files": ["a.pdf"], "pages": [{"file": 1, "page": 1, "rotation": 45}] }"#).unwrap();
    assert!(matches!(
        MergeOptions::load(&path).await,
        Err(RecomposeError::Config(_))
    ));
}

#[tokio::test]
async fn test_session_from_whole_files() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, &TestPdf::new("A", 2));
    let b = write_pdf(&dir, &TestPdf::new("B", 1));

    let options = MergeOptions {
        input_files: vec![a, b],
        pages: Vec::new(),
    };
    let session = Session::from_merge_options(&options).await.unwrap();

    let output = session.assemble().await.unwrap();
    assert_eq!(page_markers(&output), vec!["A0", "A1", "B0"]);
}

#[tokio::test]
async fn test_session_from_page_layout() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, &TestPdf::new("A", 3));
    let b = write_pdf(&dir, &TestPdf::new("B", 2).rotate(90));

    let options = MergeOptions {
        input_files: vec![a, b],
        pages: vec![
            "2:2@90".parse().unwrap(),
            "1:3".parse().unwrap(),
            "1:1".parse().unwrap(),
        ],
    };
    let session = Session::from_merge_options(&options).await.unwrap();
    assert_eq!(session.list_pages()[0].source_label, "B.pdf");

    let output = session.assemble().await.unwrap();
    assert_eq!(page_markers(&output), vec!["B1", "A2", "A0"]);
    assert_eq!(page_rotations(&output), vec![180, 0, 0]);
}

#[tokio::test]
async fn test_session_from_layout_past_last_page() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, &TestPdf::new("A", 1));

    let options = MergeOptions {
        input_files: vec![a],
        pages: vec!["1:2".parse().unwrap()],
    };
    assert!(matches!(
        Session::from_merge_options(&options).await,
        Err(RecomposeError::ReferenceOutOfRange { .. })
    ));
}

#[tokio::test]
async fn test_split_file() {
    let dir = TempDir::new().unwrap();
    let input_file = write_pdf(&dir, &TestPdf::new("A", 5));

    let options = SplitOptions {
        input_file: input_file.clone(),
        mode: SplitMode::Ranges("1-2, 3-5".to_string()),
    };
    let outputs = Session::split(&options).await.unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(page_markers(outputs[0].as_ref().unwrap()), vec!["A0", "A1"]);
    assert_eq!(
        page_markers(outputs[1].as_ref().unwrap()),
        vec!["A2", "A3", "A4"]
    );

    let options = SplitOptions {
        input_file,
        mode: SplitMode::Individual,
    };
    let outputs = Session::split(&options).await.unwrap();
    assert_eq!(outputs.len(), 5);
    assert!(outputs.iter().all(|output| output.is_ok()));
}

#[tokio::test]
async fn test_save_pdf_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.pdf");
    let bytes = TestPdf::new("A", 2).bytes();

    save_pdf_bytes(&bytes, &path).await.unwrap();
    assert_eq!(load_pdf_bytes(&path).await.unwrap(), bytes);
    assert_eq!(display_name(&path), "out.pdf");
}
