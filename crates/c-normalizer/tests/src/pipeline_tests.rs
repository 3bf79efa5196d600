use super::*;
use crate::config::OutputSettings;

#[test]
fn pipeline_takes_tools_and_output_directory_from_settings() {
    let settings = Settings {
        output: OutputSettings {
            directory: Some(PathBuf::from("/out")),
        },
        ..Settings::default()
    };
    let pipeline = Pipeline::new(&settings);
    assert_eq!(pipeline.output_dir.as_deref(), Some(Path::new("/out")));
    assert_eq!(pipeline.tools, settings.tools);
}

#[test]
fn stripped_file_is_derived_next_to_input() {
    assert_eq!(
        derived_path(Path::new("/src/main.c"), STRIPPED_PREFIX, None),
        PathBuf::from("/src/stripped_main.c")
    );
}

#[tokio::test]
async fn canonicalize_fails_fast_on_missing_input() {
    let pipeline = Pipeline::new(&Settings::default());
    let err = pipeline.canonicalize(Path::new("/definitely/missing/main.c")).await.unwrap_err();
    assert!(matches!(err, NormalizeError::Io { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn strip_stage_failure_stops_the_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("main.c");
    let pipeline = Pipeline::new(&Settings::default());

    let err = pipeline.canonicalize_with_strip(&input, &["add"]).await.unwrap_err();
    assert!(matches!(err, NormalizeError::Io { .. }), "unexpected error: {err}");
    assert!(!dir.path().join("stripped_main.c").exists());
    assert!(!dir.path().join("expanded_stripped_main.c").exists());
}
