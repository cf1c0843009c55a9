//! Unit tests for the runner's path resolution and listing helpers.

use super::*;
use crate::ir::SourceFile;
use rstest::rstest;
use std::path::PathBuf;

#[rstest]
#[case(None, "out.ninja", "out.ninja")]
#[case(Some("work"), "out.ninja", "work/out.ninja")]
#[case(Some("work"), "/tmp/out.ninja", "/tmp/out.ninja")]
fn resolve_in_project_respects_directory(
    #[case] directory: Option<&str>,
    #[case] input: &str,
    #[case] expected: &str,
) {
    let cli = Cli {
        directory: directory.map(PathBuf::from),
        ..Cli::default()
    };
    let resolved = resolve_in_project(&cli, Path::new(input));
    assert_eq!(resolved.as_ref(), Path::new(expected));
}

#[test]
fn project_dir_defaults_to_current_directory() {
    let dir = resolve_project_dir(&Cli::default()).expect("project dir");
    assert_eq!(dir, ".");
}

#[test]
fn sources_listing_pairs_sources_with_objects() {
    let config = GenConfig::default();
    let graph = BuildGraph::from_sources(
        &config,
        &[
            SourceFile::new("src/a.c", "c"),
            SourceFile::new("src/sub/b.cpp", "cpp"),
        ],
    )
    .expect("graph");
    assert_eq!(
        sources_listing(&graph),
        "src/a.c -> build/src/a.o\nsrc/sub/b.cpp -> build/src/sub/b.o\n"
    );
}
