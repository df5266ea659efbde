use pretty_assertions::assert_eq;

use super::*;

#[test]
fn project_defaults() {
    let config = CompileConfig::for_project("/work/Game");
    assert_eq!(config.intermediates_path, PathBuf::from("/work/Game/Intermediates"));
    assert_eq!(config.binaries_path, PathBuf::from("/work/Game/Binaries"));
    assert_eq!(config.build_mode, "Release");
}

#[test]
fn overrides_replace_single_fields() {
    let config = CompileConfig::for_project("/work/Game")
        .with_build_mode("Debug")
        .with_binaries("/out");
    assert_eq!(config.build_mode, "Debug");
    assert_eq!(config.binaries_path, PathBuf::from("/out"));
    assert_eq!(config.intermediates_path, PathBuf::from("/work/Game/Intermediates"));
}

#[test]
fn derived_folders_live_under_intermediates() {
    let config = CompileConfig::for_project("/p").with_intermediates("/tmp/build");
    assert_eq!(config.code_path(), PathBuf::from("/tmp/build/Code"));
    assert_eq!(config.cmake_path(), PathBuf::from("/tmp/build/CMake"));
}
