#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use rift_ast::{
    hierarchy, CFileRef, CFunctionDecl, CIdentifier, CModule, CParameterDecl, CStructDecl, CType,
    ModuleTarget, TypeCategory,
};
use rift_codegen::CCppCodeGenFragment;
use rift_diagnostic::CompileError;

use super::*;

/// Records launches. Fails the launch at `fail_at`, and on a `--build`
/// creates the given output folders.
#[derive(Default)]
struct FakeLauncher {
    launches: Mutex<Vec<ToolCommand>>,
    fail_at: Option<usize>,
    outputs: Vec<PathBuf>,
}

impl FakeLauncher {
    fn launches(&self) -> Vec<ToolCommand> {
        self.launches.lock().unwrap().clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, command: &ToolCommand) -> Result<(), ToolchainError> {
        let mut launches = self.launches.lock().unwrap();
        let index = launches.len();
        launches.push(command.clone());

        if self.fail_at == Some(index) {
            return Err(ToolchainError::Failed {
                command: command.to_string(),
                exit_code: Some(1),
                stderr: "CMake Error: boom".to_string(),
            });
        }
        if command.args.first().is_some_and(|arg| arg == "--build") {
            for output in &self.outputs {
                fs::create_dir_all(output).unwrap();
                fs::write(output.join("artifact"), "bin").unwrap();
            }
        }
        Ok(())
    }
}

fn project(root: &Path) -> AstStore {
    let mut ast = AstStore::new();
    let app = ast.create();
    ast.insert(app, CModule::new(ModuleTarget::Executable));
    ast.insert(app, CFileRef::new(root.join("App/Module.rift")));
    ast.insert(app, CIdentifier::new("App"));

    let player = ast.create();
    ast.insert(player, CIdentifier::new("Player"));
    ast.insert(player, CType::new("Player", TypeCategory::Struct));
    ast.insert(player, CStructDecl);

    let tick = ast.create();
    ast.insert(tick, CIdentifier::new("Tick"));
    ast.insert(tick, CFunctionDecl);

    hierarchy::add_children(&mut ast, app, &[player, tick]);
    ast
}

fn config(root: &Path) -> CompileConfig {
    CompileConfig::for_project(root.join("App"))
}

fn messages(context: &CompileContext) -> Vec<&str> {
    context.errors().iter().map(CompileError::message).collect()
}

#[test]
fn finished_states() {
    assert!(BuildState::Done.is_finished());
    assert!(BuildState::Failed(Stage::Compilation).is_finished());
    assert!(!BuildState::Idle.is_finished());
    assert!(!BuildState::ArtifactsCopied.is_finished());
}

#[test]
fn steps_through_every_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let launcher = FakeLauncher {
        outputs: vec![config.cmake_path().join("App/Release")],
        ..FakeLauncher::default()
    };
    let mut pipeline = Pipeline::new(project(dir.path()), config.clone(), &launcher)
        .with_cmake(CMake::new("cmake"));

    assert_eq!(pipeline.state(), BuildState::Idle);
    let states: Vec<BuildState> = (0..6).map(|_| pipeline.step()).collect();
    assert_eq!(
        states,
        [
            BuildState::CodeGenerated,
            BuildState::DescriptorGenerated,
            BuildState::Compiled,
            BuildState::ArtifactsCopied,
            BuildState::Done,
            BuildState::Done,
        ]
    );
    assert!(!pipeline.context().has_errors(), "{:?}", pipeline.context().errors());

    let launches: Vec<String> = launcher.launches().iter().map(ToString::to_string).collect();
    let code = config.code_path();
    let cmake = config.cmake_path();
    assert_eq!(
        launches,
        [
            format!(
                "cmake -S {} -B {} -DCMAKE_BUILD_TYPE=Release",
                code.display(),
                cmake.display()
            ),
            format!("cmake --build {} --config Release", cmake.display()),
        ]
    );

    assert!(code.join("App/Include/code.h").is_file());
    assert!(config.binaries_path.join("App/Include/code.h").is_file());
    assert!(config.binaries_path.join("App/Bin/artifact").is_file());
}

#[test]
fn no_project_fails_before_code_generation() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = FakeLauncher::default();
    let mut pipeline = Pipeline::new(AstStore::new(), config(dir.path()), &launcher);

    assert_eq!(pipeline.run(), BuildState::Failed(Stage::Prepare));
    assert_eq!(messages(pipeline.context()), ["No existing project to build"]);
    assert!(launcher.launches().is_empty());
    assert!(!config(dir.path()).code_path().exists());
}

#[test]
fn unwritable_intermediates_fail_code_generation() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    fs::create_dir_all(&config.binaries_path).unwrap();
    // A file where the intermediates folder should be.
    fs::write(&config.intermediates_path, "").unwrap();

    let launcher = FakeLauncher::default();
    let mut pipeline = Pipeline::new(project(dir.path()), config, &launcher);

    assert_eq!(pipeline.run(), BuildState::Failed(Stage::CodeGeneration));
    let context = pipeline.into_context();
    assert_eq!(context.error_count(), 2);
    assert_eq!(messages(&context)[1], "Failed to generate C++ code");
    assert!(launcher.launches().is_empty());
}

#[test]
fn configure_failure_skips_build() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = FakeLauncher {
        fail_at: Some(0),
        ..FakeLauncher::default()
    };
    let mut pipeline = Pipeline::new(project(dir.path()), config(dir.path()), &launcher);

    assert_eq!(pipeline.run(), BuildState::Failed(Stage::Compilation));
    assert_eq!(launcher.launches().len(), 1);

    let messages = messages(pipeline.context());
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Failed to generate cmake code: "), "{messages:?}");
    assert!(messages[0].contains("exit code 1"), "{messages:?}");
    assert_eq!(messages[1], "Compilation failed while building C++ code");
}

#[test]
fn build_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = FakeLauncher {
        fail_at: Some(1),
        ..FakeLauncher::default()
    };
    let context = build_with(&project(dir.path()), config(dir.path()), &launcher);

    assert_eq!(launcher.launches().len(), 2);
    let messages = messages(&context);
    assert!(messages[0].starts_with("C++ build failed: "), "{messages:?}");
    assert_eq!(messages[1], "Compilation failed while building C++ code");
}

#[test]
fn missing_output_fails_artifact_copy() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = FakeLauncher::default();
    let mut pipeline = Pipeline::new(project(dir.path()), config(dir.path()), &launcher);

    assert_eq!(pipeline.run(), BuildState::Failed(Stage::ArtifactCopy));
    let messages = messages(pipeline.context());
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Failed to copy binaries of module 'App': "), "{messages:?}");
    assert_eq!(messages[1], "Failed to copy build artifacts");
}

#[test]
fn previous_binaries_are_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let stale = config.binaries_path.join("Old/stale.bin");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "x").unwrap();

    let launcher = FakeLauncher::default();
    let mut pipeline = Pipeline::new(project(dir.path()), config, &launcher);
    pipeline.step();
    assert!(!stale.exists());
}

#[test]
fn pipeline_works_on_its_own_copy() {
    let dir = tempfile::tempdir().unwrap();
    let mut live = project(dir.path());
    let tick = live
        .query::<(CFunctionDecl,)>()
        .iter()
        .next()
        .unwrap();
    let height = live.create();
    live.insert(height, CIdentifier::new("height"));
    live.insert(height, CParameterDecl::new("float"));
    hierarchy::add_child(&mut live, tick, height);

    let launcher = FakeLauncher::default();
    build_with(&live, config(dir.path()), &launcher);

    // Fragments were generated on the pipeline's copy only.
    assert!(!live.has::<CCppCodeGenFragment>(height));
}
