//! End-to-end builds of on-disk projects with a recording process launcher.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use rift_ast::{hierarchy, module, CIdentifier};
use rift_diagnostic::{CompileConfig, CompileContext};
use riftc::{
    build_with, open_project, spawn_build_with, BuildState, Pipeline, ProcessLauncher, Stage,
    ToolCommand, ToolchainError,
};

/// Records every launch. The build command creates `outputs`; `fail` names
/// the first argument of a command that should fail.
#[derive(Clone, Default)]
struct RecordingLauncher {
    launches: Arc<Mutex<Vec<ToolCommand>>>,
    outputs: Vec<PathBuf>,
    fail: Option<&'static str>,
}

impl RecordingLauncher {
    fn count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }

    fn first_args(&self) -> Vec<String> {
        self.launches
            .lock()
            .unwrap()
            .iter()
            .map(|command| command.args[0].to_string_lossy().into_owned())
            .collect()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&self, command: &ToolCommand) -> Result<(), ToolchainError> {
        self.launches.lock().unwrap().push(command.clone());
        let first = command.args.first().map(|arg| arg.to_string_lossy().into_owned());

        if first.as_deref() == self.fail {
            return Err(ToolchainError::Failed {
                command: command.to_string(),
                exit_code: Some(1),
                stderr: String::new(),
            });
        }
        if first.as_deref() == Some("--build") {
            for output in &self.outputs {
                fs::create_dir_all(output).unwrap();
                fs::write(output.join("program"), "binary").unwrap();
            }
        }
        Ok(())
    }
}

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// `App` project with a `Player` struct, a `Game` class and a free `Tick`.
fn app_project(root: &Path) {
    write(root, "Module.rift", r#"{ "name": "App" }"#);
    write(root, "Player.rf", r#"{ "type": "Struct" }"#);
    write(
        root,
        "Game.rf",
        r#"{ "type": "Class", "variables": [{ "name": "score" }], "functions": [{ "name": "Start" }] }"#,
    );
    write(
        root,
        "Loop.rf",
        r#"{ "type": "FunctionLibrary", "functions": [{ "name": "Tick" }] }"#,
    );
}

fn messages(context: &CompileContext) -> Vec<String> {
    context.errors().iter().map(ToString::to_string).collect()
}

#[test]
fn builds_project_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    app_project(root);

    let ast = open_project(root).unwrap();
    let config = CompileConfig::for_project(root).with_build_mode("Debug");
    let launcher = RecordingLauncher {
        outputs: vec![config.cmake_path().join("App/Debug")],
        ..RecordingLauncher::default()
    };

    let context = build_with(&ast, config.clone(), &launcher);
    assert!(!context.has_errors(), "{:?}", messages(&context));
    assert_eq!(launcher.first_args(), ["-S", "--build"]);

    let header = fs::read_to_string(config.code_path().join("App/Include/code.h")).unwrap();
    let player = header.find("struct Player\n{").unwrap();
    let game = header.find("struct Game\n{").unwrap();
    assert!(player < game, "structs come before classes:\n{header}");
    assert!(header.contains("void Game_Start(Game& self);"), "{header}");
    assert!(header.contains("void Tick();"), "{header}");

    let source = fs::read_to_string(config.code_path().join("App/Src/code.cpp")).unwrap();
    assert!(source.contains("int main()"), "{source}");

    let root_descriptor = fs::read_to_string(config.code_path().join("CMakeLists.txt")).unwrap();
    assert!(root_descriptor.contains("project(App VERSION 0.1 LANGUAGES CXX)"));

    assert!(config.binaries_path.join("App/Bin/program").is_file());
    assert!(config.binaries_path.join("App/Include/code.h").is_file());
}

#[test]
fn descriptor_failure_launches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Module.rift", r#"{ "name": "App" }"#);
    write(root, "Engine/Module.rift", r#"{ "name": "Core", "target": "Static" }"#);
    write(root, "Tools/Module.rift", r#"{ "name": "Core", "target": "Static" }"#);

    let ast = open_project(root).unwrap();
    let launcher = RecordingLauncher::default();
    let mut pipeline = Pipeline::new(ast, CompileConfig::for_project(root), &launcher);

    assert_eq!(pipeline.run(), BuildState::Failed(Stage::DescriptorGeneration));
    assert_eq!(launcher.count(), 0);
    assert_eq!(
        messages(pipeline.context()),
        ["Duplicate module name 'Core'", "Failed to generate cmake files"]
    );
}

#[test]
fn missing_module_output_still_copies_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    app_project(root);
    write(root, "Engine/Module.rift", r#"{ "name": "Engine", "target": "Shared" }"#);
    write(root, "Tools/Module.rift", r#"{ "name": "Tools", "target": "Static" }"#);

    let ast = open_project(root).unwrap();
    assert_eq!(module::all_modules(&ast).len(), 3);

    let config = CompileConfig::for_project(root);
    // Engine produced nothing.
    let launcher = RecordingLauncher {
        outputs: vec![
            config.cmake_path().join("App/Release"),
            config.cmake_path().join("Tools/Release"),
        ],
        ..RecordingLauncher::default()
    };

    let context = build_with(&ast, config.clone(), &launcher);
    let messages = messages(&context);
    assert_eq!(messages.len(), 2, "{messages:?}");
    assert!(messages[0].contains("'Engine'"), "{messages:?}");
    assert_eq!(messages[1], "Failed to copy build artifacts");

    assert!(config.binaries_path.join("App/Bin/program").is_file());
    assert!(config.binaries_path.join("Tools/Bin/program").is_file());
    assert!(!config.binaries_path.join("Engine/Bin").exists());
}

#[test]
fn configure_failure_skips_build_launch() {
    let dir = tempfile::tempdir().unwrap();
    app_project(dir.path());

    let ast = open_project(dir.path()).unwrap();
    let launcher = RecordingLauncher {
        fail: Some("-S"),
        ..RecordingLauncher::default()
    };
    let context = build_with(&ast, CompileConfig::for_project(dir.path()), &launcher);

    assert_eq!(launcher.first_args(), ["-S"]);
    assert_eq!(
        messages(&context).last().map(String::as_str),
        Some("Compilation failed while building C++ code")
    );
}

#[test]
fn empty_store_has_nothing_to_build() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = RecordingLauncher::default();
    let context = build_with(
        &rift_ast::AstStore::new(),
        CompileConfig::for_project(dir.path()),
        &launcher,
    );
    assert_eq!(messages(&context), ["No existing project to build"]);
    assert_eq!(launcher.count(), 0);
}

#[test]
fn background_build_leaves_live_tree_editable() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    app_project(root);

    let mut ast = open_project(root).unwrap();
    let config = CompileConfig::for_project(root);
    let launcher = RecordingLauncher {
        outputs: vec![config.cmake_path().join("App/Release")],
        ..RecordingLauncher::default()
    };

    let handle = spawn_build_with(&ast, config.clone(), launcher.clone());

    // Edit the live tree while the worker builds its snapshot.
    let project = module::project_module(&ast).unwrap();
    let late = ast.create();
    ast.insert(late, CIdentifier::new("Late"));
    hierarchy::add_child(&mut ast, project, late);

    let context = handle.join().unwrap();
    assert!(!context.has_errors(), "{:?}", messages(&context));
    assert_eq!(launcher.count(), 2);
    assert!(config.binaries_path.join("App/Bin/program").is_file());
}
