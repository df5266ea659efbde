//! Build orchestration.
//!
//! A build is a small state machine over a private snapshot of the AST:
//!
//! ```text
//! Idle → CodeGenerated → DescriptorGenerated → Compiled → ArtifactsCopied → Done
//!   ╰──────────────┴──────────────┴──────────────┴─────────────┴──→ Failed(stage)
//! ```
//!
//! Every transition starts only if no diagnostic has been recorded so far.
//! A failed transition records a stage summary and halts the machine; files
//! written before the failure stay on disk.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use rift_ast::{module, AstStore};
use rift_codegen::{generate_cmake, generate_code};
use rift_diagnostic::{CompileConfig, CompileContext};

use crate::files;
use crate::toolchain::{CMake, ProcessLauncher, SystemLauncher, ToolCommand, ToolchainError};

/// Step of the pipeline a failure happened in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Project lookup and output cleanup before code generation.
    Prepare,
    CodeGeneration,
    DescriptorGeneration,
    Compilation,
    ArtifactCopy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuildState {
    Idle,
    CodeGenerated,
    DescriptorGenerated,
    Compiled,
    ArtifactsCopied,
    Done,
    Failed(Stage),
}

impl BuildState {
    /// No further transition is possible.
    pub fn is_finished(self) -> bool {
        matches!(self, BuildState::Done | BuildState::Failed(_))
    }
}

/// One build run over an owned AST snapshot.
pub struct Pipeline<'l> {
    ast: AstStore,
    context: CompileContext,
    cmake: CMake,
    launcher: &'l dyn ProcessLauncher,
    state: BuildState,
    started: Instant,
}

impl<'l> Pipeline<'l> {
    /// Prepare a build of `ast`. The pipeline owns the store; pass a copy of a
    /// tree that is still being edited.
    pub fn new(ast: AstStore, config: CompileConfig, launcher: &'l dyn ProcessLauncher) -> Self {
        Pipeline {
            ast,
            context: CompileContext::new(config),
            cmake: CMake::from_env(),
            launcher,
            state: BuildState::Idle,
            started: Instant::now(),
        }
    }

    /// Use `cmake` instead of the program picked from the environment.
    #[must_use]
    pub fn with_cmake(mut self, cmake: CMake) -> Self {
        self.cmake = cmake;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn context(&self) -> &CompileContext {
        &self.context
    }

    pub fn into_context(self) -> CompileContext {
        self.context
    }

    /// Run the next transition. Finished pipelines stay where they are.
    pub fn step(&mut self) -> BuildState {
        self.state = match self.state {
            BuildState::Idle => self.emit_code(),
            BuildState::CodeGenerated => self.emit_descriptors(),
            BuildState::DescriptorGenerated => self.compile(),
            BuildState::Compiled => self.copy_artifacts(),
            BuildState::ArtifactsCopied => {
                tracing::info!(
                    "Build complete ({:.2}s)",
                    self.started.elapsed().as_secs_f64()
                );
                BuildState::Done
            }
            state @ (BuildState::Done | BuildState::Failed(_)) => state,
        };
        self.state
    }

    /// Step until the pipeline is done or failed.
    pub fn run(&mut self) -> BuildState {
        while !self.state.is_finished() {
            self.step();
        }
        self.state
    }

    /// Close a transition: `next` when no diagnostic was recorded, otherwise
    /// record `summary` and fail in `stage`.
    fn conclude(&mut self, next: BuildState, stage: Stage, summary: &str) -> BuildState {
        if self.context.has_errors() {
            self.context.add_error(summary);
            BuildState::Failed(stage)
        } else {
            next
        }
    }

    fn emit_code(&mut self) -> BuildState {
        if !self.prepare() {
            return BuildState::Failed(Stage::Prepare);
        }

        tracing::info!("Generating C++");
        let code_path = self.context.config().code_path();
        if let Err(error) = files::recreate_dir(&code_path) {
            self.context
                .add_error(format!("Couldn't prepare code folder: {error}"));
        } else {
            generate_code(&mut self.ast, &mut self.context);
        }
        self.conclude(
            BuildState::CodeGenerated,
            Stage::CodeGeneration,
            "Failed to generate C++ code",
        )
    }

    /// Check there is something to build and clear the previous binaries.
    fn prepare(&mut self) -> bool {
        if self.context.has_errors() {
            return false;
        }
        let Some(project) = module::project_module(&self.ast) else {
            self.context.add_error("No existing project to build");
            return false;
        };
        tracing::info!(
            "Building project '{}'",
            module::module_name(&self.ast, project)
        );

        tracing::info!("Cleaning previous build");
        if let Err(error) = files::recreate_dir(&self.context.config().binaries_path) {
            self.context
                .add_error(format!("Couldn't clean binaries folder: {error}"));
            return false;
        }
        true
    }

    fn emit_descriptors(&mut self) -> BuildState {
        tracing::info!("Generating CMake");
        generate_cmake(&self.ast, &mut self.context);
        self.conclude(
            BuildState::DescriptorGenerated,
            Stage::DescriptorGeneration,
            "Failed to generate cmake files",
        )
    }

    fn compile(&mut self) -> BuildState {
        tracing::info!("Building C++");
        let config = self.context.config().clone();
        let code_path = config.code_path();
        let cmake_path = config.cmake_path();

        if let Err(error) = files::create_dir(&cmake_path) {
            self.context
                .add_error(format!("Couldn't create build folder: {error}"));
        } else {
            tracing::info!("Configuring");
            let configure = self
                .cmake
                .configure(&code_path, &cmake_path, &config.build_mode);
            if self.launch(&configure, "Failed to generate cmake code") {
                tracing::info!("Building");
                let build = self.cmake.build(&cmake_path, &config.build_mode);
                self.launch(&build, "C++ build failed");
            }
        }
        self.conclude(
            BuildState::Compiled,
            Stage::Compilation,
            "Compilation failed while building C++ code",
        )
    }

    /// Launch `command`, recording `message` with the cause if it fails.
    fn launch(&mut self, command: &ToolCommand, message: &str) -> bool {
        match self.launcher.launch(command) {
            Ok(()) => true,
            Err(error) => {
                if let ToolchainError::Failed { stderr, .. } = &error {
                    if !stderr.trim().is_empty() {
                        tracing::error!("{}", stderr.trim_end());
                    }
                }
                self.context.add_error(format!("{message}: {error}"));
                false
            }
        }
    }

    fn copy_artifacts(&mut self) -> BuildState {
        tracing::info!("Copying artifacts");
        let config = self.context.config().clone();

        if let Err(error) = files::copy_dir(&config.code_path(), &config.binaries_path) {
            self.context
                .add_error(format!("Failed to copy code: {error}"));
        } else {
            for id in module::all_modules(&self.ast) {
                let name = module::module_name(&self.ast, id);
                self.copy_module_binaries(&config, &name);
            }
        }
        self.conclude(
            BuildState::ArtifactsCopied,
            Stage::ArtifactCopy,
            "Failed to copy build artifacts",
        )
    }

    /// Copy `<CMake>/<name>/<mode>` into `<Binaries>/<name>/Bin`.
    fn copy_module_binaries(&mut self, config: &CompileConfig, name: &str) {
        let from = config.cmake_path().join(name).join(&config.build_mode);
        let to = config.binaries_path.join(name).join("Bin");
        tracing::debug!(module = %name, from = %from.display(), "copying binaries");

        if let Err(error) = files::copy_dir(&from, &to) {
            self.context.add_error(format!(
                "Failed to copy binaries of module '{name}': {error}"
            ));
        }
    }
}

/// Build `ast` with the system toolchain, blocking until done.
///
/// `ast` is copied first. Inspect the returned diagnostics to learn whether the
/// build succeeded.
pub fn build(ast: &AstStore, config: CompileConfig) -> CompileContext {
    build_with(ast, config, &SystemLauncher)
}

/// [`build`] with a custom process launcher.
pub fn build_with(
    ast: &AstStore,
    config: CompileConfig,
    launcher: &dyn ProcessLauncher,
) -> CompileContext {
    let mut pipeline = Pipeline::new(ast.clone(), config, launcher);
    pipeline.run();
    pipeline.into_context()
}

/// Build a copy of `ast` on a worker thread with the system toolchain.
///
/// `ast` may be edited freely while the build runs.
pub fn spawn_build(ast: &AstStore, config: CompileConfig) -> JoinHandle<CompileContext> {
    spawn_build_with(ast, config, SystemLauncher)
}

/// [`spawn_build`] with a custom process launcher.
pub fn spawn_build_with<L>(
    ast: &AstStore,
    config: CompileConfig,
    launcher: L,
) -> JoinHandle<CompileContext>
where
    L: ProcessLauncher + Send + 'static,
{
    let snapshot = ast.clone();
    thread::spawn(move || {
        let mut pipeline = Pipeline::new(snapshot, config, &launcher);
        pipeline.run();
        pipeline.into_context()
    })
}

#[cfg(test)]
mod tests;
