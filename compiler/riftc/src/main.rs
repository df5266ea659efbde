//! Rift Compiler CLI

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rift_diagnostic::CompileConfig;
use riftc::{
    build, init_tracing, init_tracing_with, open_project, parse_build_options, BuildOptions,
    VERBOSE_LOG_FILTER,
};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "build" => {
            if args.len() < 3 {
                print_build_usage();
                return ExitCode::FAILURE;
            }

            // `-m <mode>` needs lookahead, everything else is one argument.
            let mut options = BuildOptions::default();
            let mut i = 3;
            while i < args.len() {
                if args[i] == "-m" && i + 1 < args.len() {
                    options.build_mode = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    let parsed = parse_build_options(&args[i..=i]);
                    options.merge(&parsed);
                    i += 1;
                }
            }

            build_project(Path::new(&args[2]), &options)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("riftc {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn build_project(path: &Path, options: &BuildOptions) -> ExitCode {
    if options.verbose {
        init_tracing_with(VERBOSE_LOG_FILTER);
    } else {
        init_tracing();
    }

    let ast = match open_project(path) {
        Ok(ast) => ast,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let config = options.apply(CompileConfig::for_project(project_folder(path)));
    if options.verbose {
        eprintln!("  Intermediates: {}", config.intermediates_path.display());
        eprintln!("  Binaries: {}", config.binaries_path.display());
        eprintln!("  Mode: {}", config.build_mode);
    }

    let context = build(&ast, config);
    if context.has_errors() {
        for error in context.errors() {
            eprintln!("error: {error}");
        }
        eprintln!(
            "build failed with {} error{}",
            context.error_count(),
            if context.error_count() == 1 { "" } else { "s" }
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Folder of the project, whether `path` names the folder or its module file.
fn project_folder(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

fn print_usage() {
    eprintln!("Rift Compiler");
    eprintln!();
    eprintln!("Usage: riftc <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  build <project>    Generate, compile and package a project");
    eprintln!("  help               Show this message");
    eprintln!("  version            Show the compiler version");
    eprintln!();
    eprintln!("Run 'riftc build' for build options.");
}

fn print_build_usage() {
    eprintln!("Usage: riftc build <project folder or Module.rift> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --debug                 Build in Debug mode");
    eprintln!("  --release               Build in Release mode (default)");
    eprintln!("  --mode=<mode>, -m <mode>");
    eprintln!("                          Build in any CMake configuration");
    eprintln!("  --intermediates=<path>  Generated code and build trees");
    eprintln!("                          (default: <project>/Intermediates)");
    eprintln!("  --binaries=<path>       Copied artifacts (default: <project>/Binaries)");
    eprintln!("  -v, --verbose           Verbose output");
    eprintln!();
    eprintln!("Set RIFT_CMAKE to use another cmake program.");
}
