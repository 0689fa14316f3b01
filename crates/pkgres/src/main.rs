//! `pkgres` — query compiler and linker metadata from `.pc` files.
//!
//! A command-line front end over the `libpkgres` resolution engine. The
//! interface follows the familiar pkg-config shape: package names (with
//! optional version constraints) plus query flags, configuration from
//! `PKG_CONFIG_PATH`-style environment variables, exit code 0 when every
//! query succeeds.

use std::collections::HashMap;
use std::env;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use libpkgres::config::Config;
use libpkgres::dependency::parse_spec_list;
use libpkgres::invoker::ReferenceImpl;
use libpkgres::package::validate_pc_path;
use libpkgres::paths::split_env_path_list;
use libpkgres::searcher::PkgSearcher;

/// Query build and link metadata for installed packages.
#[derive(Parser, Debug)]
#[command(
    name = "pkgres",
    about = "query compiler and linker metadata from .pc files",
    version = libpkgres::VERSION,
)]
struct Cli {
    // ── Queries ─────────────────────────────────────────────────────
    /// Print the version of each matched module.
    #[arg(long)]
    modversion: bool,

    /// Check whether the modules exist, printing nothing.
    #[arg(long)]
    exists: bool,

    /// Print the named variable's substituted value.
    #[arg(long, value_name = "VARNAME")]
    variable: Option<String>,

    /// Print all variable names defined in each matched module.
    #[arg(long = "print-variables")]
    print_variables: bool,

    /// Print the substituted Cflags property.
    #[arg(long)]
    cflags: bool,

    /// Print the substituted Libs property.
    #[arg(long)]
    libs: bool,

    /// Print each matched module's description.
    #[arg(long = "print-description")]
    print_description: bool,

    /// List every known package with its name and description.
    #[arg(long = "list-all")]
    list_all: bool,

    // ── Configuration ───────────────────────────────────────────────
    /// Define a global variable (format: varname=value).
    #[arg(long = "define-variable", value_name = "VARNAME=VALUE")]
    define_variable: Vec<String>,

    /// Add a directory to the end of the search path.
    #[arg(long = "with-path", value_name = "PATH")]
    with_path: Vec<String>,

    /// Install prefix used to derive the default search directories.
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Never prefer -uninstalled variants.
    #[arg(long = "no-uninstalled")]
    no_uninstalled: bool,

    /// Only match -uninstalled variants.
    #[arg(long = "uninstalled-only")]
    uninstalled_only: bool,

    /// Seed the default search path from an installed pkg-config.
    #[arg(long = "probe-reference")]
    probe_reference: bool,

    /// Enable debug output.
    #[arg(long)]
    debug: bool,

    // ── Positional ──────────────────────────────────────────────────
    /// Package names (and optional version constraints) to query.
    #[arg(trailing_var_arg = true)]
    packages: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build the search configuration from environment variables, CLI flags,
/// and (optionally) values probed from an installed reference tool.
fn build_config(cli: &Cli) -> Result<Config> {
    let mut builder = Config::builder();

    if let Ok(value) = env::var(libpkgres::ENV_PKG_CONFIG_PATH) {
        builder = builder.path_dirs(split_env_path_list(&value));
    }
    if let Ok(value) = env::var(libpkgres::ENV_PKG_CONFIG_LIBDIR) {
        builder = builder.libdir_dirs(split_env_path_list(&value));
    }
    if let Some(ref prefix) = cli.prefix {
        builder = builder.prefix(prefix);
    }
    if cli.no_uninstalled || env::var_os(libpkgres::ENV_PKG_CONFIG_DISABLE_UNINSTALLED).is_some() {
        builder = builder.prefer_uninstalled(false);
    }
    if cli.uninstalled_only {
        builder = builder.uninstalled_only(true);
    }
    for path in &cli.with_path {
        builder = builder.extra_search_dir(path);
    }

    if cli.probe_reference {
        let reference = ReferenceImpl::discover()?;
        let pc_path = reference.default_pc_path()?;
        if !pc_path.is_empty() {
            builder = builder.default_path_override(pc_path);
        }
    }

    Ok(builder.build())
}

/// Parse `--define-variable` arguments into the globals map.
fn build_globals(cli: &Cli) -> Result<HashMap<String, String>> {
    let mut globals = HashMap::new();
    for def in &cli.define_variable {
        match def.split_once('=') {
            Some((key, value)) => {
                globals.insert(key.to_string(), value.to_string());
            }
            None => bail!("Invalid --define-variable format: '{def}' (expected varname=value)"),
        }
    }
    Ok(globals)
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let globals = build_globals(cli)?;
    let searcher = PkgSearcher::new(&config);

    if cli.list_all {
        let (mut pkgs, errors) = searcher.known_packages_list(&globals);
        pkgs.sort();
        for (pkgname, name, description) in pkgs {
            println!("{pkgname:<32}{name} - {description}");
        }
        for error in errors {
            eprintln!("{error}");
        }
        return Ok(());
    }

    if cli.packages.is_empty() {
        bail!("Must specify package names on the command line");
    }

    // Explicitly supplied .pc paths are validated up front.
    for package in &cli.packages {
        if package.ends_with(".pc") {
            validate_pc_path(Path::new(package))?;
        }
    }

    let deps = parse_spec_list(&cli.packages.join(" "));
    if deps.is_empty() {
        bail!("Must specify package names on the command line");
    }

    let wants_output = cli.modversion
        || cli.print_description
        || cli.variable.is_some()
        || cli.print_variables
        || cli.cflags
        || cli.libs;
    if !wants_output && !cli.exists {
        // A plain invocation behaves like --exists: resolution alone
        // decides the exit code.
        tracing::debug!("no query flags given; checking existence only");
    }

    let mut cflags = Vec::new();
    let mut libs = Vec::new();
    for dep in &deps {
        let pkg = searcher.search_for_package(dep, &globals)?;

        if cli.modversion {
            println!("{}", pkg.version);
        }
        if cli.print_description {
            println!("{}", pkg.description());
        }
        if let Some(ref varname) = cli.variable {
            println!("{}", pkg.variable(varname).unwrap_or(""));
        }
        if cli.print_variables {
            let mut names: Vec<_> = pkg.variables.keys().collect();
            names.sort();
            for name in names {
                println!("{name}");
            }
        }
        if cli.cflags {
            cflags.push(pkg.properties.cflags.clone());
        }
        if cli.libs {
            libs.push(pkg.properties.libs.clone());
        }
    }

    if cli.cflags {
        println!("{}", cflags.join(" ").trim());
    }
    if cli.libs {
        println!("{}", libs.join(" ").trim());
    }

    Ok(())
}
