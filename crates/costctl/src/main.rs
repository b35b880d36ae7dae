#![warn(missing_docs)]

//! Entry point for the `costctl` binary.

mod cli;
mod error;
mod render;
mod script;
mod service;

use std::{io, path::Path, process, rc::Rc};

use clap::Parser;
use settings_engine::Expr;
use settings_store::SettingStore;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::{CheckArgs, Cli, Commands},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli {
        log,
        store,
        screen,
        locale,
        command,
    } = Cli::parse();
    let env_filter = logging::env_filter_from_spec(&log.spec());
    registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    if let Commands::Check(args) = &command {
        return check(args, screen.as_deref());
    }

    let decl = config::resolve_screen(screen.as_deref())?;
    let store_path = store.unwrap_or_else(service::default_store_path);
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let store: Rc<dyn SettingStore> = Rc::new(runtime.block_on(service::connect(&store_path))?);
    let mut bound = service::open_screen(store, &decl, locale.as_deref())?;

    if let Commands::Run(args) = &command {
        for action in &args.actions {
            script::apply(&mut bound, action)?;
        }
    }
    print!("{}", render::screen(&bound));
    Ok(())
}

/// Validate a screen declaration and optionally dump it.
fn check(args: &CheckArgs, screen: Option<&Path>) -> Result<()> {
    let decl = config::resolve_screen(args.path.as_deref().or(screen))?;
    for control in &decl.controls {
        settings_engine::classify(control)?;
        for rule in [&control.disable_when, &control.hide_when].into_iter().flatten() {
            Expr::parse(rule)?;
        }
    }
    for rule in decl.sections.iter().filter_map(|s| s.hide_when.as_deref()) {
        Expr::parse(rule)?;
    }
    for key in service::missing_defaults(&decl) {
        warn!(key, "control_without_default");
        eprintln!("warning: control '{key}' has no default");
    }
    if args.dump {
        println!("{}", serde_json::to_string_pretty(&decl)?);
    } else {
        println!(
            "ok: {} controls, {} sections, {} locales",
            decl.controls.len(),
            decl.sections.len(),
            decl.locales().count()
        );
    }
    Ok(())
}
