//! Thin command-line host shell for the OBEX engine
//!
//! Drives the engine against a replay fixture instead of a live remote
//! session: open a path and print its markup, dispatch one action token, or
//! list the supported object types.

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use obex_engine::{ActionRequest, DocumentManager, EngineConfig};
use obex_handlers::build_default_registry;
use obex_remote::ReplayClient;
use std::collections::HashMap;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Command::new("obex")
        .version(obex_engine::VERSION)
        .about("Browse and act on remote administrative objects")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Open a resource against a replay fixture and print its markup")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .help("Editor path, e.g. /x/PAYROLL/QUEUE1.DTAQ"),
                )
                .arg(
                    Arg::new("fixture")
                        .long("fixture")
                        .required(true)
                        .help("JSON replay fixture with scripted queries/commands"),
                ),
        )
        .subcommand(
            Command::new("act")
                .about("Open a resource, dispatch one action token, and print the result")
                .arg(Arg::new("path").required(true).help("Editor path"))
                .arg(
                    Arg::new("token")
                        .required(true)
                        .help("Action token, e.g. 'action:clear?confirm=yes'"),
                )
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .action(ArgAction::Append)
                        .help("Bound field value as field=value; repeatable"),
                )
                .arg(
                    Arg::new("fixture")
                        .long("fixture")
                        .required(true)
                        .help("JSON replay fixture with scripted queries/commands"),
                ),
        )
        .subcommand(Command::new("types").about("List supported object types"));

    match cli.get_matches().subcommand() {
        Some(("render", args)) => {
            let path = args.get_one::<String>("path").unwrap();
            let fixture = args.get_one::<String>("fixture").unwrap();

            let manager = manager_from_fixture(fixture)?;
            let opened = manager.open(path).await?;

            if opened.failed_fetch {
                eprintln!("warning: {} reported no data", opened.identifier);
            }
            println!("{}", opened.markup);
        }
        Some(("act", args)) => {
            let path = args.get_one::<String>("path").unwrap();
            let token = args.get_one::<String>("token").unwrap();
            let bindings = parse_bindings(args.get_many::<String>("bind"))?;

            let fixture = args.get_one::<String>("fixture").unwrap();
            let manager = manager_from_fixture(fixture)?;
            let opened = manager.open(path).await?;

            let request = ActionRequest::parse(token, bindings)?;
            match manager.act(&opened.identifier, request).await? {
                Some(markup) => println!("{markup}"),
                None => println!("(no rerender)"),
            }

            let status = manager.status(&opened.identifier)?;
            if status.dirty {
                println!("document has unsaved changes");
            }
        }
        Some(("types", _)) => {
            let registry = build_default_registry(Arc::new(ReplayClient::new()));
            for tag in registry.supported_types() {
                println!("{tag}");
            }
        }
        _ => {}
    }

    Ok(())
}

fn manager_from_fixture(fixture: &str) -> anyhow::Result<DocumentManager> {
    let client =
        ReplayClient::from_fixture(fixture).with_context(|| format!("loading {fixture}"))?;
    let registry = build_default_registry(Arc::new(client));
    Ok(DocumentManager::new(registry, EngineConfig::new()))
}

fn parse_bindings(
    values: Option<clap::parser::ValuesRef<'_, String>>,
) -> anyhow::Result<HashMap<String, String>> {
    let mut bindings = HashMap::new();
    for raw in values.into_iter().flatten() {
        let (field, value) = raw
            .split_once('=')
            .with_context(|| format!("binding {raw} is not field=value"))?;
        bindings.insert(field.to_string(), value.to_string());
    }
    Ok(bindings)
}
