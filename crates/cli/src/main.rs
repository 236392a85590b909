mod script;
mod simulate;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use navmenu::{MemoryDom, MenuConfig, MenuRuntime, load_config_from_path};
use tracing::info;

use crate::script::parse_script;
use crate::simulate::{OutputFormat, Simulator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli().get_matches();
    run(&matches).await
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn cli() -> Command {
    Command::new("navmenu-sim")
        .about("Replay scripted browser events against the navigation menu controller")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("page")
                .long("page")
                .short('p')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Page description (JSON)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("Menu configuration (JSON); defaults apply when omitted"),
        )
        .arg(
            Arg::new("script")
                .long("script")
                .short('s')
                .value_parser(value_parser!(PathBuf))
                .help("Event script, one step per line; `-` reads stdin"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print snapshots as JSON lines"),
        )
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let page_path = matches.get_one::<PathBuf>("page").context("--page is required")?;
    let page = std::fs::read_to_string(page_path)
        .with_context(|| format!("failed to read page description {}", page_path.display()))?;
    let dom = MemoryDom::from_json_str(&page)
        .with_context(|| format!("invalid page description {}", page_path.display()))?;

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config_from_path(path)?,
        None => MenuConfig::default(),
    };

    let script = match matches.get_one::<PathBuf>("script") {
        Some(path) => read_script(path)?,
        None => String::new(),
    };
    let script = parse_script(&script)?;

    let format = if matches.get_flag("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let runtime = MenuRuntime::mount(dom, config)?;
    info!(steps = script.len(), "navigation menu mounted");
    let mut simulator = Simulator::new(runtime, format);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    simulator.run(&script, &mut out).await
}

fn read_script(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut script = String::new();
        io::stdin()
            .read_to_string(&mut script)
            .context("failed to read event script from stdin")?;
        return Ok(script);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read event script {}", path.display()))
}
