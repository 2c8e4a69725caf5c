use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use scenario_client::{ApiClient, ViewOutcome, WriteOutcome};
use scenario_model::{InjectTestPayload, InjectTestResult, InjectUuid, ScenarioUuid};
use scenario_session::{EditorConfig, LogConfig, ScenarioSession};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("scenario-editor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and edit scenarios on a scenario server")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Server base URL (overrides configuration and environment)"),
        )
        .subcommand(Command::new("list").about("List scenarios and unreadable files"))
        .subcommand(Command::new("reload").about("Make the server reread its scenario files"))
        .subcommand(
            Command::new("view")
                .about("Print one scenario as JSON")
                .arg(Arg::new("uuid").required(true).help("Scenario UUID")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a scenario")
                .arg(Arg::new("uuid").required(true).help("Scenario UUID")),
        )
        .subcommand(
            Command::new("remove-inject")
                .about("Remove an inject from a scenario")
                .arg(Arg::new("scenario").required(true).help("Scenario UUID"))
                .arg(Arg::new("inject").required(true).help("Inject UUID")),
        )
        .subcommand(
            Command::new("order")
                .about("Set the inject order of a scenario")
                .arg(Arg::new("scenario").required(true).help("Scenario UUID"))
                .arg(
                    Arg::new("injects")
                        .required(true)
                        .action(ArgAction::Append)
                        .num_args(1..)
                        .help("Inject UUIDs in the new order"),
                ),
        )
        .subcommand(
            Command::new("test-inject")
                .about("Evaluate an inject against test data")
                .arg(
                    Arg::new("payload")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("JSON file with the test payload"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<EditorConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EditorConfig::new(),
    };
    let mut config = config.apply_env()?;
    if let Some(url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(url.clone());
    }
    Ok(config)
}

fn init_tracing(log: &LogConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.filter)
            .with_context(|| format!("invalid log filter {:?}", log.filter))?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{name}>"))
}

/// Print server feedback; rejected writes exit non-zero
fn finish(outcome: &WriteOutcome) -> ExitCode {
    let reply = outcome.reply();
    if outcome.is_accepted() {
        println!("{}: {}", reply.title, reply.message);
        ExitCode::SUCCESS
    } else {
        eprintln!("rejected: {}: {}", reply.title, reply.message);
        ExitCode::FAILURE
    }
}

fn print_list(session: &ScenarioSession) {
    for scenario in session.store().scenarios() {
        println!(
            "{}\t{}\t{} injects",
            scenario.uuid(),
            scenario.exercise.name,
            scenario.injects.len()
        );
    }
    for error in session.store().read_errors() {
        eprintln!("unreadable {}: {}", error.file, error.error);
    }
}

/// Load the list and select `scenario` for an inject-level write
async fn select(session: &ScenarioSession, scenario: &str) -> Result<()> {
    session.fetch_scenarios().await?;
    session.store().select_scenario(ScenarioUuid::new(scenario));
    Ok(())
}

async fn run(matches: &ArgMatches, session: &ScenarioSession) -> Result<ExitCode> {
    let code = match matches.subcommand() {
        Some(("list", _)) => {
            session.fetch_scenarios().await?;
            print_list(session);
            ExitCode::SUCCESS
        }
        Some(("reload", _)) => {
            session.force_reload().await?;
            print_list(session);
            ExitCode::SUCCESS
        }
        Some(("view", args)) => {
            let uuid = ScenarioUuid::new(arg(args, "uuid")?);
            match session.view_scenario(&uuid).await? {
                ViewOutcome::Found(scenario) => {
                    println!("{}", serde_json::to_string_pretty(&scenario)?);
                    ExitCode::SUCCESS
                }
                ViewOutcome::NotFound(reply) => {
                    eprintln!("not found: {}", reply.message);
                    ExitCode::FAILURE
                }
            }
        }
        Some(("delete", args)) => {
            let uuid = ScenarioUuid::new(arg(args, "uuid")?);
            finish(&session.delete_scenario(&uuid).await?)
        }
        Some(("remove-inject", args)) => {
            select(session, arg(args, "scenario")?).await?;
            let inject = InjectUuid::new(arg(args, "inject")?);
            finish(&session.remove_inject(&inject).await?)
        }
        Some(("order", args)) => {
            select(session, arg(args, "scenario")?).await?;
            let order: Vec<InjectUuid> = args
                .get_many::<String>("injects")
                .into_iter()
                .flatten()
                .map(|uuid| InjectUuid::new(uuid.as_str()))
                .collect();
            finish(&session.reorder_injects(&order).await?)
        }
        Some(("test-inject", args)) => {
            let path = args
                .get_one::<PathBuf>("payload")
                .context("missing argument <payload>")?;
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let payload: InjectTestPayload = serde_json::from_str(&source)
                .with_context(|| format!("parsing {}", path.display()))?;

            let outcome = session.test_inject(&payload).await?;
            if outcome.is_accepted() {
                let result: InjectTestResult = outcome.reply().data_as()?;
                println!("outcome: {:?}", result.outcome);
                for line in &result.debug {
                    println!("  {line}");
                }
            }
            finish(&outcome)
        }
        Some((other, _)) => anyhow::bail!("unknown subcommand {other}"),
        None => anyhow::bail!("no subcommand given"),
    };
    Ok(code)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let matches = build_cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config.log)?;

    tracing::debug!(base_url = %config.api.resolved_base_url(), "starting");
    let client = ApiClient::new(&config.api)?;
    let session = ScenarioSession::new(client);

    run(&matches, &session).await
}
