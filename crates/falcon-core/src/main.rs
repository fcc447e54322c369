use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use falcon_core::{
    analyze_coverage, FalconConfig, InputDocument, ResponseStrategy, StaticResponses,
};
use falcon_pipeline::{
    catalog, PipelineActor, PipelineController, PipelineEvent, PipelineMode, SessionHistory, Stage,
    TokioClock, STAGE_COUNT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    match matches.subcommand() {
        Some(("simulate", args)) => simulate(args).await,
        Some(("coverage", args)) => {
            print!("{}", coverage(args)?);
            Ok(())
        }
        Some(("ask", args)) => {
            println!("{}", ask(args));
            Ok(())
        }
        Some(("stages", args)) => {
            print!("{}", stages(args)?);
            Ok(())
        }
        Some(("history", args)) => {
            print!("{}", history(args));
            Ok(())
        }
        _ => Ok(()),
    }
}

fn cli() -> Command {
    Command::new("falcon")
        .version(falcon_core::VERSION)
        .about("Ford Falcon modernization pipeline simulator")
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run a pipeline from engine start to the final stage")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("manual")
                        .long("manual")
                        .action(ArgAction::SetTrue)
                        .help("Manual mode: trigger every stage explicitly"),
                )
                .arg(
                    Arg::new("stage-ms")
                        .long("stage-ms")
                        .value_parser(value_parser!(u64))
                        .help("Countdown length per stage in milliseconds"),
                )
                .arg(
                    Arg::new("tick-ms")
                        .long("tick-ms")
                        .value_parser(value_parser!(u64))
                        .help("Tick period in milliseconds"),
                )
                .arg(
                    Arg::new("restart-at")
                        .long("restart-at")
                        .value_parser(value_parser!(usize))
                        .help("Restart the engines once when this stage becomes active"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the final snapshot as JSON"),
                ),
        )
        .subcommand(
            Command::new("coverage")
                .about("Analyze input document coverage")
                .arg(
                    Arg::new("docs")
                        .long("docs")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of input documents"),
                ),
        )
        .subcommand(
            Command::new("ask")
                .about("Ask the assistant a question")
                .arg(Arg::new("question").required(true).help("Question text"))
                .arg(
                    Arg::new("document")
                        .long("document")
                        .action(ArgAction::SetTrue)
                        .help("Use the document editor table"),
                ),
        )
        .subcommand(
            Command::new("stages")
                .about("List the pipeline stages")
                .arg(Arg::new("key").help("Show only the stage with this key")),
        )
        .subcommand(
            Command::new("history")
                .about("Generate a mock session history")
                .arg(
                    Arg::new("count")
                        .long("count")
                        .default_value("5")
                        .value_parser(value_parser!(usize))
                        .help("Number of sessions"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn simulate(args: &ArgMatches) -> anyhow::Result<()> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => FalconConfig::load(path)?,
        None => FalconConfig::default(),
    };
    if let Some(ms) = args.get_one::<u64>("stage-ms") {
        config.pipeline.stage_duration_ms = *ms;
    }
    if let Some(ms) = args.get_one::<u64>("tick-ms") {
        config.pipeline.tick_interval_ms = *ms;
    }
    if args.get_flag("manual") {
        config.pipeline.default_mode = PipelineMode::Manual;
    }
    config.validate()?;
    let mut restart_at = args.get_one::<usize>("restart-at").copied();

    let controller = PipelineController::new(config.project.to_project(), config.pipeline.clone())
        .with_clock(Arc::new(TokioClock::new()));
    let (handle, join) = PipelineActor::spawn(controller)?;
    let mut events = handle.subscribe();

    println!("Simulating {} ({:?} mode)", config.project.name, config.pipeline.default_mode);
    handle.start_engines().await?;

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event stream lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        print_event(&event);

        match event {
            PipelineEvent::StageStarted { stage } => {
                if restart_at == Some(stage) {
                    restart_at = None;
                    println!("  -> restarting engines at stage {stage}");
                    handle.start_engines().await?;
                } else if config.pipeline.default_mode == PipelineMode::Manual && stage < STAGE_COUNT {
                    match handle.trigger_stage().await {
                        Ok(_) => {}
                        Err(e) if e.is_precondition() => {
                            tracing::warn!(error = %e, stage, "manual trigger rejected");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            PipelineEvent::PipelineFinished => break,
            _ => {}
        }
    }

    let snapshot = handle.snapshot().await?;
    let sessions = handle.sessions().await?;
    let notifications = handle.notifications().await?;
    handle.shutdown().await?;
    join.await.context("pipeline actor panicked")?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!();
        println!("Notifications:");
        for note in notifications.iter().rev() {
            println!("  [{:?}] {}: {}", note.kind, note.title, note.message);
        }
        println!();
        println!("Final stage: {} / {}", snapshot.project.progress(), STAGE_COUNT);
        println!("Unread notifications: {}", snapshot.unread_notifications);
        println!("Archived sessions: {}", sessions.len());
        for session in &sessions {
            println!(
                "  {}  reached stage {} ({:?}), {}s",
                session.id,
                session.final_stage,
                session.status,
                session.duration().num_seconds()
            );
        }
    }
    Ok(())
}

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::StartupMessage { text } => println!("  {text}"),
        PipelineEvent::EnginesStarted => println!("Engines started"),
        PipelineEvent::StageStarted { stage } => {
            println!("[{stage:>2}] {} started", catalog::stage_name(*stage));
        }
        PipelineEvent::StageCompleted { stage } => {
            println!("[{stage:>2}] {} completed", catalog::stage_name(*stage));
        }
        PipelineEvent::SessionArchived { session, final_stage } => {
            println!("Archived {session} at stage {final_stage}");
        }
        PipelineEvent::PipelineFinished => println!("Pipeline reached the final stage"),
        PipelineEvent::StageTimerStarted { .. } | PipelineEvent::ModeChanged { .. } => {}
    }
}

fn coverage(args: &ArgMatches) -> anyhow::Result<String> {
    let documents: Vec<InputDocument> = match args.get_one::<PathBuf>("docs") {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("cannot parse {}", path.display()))?
        }
        None => Vec::new(),
    };
    Ok(render_coverage(&documents))
}

fn render_coverage(documents: &[InputDocument]) -> String {
    let report = analyze_coverage(documents);
    let mut out = format!(
        "Coverage: {}% ({}/{}) [{:?}]\n",
        report.coverage_percentage(),
        report.total_provided,
        report.total_required,
        report.traffic_light()
    );
    for doc in &report.provided {
        out.push_str(&format!("  + {doc}\n"));
    }
    for doc in &report.missing {
        out.push_str(&format!("  - {doc}\n"));
    }
    out
}

fn ask(args: &ArgMatches) -> String {
    let question = args
        .get_one::<String>("question")
        .map(String::as_str)
        .unwrap_or_default();
    let strategy = if args.get_flag("document") {
        StaticResponses::document()
    } else {
        StaticResponses::chat()
    };
    strategy.answer(question)
}

fn stages(args: &ArgMatches) -> anyhow::Result<String> {
    let selected: Vec<(usize, &Stage)> = match args.get_one::<String>("key") {
        Some(key) => {
            let found = catalog::stage_by_key(key)
                .with_context(|| format!("unknown stage key {key:?}"))?;
            vec![found]
        }
        None => catalog::stages().iter().enumerate().map(|(i, s)| (i + 1, s)).collect(),
    };

    let mut out = String::new();
    for (index, stage) in selected {
        out.push_str(&format!("{index:>2}. {} [{}] ({})\n", stage.name, stage.key, stage.duration));
        out.push_str(&format!("    {}\n", stage.description));
        out.push_str(&format!("    team: {}\n", stage.team.join(", ")));
    }
    Ok(out)
}

fn history(args: &ArgMatches) -> String {
    let count = args.get_one::<usize>("count").copied().unwrap_or(5);
    let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);
    let mut rng = StdRng::seed_from_u64(seed);
    let history = SessionHistory::mock(&mut rng, count, chrono::Utc::now());

    let mut out = String::new();
    for session in history.iter() {
        out.push_str(&format!(
            "{}  {}  stage {}/{}  {:?}  {}\n",
            session.id,
            session.start_time.format("%Y-%m-%d %H:%M"),
            session.final_stage,
            session.total_stages,
            session.status,
            session.artifacts.join(", ")
        ));
    }
    out
}
