use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, info, warn};
use pipehub::{
    Hub, Pipeline, Stage,
    config::HubConfig,
    logging::{LoggingConfig, init_logging},
    pipes::{FaultyPipe, GenerateLinks, RemoveBadWords, ShortenUrls, Uppercase},
};

#[derive(Parser, Debug)]
#[command(name = "pipehub")]
#[command(about = "Send a message through a named pipeline")]
#[command(long_about = r#"
Send a message through a named pipeline

Pipelines:
  message_processing  remove bad words, then shorten URLs
  links               turn "content" into link markers (via "process")
  shout               uppercase the message (via "process")
  faulty              always fails; the failure handler returns "Default Content"
  default             return the message unchanged

Examples:
  pipehub --pipeline message_processing "This is a test http://example.com with badword"
  pipehub --pipeline faulty "Some data"
"#)]
struct CliArgs {
    /// Message to send through the pipeline
    #[arg(required_unless_present = "list")]
    message: Option<String>,

    /// Pipeline to dispatch to (the configured default when omitted)
    #[arg(long, short)]
    pipeline: Option<String>,

    /// JSON hub configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "info", value_parser = ["off", "error", "warn", "info", "debug", "trace"])]
    log_level: String,

    /// List registered pipelines and exit
    #[arg(long)]
    list: bool,
}

fn build_hub(config: HubConfig) -> Hub<String, String> {
    let hub = Hub::with_config(config);

    hub.register(
        "message_processing",
        |pipeline: Pipeline<String, String>, message| {
            pipeline
                .send(message)
                .through(vec![
                    Stage::object(RemoveBadWords::new()),
                    Stage::object(ShortenUrls),
                ])
                .then_return()
        },
    );

    hub.register("links", |pipeline: Pipeline<String, String>, message| {
        pipeline
            .send(message)
            .via("process")
            .through(Stage::object(GenerateLinks))
            .then_return()
    });

    hub.register("shout", |pipeline: Pipeline<String, String>, message| {
        pipeline
            .send(message)
            .via("process")
            .through(Stage::object(Uppercase))
            .then_return()
    });

    hub.register("faulty", |pipeline: Pipeline<String, String>, message| {
        pipeline
            .send(message)
            .through(Stage::object(FaultyPipe))
            .on_failure(|_content, err| {
                warn!("Error handling content: {}", err);
                Ok("Default Content".to_string())
            })
            .then_return()
    });

    hub.register_default(|pipeline: Pipeline<String, String>, message| {
        pipeline.send(message).then_return()
    });

    hub
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => HubConfig::from_file(path)?,
        None => HubConfig::default(),
    };

    let hub = build_hub(config);

    if args.list {
        for name in hub.pipeline_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let message = args.message.unwrap_or_default();
    let name = args.pipeline.as_deref();
    info!(
        "Dispatching to '{}'",
        name.unwrap_or(&hub.config().default_pipeline)
    );

    let result = hub.dispatch(message, name)?;
    println!("{}", result);
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let level = args.log_level.parse().unwrap_or(LevelFilter::Info);
    init_logging(&LoggingConfig {
        level,
        ..LoggingConfig::default()
    });

    if let Err(err) = run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
