use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use fcars::{Base64Model, Explorer, ExplorerConfig, ModelCodec, PlainText, Pos2, RunLengthEncoded};

mod console;
mod options;
mod stats;

use options::{Args, OutputFormat};
use stats::Recorder;

fn write_output(args: &Args, explorer: &Explorer) -> Result<()> {
    let Some(file_name) = args.output_file() else {
        return Ok(());
    };

    let encoded = match args.output_format()? {
        OutputFormat::Base64 => format!("{}\n", Base64Model.encode(explorer.model())),
        OutputFormat::Text => PlainText.encode(explorer.model()),
        OutputFormat::Rle => RunLengthEncoded::default()
            .set_name("fcars generated model")
            .set_rule(explorer.rule().get())
            .encode(explorer.model()),
    };
    std::fs::write(&file_name, encoded).with_context(|| format!("write model to {}", file_name))
}

fn run_headless(args: &Args, explorer: &mut Explorer, stats: &mut stats::SwitchRecorder) -> Result<()> {
    let display = args.display()?;
    let focus = args.focus()?;

    for _ in 0..args.generations()? {
        let size = explorer.model().size() as i32;
        let focus = focus.unwrap_or(Pos2::splat(size / 2));

        let start = Instant::now();
        explorer.zoom_at(focus, (display, display));
        stats.record(explorer.model(), start.elapsed());

        if stats.has_report() {
            println!("{}", stats.report());
        }
    }
    println!("{}", stats.report());
    Ok(())
}

fn run_console(args: &Args, explorer: &mut Explorer, stats: &mut stats::SwitchRecorder) -> Result<()> {
    let mut console = console::ConsoleRender::new()?;
    let seed = explorer.model().clone();
    let max_steps = args.generations()?;
    let base = args.base_url();

    console.set_report(explorer.share_url(&base, false));
    console.render(explorer.model())?;
    while explorer.generation() < max_steps {
        let Some(cmd) = console.poll_events(Duration::from_millis(100))? else {
            continue;
        };

        let start = Instant::now();
        let stepped = match cmd {
            console::ConsoleCommand::Exit => break,
            console::ConsoleCommand::Zoom => {
                explorer.zoom_at(console.focus(), console::ConsoleRender::display()?);
                true
            }
            console::ConsoleCommand::ZoomOut => {
                explorer.zoom_out();
                true
            }
            console::ConsoleCommand::ZoomIn => {
                explorer.zoom_in(console.focus());
                true
            }
            console::ConsoleCommand::Undo => {
                if let Err(err) = explorer.undo() {
                    console.set_report(err.to_string());
                }
                false
            }
            console::ConsoleCommand::Reset => {
                explorer.apply_seed(seed.clone());
                false
            }
            console::ConsoleCommand::Handled => false,
        };
        if stepped {
            stats.record(explorer.model(), start.elapsed());
            console.set_report(format!(
                "{} | {}",
                stats.report(),
                explorer.share_url(&base, false)
            ));
        }
        console.render(explorer.model())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = Args::from_env()? else {
        return Ok(());
    };

    let params = args.share_params();
    let rule = args.pick_rule(&params)?;
    let seed = args.pick_seed(&params)?;
    println!("rule: {} seed: {1}x{1}", rule, seed.size());

    let config = ExplorerConfig {
        history_depth: args.history()?,
        parallel: args.multithreading(),
    };
    let mut explorer = Explorer::new(rule, seed, config);
    let mut stats = stats::SwitchRecorder::new(explorer.model(), args.stats_file().is_some());

    if args.console() {
        run_console(&args, &mut explorer, &mut stats)?;
    } else {
        run_headless(&args, &mut explorer, &mut stats)?;
    }

    println!("{}", explorer.share_url(&args.base_url(), true));
    write_output(&args, &explorer)?;
    if let Some(file_name) = args.stats_file() {
        stats
            .save(&file_name)
            .with_context(|| format!("write stats to {}", file_name))?;
    }
    Ok(())
}
