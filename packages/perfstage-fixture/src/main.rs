use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use perfstage_fixture::trace::TraceEvent;
use perfstage_fixture::{PointerScript, Session, Timings};
use perfstage_page::ElementKind;

#[derive(Parser)]
#[command(name = "perfstage")]
#[command(
    about = "Runs the profiler test fixture against the perfstage event loop",
    long_about = None
)]
struct Cli {
    /// How long the scripted pointer keeps moving, in milliseconds
    #[arg(long, default_value_t = 3200.0)]
    session_ms: f64,

    /// Interval between scripted pointer movements, in milliseconds
    #[arg(long, default_value_t = 16.0)]
    move_interval_ms: f64,

    /// When the scripted click lands on the page body, in milliseconds
    #[arg(long, default_value_t = 50.0)]
    click_at_ms: f64,

    /// Display refresh interval of the simulated host, in milliseconds
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_interval_ms: f64,

    /// Write the recorded trace as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let session = Session::new(Timings::default());
    session.set_frame_interval(cli.frame_interval_ms);

    let body = session.page().body();
    let link = session
        .page()
        .create_element(ElementKind::Anchor, "a link the click handler ignores");

    // A click on the link first, to show it starts nothing, then the real
    // activation on the body, with the pointer moving throughout.
    let script = PointerScript::new()
        .moves(0.0, cli.session_ms, cli.move_interval_ms, body)
        .click(10.0, link)
        .click(cli.click_at_ms, body);

    println!("Running the fixture; capture this process with your profiler now.");
    let trace = session.run(script);

    let mut events = trace.events();
    events.sort_by(|a, b| event_time(a).total_cmp(&event_time(b)));
    println!("{:>10}  {:<8}  event", "ms", "kind");
    for event in &events {
        match event {
            TraceEvent::Task {
                label,
                start_ms,
                end_ms,
            } => println!(
                "{start_ms:>10.1}  {:<8}  {label} ({:.1}ms)",
                "task",
                end_ms - start_ms
            ),
            TraceEvent::Marker { label, at_ms } => {
                println!("{at_ms:>10.1}  {:<8}  {label}", "marker")
            }
            TraceEvent::Frame {
                label,
                timestamp_ms,
            } => println!("{timestamp_ms:>10.1}  {:<8}  {label}", "frame"),
        }
    }
    println!("Final status: {}", session.page().status());

    if let Some(path) = cli.json {
        std::fs::write(&path, trace.to_json()?)?;
        println!("Trace written to {}", path.display());
    }

    Ok(())
}

fn event_time(event: &TraceEvent) -> f64 {
    match event {
        TraceEvent::Task { start_ms, .. } => *start_ms,
        TraceEvent::Marker { at_ms, .. } => *at_ms,
        TraceEvent::Frame { timestamp_ms, .. } => *timestamp_ms,
    }
}
