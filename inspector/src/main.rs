use anyhow::Context;
use clap::Parser;
use generator::profile::{build_sensor_lines, GeneratorConfig};
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::DashboardModel;
use ndtcore::demo::overall_risk;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{LiveReport, Runner};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "NDT inspection workflow driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// CSV file(s) in the 16-column inspection schema to import
    #[arg(long)]
    import: Vec<PathBuf>,
    /// Record sensor lines from stdin until end of input
    #[arg(long, default_value_t = false)]
    live: bool,
    /// Record this many generated sensor readings
    #[arg(long)]
    synthetic: Option<usize>,
    /// Load the synthetic sensor generator settings from YAML
    #[arg(long)]
    generator: Option<PathBuf>,
    /// Fraction of generated readings that pass through a defect
    #[arg(long, value_parser = parse_rate)]
    defect_rate: Option<f64>,
    /// Seed for generated readings and the scan demo
    #[arg(long)]
    seed: Option<u64>,
    /// Play the simulated crack-detection scan
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Write the CSV export here (overrides the workflow config)
    #[arg(long)]
    export: Option<PathBuf>,
    #[arg(long, default_value_t = 800)]
    analysis_delay_ms: u64,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
    /// Keep the dashboard bridge alive for incoming requests
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.analysis_delay_ms, args.bind)
    };

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating inspection runtime")?;
    runtime.block_on(run(args, workflow_config))
}

async fn run(args: Args, workflow_config: WorkflowConfig) -> anyhow::Result<()> {
    let runner = Runner::new(workflow_config.clone());
    let gui_bridge = GuiBridge::new(runner.clone());

    for path in &args.import {
        let imported = runner.import_file(path).await?;
        gui_bridge.publish_status(&format!(
            "imported {} rows from {}",
            imported,
            path.display()
        ));
    }

    if args.synthetic.is_some() || args.generator.is_some() {
        let mut generator_config = match args.generator.as_ref() {
            Some(path) => GeneratorConfig::load(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(readings) = args.synthetic {
            generator_config.readings = readings;
        }
        if let Some(seed) = args.seed {
            generator_config.seed = seed;
        }
        if let Some(rate) = args.defect_rate {
            generator_config.defect_rate = rate;
        }
        let lines = build_sensor_lines(&generator_config);
        let report = runner.record_stream(lines.join("\n").as_bytes()).await?;
        report_live(&gui_bridge, "synthetic", &report);
    }

    if args.live {
        gui_bridge.publish_status("recording sensor lines from stdin (EOF to stop)...");
        let report = runner
            .record_stream(BufReader::new(tokio::io::stdin()))
            .await?;
        report_live(&gui_bridge, "stdin", &report);
    }

    if args.demo {
        let snapshot = runner.run_demo(args.seed.unwrap_or_default()).await;
        println!(
            "Demo scan -> progress {}%, step {}, cracks {}, structural risk {}",
            snapshot.progress,
            snapshot.current_step,
            snapshot.cracks.len(),
            overall_risk(&snapshot.cracks)
        );
        for crack in &snapshot.cracks {
            println!(
                "  {} at ({}, {}) width {} mm depth {} mm severity {:?}",
                crack.id, crack.x, crack.y, crack.width, crack.depth, crack.severity
            );
        }
    }

    let model = DashboardModel::from_session(&*runner.read()?);
    gui_bridge.publish(&model);

    if let Some(path) = args.export.or(workflow_config.export_path) {
        if runner.export_to(&path)? {
            gui_bridge.publish_status(&format!("exported results to {}", path.display()));
        } else {
            gui_bridge.publish_status("nothing to export");
        }
    }

    if args.serve {
        gui_bridge
            .serve(async {
                if let Err(err) = signal::ctrl_c().await {
                    log::error!("awaiting Ctrl+C failed: {}", err);
                }
            })
            .await?;
    }

    Ok(())
}

fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|err| format!("invalid rate {:?}: {}", value, err))?;
    if rate.is_finite() && (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("rate must be between 0 and 1, got {}", value))
    }
}

fn report_live(gui_bridge: &GuiBridge, source: &str, report: &LiveReport) {
    let verdict = report
        .summary
        .as_ref()
        .map(|summary| format!("risk {}", summary.risk_level))
        .unwrap_or_else(|| "no analysis".to_string());
    gui_bridge.publish_status(&format!(
        "{} recording -> accepted {}, rejected {}, {}",
        source, report.accepted, report.rejected, verdict
    ));
}
