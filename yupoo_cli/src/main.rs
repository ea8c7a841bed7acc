use anyhow::Context;
use dotenvy::dotenv;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use std::env;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

use yupoo_pipeline::{Config, Pipeline, PipelineControl};

const DEFAULT_CONFIG_FILE: &str = "config.json";
const USAGE: &str = "usage: yupoo_cli <listing url with pag=n> <download folder>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()?
        .add_directive("hyper=info".parse()?)
        .add_directive("reqwest=info".parse()?)
        .add_directive("html5ever=info".parse()?)
        .add_directive("selectors=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // 2. Load config
    let config_path = env::var("YUPOO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let config = Config::from_file(&config_path).with_context(|| format!("cannot load config {}", config_path))?;

    // 3. Read listing URL and download folder
    let mut args = env::args().skip(1);
    let listing_url = args
        .next()
        .or_else(|| env::var("LISTING_URL").ok())
        .context(USAGE)?;
    let download_dir = args
        .next()
        .or_else(|| env::var("DOWNLOAD_DIR").ok())
        .map(PathBuf::from)
        .context(USAGE)?;

    // 4. Wire stop and pause to Ctrl-C and stdin
    let control = PipelineControl::new();
    listen_ctrl_c(control.clone());
    listen_stdin(control.clone());
    tracing::info!("Type `p` + Enter to pause or resume, `s` + Enter to stop");

    // 5. Run
    let pipeline = Pipeline::new(config)?;
    let start = Instant::now();
    let result = pipeline
        .run(&listing_url, &download_dir, &control, |progress| {
            tracing::info!(
                "Progress: {}% (album {} of {}) {}: {} saved, {} skipped, {} failed",
                progress.completed * 100 / progress.total,
                progress.completed,
                progress.total,
                progress.title,
                progress.report.saved,
                progress.report.skipped,
                progress.report.failures.len()
            );
        })
        .await;

    let elapsed = start.elapsed().as_secs();
    match result {
        Ok(summary) if summary.cancelled => {
            tracing::info!("Download stopped after {} of {} albums, {} s", summary.completed, summary.total, elapsed);
            Ok(())
        }
        Ok(summary) => {
            tracing::info!("Download completed: {} albums, {} s", summary.total, elapsed);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Download failed ({:?}): {}", e.kind(), e);
            Err(e.into())
        }
    }
}

fn listen_ctrl_c(control: PipelineControl) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Stopping after the current album");
            control.stop();
        }
    });
}

/// Read commands on a plain thread, a pending read must not keep the runtime alive.
fn listen_stdin(control: PipelineControl) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "p" | "pause" | "resume" => {
                    if control.toggle_pause() {
                        tracing::info!("Pausing before the next album");
                    } else {
                        tracing::info!("Resuming");
                    }
                }
                "s" | "stop" => {
                    tracing::warn!("Stopping after the current album");
                    control.stop();
                    break;
                }
                "" => {}
                other => tracing::warn!("Unknown command `{}`", other),
            }
        }
    });
}
