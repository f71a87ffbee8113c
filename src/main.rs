use anyhow::Result;
use moviemerge::pipeline;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) run the merge pass ───────────────────────────────────────
    let merged = pipeline::run(
        "data/movies-text.xlsx",
        "data/movies-numbers.xlsx",
        "data/merged-data.xlsx",
    )?;

    info!(rows = merged.rows.len(), "all done");
    Ok(())
}
