/// Print the summary of a pack as JSON
///
/// Run with: cargo run --example list -- path/to/file.pack
use anyhow::{bail, Context};
use packfile_rs::PackReader;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: list <pack file>");
    };

    let reader = PackReader::open(&path).with_context(|| format!("opening {path}"))?;
    let summary = reader.summary();
    tracing::info!(
        entries = summary.entries.len(),
        stored = summary.stored_bytes(),
        decoded = summary.decoded_bytes(),
        "loaded pack"
    );

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&summary.to_json()?)?;
    writeln!(stdout)?;
    Ok(())
}
