//! Charge une playlist XSPF, affiche ses morceaux et la réécrit
//!
//! Usage : cargo run -p pmoxspf --example xspf_roundtrip -- <in.xspf> [out.xspf]
//!
//! Sans argument, une petite playlist de démonstration est générée.

use anyhow::{Context, Result};
use pmoxspf::{Playlist, PlaylistItem};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pmoxspf=debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next();
    let output = args.next().unwrap_or_else(|| "roundtrip.xspf".to_string());

    let mut playlist = match input {
        Some(path) => Playlist::load(&path).with_context(|| format!("Failed to load {}", path))?,
        None => demo_playlist()?,
    };

    println!("{}", playlist.to_markdown());

    let total: f64 = playlist.iter().map(PlaylistItem::duration_seconds).sum();
    info!("⏱️ Total duration: {:.1}s", total);

    playlist.push(
        PlaylistItem::from_fields([("title", "Appended"), ("duration_seconds", "1.5")])
            .context("Invalid demo track")?,
    );

    playlist
        .save(&output)
        .with_context(|| format!("Failed to save {}", output))?;
    info!("✅ Playlist written to {}", output);

    Ok(())
}

fn demo_playlist() -> Result<Playlist> {
    let tracks = [
        ("file:///music/01.flac", "Opening", 185_000),
        ("file:///music/02.flac", "Interlude", 62_500),
    ];

    tracks
        .into_iter()
        .map(|(location, title, duration)| {
            PlaylistItem::builder()
                .location(location)
                .title(title)
                .creator("Demo")
                .duration(duration)
                .build()
                .map_err(anyhow::Error::from)
        })
        .collect()
}
