use std::path::PathBuf;

use anyhow::Result;
use log::info;

use formcast::config::ModelConfig;
use formcast::record::MatchContext;
use formcast::store::{EntityStore, MemoryStore, StoreFilter};
use formcast::{impute, predict, quality, sample_data};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let snapshot_path = args.next().map(PathBuf::from);

    let (store, cfg) = match &snapshot_path {
        Some(path) if path.exists() => {
            info!("loading snapshot {}", path.display());
            (MemoryStore::load(path)?, ModelConfig::default())
        }
        _ => {
            info!("no snapshot given; seeding synthetic population");
            (sample_data::sample_store(7, 120), sample_data::sample_config())
        }
    };

    let report = quality::assess(&store, &quality::TelemetrySnapshot::default(), Vec::new());
    println!(
        "quality: {} records, completeness {:.1}%, {} outliers",
        report.total_records,
        report.completeness * 100.0,
        report.outliers.len()
    );
    for outlier in report.outliers.iter().take(5) {
        println!(
            "  outlier: player {} {} = {:.2} (expected {:.2}..{:.2}, {:?})",
            outlier.player_id,
            outlier.feature,
            outlier.value,
            outlier.expected_low,
            outlier.expected_high,
            outlier.severity
        );
    }

    let imputations = impute::impute_population(&store, &cfg);
    println!("imputed {} feature values", imputations.len());

    let players = store.list(&StoreFilter::all());
    println!("sample forecasts:");
    for player in players.iter().take(8) {
        let opponent = players
            .iter()
            .find(|p| p.team != player.team)
            .map(|p| p.team.clone())
            .unwrap_or_else(|| player.team.clone());
        let ctx = MatchContext {
            own_team: player.team.clone(),
            opponent_team: opponent,
        };
        let result = predict::predict(player, &ctx, &cfg);
        println!(
            "  {} ({} {}, {:?}): expected {:.2}, p {:.3}, rating {:.2}, conf {:.2}",
            player.name,
            player.team,
            player.position.code(),
            player.stat_type,
            result.expected_contribution,
            result.probability,
            result.expected_rating,
            result.confidence
        );
    }

    if let Some(path) = snapshot_path {
        store.save(&path)?;
        info!("snapshot saved to {}", path.display());
    }

    Ok(())
}
