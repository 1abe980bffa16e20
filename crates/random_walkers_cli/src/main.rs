use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use random_walkers::prelude::*;
use random_walkers_cli::{init_tracing, render_scene_to_png, RenderConfig};
use tracing::info;

/// Simulate random walkers that avoid a building north of their start and plot their paths.
#[derive(Parser, Debug)]
#[command(name = "random-walkers", version)]
struct Args {
    /// Time every walker walks; each walker makes `walking_time * speed` steps.
    #[arg(allow_negative_numbers = true)]
    walking_time: i64,

    /// Number of walkers walking casually (speed 1).
    #[arg(allow_negative_numbers = true)]
    usual: i64,

    /// Number of walkers walking fast (speed 2).
    #[arg(allow_negative_numbers = true)]
    fast: i64,

    /// Number of running walkers (speed 4).
    #[arg(allow_negative_numbers = true)]
    running: i64,

    /// Output PNG file.
    outfile: PathBuf,

    /// Base seed; a random one is chosen and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Start/end distance at or above which a walker is drawn as a straight line.
    #[arg(long, default_value_t = DEFAULT_LONG_DISTANCE_THRESHOLD)]
    threshold: f64,

    /// Edge length of each walker panel in pixels.
    #[arg(long, default_value_t = 480)]
    panel_size: u32,
}

impl Args {
    fn scene_config(&self) -> SceneConfig {
        SceneConfig::new(self.walking_time).with_counts(WalkerCounts::new(
            self.usual,
            self.fast,
            self.running,
        ))
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = args.scene_config();
    let classifier = Classifier::try_new(args.threshold)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Building scene with seed {}.", seed);

    let scene = SceneBuilder::new()
        .build_seeded(&config, seed)
        .context("invalid walker configuration")?;

    for s in scene.summaries(&classifier) {
        info!(
            "Walker {} is {}: {:?} -> {:?} ({:?}).",
            s.number,
            s.speed.label(),
            s.start,
            s.end,
            s.classification,
        );
    }
    let flying = scene.long_distance_walkers(&classifier);
    if !flying.is_empty() {
        info!(
            "Walker(s) {:?} took a plane, as they don't want to walk such a long distance!",
            flying
        );
    }

    let rc = RenderConfig::new((args.panel_size, args.panel_size));
    render_scene_to_png(&scene, &classifier, &rc, &args.outfile)?;
    info!("Wrote {}.", args.outfile.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_arguments() {
        let args = Args::try_parse_from(["random-walkers", "10", "1", "2", "3", "out.png"]).unwrap();
        assert_eq!(args.walking_time, 10);
        assert_eq!(args.scene_config().counts, WalkerCounts::new(1, 2, 3));
        assert_eq!(args.outfile, PathBuf::from("out.png"));
        assert_eq!(args.seed, None);
        assert_eq!(args.threshold, DEFAULT_LONG_DISTANCE_THRESHOLD);
    }

    #[test]
    fn negative_counts_reach_scene_validation() {
        let args =
            Args::try_parse_from(["random-walkers", "1", "1", "-1", "0", "out.png"]).unwrap();
        let err = args.scene_config().validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigError::NegativeCount {
                class: SpeedClass::Fast,
                count: -1
            })
        ));
    }

    #[test]
    fn missing_or_malformed_arguments_fail_to_parse() {
        assert!(Args::try_parse_from(["random-walkers", "10", "1", "2"]).is_err());
        assert!(Args::try_parse_from(["random-walkers", "ten", "1", "2", "3", "o.png"]).is_err());
    }

    #[test]
    fn options_are_parsed() {
        let args = Args::try_parse_from([
            "random-walkers",
            "5",
            "1",
            "0",
            "0",
            "o.png",
            "--seed",
            "42",
            "--threshold",
            "50",
            "--panel-size",
            "200",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.threshold, 50.0);
        assert_eq!(args.panel_size, 200);
    }
}
