//! DhruvaNBV - next-best-view planner demo
//!
//! Runs one planning episode against a simulated room:
//!
//! - **Robot**: teleports between a ring of views; each retrieval reveals
//!   ground truth into the belief map along camera rays
//! - **World model**: ray-casting information gain over the belief map
//! - **Planner**: evaluates every ring view in parallel, moves to the best
//!   gain/cost trade-off, senses, repeats

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use vastu_ig::{CancelToken, InformationGainEstimator, LocalWorldModel};

use dhruva_nbv::simulation::Scenario;
use dhruva_nbv::{
    BoundedRobot, BoundedWorldModel, EpisodeOutcome, NbvConfig, ReceptionInfo, Result,
    RobotChannel, ViewPlanner, spawn_planner,
};

const DEFAULT_CONFIG: &str = "dhruva-nbv/configs/nbv.toml";

#[derive(Parser, Debug)]
#[command(name = "dhruva-nbv")]
#[command(about = "Next-best-view planning in a simulated room")]
struct Args {
    /// Path to TOML configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the planner iteration budget
    #[arg(short = 'n', long)]
    iterations: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dhruva_nbv=info,vastu_ig=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            NbvConfig::load(path)?
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG);
            NbvConfig::load(Path::new(DEFAULT_CONFIG))?
        }
        None => {
            info!("Using default configuration");
            NbvConfig::default()
        }
    };
    if let Some(iterations) = args.iterations {
        info!("Iteration budget: {}", iterations);
        config.planner.max_iterations = iterations;
    }

    info!("DhruvaNBV v{}", env!("CARGO_PKG_VERSION"));

    let scenario = Scenario::build(&config.simulation)?;
    let robot = Arc::new(scenario.robot(&config.simulation, &config.estimator.camera));
    info!(
        "Simulated robot at view {} with {} candidate views",
        scenario.start.id(),
        scenario.views.len()
    );

    // Initial measurement so the belief map is not empty
    if robot.retrieve_data() == ReceptionInfo::Failed {
        warn!("Initial measurement failed");
    }
    info!(
        "Belief map: {} known voxels before planning",
        scenario.belief.read().known_count()
    );

    let cancel = CancelToken::new();
    let estimator = InformationGainEstimator::new(config.estimator.clone())?;
    let world = LocalWorldModel::new(Arc::clone(&scenario.belief), estimator)
        .with_cancel_token(cancel.clone());

    let bounded_robot = BoundedRobot::new(Arc::clone(&robot), config.channels.robot_timeout());
    let bounded_world =
        BoundedWorldModel::new(Arc::new(world), config.channels.world_model_timeout());

    let planner = ViewPlanner::new(bounded_robot, bounded_world, config.planner.clone())?
        .with_cancel_token(cancel);
    let report = spawn_planner(planner)?.join()?;

    for round in &report.rounds {
        info!(
            "Round {}: view {} gain {:.3} cost {:.3} utility {:.3} ({} candidates, {} excluded, {:?})",
            round.iteration,
            round.view,
            round.gain,
            round.cost.cost(),
            round.utility,
            round.candidates,
            round.excluded.len(),
            round.reception
        );
    }

    match &report.outcome {
        EpisodeOutcome::NoViableView { excluded } => {
            for exclusion in excluded {
                warn!("  view {}: {}", exclusion.view, exclusion.reason);
            }
        }
        EpisodeOutcome::MoveFailed { target, attempts } => {
            for (i, error) in attempts.iter().enumerate() {
                warn!("  move to {} attempt {}: {}", target, i + 1, error);
            }
        }
        _ => {}
    }

    let belief = scenario.belief.read();
    info!(
        "Episode {}: {} rounds, total gain {:.3}, total cost {:.3}, {} known voxels ({} occupied)",
        report.outcome.label(),
        report.rounds.len(),
        report.total_gain(),
        report.total_cost(),
        belief.known_count(),
        belief.occupied_count()
    );
    info!("Robot made {} moves", robot.move_count());

    Ok(())
}
