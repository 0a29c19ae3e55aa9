use beliefgrid::game::{Agents, Game};
use beliefgrid::infra::{
    CompositeObserver, DefaultObserver, ExportWriter, GameObserver, SimulationConfig,
};
use beliefgrid::planners::MetricsObserver;
use beliefgrid::state::GridEnvironment;
use dotenv::dotenv;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("beliefgrid=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = SimulationConfig::from_env()?;
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut env = GridEnvironment::new(config.grid.clone());
    env.assign_cells(&mut rng)?;
    env.assign_players(&mut rng)?;

    let writer = ExportWriter::new(config.output_folder.as_deref(), config.timestamp_exports)?;
    writer.write_environment(&env.layout())?;

    let agents = Agents::new(&config, &env);
    let observers: Vec<Box<dyn GameObserver>> = vec![
        Box::new(DefaultObserver),
        Box::new(MetricsObserver::new(100, config.log_every)),
    ];

    let mut game = Game::new(config, env, CompositeObserver::new(observers));
    game.run(agents, &mut rng)?;

    writer.write_trajectory(game.trajectory())?;

    Ok(())
}
