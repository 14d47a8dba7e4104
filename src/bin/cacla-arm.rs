use cacla::cacla::MlpCheckpoint;
use cacla::cli::Options;
use cacla::logging::{DisplayLogger, JsonLinesLogger, TensorBoardLogger};
use cacla::simulation::{evaluate, train, RunDir};
use cacla::utils::save::SaveLoad;
use cacla::{ArmEnvironment, CaclaError, Prng};
use chrono::Utc;
use clap::Parser;
use rand::{Rng, SeedableRng};
use tch::Device;
use yansi::Paint;

fn main() -> Result<(), CaclaError> {
    let opts = Options::parse();
    let config = opts.run_config()?;
    println!("Config:\n{:#?}\n", config);

    #[allow(clippy::cast_possible_wrap)]
    tch::manual_seed(config.seed as i64);
    let mut rng = Prng::seed_from_u64(config.seed);
    let mut env = config.env.build_env(rng.gen())?;
    let mut learner = config
        .agent
        .build_for_env(&env, Device::cuda_if_available())?;

    if let Some(path) = &opts.load {
        println!("Loading {}", path.display());
        learner.load_checkpoint(&MlpCheckpoint::load(path)?)?;
    } else {
        let run_dir = RunDir::create(&config.log_root, env.name(), Utc::now())?;
        println!("Logging to {}", run_dir.path().display());
        config.save(run_dir.config_file())?;

        let mut logger = (
            DisplayLogger::default(),
            (
                JsonLinesLogger::create(run_dir.log_file())?,
                TensorBoardLogger::new(run_dir.tensorboard_dir()),
            ),
        );
        let summary = train(
            &mut learner,
            &mut env,
            &config.train,
            &run_dir,
            &mut rng,
            &mut logger,
        )?;
        println!(
            "\nTrained {} episodes ({} steps). Best batch mean reward {:.4}",
            summary.num_episodes, summary.num_steps, summary.best_mean_reward
        );
    }

    let episodes = evaluate(
        &learner,
        &mut env,
        config.test_episodes,
        config.test_pause,
        &mut DisplayLogger::default(),
    )?;
    println!();
    for (i, episode) in episodes.iter().enumerate() {
        let outcome = if episode.reached {
            Paint::green("reached")
        } else {
            Paint::red("missed")
        };
        println!(
            "episode {:>3}  {}  steps {:>3}  reward {:>9.4}  distance {:.4}",
            i, outcome, episode.steps, episode.total_reward, episode.final_distance
        );
    }
    Ok(())
}
