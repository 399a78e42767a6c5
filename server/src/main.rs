use clap::Parser;
use log::{debug, info, warn};
use rand::Rng;
use server::game_center::{GameCenter, GuessReport};
use shared::{Direction, DEFAULT_MAX_GUESSES, GUESS_MAX, GUESS_MIN};
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Main-method of the application.
/// Parses command-line arguments, then plays many sessions against one shared game center.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Number of concurrent simulated sessions
        #[clap(short, long, default_value = "32")]
        players: usize,
        /// Games each session plays
        #[clap(short, long, default_value = "20")]
        rounds: u32,
        /// Guesses allowed per game
        #[clap(short, long, default_value_t = DEFAULT_MAX_GUESSES)]
        max_guesses: u32,
        /// How often to log site statistics, in milliseconds
        #[clap(long, default_value = "250")]
        report_interval_ms: u64,
        /// Idle time after which an abandoned game is expired, in seconds
        #[clap(long, default_value = "30")]
        idle_timeout_secs: u64,
    }

    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    if args.max_guesses == 0 {
        return Err("--max-guesses must be at least 1".into());
    }
    if args.report_interval_ms == 0 {
        return Err("--report-interval-ms must be at least 1".into());
    }

    info!(
        "Starting {} sessions x {} rounds, {} guesses per game",
        args.players, args.rounds, args.max_guesses
    );

    let center = Arc::new(GameCenter::new(args.max_guesses));

    // Spawn statistics reporter
    let reporter = {
        let center = Arc::clone(&center);
        let period = Duration::from_millis(args.report_interval_ms);
        tokio::spawn(async move { run_stats_reporter(center, period).await })
    };

    // Spawn idle session sweeper
    let sweeper = {
        let center = Arc::clone(&center);
        let timeout = Duration::from_secs(args.idle_timeout_secs);
        tokio::spawn(async move { run_idle_sweeper(center, timeout).await })
    };

    let players: Vec<_> = (0..args.players)
        .map(|player| {
            let center = Arc::clone(&center);
            let rounds = args.rounds;
            tokio::spawn(async move {
                play_session(center, format!("session-{}", player), rounds).await
            })
        })
        .collect();

    let all_done = async {
        let mut wins = 0u64;
        for handle in players {
            match handle.await {
                Ok(session_wins) => wins += u64::from(session_wins),
                Err(e) => warn!("Player task panicked: {}", e),
            }
        }
        wins
    };

    // Handle shutdown gracefully
    tokio::select! {
        wins = all_done => {
            let snapshot = center.stats().global_snapshot();
            if snapshot.games_won != wins {
                warn!(
                    "Players counted {} wins but the site recorded {}",
                    wins, snapshot.games_won
                );
            }
            info!("All sessions finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    reporter.abort();
    sweeper.abort();

    println!("{}", center.global_stats_message());
    Ok(())
}

/// Plays `rounds` games for one session and returns how many it won.
async fn play_session(center: Arc<GameCenter>, session_id: String, rounds: u32) -> u32 {
    let mut wins = 0;

    for _ in 0..rounds {
        center.get_game(&session_id);
        let (mut low, mut high) = (GUESS_MIN, GUESS_MAX);

        loop {
            // An expired game is silently replaced, which can invalidate earlier hints
            if low > high {
                (low, high) = (GUESS_MIN, GUESS_MAX);
            }
            let (raw, guess) = next_input(low, high);

            match center.play_guess(&session_id, &raw) {
                Err(e) => debug!("Session {}: {}", session_id, e),
                Ok(GuessReport::TryAgain { hint, .. }) => match hint {
                    Direction::Higher => low = guess + 1,
                    Direction::Lower => high = guess - 1,
                },
                Ok(GuessReport::Won(summary)) => {
                    wins += 1;
                    debug!("Session {}: {}", session_id, summary.session);
                    break;
                }
                Ok(GuessReport::Lost(summary)) => {
                    debug!("Session {}: {}", session_id, summary.session);
                    break;
                }
            }

            tokio::task::yield_now().await;
        }
    }

    info!(
        "Session {} finished {} rounds with {} wins: {}",
        session_id,
        rounds,
        wins,
        center.session_stats_message(&session_id)
    );
    wins
}

/// Picks a guess inside the narrowed range; now and then the player fumbles the input.
fn next_input(low: u8, high: u8) -> (String, u8) {
    let mut rng = rand::thread_rng();
    let guess = rng.gen_range(low..=high);

    let raw = match rng.gen_range(0..20) {
        0 => format!("{}?", guess),
        1 => format!("{}0", guess + 1),
        _ => guess.to_string(),
    };

    (raw, guess)
}

/// Logs site statistics at a fixed cadence.
async fn run_stats_reporter(center: Arc<GameCenter>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Skip the first tick since it fires immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let snapshot = center.stats().global_snapshot();
        info!(
            "{} games completed, {} won, {} live sessions",
            snapshot.games_completed,
            snapshot.games_won,
            center.registry().len()
        );
    }
}

/// Expires abandoned games, standing in for the session layer's own expiry.
async fn run_idle_sweeper(center: Arc<GameCenter>, timeout: Duration) {
    let mut ticker = interval(Duration::from_secs(1));

    loop {
        ticker.tick().await;

        let expired = center.registry().expire_idle(timeout);
        if !expired.is_empty() {
            warn!("Expired {} idle sessions", expired.len());
        }
    }
}
