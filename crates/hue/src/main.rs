mod config;
mod session;
mod terminal;

use anyhow::Context;
use config::Config;
use hue_lib::{
    player::PlayerOptions,
    room::Room,
    room_code::{AlwaysUnique, RoomCode, DEFAULT_ATTEMPTS},
    score::Attribution,
    store::{FileStore, Preferences},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use terminal::Terminal;
use tokio::io::{AsyncBufReadExt, BufReader};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout belongs to the game screen
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    tracing::info!("Hue's Right? Version: {}", crate::VERSION);

    let config = Config::from_env()?;
    let mut store = FileStore::open(&config.store_dir)
        .with_context(|| format!("Failed to open store at {}", config.store_dir.display()))?;
    let mut prefs = Preferences::load(&store).context("Failed to load preferences")?;
    config.apply(&mut prefs);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Err(e) = PlayerOptions::new(prefs.nickname.as_str()).validated() {
        if !prefs.nickname.is_empty() {
            println!("{e}");
        }
        println!("Enter a nickname:");
        let Some(line) = input.next_line().await? else {
            return Ok(());
        };
        prefs.nickname = line.trim().to_owned();
    }

    let settings = prefs.game_settings()?;
    prefs.save(&mut store).context("Failed to save preferences")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let code = RoomCode::generate_unique(&mut rng, &AlwaysUnique, DEFAULT_ATTEMPTS)?;
    let room = Room::open(code, prefs.player_options(), settings, &mut rng)?;
    tracing::info!(speed = settings.speed(), rounds = settings.rounds(), "Starting game");

    let (handle, events) = session::start_session(
        settings,
        room.players().to_vec(),
        Attribution::Local(room.host_id()),
        StdRng::seed_from_u64(rng.gen()),
    )?;

    let room = Terminal::new(handle, room, input).run(events).await?;
    if let Some((player, score)) = room.leaderboard().first() {
        tracing::info!(nickname = %player.nickname, score, "Leaving room");
    }
    Ok(())
}
