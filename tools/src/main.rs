//! sim-runner: headless runner for the Leafy Loot economy.
//!
//! Usage:
//!   sim-runner --seed 12345 --seconds 3600 --save-dir ./saves
//!   sim-runner --seed 12345 --seconds 3600 --db run.db --new
//!   sim-runner --save-dir ./saves --ipc-mode

use anyhow::Result;
use leafy_core::{
    audio::NullAudio,
    autoplay::AutoPlayer,
    command::PlayerCommand,
    config::GameConfig,
    engine::GameSession,
    event::GameEvent,
    file_store::{DiskFileStore, FileStore},
    settings::Settings,
    shop::ShopListing,
    snapshot::EconomySnapshot,
    store::SimStore,
    types::Seconds,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Advance {
        dt: Seconds,
    },
    Command {
        command: PlayerCommand,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    elapsed: Seconds,
    #[serde(flatten)]
    economy: EconomySnapshot,
    shop: Vec<ShopListing>,
    events: Vec<GameEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seconds = parse_arg(&args, "--seconds", 600.0f64);
    let step = parse_arg(&args, "--step", 0.5f64);
    let purchase_chance = parse_arg(&args, "--purchase-chance", 0.05f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let new_game = args.iter().any(|a| a == "--new");
    let db = flag_value(&args, "--db");
    let data_dir = flag_value(&args, "--data-dir");
    let save_dir = flag_value(&args, "--save-dir").unwrap_or(".");

    anyhow::ensure!(step > 0.0, "--step must be positive, got {step}");

    if !ipc_mode {
        println!("Leafy Loot sim-runner");
        println!("  seed:      {seed}");
        println!("  seconds:   {seconds}");
        println!("  step:      {step}");
        println!("  store:     {}", db.unwrap_or(save_dir));
        println!("  data_dir:  {}", data_dir.unwrap_or("(built-in)"));
        println!();
    }

    let config = match data_dir {
        Some(dir) => GameConfig::load(dir)?,
        None => GameConfig::default(),
    };

    let sqlite = match db {
        Some(path) => {
            let store = SimStore::open(path)?;
            store.migrate()?;
            Some(Rc::new(store))
        }
        None => None,
    };
    let files: Rc<dyn FileStore> = match &sqlite {
        Some(store) => Rc::clone(store) as Rc<dyn FileStore>,
        None => Rc::new(DiskFileStore::new(save_dir)),
    };

    let settings = Settings::load(&*files);
    log::debug!(
        "settings: music {:.2}, sfx {:.2}",
        settings.music_volume,
        settings.sfx_volume
    );

    let mut session = if new_game {
        GameSession::new_game(config, Box::new(files.clone()), Box::new(NullAudio))?
    } else {
        GameSession::load_or_new(config, Box::new(files.clone()), Box::new(NullAudio))?
    };
    if let Some(store) = &sqlite {
        store.insert_session(&session.session_id, seed, env!("CARGO_PKG_VERSION"))?;
    }

    if ipc_mode {
        run_ipc_loop(&mut session, sqlite.as_deref())?;
    } else {
        run_autoplay(&mut session, sqlite.as_deref(), seed, seconds, step, purchase_chance)?;
        session.save()?;
        let events = session_events(&mut session);
        record(sqlite.as_deref(), &session, &events)?;
        print_summary(&session, sqlite.as_deref())?;
    }

    settings.save(&*files)?;
    Ok(())
}

fn run_autoplay(
    session: &mut GameSession,
    sqlite: Option<&SimStore>,
    seed: u64,
    seconds: Seconds,
    step: Seconds,
    purchase_chance: f64,
) -> Result<()> {
    let mut player = AutoPlayer::new(seed, purchase_chance);
    let steps = (seconds / step).ceil() as u64;
    for _ in 0..steps {
        let events = session.tick(step);
        record(sqlite, session, &events)?;

        if let Some(item_id) = player.choose(&session.listing()) {
            if let Err(e) = session.purchase(&item_id) {
                log::debug!("autoplay purchase of {item_id} failed: {e}");
            }
        }
    }
    Ok(())
}

fn run_ipc_loop(session: &mut GameSession, sqlite: Option<&SimStore>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::Advance { dt } => {
                let events = session.tick(dt);
                record(sqlite, session, &events)?;
                writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(session, events))?)?;
                stdout.flush()?;
                continue;
            }
            IpcCommand::Command { command } => session.apply_command(&command),
        };

        let events = session_events(session);
        record(sqlite, session, &events)?;
        match outcome {
            Ok(()) => writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(session, events))?)?,
            Err(e) => writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?,
        }
        stdout.flush()?;
    }

    session.save()?;
    let events = session_events(session);
    record(sqlite, session, &events)?;
    Ok(())
}

/// Drain recorded events without advancing time.
fn session_events(session: &mut GameSession) -> Vec<GameEvent> {
    session.tick(0.0)
}

fn record(sqlite: Option<&SimStore>, session: &GameSession, events: &[GameEvent]) -> Result<()> {
    if let Some(store) = sqlite {
        for event in events {
            store.append_event(&session.session_id, session.elapsed(), event)?;
        }
    }
    Ok(())
}

fn build_ui_state(session: &GameSession, events: Vec<GameEvent>) -> UiState {
    UiState {
        elapsed: session.elapsed(),
        economy: session.snapshot(),
        shop: session.listing(),
        events,
    }
}

fn print_summary(session: &GameSession, sqlite: Option<&SimStore>) -> Result<()> {
    let snap = session.snapshot();
    let sim = session.simulation();

    println!("=== RUN SUMMARY ===");
    println!("  session:        {}", session.session_id);
    println!("  elapsed:        {:.1}s", session.elapsed());
    println!("  leafs:          {}", snap.display_balance());
    println!("  rate:           {:.2}/s", snap.effective_rate);
    println!("  season:         {}", snap.season.name());
    println!("  plants:         {}", snap.plants_owned);
    println!("  multiplier:     x{:.3}", snap.multiplier);

    if let Some(store) = sqlite {
        let purchases = store.event_count(&session.session_id, "item_purchased")?;
        let seasons = store.event_count(&session.session_id, "season_changed")?;
        println!("  purchases:      {purchases}");
        println!("  season changes: {seasons}");
    }

    println!();
    println!("=== NEWEST PLANTS ===");
    let newest = sim.displayed_items();
    if newest.is_empty() {
        println!("  (none)");
    } else {
        for item_id in newest.iter().take(10) {
            println!("  {item_id}");
        }
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
