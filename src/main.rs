//! Flappy Session entry point
//!
//! Runs one scripted round against the headless platform and logs what the
//! session asks the engine to do. Usage: `flappy-session [settings.json]`

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use flappy_session::platform::Headless;
use flappy_session::sim::{Body, Category, Contact, EntityId, Session, SessionEvent};
use flappy_session::{ConfigError, Settings};

/// Frame step for the headless loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Obstacles to fly through before crashing
const GAPS_TO_PASS: usize = 3;

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(path.as_deref())?;
    let seed = settings.seed.unwrap_or_else(wall_clock_seed);
    log::info!("Flappy Session (headless) starting, seed {}", seed);

    let mut session = Session::new(settings, seed);
    let mut platform = Headless::new();

    platform.apply(&session.start());
    run_round(&mut session, &mut platform);

    // Player picks "Play Again", then quits from the next alert
    send(&mut session, &mut platform, SessionEvent::PlayAgain);
    platform.alerts.dismiss();
    log::info!(
        "Restarted: score {}, {} obstacles on screen",
        session.state().score,
        session.barriers().count()
    );
    send(&mut session, &mut platform, SessionEvent::Quit);

    println!("{}", serde_json::to_string(session.state())?);
    Ok(())
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn send(session: &mut Session, platform: &mut Headless, event: SessionEvent) {
    let effects = session.handle(event);
    if log::log_enabled!(log::Level::Debug) {
        let names: Vec<&str> = effects.iter().map(|e| e.name()).collect();
        log::debug!("{:?} -> {:?}", event, names);
    }
    platform.apply(&effects);
}

/// Tap until a few obstacles have spawned, fly through each gap, then crash
fn run_round(session: &mut Session, platform: &mut Headless) {
    let bird = Body::new(session.bird().unwrap_or(EntityId(0)), Category::Bird);
    let mut passed = 0;
    let mut frame: u32 = 0;

    send(session, platform, SessionEvent::Tap);

    while passed < GAPS_TO_PASS && !session.state().is_over {
        frame += 1;
        // Keep flapping about twice a second
        if frame % 30 == 0 && platform.engine.input_enabled {
            send(session, platform, SessionEvent::Tap);
        }
        for event in platform.step(FRAME_DT) {
            send(session, platform, event);
        }
        // Pretend the bird threads every gap that reaches it
        let bird_x = session.settings().center().x;
        let reached: Vec<EntityId> = platform
            .engine
            .nodes_of(Category::ScoreTrigger)
            .filter(|(_, node)| node.center.x <= bird_x)
            .map(|(id, _)| id)
            .collect();
        for id in reached {
            let contact = Contact::new(bird, Body::new(id, Category::ScoreTrigger));
            send(session, platform, SessionEvent::Contact(contact));
            passed += 1;
        }
    }

    // Clip the next pipe edge twice in the same step
    let pipe = platform
        .engine
        .nodes_of(Category::Solid)
        .last()
        .map(|(id, _)| id);
    if let Some(pipe) = pipe {
        for _ in 0..2 {
            let contact = Contact::new(bird, Body::new(pipe, Category::Solid));
            send(session, platform, SessionEvent::Contact(contact));
        }
    }

    log::info!(
        "Round over after {:.1}s: score {}, alerts shown {}",
        frame as f32 * FRAME_DT,
        session.state().score,
        platform.alerts.presented.len()
    );
}
