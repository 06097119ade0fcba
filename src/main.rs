/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::ThreadRng;

use config::GameConfig;
use domain::entity::MoveDir;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, World};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let mut world = World::new(&config);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Terminal Gridiron!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut World,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut rng: ThreadRng = rand::thread_rng();

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }
        handle_meta(world, sound, &kb, &mut rng);

        // Movement: one grid step per fresh press, in arrival order.
        if world.phase == Phase::Playing {
            for &key in kb.presses() {
                if let Some(dir) = movement_for(key) {
                    let events = step::move_player(world, dir);
                    process_sound_events(sound, &events);
                    if world.phase != Phase::Playing {
                        break;
                    }
                }
            }
        }

        // Scheduled events: AI ticks, the clock, and phase delays.
        for kind in world.schedule.fire_due(Instant::now()) {
            let events = step::on_timer(world, kind, &mut rng);
            process_sound_events(sound, &events);
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Phase-specific meta keys (start, restart).
fn handle_meta(world: &mut World, sound: Option<&SoundEngine>, kb: &InputState, rng: &mut ThreadRng) {
    match world.phase {
        Phase::Menu | Phase::GameOver => {
            if kb.any_pressed(KEYS_CONFIRM) {
                let events = step::start_game(world, rng);
                process_sound_events(sound, &events);
            }
        }
        _ => {}
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Cheer | GameEvent::Touchdown => sfx.play_cheer(),
            GameEvent::SealCall => sfx.play_seal(),
            GameEvent::Whistle => sfx.play_whistle(),
            GameEvent::Step => sfx.play_step(),
            GameEvent::Juke | GameEvent::Tackled => sfx.play_thud(),
            GameEvent::TimeExpired | GameEvent::Turnover => sfx.play_whistle(),
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn movement_for(key: KeyCode) -> Option<MoveDir> {
    if KEYS_LEFT.contains(&key) {
        Some(MoveDir::Left)
    } else if KEYS_RIGHT.contains(&key) {
        Some(MoveDir::Right)
    } else if KEYS_UP.contains(&key) {
        Some(MoveDir::Up)
    } else if KEYS_DOWN.contains(&key) {
        Some(MoveDir::Down)
    } else {
        None
    }
}
