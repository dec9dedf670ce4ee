/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{error, info};

use config::AppConfig;
use domain::stage::Stage;
use error::AppError;
use sim::world::Tour;
use ui::assets::AssetCatalog;
use ui::gamepad::GamepadState;
use ui::input::{meta_key, scroll_delta, InputEvent, InputState, MetaKey};
use ui::renderer::Renderer;
use ui::sound::{play_events, SoundEngine};

/// Upper bound on one idle sleep so input stays responsive.
const MAX_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    logging::init();

    let config = match config_path_arg() {
        Some(path) => match AppConfig::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => AppConfig::load(),
    };

    let assets = AssetCatalog::scan(&config.assets_dir);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let (cols, rows) = renderer.size();
    let mut tour = Tour::mount(&config, cols, rows, Instant::now());
    let sound = SoundEngine::new();

    let result = run(&mut tour, &mut renderer, &assets, sound.as_ref(), &config);

    tour.unmount();
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }

    println!();
    println!("Thanks for visiting Questfolio!");
    println!("Last stage: {} ({} / {})", tour.current().label(), tour.current().index() + 1, Stage::COUNT);
}

/// `--config <path>` loads one file strictly instead of searching.
fn config_path_arg() -> Option<PathBuf> {
    let mut args = std::env::args_os().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn run(
    tour: &mut Tour,
    renderer: &mut Renderer,
    assets: &AssetCatalog,
    sound: Option<&SoundEngine>,
    config: &AppConfig,
) -> Result<(), AppError> {
    let mut input = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    info!(stage = ?tour.current(), "tour started");

    loop {
        input.drain_events();
        gp.update();

        // in arrival order: the last key pressed wins the transition
        for ev in input.events.drain(..) {
            let events = match ev {
                InputEvent::Key(key) => {
                    match meta_key(&key) {
                        Some(MetaKey::Quit) => return Ok(()),
                        Some(MetaKey::ToggleHelp) => {
                            tour.help_visible = !tour.help_visible;
                            continue;
                        }
                        None => {}
                    }
                    if tour.help_visible {
                        // any other key just closes the overlay
                        tour.help_visible = false;
                        continue;
                    }
                    let (_, rows) = renderer.size();
                    if let Some(delta) = scroll_delta(&key, rows.saturating_sub(6)) {
                        tour.scroll_by(delta);
                        continue;
                    }
                    tour.handle_key(key.code)
                }
                InputEvent::Click { col, row } => tour.click(col, row),
                InputEvent::Resize { cols, rows } => {
                    tour.resize(cols, rows);
                    continue;
                }
            };
            play_events(sound, &events);
        }

        if gp.quit_pressed() {
            return Ok(());
        }
        if let Some(cmd) = gp.nav_command() {
            let events = tour.navigate(cmd);
            play_events(sound, &events);
        }

        let now = Instant::now();
        if tour.frame_due(now) {
            tour.frame();
            renderer.render(tour, assets)?;
        }

        std::thread::sleep(tour.until_next_frame(Instant::now()).min(MAX_SLEEP));
    }
}
