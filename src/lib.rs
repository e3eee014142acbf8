pub mod app;
pub mod asset;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod motion;
pub mod ocean;
pub mod renderer;
pub mod scene;
pub mod scheduler;
pub mod settings;
pub mod sky;
pub mod time;
pub mod water;

use app::App;
use settings::OceanSettings;
use winit::event_loop::EventLoop;

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

pub fn run() -> Result<(), winit::error::EventLoopError> {
    init_logging();

    let settings = OceanSettings::load();
    log::info!("Starting ocean scene");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);

    let result = event_loop.run_app(&mut app);

    if let Err(ref err) = result {
        log::error!("Application error: {}", err);
    }

    log::info!("Application shutdown complete");

    result
}
