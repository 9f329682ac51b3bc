use std::io::{self, BufReader};

use embassy_executor::Spawner;

use neopixel_pi5::config::{ComponentConfig, DRY_RUN_ENV};
use neopixel_pi5::controllers::{NeopixelComponent, model_triplet};
use neopixel_pi5::domain::ports::StripFactory;
use neopixel_pi5::infrastructure::config::load_component_config;
use neopixel_pi5::infrastructure::drivers::MemoryStripFactory;
use neopixel_pi5::infrastructure::tasks::{
    host_event_receiver, host_event_sender, host_runtime, spawn_input_reader,
};

async fn serve<F: StripFactory>(config: &ComponentConfig, factory: F) -> i32 {
    let mut component = match NeopixelComponent::new(config, factory) {
        Ok(component) => component,
        Err(e) => {
            log::error!("main: failed to start component: {}", e);
            return 1;
        }
    };

    if let Err(e) = spawn_input_reader(BufReader::new(io::stdin()), host_event_sender()) {
        log::error!("main: failed to start input reader: {}", e);
        return 1;
    }

    match host_runtime(&mut component, host_event_receiver(), io::stdout()).await {
        Ok(()) => 0,
        Err(e) => {
            log::error!("main: failed to write reply: {}", e);
            1
        }
    }
}

#[cfg(target_os = "linux")]
async fn serve_hardware(config: &ComponentConfig) -> i32 {
    serve(config, neopixel_pi5::infrastructure::drivers::SpidevStripFactory).await
}

#[cfg(not(target_os = "linux"))]
async fn serve_hardware(_config: &ComponentConfig) -> i32 {
    log::error!("main: spidev is only available on Linux, set {} for a dry run", DRY_RUN_ENV);
    1
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env()
        .init();

    log::info!("main: starting {}", model_triplet());

    let config = match load_component_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("main: {}", e);
            std::process::exit(2);
        }
    };

    let code = if std::env::var_os(DRY_RUN_ENV).is_some() {
        log::warn!("main: dry run, frames are kept in memory");
        serve(&config, MemoryStripFactory::default()).await
    } else {
        serve_hardware(&config).await
    };

    // The executor never returns on its own
    std::process::exit(code);
}
