#![deny(clippy::all)]
#![forbid(unsafe_code)]

use life_engine::LifeConfig;
use life_pixels_support::{run, HostConfig};
use log::info;
use std::process::ExitCode;
use std::time::Duration;

const WINDOW_TITLE: &str = "Game of Life";
const WINDOW_WIDTH: u32 = 640;
const WINDOW_HEIGHT: u32 = 480;
const FRAME_MILLIS: u64 = 16;
const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

fn main() -> ExitCode {
    env_logger::init();

    let config = HostConfig {
        title: WINDOW_TITLE.to_string(),
        width: WINDOW_WIDTH,
        height: WINDOW_HEIGHT,
        frame_interval: Duration::from_millis(FRAME_MILLIS),
        asset_dir: ASSET_DIR.into(),
        life: LifeConfig::default(),
    };
    match run(config) {
        Ok(()) => {
            info!("Window closed");
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
