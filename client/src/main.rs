use clap::Parser;
use client::bootstrap::bootstrap;
use client::config::{ClientConfig, JoinPolicy, DEFAULT_SERVER_URL};
use client::input::InputManager;
use client::rendering::Renderer;
use log::{error, info};
use macroquad::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the game server
    #[arg(short = 's', long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// How to treat a join announcement for an id that already has a ship
    #[arg(short = 'j', long, value_enum, default_value_t = JoinPolicy::Duplicate)]
    join_policy: JoinPolicy,

    /// Window width
    #[arg(short = 'w', long, default_value = "800")]
    width: usize,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "600")]
    height: usize,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Entity Sync Client".to_owned(),
        window_width: 800,
        window_height: 600,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let config = ClientConfig::new(args.server).with_join_policy(args.join_policy);
    info!("Connecting to: {}", config.server_url);

    let (engine, receiver) = match runtime.block_on(bootstrap(&config)) {
        Ok(result) => result,
        Err(e) if e.is_fatal() => {
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Startup interrupted: {}", e);
            std::process::exit(2);
        }
    };

    info!("Controls: W to thrust, A/D to rotate");
    runtime.spawn(engine.clone().run_inbound(receiver));

    request_new_screen_size(args.width as f32, args.height as f32);
    let input_manager = InputManager::new();
    let mut renderer = Renderer::new(args.width, args.height);

    loop {
        let input = input_manager.sample();
        engine.tick(&input);

        renderer.render(&engine.snapshot(), engine.local_id());

        next_frame().await;
    }
}
