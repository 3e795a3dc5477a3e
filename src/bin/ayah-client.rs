//! Terminal front end: shows a random ayah and plays its recitation.
//!
//! Commands (one per line): `r` refetch, `p` play/pause, `q` quit.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use ayah_of_the_day::client::render::render;
use ayah_of_the_day::client::{AyahClient, AyahDisplay, FetchTicket, ProcessPlayer};
use ayah_of_the_day::config::load_client_config;
use ayah_of_the_day::models::AyahPayload;
use ayah_of_the_day::utils::logger::init_logging;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::error;

type Fetched = (FetchTicket, Option<AyahPayload>);

enum Event {
    Fetched(Fetched),
    AudioEnded,
    Input(std::io::Result<Option<String>>),
}

/// Starts a fetch in the background; the result comes back through `tx`.
fn spawn_fetch(
    display: &mut AyahDisplay<ProcessPlayer>,
    client: &Arc<AyahClient>,
    tx: &mpsc::UnboundedSender<Fetched>,
) {
    let ticket = display.begin_fetch();
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.get_random_ayah().await;
        let _ = tx.send((ticket, result));
    });
}

fn draw(display: &AyahDisplay<ProcessPlayer>) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "\x1b[2J\x1b[H{}> ", render(&display.view()));
    let _ = stdout.flush();
}

#[tokio::main]
async fn main() {
    let config = match load_client_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading client configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = init_logging(&config.logging()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let client = match AyahClient::new(
        config.api_url.clone(),
        Duration::from_millis(config.timeout_in_ms),
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let player = ProcessPlayer::new(config.player_command());
    let mut display = AyahDisplay::new(player, config.media_host.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    spawn_fetch(&mut display, &client, &tx);
    draw(&display);

    loop {
        let event = tokio::select! {
            Some(fetched) = rx.recv() => Event::Fetched(fetched),
            _ = display.audio_ended() => Event::AudioEnded,
            line = lines.next_line() => Event::Input(line),
        };

        match event {
            Event::Fetched((ticket, result)) => {
                if display.complete_fetch(ticket, result) {
                    draw(&display);
                }
            }
            Event::AudioEnded => {
                draw(&display);
            }
            Event::Input(Ok(Some(line))) => match line.trim() {
                "r" if display.can_refetch() => {
                    spawn_fetch(&mut display, &client, &tx);
                    draw(&display);
                }
                "p" => {
                    display.toggle_audio();
                    draw(&display);
                }
                "q" => break,
                _ => draw(&display),
            },
            Event::Input(Ok(None)) => break,
            Event::Input(Err(e)) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    display.unmount();
}
