use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// No input within one tick; drives auto-advance and toast expiry.
    Tick,
    Resize,
}

/// Polls the terminal on a background thread and forwards events over a channel.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let forwarded = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        // Presses only
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            tx.send(AppEvent::Key(key))
                        }
                        Ok(Event::Resize(_, _)) => tx.send(AppEvent::Resize),
                        Ok(_) => Ok(()),
                        Err(e) => {
                            log::warn!("Terminal read failed: {e}");
                            Ok(())
                        }
                    },
                    Ok(false) => tx.send(AppEvent::Tick),
                    Err(e) => {
                        log::warn!("Terminal poll failed: {e}");
                        thread::sleep(tick_rate);
                        tx.send(AppEvent::Tick)
                    }
                };
                if forwarded.is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
