// ABOUTME: Background tokio thread for delayed work: banner expiry and the delayed re-assert.
// ABOUTME: Results come back to the window thread as AppEvents through an EventSink.

use std::sync::Arc;
use std::time::Duration;

use hudtoggle_defaults::CommandRunner;
use winit::event_loop::EventLoopProxy;

/// Messages posted back to the window event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    BannerExpired(u64),
    ReassertFinished(bool),
}

/// Commands sent from the window thread to the timer thread.
pub enum TimerCommand {
    ExpireBanner {
        generation: u64,
        after: Duration,
    },
    Reassert {
        after: Duration,
        runner: Arc<dyn CommandRunner + Send + Sync>,
    },
}

/// Where timer results are delivered.
pub trait EventSink: Clone + Send + 'static {
    fn post(&self, event: AppEvent);
}

impl EventSink for EventLoopProxy<AppEvent> {
    fn post(&self, event: AppEvent) {
        if self.send_event(event).is_err() {
            tracing::debug!("Event loop closed, dropping {event:?}");
        }
    }
}

/// Handle for scheduling delayed work from the window thread.
pub struct Timers {
    cmd_tx: tokio::sync::mpsc::UnboundedSender<TimerCommand>,
}

impl Timers {
    /// Spawn a background current-thread runtime that services timer commands.
    pub fn spawn<S: EventSink>(sink: S) -> Self {
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("Failed to create timer runtime: {e}");
                    return;
                }
            };
            rt.block_on(run(sink, cmd_rx));
        });

        Self { cmd_tx }
    }

    pub fn send(&self, cmd: TimerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!("Timer thread is gone, command dropped");
        }
    }
}

async fn run<S: EventSink>(
    sink: S,
    mut cmd_rx: tokio::sync::mpsc::UnboundedReceiver<TimerCommand>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        let sink = sink.clone();
        match cmd {
            TimerCommand::ExpireBanner { generation, after } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    sink.post(AppEvent::BannerExpired(generation));
                });
            }
            TimerCommand::Reassert { after, runner } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let result = tokio::task::spawn_blocking(move || {
                        hudtoggle_defaults::write_enabled(&*runner, true)
                    })
                    .await;
                    let ok = match result {
                        Ok(Ok(())) => true,
                        Ok(Err(e)) => {
                            tracing::warn!("Delayed re-assert failed: {e}");
                            false
                        }
                        Err(e) => {
                            tracing::warn!("Delayed re-assert task panicked: {e}");
                            false
                        }
                    };
                    sink.post(AppEvent::ReassertFinished(ok));
                });
            }
        }
    }
    tracing::debug!("Timer command channel closed");
}
