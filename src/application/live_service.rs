// Live feed service - pushes a fresh dashboard frame every refresh interval
use crate::application::clock::Clock;
use crate::application::session::DashboardSession;
use crate::domain::page::PageView;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    AutoRefreshDisabled,
    LeftLivePage,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveFrame {
    Update { view: PageView },
    Stopped { reason: StopReason, message: Option<String> },
}

impl LiveFrame {
    fn stopped(reason: StopReason) -> Self {
        LiveFrame::Stopped {
            reason,
            message: None,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, LiveFrame::Stopped { .. })
    }
}

#[derive(Clone)]
pub struct LiveFeedService {
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
}

impl LiveFeedService {
    pub fn new(clock: Arc<dyn Clock>, refresh_interval: Duration) -> Self {
        Self {
            clock,
            refresh_interval,
        }
    }

    /// Start the refresh loop for one session. Each tick advances the
    /// session's window once and sends the rendered dashboard. The loop ends
    /// after a `Stopped` frame, or as soon as the receiver is dropped.
    pub fn stream_session(&self, session: Arc<Mutex<DashboardSession>>) -> mpsc::Receiver<LiveFrame> {
        let (tx, rx) = mpsc::channel(100);
        let clock = self.clock.clone();

        let mut interval = tokio::time::interval(self.refresh_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        tokio::spawn(async move {
            let mut frames = 0usize;
            while ticks.next().await.is_some() {
                let frame = {
                    let mut session = session.lock().await;
                    if !session.wants_live_updates() {
                        LiveFrame::stopped(if session.settings().auto_refresh {
                            StopReason::LeftLivePage
                        } else {
                            StopReason::AutoRefreshDisabled
                        })
                    } else {
                        match session.render_live(clock.now()) {
                            Ok(view) => LiveFrame::Update { view },
                            Err(e) => {
                                tracing::warn!("Live render failed for {}: {}", session.id(), e);
                                LiveFrame::Stopped {
                                    reason: StopReason::Failed,
                                    message: Some(e.to_string()),
                                }
                            }
                        }
                    }
                };

                let last = frame.is_final();
                if tx.send(frame).await.is_err() {
                    tracing::debug!("Live client disconnected after {} frames", frames);
                    break;
                }
                frames += 1;
                if last {
                    tracing::debug!("Live stream stopped after {} frames", frames);
                    break;
                }
            }
        });

        rx
    }
}
