//! Turntable Input Tracker
//!
//! Feeds input events to a viewer session over a channel. Uses a pluggable
//! backend architecture so different producers can drive the viewer:
//!
//! - **Script:** A recorded JSONL event stream released in real time
//!
//! Every forwarded event can also be appended to a JSONL recording.

pub mod backends;
pub mod writer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use turntable_common::error::TurntableResult;
use turntable_model::event::InputEvent;

pub use backends::ScriptedBackend;
pub use writer::EventWriter;

/// Trait for input backends.
pub trait InputBackend: Send {
    /// Poll for the next input event. Returns `None` if no event is available.
    fn poll(&mut self) -> TurntableResult<Option<InputEvent>>;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Whether the backend will never produce another event.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Moves events from a backend into a viewer session channel.
pub struct InputPump {
    backend: Box<dyn InputBackend>,
    recorder: Option<EventWriter>,
    stop_flag: Arc<AtomicBool>,
    idle_wait: Duration,
    events_forwarded: u64,
}

impl InputPump {
    pub fn new(backend: Box<dyn InputBackend>) -> Self {
        Self {
            backend,
            recorder: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            idle_wait: Duration::from_millis(1),
            events_forwarded: 0,
        }
    }

    /// Also append every forwarded event to `recorder`.
    pub fn with_recorder(mut self, recorder: EventWriter) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Forward events until the backend is exhausted, the stop flag is set,
    /// or the session hangs up. Dropping `tx` on return closes the session's
    /// input.
    pub async fn run(&mut self, tx: mpsc::Sender<InputEvent>) -> TurntableResult<u64> {
        tracing::info!(backend = %self.backend.name(), "Input pump started");

        while !self.stop_flag.load(Ordering::Relaxed) {
            match self.backend.poll() {
                Ok(Some(event)) => {
                    if let Some(recorder) = self.recorder.as_mut() {
                        recorder.record(&event)?;
                    }
                    if tx.send(event).await.is_err() {
                        tracing::debug!("Session closed its input, stopping pump");
                        break;
                    }
                    self.events_forwarded += 1;
                }
                Ok(None) if self.backend.is_exhausted() => break,
                Ok(None) => {
                    tokio::time::sleep(self.idle_wait).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Input backend error");
                    tokio::time::sleep(self.idle_wait).await;
                }
            }
        }

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.flush()?;
        }
        tracing::info!(events = self.events_forwarded, "Input pump stopped");
        Ok(self.events_forwarded)
    }

    /// Flag that ends [`InputPump::run`] once set, for use from another task.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn events_forwarded(&self) -> u64 {
        self.events_forwarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct QueueBackend {
        queue: VecDeque<InputEvent>,
        closed: bool,
    }

    impl InputBackend for QueueBackend {
        fn poll(&mut self) -> TurntableResult<Option<InputEvent>> {
            Ok(self.queue.pop_front())
        }

        fn name(&self) -> &str {
            "queue"
        }

        fn is_exhausted(&self) -> bool {
            self.closed && self.queue.is_empty()
        }
    }

    #[tokio::test]
    async fn test_pump_forwards_until_exhausted() {
        let backend = QueueBackend {
            queue: vec![InputEvent::drag_start(0, 1.0), InputEvent::drag_end(5)].into(),
            closed: true,
        };
        let mut pump = InputPump::new(Box::new(backend));
        let (tx, mut rx) = mpsc::channel(8);

        let forwarded = pump.run(tx).await.unwrap();
        assert_eq!(forwarded, 2);
        assert_eq!(rx.recv().await, Some(InputEvent::drag_start(0, 1.0)));
        assert_eq!(rx.recv().await, Some(InputEvent::drag_end(5)));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_pump_stops_when_session_hangs_up() {
        let backend = QueueBackend {
            queue: vec![InputEvent::drag_start(0, 1.0)].into(),
            closed: false,
        };
        let mut pump = InputPump::new(Box::new(backend));
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        assert_eq!(pump.run(tx).await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_flag_ends_idle_pump() {
        let backend = QueueBackend {
            queue: VecDeque::new(),
            closed: false,
        };
        let mut pump = InputPump::new(Box::new(backend));
        let flag = pump.stop_flag();
        let (tx, _rx) = mpsc::channel(1);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        });

        assert_eq!(pump.run(tx).await.unwrap(), 0);
    }

    struct FailingBackend;

    impl InputBackend for FailingBackend {
        fn poll(&mut self) -> TurntableResult<Option<InputEvent>> {
            Err(turntable_common::error::TurntableError::input("device unplugged"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_errors_back_off() {
        let mut pump = InputPump::new(Box::new(FailingBackend));
        let flag = pump.stop_flag();
        let (tx, _rx) = mpsc::channel(1);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            flag.store(true, Ordering::SeqCst);
        });

        // The stop task only runs if the pump yields between failures.
        let started = tokio::time::Instant::now();
        assert_eq!(pump.run(tx).await.unwrap(), 0);
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
