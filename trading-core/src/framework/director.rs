//! The single-threaded event loop driving the pipeline.

use crate::error::DirectorError;
use crate::framework::context::Session;
use crate::framework::strategy::{Assessor, Executor, Sizer, Strategist};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use trading::{DataEvent, Event, EventKind, ExecutionEvent, PendingPlacedEvent, Timeframe, TradingError};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The four stages, one implementation each.
pub struct Pipeline {
    pub strategist: Box<dyn Strategist>,
    pub sizer: Box<dyn Sizer>,
    pub assessor: Box<dyn Assessor>,
    pub executor: Box<dyn Executor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorState {
    Running,
    Stopped,
}

/// Outcome of a single loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An event was taken off the queue and handled.
    Dispatched(EventKind),
    /// The queue was empty; this many new bars were enqueued.
    Polled(usize),
    /// The director is stopped and will do nothing more.
    Stopped,
}

/// Requests a graceful stop from another thread (e.g. a signal handler).
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owns the event queue and the last-seen-bar map and routes every event
/// to the stage that consumes it.
pub struct TradingDirector {
    session: Session,
    pipeline: Pipeline,
    queue: VecDeque<Event>,
    last_seen: HashMap<String, DateTime<Utc>>,
    symbols: Vec<String>,
    timeframe: Timeframe,
    poll_interval: Duration,
    notifications: bool,
    state: DirectorState,
    shutdown: ShutdownHandle,
}

impl TradingDirector {
    pub fn new(session: Session, pipeline: Pipeline, symbols: Vec<String>, timeframe: Timeframe) -> Self {
        let last_seen = symbols
            .iter()
            .map(|s| (s.clone(), DateTime::<Utc>::MIN_UTC))
            .collect();
        Self {
            session,
            pipeline,
            queue: VecDeque::new(),
            last_seen,
            symbols,
            timeframe,
            poll_interval: DEFAULT_POLL_INTERVAL,
            notifications: true,
            state: DirectorState::Running,
            shutdown: ShutdownHandle::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Whether fills and placements are forwarded to the notifier.
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn state(&self) -> DirectorState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Appends an event to the back of the queue.
    pub fn enqueue(&mut self, event: impl Into<Event>) {
        self.queue.push_back(event.into());
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn last_seen(&self, symbol: &str) -> Option<DateTime<Utc>> {
        self.last_seen.get(symbol).copied()
    }

    /// Asks the feed for each symbol's latest closed bar and enqueues the
    /// ones strictly newer than what was last seen.
    ///
    /// # Returns
    ///
    /// * `usize` - number of `DataEvent`s enqueued.
    pub fn poll_market(&mut self) -> usize {
        let mut enqueued = 0;
        for symbol in &self.symbols {
            let Some(bar) = self.session.feed().latest_closed_bar(symbol, self.timeframe) else {
                debug!("No closed bar available for {}", symbol);
                continue;
            };
            let seen = self
                .last_seen
                .entry(symbol.clone())
                .or_insert(DateTime::<Utc>::MIN_UTC);
            if bar.time > *seen {
                *seen = bar.time;
                self.queue.push_back(Event::Data(DataEvent {
                    symbol: symbol.clone(),
                    bar,
                }));
                enqueued += 1;
            }
        }
        enqueued
    }

    /// Runs one loop iteration without sleeping.
    ///
    /// # Returns
    ///
    /// * `Err(DirectorError)` - a malformed event was dequeued; the director is now stopped.
    pub fn step(&mut self) -> Result<Step, DirectorError> {
        if self.state == DirectorState::Stopped {
            return Ok(Step::Stopped);
        }
        if self.shutdown.is_requested() {
            info!("Shutdown requested, stopping the trading director");
            self.state = DirectorState::Stopped;
            return Ok(Step::Stopped);
        }

        let Some(event) = self.queue.pop_front() else {
            return Ok(Step::Polled(self.poll_market()));
        };

        if let Err(malformed) = event.validate() {
            error!("{}. Stopping the framework execution", malformed);
            self.state = DirectorState::Stopped;
            return Err(DirectorError::MalformedEvent(malformed));
        }

        let kind = event.kind();
        self.dispatch(event);
        Ok(Step::Dispatched(kind))
    }

    /// Handles everything already queued without polling for new bars.
    ///
    /// # Returns
    ///
    /// * `usize` - number of events dispatched.
    pub fn drain(&mut self) -> Result<usize, DirectorError> {
        let mut dispatched = 0;
        while !self.queue.is_empty() {
            match self.step()? {
                Step::Dispatched(_) => dispatched += 1,
                Step::Polled(_) => {}
                Step::Stopped => break,
            }
        }
        Ok(dispatched)
    }

    /// Loops until shutdown is requested or a malformed event is met.
    pub fn run(&mut self) -> Result<(), DirectorError> {
        info!(
            "Trading director started | symbols: {} | timeframe: {} | magic: {}",
            self.symbols.join(", "),
            self.timeframe,
            self.session.magic_number()
        );

        let outcome = loop {
            match self.step() {
                Ok(Step::Stopped) => break Ok(()),
                Ok(_) => thread::sleep(self.poll_interval),
                Err(e) => break Err(e),
            }
        };

        info!("END");
        outcome
    }

    /// Hands back the session so the caller can close it.
    pub fn into_session(self) -> Session {
        self.session
    }

    fn dispatch(&mut self, event: Event) {
        let kind = event.kind();
        let produced = match &event {
            Event::Data(e) => {
                info!("[{}] DATA {} close {}", e.bar.time, e.symbol, e.bar.close);
                self.pipeline
                    .strategist
                    .generate_signal(e, &self.session, self.pipeline.executor.as_ref())
                    .map(|o| o.map(Event::from))
            }
            Event::Signal(e) => {
                info!(
                    "SIGNAL {} {} {} @ {} (sl {}, tp {})",
                    e.symbol, e.direction, e.target_order, e.target_price, e.stop_loss, e.take_profit
                );
                self.pipeline
                    .sizer
                    .size_signal(e, &self.session)
                    .map(|o| o.map(Event::from))
            }
            Event::Sizing(e) => {
                info!("SIZING {} {} volume {}", e.signal.symbol, e.signal.direction, e.volume);
                self.pipeline
                    .assessor
                    .assess_order(e, &self.session)
                    .map(|o| o.map(Event::from))
            }
            Event::Order(e) => {
                info!("ORDER {} {} {} volume {}", e.signal.symbol, e.signal.direction, e.signal.target_order, e.volume);
                self.pipeline.executor.execute_order(e, &self.session)
            }
            Event::Execution(e) => {
                self.on_execution(e);
                Ok(None)
            }
            Event::PendingPlaced(e) => {
                self.on_pending_placed(e);
                Ok(None)
            }
        };

        self.forward(kind, event.symbol(), produced);
    }

    fn forward(&mut self, kind: EventKind, symbol: &str, produced: Result<Option<Event>, TradingError>) {
        match produced {
            Ok(Some(next)) => {
                debug!("{} handler for {} produced {}", kind, symbol, next.kind());
                self.queue.push_back(next);
            }
            Ok(None) => {}
            Err(e) => warn!("{} handler skipped {}: {}", kind, symbol, e),
        }
    }

    fn on_execution(&self, e: &ExecutionEvent) {
        let message = format!(
            "{} {} {} @ {} (ticket {}, magic {})",
            e.direction, e.volume, e.symbol, e.fill_price, e.ticket, e.magic_number
        );
        info!("EXECUTION {}", message);
        if self.notifications {
            self.session.notifier().notify("Order executed", &message);
        }
    }

    fn on_pending_placed(&self, e: &PendingPlacedEvent) {
        let message = format!(
            "{} {} {} {} @ {} (ticket {}, magic {})",
            e.direction, e.target_order, e.volume, e.symbol, e.target_price, e.ticket, e.magic_number
        );
        info!("PENDING_PLACED {}", message);
        if self.notifications {
            self.session.notifier().notify("Pending order placed", &message);
        }
    }
}
