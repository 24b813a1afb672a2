use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use tracing::{debug, info};

use crate::config::PortfolioConfig;
use crate::fetch::{fetch_repositories_background, FetchEvent, RepoFetcher};
use crate::project::{project_repositories, LoadState};

/// One page visit's worth of project state.
///
/// The hosting runtime activates the view once, then polls for events and
/// re-reads `state()` on every render pass. The state is `Loading` until the
/// single fetch settles and `Loaded` from then on; it never goes back.
/// Dropping the view before settlement discards the in-flight result.
pub struct PortfolioView {
    config: PortfolioConfig,
    state: LoadState,
    events: Option<Receiver<FetchEvent>>,
    fetch_started: bool,
}

impl PortfolioView {
    pub fn new(config: PortfolioConfig) -> Self {
        Self {
            config,
            state: LoadState::Loading,
            events: None,
            fetch_started: false,
        }
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Current load state, re-read by the renderer on every pass.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Kick off the one background fetch for this view.
    ///
    /// Only the first call does anything; a view never has more than one
    /// request in flight and never re-fetches after loading.
    pub fn activate(&mut self, fetcher: &RepoFetcher) {
        if self.fetch_started {
            debug!("View already activated, ignoring");
            return;
        }
        self.fetch_started = true;

        info!("Loading projects for {}", self.config.username);
        let (tx, rx) = unbounded();
        fetch_repositories_background(fetcher.clone(), self.config.username.clone(), tx);
        self.events = Some(rx);
    }

    /// Drain pending fetch events without blocking. Hosts call this once per
    /// render pass; it is a no-op while the fetch is still in flight.
    pub fn poll_events(&mut self) {
        loop {
            let event = match &self.events {
                Some(receiver) => match receiver.try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Empty) => return,
                    Err(TryRecvError::Disconnected) => {
                        self.events = None;
                        return;
                    }
                },
                None => return,
            };

            self.handle_event(event);
        }
    }

    /// Apply one settled fetch. The first settlement wins; anything arriving
    /// after the `Loading -> Loaded` transition is discarded.
    pub fn handle_event(&mut self, event: FetchEvent) {
        if !self.state.is_loading() {
            debug!("Projects already loaded, discarding late fetch result");
            return;
        }

        let result = match event {
            FetchEvent::Completed(repos) => Ok(repos),
            FetchEvent::Failed(err) => Err(err),
        };

        self.state = project_repositories(result);
        // One settlement per view; the channel has served its purpose.
        self.events = None;
    }
}
