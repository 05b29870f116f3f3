use crate::bot::looks_like_bot;
use crate::client::CountingService;
use crate::config::CounterConfig;
use crate::count::{count_from_body, format_grouped};
use crate::display::{DisplayTarget, show_count, show_fallback};
use crate::errors::CounterError;
use crate::models::{Action, Outcome};
use crate::page::{Page, wait_until_visible};
use crate::state::VisitFlags;
use crate::storage::KeyValueStore;
use chrono::Utc;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, error, info, warn};

/// Decides once per page load whether this visit bumps the remote counter,
/// then renders the count.
///
/// Build one controller per page lifecycle. The durable store must outlive
/// the session store for the duplicate guards to mean anything.
pub struct VisitCounterController {
    service: Arc<dyn CountingService>,
    flags: VisitFlags,
    group_separator: String,
    fallback_text: String,
    error_text: String,
    started: AtomicBool,
}

impl VisitCounterController {
    pub fn new(
        config: &CounterConfig,
        service: Arc<dyn CountingService>,
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            service,
            flags: VisitFlags::new(
                durable,
                session,
                config.visited_key.clone(),
                config.session_key.clone(),
            ),
            group_separator: config.group_separator.clone(),
            fallback_text: config.fallback_text.clone(),
            error_text: config.error_text.clone(),
            started: AtomicBool::new(false),
        }
    }

    pub fn flags(&self) -> &VisitFlags {
        &self.flags
    }

    /// Runs the counter for this page load. Only the first call does
    /// anything; later calls return `Outcome::AlreadyStarted`.
    pub async fn initialize(&self, page: &dyn Page) -> Outcome {
        let target = match locate_target(page) {
            Ok(target) => target,
            Err(err) => {
                warn!("visit counter disabled: {err}");
                return Outcome::NoDisplayTarget;
            }
        };

        if self.started.swap(true, Ordering::SeqCst) {
            debug!("visit counter already started for this page");
            return Outcome::AlreadyStarted;
        }

        let action = match self.determine_action(page).await {
            Ok(action) => action,
            Err(err) => {
                info!("visit counter abandoned: {err}");
                return Outcome::Abandoned;
            }
        };

        match action {
            Action::Increment => self.execute_increment(target).await,
            Action::ReadOnly => self.execute_read_only(target).await,
        }
    }

    /// Waits for the page to be visible, then picks the action. Fails only
    /// when the page closes while still hidden.
    pub async fn determine_action(&self, page: &dyn Page) -> Result<Action, CounterError> {
        wait_until_visible(page.visibility()).await?;

        if looks_like_bot(page.user_agent(), page.is_automated()) {
            info!("visit not counted: automated agent");
            return Ok(Action::ReadOnly);
        }

        if self.flags.session_incremented() {
            info!("visit not counted: already incremented this session");
            return Ok(Action::ReadOnly);
        }

        if self.flags.visited() {
            debug!(first_visit = ?self.flags.first_visit(), "visit not counted: returning visitor");
            return Ok(Action::ReadOnly);
        }

        Ok(Action::Increment)
    }

    pub async fn execute_increment(&self, target: &dyn DisplayTarget) -> Outcome {
        // Set before the request so a reload mid-flight cannot increment again.
        if let Err(err) = self.flags.mark_session_incremented() {
            error!("failed to record session increment: {err}");
            show_fallback(target, &self.error_text);
            return Outcome::Failed;
        }

        let counted = self
            .service
            .increment()
            .await
            .and_then(|body| count_from_body(&body));
        match counted {
            Ok(count) => {
                if let Err(err) = self.flags.mark_visited(Utc::now()) {
                    error!("failed to persist visited flag: {err}");
                }
                info!(count, "visit counted");
                show_count(target, &format_grouped(count, &self.group_separator));
                Outcome::Incremented { count }
            }
            Err(err) => {
                warn!("increment failed, showing current count instead: {err}");
                self.execute_read_only(target).await
            }
        }
    }

    pub async fn execute_read_only(&self, target: &dyn DisplayTarget) -> Outcome {
        match self.service.read().await.and_then(|body| count_from_body(&body)) {
            Ok(count) => {
                debug!(count, "count read");
                show_count(target, &format_grouped(count, &self.group_separator));
                Outcome::Read { count }
            }
            Err(err) => {
                warn!("count unavailable: {err}");
                show_fallback(target, &self.fallback_text);
                Outcome::Unavailable
            }
        }
    }
}

fn locate_target(page: &dyn Page) -> Result<&dyn DisplayTarget, CounterError> {
    page.display_target().ok_or(CounterError::MissingDisplayTarget)
}
