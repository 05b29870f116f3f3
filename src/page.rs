use crate::display::DisplayTarget;
use crate::errors::CounterError;
use crate::models::Visibility;
use std::sync::Arc;
use tokio::sync::watch;

/// The hosting page as seen by the counter.
pub trait Page: Send + Sync {
    fn user_agent(&self) -> &str;

    /// Whether the environment advertises automation (webdriver).
    fn is_automated(&self) -> bool;

    /// Visibility updates. Closing the channel means the page is gone.
    fn visibility(&self) -> watch::Receiver<Visibility>;

    fn display_target(&self) -> Option<&dyn DisplayTarget>;
}

/// Waits until the page reports `Visible`. Returns immediately when it
/// already is.
pub async fn wait_until_visible(mut visibility: watch::Receiver<Visibility>) -> Result<(), CounterError> {
    visibility
        .wait_for(|state| *state == Visibility::Visible)
        .await
        .map(|_| ())
        .map_err(|_| CounterError::PageClosed)
}

/// A page whose properties are fixed up front, apart from visibility.
pub struct StaticPage {
    user_agent: String,
    automated: bool,
    visibility: watch::Sender<Visibility>,
    target: Option<Arc<dyn DisplayTarget>>,
}

impl StaticPage {
    pub fn new(user_agent: impl Into<String>) -> Self {
        let (visibility, _) = watch::channel(Visibility::Visible);
        Self {
            user_agent: user_agent.into(),
            automated: false,
            visibility,
            target: None,
        }
    }

    pub fn automated(mut self, automated: bool) -> Self {
        self.automated = automated;
        self
    }

    pub fn with_visibility(self, state: Visibility) -> Self {
        self.visibility.send_replace(state);
        self
    }

    pub fn with_target(mut self, target: Arc<dyn DisplayTarget>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn set_visibility(&self, state: Visibility) {
        self.visibility.send_replace(state);
    }
}

impl Page for StaticPage {
    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn is_automated(&self) -> bool {
        self.automated
    }

    fn visibility(&self) -> watch::Receiver<Visibility> {
        self.visibility.subscribe()
    }

    fn display_target(&self) -> Option<&dyn DisplayTarget> {
        self.target.as_deref()
    }
}
