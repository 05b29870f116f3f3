use std::sync::Mutex;

pub const FADED_OPACITY: f32 = 0.1;
pub const DIMMED_OPACITY: f32 = 0.6;

/// Element the count is rendered into.
pub trait DisplayTarget: Send + Sync {
    fn set_text(&self, text: &str);
    fn set_opacity(&self, opacity: f32);
}

/// Fades the target out, swaps the text and fades it back in.
pub fn show_count(target: &dyn DisplayTarget, text: &str) {
    target.set_opacity(FADED_OPACITY);
    target.set_text(text);
    target.set_opacity(1.0);
}

/// Shows a placeholder or error label, dimmed so it reads as inactive.
pub fn show_fallback(target: &dyn DisplayTarget, text: &str) {
    target.set_text(text);
    target.set_opacity(DIMMED_OPACITY);
}

/// In-memory target that remembers what was rendered.
#[derive(Debug, Default)]
pub struct TextTarget {
    state: Mutex<TextState>,
}

#[derive(Debug, Default, Clone)]
struct TextState {
    text: Option<String>,
    opacity: Option<f32>,
    updates: usize,
}

impl TextTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    pub fn opacity(&self) -> Option<f32> {
        self.lock().opacity
    }

    /// Number of times the text was replaced.
    pub fn updates(&self) -> usize {
        self.lock().updates
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TextState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DisplayTarget for TextTarget {
    fn set_text(&self, text: &str) {
        let mut state = self.lock();
        state.text = Some(text.to_string());
        state.updates += 1;
    }

    fn set_opacity(&self, opacity: f32) {
        self.lock().opacity = Some(opacity.clamp(0.0, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_ends_fully_opaque() {
        let target = TextTarget::new();
        show_count(&target, "1,000");
        assert_eq!(target.text().as_deref(), Some("1,000"));
        assert_eq!(target.opacity(), Some(1.0));
        assert_eq!(target.updates(), 1);
    }

    #[test]
    fn fallback_is_dimmed() {
        let target = TextTarget::new();
        show_fallback(&target, "—");
        assert_eq!(target.text().as_deref(), Some("—"));
        assert_eq!(target.opacity(), Some(DIMMED_OPACITY));
    }
}
