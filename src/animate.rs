//! Animation capability interface
//!
//! The simulation never animates anything itself; the host page hands the
//! game a single `animate` capability and keeps the actual tweening engine
//! (CSS transitions, a JS library, nothing at all in tests) behind it.

/// Easing curve for a property animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// CSS `transition-timing-function` name
    pub fn as_css(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

/// Completion hook for an animation
pub type OnComplete = Box<dyn FnOnce()>;

/// Minimal animation engine surface: tween `properties` on the element named
/// by `target` over `duration_ms`, then invoke `on_complete`.
pub trait Animator {
    fn animate(
        &self,
        target: &str,
        properties: &[(&str, String)],
        duration_ms: u32,
        easing: Easing,
        on_complete: Option<OnComplete>,
    );
}

/// Animator that skips the tween and completes immediately. Used in tests
/// and in the native build, where there is nothing to animate.
#[derive(Debug, Default)]
pub struct NoopAnimator;

impl Animator for NoopAnimator {
    fn animate(
        &self,
        _target: &str,
        _properties: &[(&str, String)],
        _duration_ms: u32,
        _easing: Easing,
        on_complete: Option<OnComplete>,
    ) {
        if let Some(complete) = on_complete {
            complete();
        }
    }
}
