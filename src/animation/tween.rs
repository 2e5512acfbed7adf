use crate::animation::ease::Ease;
use crate::animation::values::Interpolatable;

/// Animates a value from `from` toward `to` over `duration` seconds.
///
/// The tween owns no target; callers feed `dt` through [`Tween::advance`]
/// and write the returned value wherever it belongs.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Interpolatable> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl<T: Interpolatable> Tween<T> {
    #[must_use]
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    /// Advances time and returns the value at the new time.
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    /// Linear progress in `[0, 1]`. Zero-length tweens are always complete.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= f32::EPSILON {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    #[must_use]
    pub fn value(&self) -> T {
        let p = self.progress();
        if p >= 1.0 {
            return self.to;
        }
        T::interpolate_linear(self.from, self.to, self.ease.apply(p))
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> T {
        self.to
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
