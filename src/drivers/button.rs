// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Polled push button.

use embedded_hal::digital::InputPin;

/// Press/release edge detection for a sampled level.
#[derive(Default)]
pub struct EdgeDetector {
    old: bool,
}

/// Edges seen by one [`EdgeDetector::update`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub pressed: bool,
    pub released: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { old: false }
    }

    /// Feed the current level (`true` = pressed).
    pub fn update(&mut self, now: bool) -> Edges {
        let changed = now ^ self.old;
        self.old = now;
        Edges {
            pressed: now & changed,
            released: !now & changed,
        }
    }
}

/// Active-low button on an input pin.
pub struct Button<P> {
    pin: P,
    edges: EdgeDetector,
}

impl<P: InputPin> Button<P> {
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            edges: EdgeDetector::new(),
        }
    }

    /// Sample the pin. Returns `true` once per press. Read errors count as released.
    pub fn poll_pressed(&mut self) -> bool {
        let down = self.pin.is_low().unwrap_or(false);
        self.edges.update(down).pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_fires_once_per_edge() {
        let mut e = EdgeDetector::new();
        let levels = [false, true, true, true, false, false, true];
        let presses: usize = levels.iter().filter(|&&l| e.update(l).pressed).count();
        assert_eq!(presses, 2);
    }

    #[test]
    fn release_edge() {
        let mut e = EdgeDetector::new();
        e.update(true);
        let edges = e.update(false);
        assert!(edges.released && !edges.pressed);
    }
}
