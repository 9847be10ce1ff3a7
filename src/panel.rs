//! Tweak panel commands and the bridge that applies them.
//!
//! The egui panel only produces [`PanelCommand`]s; all mutation goes
//! through [`PanelBridge::apply`] so the same paths run under test.

use crate::math::Color;
use crate::scene::{MaterialId, Palette, PaletteSlot, PopulateReport};
use crate::state::AppState;

pub const ADVISORY_MESSAGE: &str = "That's a lot of objects! Restart the scene if it gets sluggish.";

/// Materials with a wireframe toggle, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireframeTarget {
    Torus,
    Sphere,
    Boundary,
}

impl WireframeTarget {
    pub const ALL: [WireframeTarget; 3] = [WireframeTarget::Torus, WireframeTarget::Sphere, WireframeTarget::Boundary];

    pub fn label(&self) -> &'static str {
        match self {
            WireframeTarget::Torus => "Torus Wireframe",
            WireframeTarget::Sphere => "Sphere Wireframe",
            WireframeTarget::Boundary => "Boundary Wireframe",
        }
    }

    pub fn material(&self) -> MaterialId {
        match self {
            WireframeTarget::Torus => MaterialId::Torus,
            WireframeTarget::Sphere => MaterialId::Sphere,
            WireframeTarget::Boundary => MaterialId::Boundary,
        }
    }

    /// State after "Reset Color".
    pub fn reset_value(&self) -> bool {
        matches!(self, WireframeTarget::Sphere)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    SetPaletteColor { slot: PaletteSlot, color: Color },
    SetWireframe { target: WireframeTarget, enabled: bool },
    ResetColor,
    Populate,
}

/// Counts "Populate" actions and raises the advisory exactly once, the
/// first time the count exceeds the threshold.
#[derive(Debug, Clone)]
pub struct PopulationCounter {
    count: u32,
    threshold: u32,
    advised: bool,
}

impl PopulationCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
            advised: false,
        }
    }

    /// Returns true when this increment should raise the advisory.
    pub fn increment(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        if self.count > self.threshold && !self.advised {
            self.advised = true;
            return true;
        }
        false
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn advised(&self) -> bool {
        self.advised
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelOutcome {
    pub populated: Option<PopulateReport>,
    pub advisory: Option<&'static str>,
}

pub struct PanelBridge;

impl PanelBridge {
    pub fn apply(state: &mut AppState, command: PanelCommand) -> PanelOutcome {
        let mut outcome = PanelOutcome::default();
        match command {
            PanelCommand::SetPaletteColor { slot, color } => {
                state.palette.set(slot, color);
                state.materials.apply_palette_slot(&state.palette, slot);
                log::debug!("{} -> {}", slot.label(), color);
            }
            PanelCommand::SetWireframe { target, enabled } => {
                state.materials.set_wireframe(target.material(), enabled);
                log::debug!("{} -> {}", target.label(), enabled);
            }
            PanelCommand::ResetColor => {
                state.palette = Palette::default();
                for slot in PaletteSlot::ALL {
                    state.materials.apply_palette_slot(&state.palette, slot);
                }
                for target in WireframeTarget::ALL {
                    state.materials.set_wireframe(target.material(), target.reset_value());
                }
                log::info!("palette and wireframe flags reset");
            }
            PanelCommand::Populate => {
                let batch = state.config.population.batch;
                outcome.populated = Some(state.populate(batch));
                if state.counter.increment() {
                    log::warn!("{} (populate #{})", ADVISORY_MESSAGE, state.counter.count());
                    outcome.advisory = Some(ADVISORY_MESSAGE);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_fires_once_past_threshold() {
        let mut counter = PopulationCounter::new(7);
        let fired: Vec<bool> = (0..12).map(|_| counter.increment()).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[7]);
        assert!(counter.advised());
        assert_eq!(counter.count(), 12);
    }

    #[test]
    fn test_zero_threshold_fires_on_first() {
        let mut counter = PopulationCounter::new(0);
        assert!(counter.increment());
        assert!(!counter.increment());
    }

    #[test]
    fn test_wireframe_targets() {
        assert_eq!(WireframeTarget::Torus.material(), MaterialId::Torus);
        assert_eq!(WireframeTarget::Boundary.label(), "Boundary Wireframe");
        let reset: Vec<bool> = WireframeTarget::ALL.iter().map(|t| t.reset_value()).collect();
        assert_eq!(reset, vec![false, true, false]);
    }
}
