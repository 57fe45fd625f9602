use log::trace;

/// Edge emitted when the observed fraction crosses the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEdge {
    Entered,
    Exited,
}

/// Converts a stream of visible-fraction samples into threshold-crossing
/// edges. The first sample at or above the threshold yields `Entered`,
/// the first one below it afterwards yields `Exited`; everything in
/// between is silent.
pub struct VisibilityObserver {
    threshold: f32,
    visible: bool,
}

impl VisibilityObserver {
    /// The fraction of the viewer that must be on screen before the
    /// explode animation starts.
    pub const DEFAULT_THRESHOLD: f32 = 0.3;

    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update(&mut self, visible_fraction: f32) -> Option<VisibilityEdge> {
        let now_visible = visible_fraction >= self.threshold;
        if now_visible == self.visible {
            return None;
        }
        self.visible = now_visible;
        let edge = if now_visible {
            VisibilityEdge::Entered
        } else {
            VisibilityEdge::Exited
        };
        trace!("visibility edge: {edge:?} at fraction {visible_fraction}");
        Some(edge)
    }
}

impl Default for VisibilityObserver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_the_threshold_emits_one_edge_each_way() {
        let mut observer = VisibilityObserver::default();
        assert_eq!(observer.update(0.0), None);
        assert_eq!(observer.update(0.29), None);
        assert_eq!(observer.update(0.3), Some(VisibilityEdge::Entered));
        assert_eq!(observer.update(0.8), None);
        assert_eq!(observer.update(1.0), None);
        assert_eq!(observer.update(0.1), Some(VisibilityEdge::Exited));
        assert_eq!(observer.update(0.0), None);
    }

    #[test]
    fn starting_fully_visible_emits_entered_immediately() {
        let mut observer = VisibilityObserver::default();
        assert_eq!(observer.update(1.0), Some(VisibilityEdge::Entered));
    }
}
