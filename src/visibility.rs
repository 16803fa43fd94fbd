/// Fraction of the host region that must intersect the viewport to count as
/// visible.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    BecameVisible,
    BecameHidden,
    Unchanged,
}

/// Turns raw intersection reports into visible/hidden edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityGate {
    visible: bool,
}

impl VisibilityGate {
    pub fn observe(&mut self, intersecting: bool) -> Transition {
        let transition = match (self.visible, intersecting) {
            (false, true) => Transition::BecameVisible,
            (true, false) => Transition::BecameHidden,
            _ => Transition::Unchanged,
        };
        self.visible = intersecting;
        transition
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn reset(&mut self) {
        self.visible = false;
    }
}
