//! Menu DragDrop Utilities
//!
//! Ordering model and gesture state for drag-and-drop reordering.
//! Pointer capture and drag previews belong to the view; this crate only
//! tracks what is moving and computes where it lands.

mod collection;

pub use collection::{CollectionError, Keyed, OrderedCollection};

/// Drop target types
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget<N, C> {
    /// Hovering a sibling node
    Node(N),
    /// Hovering the empty area of a container
    Container(C),
}

/// Which half of the hovered element the pointer is in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropHint {
    #[default]
    Before,
    /// Past the vertical midpoint
    After,
}

/// One intermediate "positioned over X" event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragOver<N, C> {
    pub target: DropTarget<N, C>,
    pub hint: DropHint,
}

impl<N, C> DragOver<N, C> {
    pub fn node(node: N, hint: DropHint) -> Self {
        Self { target: DropTarget::Node(node), hint }
    }

    pub fn container(container: C) -> Self {
        Self { target: DropTarget::Container(container), hint: DropHint::Before }
    }
}

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a drag session is already active")]
    AlreadyActive,
}

/// DnD state: at most one active session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DragState<S> {
    #[default]
    Idle,
    Active(S),
}

impl<S> DragState<S> {
    /// Start a session; rejected while another one is active
    pub fn start(&mut self, session: S) -> Result<(), SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        *self = DragState::Active(session);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DragState::Active(_))
    }

    pub fn active(&self) -> Option<&S> {
        match self {
            DragState::Active(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// End drag operation, handing back the session if there was one
    pub fn end(&mut self) -> Option<S> {
        match std::mem::take(self) {
            DragState::Active(session) => Some(session),
            DragState::Idle => None,
        }
    }
}

/// Target slot for a node moving inside its own container.
///
/// `over` is the hovered sibling's current index. The slot is expressed in the
/// list with the moving node already removed, which is what `move_within` expects.
pub fn reorder_index(from: usize, over: usize, hint: DropHint) -> usize {
    let base = if over > from { over - 1 } else { over };
    match hint {
        DropHint::Before => base,
        DropHint::After => base + 1,
    }
}

/// Target slot for a node entering a container of length `len`.
///
/// `None` means the container itself is hovered: append at exactly `len`.
pub fn insert_index(over: Option<usize>, hint: DropHint, len: usize) -> usize {
    match over {
        None => len,
        Some(index) => {
            let slot = match hint {
                DropHint::Before => index,
                DropHint::After => index + 1,
            };
            slot.min(len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_session() {
        let mut state = DragState::default();
        state.start("a").unwrap();
        assert_eq!(state.start("b"), Err(SessionError::AlreadyActive));
        assert_eq!(state.active(), Some(&"a"));
        assert_eq!(state.end(), Some("a"));
        assert_eq!(state.end(), None);
        assert!(state.start("b").is_ok());
    }

    #[test]
    fn test_reorder_index_moving_down() {
        // [a, b, c]: drag a over c
        assert_eq!(reorder_index(0, 2, DropHint::Before), 1);
        assert_eq!(reorder_index(0, 2, DropHint::After), 2);
    }

    #[test]
    fn test_reorder_index_moving_up() {
        // [a, b, c]: drag c over a
        assert_eq!(reorder_index(2, 0, DropHint::Before), 0);
        assert_eq!(reorder_index(2, 0, DropHint::After), 1);
    }

    #[test]
    fn test_insert_index_appends_at_len() {
        assert_eq!(insert_index(None, DropHint::After, 3), 3);
        assert_eq!(insert_index(None, DropHint::Before, 0), 0);
    }

    #[test]
    fn test_insert_index_after_last_sibling() {
        assert_eq!(insert_index(Some(0), DropHint::After, 1), 1);
        assert_eq!(insert_index(Some(2), DropHint::After, 3), 3);
        assert_eq!(insert_index(Some(1), DropHint::Before, 3), 1);
    }
}
