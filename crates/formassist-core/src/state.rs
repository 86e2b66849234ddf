//! Controller state published to views.
//!
//! The orchestrator owns one `ControllerState` behind a watch channel; views
//! read clones or borrow it through a receiver. Only the orchestrator can
//! mutate it.

use formassist_types::operation::{OperationKind, OperationState};
use formassist_types::session::SessionId;

use crate::catalog::FormCatalog;
use crate::timeline::MessageTimeline;

/// Everything a view needs to render the session.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub(crate) session_id: SessionId,
    pub(crate) timeline: MessageTimeline,
    pub(crate) catalog: FormCatalog,
    pub(crate) chat: OperationState,
    pub(crate) upload: OperationState,
    pub(crate) fill: OperationState,
}

impl ControllerState {
    pub(crate) fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            timeline: MessageTimeline::new(),
            catalog: FormCatalog::new(),
            chat: OperationState::default(),
            upload: OperationState::default(),
            fill: OperationState::default(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn timeline(&self) -> &MessageTimeline {
        &self.timeline
    }

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    pub fn banner(&self) -> Option<&str> {
        self.timeline.banner()
    }

    pub fn operation(&self, kind: OperationKind) -> &OperationState {
        match kind {
            OperationKind::Chat => &self.chat,
            OperationKind::Upload => &self.upload,
            OperationKind::Fill => &self.fill,
        }
    }

    pub(crate) fn operation_mut(&mut self, kind: OperationKind) -> &mut OperationState {
        match kind {
            OperationKind::Chat => &mut self.chat,
            OperationKind::Upload => &mut self.upload,
            OperationKind::Fill => &mut self.fill,
        }
    }

    /// Conventional UI gate: chat or fill in flight.
    ///
    /// Upload is left out, matching how the input and picker controls are
    /// disabled; the orchestrator itself only guards per kind.
    pub fn busy(&self) -> bool {
        self.chat.in_flight || self.fill.in_flight
    }

    /// Whether the fill action can currently be offered.
    pub fn can_fill(&self) -> bool {
        !self.fill.in_flight && !self.catalog.is_empty() && self.catalog.selected().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formassist_types::form::FormDescriptor;

    fn state() -> ControllerState {
        ControllerState::new(SessionId("s-1".to_string()))
    }

    #[test]
    fn test_busy_is_chat_or_fill() {
        let mut s = state();
        assert!(!s.busy());

        s.operation_mut(OperationKind::Upload).begin();
        assert!(!s.busy());

        s.operation_mut(OperationKind::Chat).begin();
        assert!(s.busy());

        s.operation_mut(OperationKind::Chat).succeed();
        s.operation_mut(OperationKind::Fill).begin();
        assert!(s.busy());
    }

    #[test]
    fn test_can_fill_requires_selection() {
        let mut s = state();
        assert!(!s.can_fill());

        s.catalog.populate(vec![FormDescriptor::new("I-765", "EAD")]);
        assert!(s.can_fill());

        s.fill.begin();
        assert!(!s.can_fill());
    }
}
