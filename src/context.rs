//! Menu Editor
//!
//! Shared editor state behind one async lock: the provisional and canonical
//! models, the single drag slot, containers with a save in flight, the item
//! edit form and notices for the user. The lock is never held across a store call.

use std::collections::HashSet;
use std::sync::Arc;

use menu_dragdrop::{DragState, OrderedCollection, SessionError};
use tokio::sync::Mutex;

use crate::commands::MenuApi;
use crate::commit::{execute, plan_commit, restore_origin, CommitPlan, PersistCall};
use crate::config::EditorConfig;
use crate::error::{ReorderError, ReorderResult};
use crate::form::{EditForm, SideDraft};
use crate::models::{ContainerRef, NodeKind, NodeRef, SideName};
use crate::reorder::{LiveReorderer, MenuDragOver, Transition};
use crate::session::DragSession;
use crate::store::HierarchyModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// How a drag ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Unchanged,
    /// Store calls that were made, in order
    Saved(Vec<PersistCall>),
    /// Side order kept in the edit form
    Drafted(SideDraft),
    Abandoned,
}

#[derive(Default)]
struct EditorState {
    provisional: HierarchyModel,
    canonical: HierarchyModel,
    drag: DragState<DragSession>,
    in_flight: HashSet<ContainerRef>,
    form: Option<EditForm>,
    notices: Vec<Notice>,
}

impl EditorState {
    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice { level, message: message.into() });
    }

    fn abort_session(&mut self) {
        if let Some(session) = self.drag.end() {
            log::warn!("Drag of {} aborted", session.node);
        }
    }

    /// Install a fresh fetch as both models.
    ///
    /// Containers with a save in flight keep their shown state: the fetch may
    /// predate the write, and a successful save promotes what is shown.
    fn replace_models(&mut self, model: HierarchyModel) {
        self.abort_session();
        if let Some(form) = &self.form {
            if model.item(form.item()).is_none() {
                log::info!("{} no longer exists, closing its form", form.item());
                self.form = None;
            }
        }
        let mut provisional = model.clone();
        for container in &self.in_flight {
            if provisional.contains_container(container) {
                log::debug!("Keeping {} while it saves", container);
                provisional.copy_container_from(&self.provisional, container);
            }
        }
        self.provisional = provisional;
        self.canonical = model;
    }

    /// Return to the last confirmed state, keeping containers that are still saving
    fn rollback(&mut self) {
        let mut model = self.canonical.clone();
        for container in &self.in_flight {
            model.copy_container_from(&self.provisional, container);
        }
        self.provisional = model;
    }
}

pub struct MenuEditor<A: MenuApi> {
    api: Arc<A>,
    config: EditorConfig,
    state: Arc<Mutex<EditorState>>,
}

impl<A: MenuApi> Clone for MenuEditor<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            config: self.config.clone(),
            state: self.state.clone(),
        }
    }
}

impl<A: MenuApi> MenuEditor<A> {
    /// Editor with an empty menu; call `refresh` to load
    pub fn new(api: Arc<A>, config: EditorConfig) -> Self {
        Self {
            api,
            config,
            state: Arc::new(Mutex::new(EditorState::default())),
        }
    }

    pub async fn load(api: Arc<A>, config: EditorConfig) -> ReorderResult<Self> {
        let editor = Self::new(api, config);
        editor.refresh().await?;
        Ok(editor)
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ========================
    // Snapshots
    // ========================

    /// Model as currently shown, including an ongoing drag
    pub async fn model(&self) -> HierarchyModel {
        self.state.lock().await.provisional.clone()
    }

    /// Model as last confirmed by the store
    pub async fn canonical(&self) -> HierarchyModel {
        self.state.lock().await.canonical.clone()
    }

    pub async fn session(&self) -> Option<DragSession> {
        self.state.lock().await.drag.active().cloned()
    }

    pub async fn in_flight(&self) -> Vec<ContainerRef> {
        let mut containers: Vec<ContainerRef> = self.state.lock().await.in_flight.iter().cloned().collect();
        containers.sort();
        containers
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().await.notices)
    }

    pub async fn edit_form(&self) -> Option<EditForm> {
        self.state.lock().await.form.clone()
    }

    // ========================
    // Fetch
    // ========================

    /// Fetch the whole menu and replace both models
    pub async fn refresh(&self) -> ReorderResult<()> {
        let model = self.fetch().await?;
        let count = model.item_count();
        self.state.lock().await.replace_models(model);
        log::info!("Menu loaded: {} items", count);
        Ok(())
    }

    async fn fetch(&self) -> ReorderResult<HierarchyModel> {
        let categories = self.api.fetch_categories().await.map_err(ReorderError::Refetch)?;
        let order = self.api.fetch_category_order().await.map_err(ReorderError::Refetch)?;
        HierarchyModel::from_parts(categories, order)
    }

    /// Abort any drag, tell the user, reload from the store
    async fn recover(&self, error: &ReorderError) {
        log::error!("{}; reloading menu", error);
        {
            let mut state = self.state.lock().await;
            state.abort_session();
            let level = match error {
                ReorderError::PartialTransfer { .. } => NoticeLevel::Warning,
                _ => NoticeLevel::Error,
            };
            state.notify(level, error.to_string());
        }

        if let Err(refetch_error) = self.refresh().await {
            log::error!("{}", refetch_error);
            let mut state = self.state.lock().await;
            state.rollback();
            state.notify(NoticeLevel::Error, refetch_error.to_string());
        }
    }

    // ========================
    // Drag and drop
    // ========================

    /// Pick up `node`
    pub async fn start_drag(&self, node: NodeRef) -> ReorderResult<DragSession> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.drag.is_active() {
            return Err(SessionError::AlreadyActive.into());
        }

        let session = DragSession::open(node, &state.provisional, state.form.as_ref())?;
        if state.in_flight.contains(&session.origin) {
            log::debug!("Refusing drag of {}: {} is saving", session.node, session.origin);
            return Err(ReorderError::ContainerBusy(session.origin));
        }

        state.drag.start(session.clone())?;
        log::debug!("Drag of {} from {} at {}", session.node, session.origin, session.origin_index);
        Ok(session)
    }

    /// Pointer is over a node or container
    pub async fn drag_over(&self, event: MenuDragOver) -> ReorderResult<Transition> {
        let result = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let session = state.drag.active().cloned().ok_or(ReorderError::NoSession)?;
            LiveReorderer::new(&state.in_flight).apply(
                &session,
                &event,
                &mut state.provisional,
                state.form.as_mut(),
            )
        };

        match result {
            Err(e) if e.needs_refetch() => {
                self.recover(&e).await;
                Err(e)
            }
            other => other,
        }
    }

    /// Release the dragged node over `event`, or outside any target when `None`.
    ///
    /// When a store call fails the menu has already been reloaded by the time
    /// this returns the error.
    pub async fn end_drag(&self, event: Option<MenuDragOver>) -> ReorderResult<DropOutcome> {
        let planned = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let session = state.drag.end().ok_or(ReorderError::NoSession)?;

            let applied = match &event {
                Some(event) => LiveReorderer::new(&state.in_flight)
                    .apply(&session, event, &mut state.provisional, state.form.as_mut())
                    .map(|_| ()),
                None => Ok(()),
            };
            let planned = applied.and_then(|()| {
                plan_commit(
                    &session,
                    &state.provisional,
                    state.form.as_ref(),
                    event.is_some(),
                    &self.config,
                )
            });
            if let Ok(CommitPlan::Persist { touched, .. }) = &planned {
                state.in_flight.extend(touched.iter().cloned());
            }
            planned.map(|plan| (session, plan))
        };

        let (session, plan) = match planned {
            Ok(planned) => planned,
            Err(e) => {
                if e.needs_refetch() {
                    self.recover(&e).await;
                }
                return Err(e);
            }
        };

        match plan {
            CommitPlan::Unchanged => Ok(DropOutcome::Unchanged),
            CommitPlan::KeepDraft(draft) => {
                log::debug!("Side order of {} drafted: {:?}", draft.item, draft.order);
                Ok(DropOutcome::Drafted(draft))
            }
            CommitPlan::Abandon { refetch } => {
                self.abandon(&session, refetch).await;
                Ok(DropOutcome::Abandoned)
            }
            CommitPlan::Persist { calls, touched } => self.persist(calls, touched).await,
        }
    }

    /// Drop the current drag without a target
    pub async fn abort_drag(&self) -> ReorderResult<()> {
        self.end_drag(None).await.map(|_| ())
    }

    async fn abandon(&self, session: &DragSession, refetch: bool) {
        // Drafts are not in the store, so side drags always restore locally
        if refetch && session.kind() != NodeKind::Side {
            if let Err(e) = self.refresh().await {
                self.recover(&e).await;
            }
            return;
        }

        let restored = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            restore_origin(session, &mut state.provisional, state.form.as_mut())
        };
        match restored {
            Ok(()) => log::debug!("{} returned to {}", session.node, session.origin),
            Err(e) => self.recover(&e).await,
        }
    }

    async fn persist(&self, calls: Vec<PersistCall>, touched: Vec<ContainerRef>) -> ReorderResult<DropOutcome> {
        let result = execute(self.api.as_ref(), &calls).await;

        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            for container in &touched {
                state.in_flight.remove(container);
            }
            if result.is_ok() {
                for container in &touched {
                    state.canonical.copy_container_from(&state.provisional, container);
                }
            }
        }

        match result {
            Ok(()) => {
                log::info!("Saved {} change(s) to {:?}", calls.len(), touched);
                Ok(DropOutcome::Saved(calls))
            }
            Err(e) => {
                self.recover(&e).await;
                Err(e)
            }
        }
    }

    // ========================
    // Edit form
    // ========================

    /// Open `item` for editing; its sides become draggable
    pub async fn open_edit_form(&self, item: &str) -> ReorderResult<EditForm> {
        let mut state = self.state.lock().await;
        if state.drag.active().is_some_and(|s| s.kind() == NodeKind::Side) {
            return Err(SessionError::AlreadyActive.into());
        }
        let record = state
            .provisional
            .item(&item.to_string())
            .ok_or_else(|| ReorderError::Resolution(format!("item {}", item)))?;
        let form = EditForm::open(record)?;
        state.form = Some(form.clone());
        Ok(form)
    }

    /// Close the form, discarding its draft; returns the draft if it had unsaved changes
    pub async fn close_edit_form(&self) -> Option<SideDraft> {
        let mut state = self.state.lock().await;
        if state.drag.active().is_some_and(|s| s.kind() == NodeKind::Side) {
            state.abort_session();
        }
        state.form.take().filter(EditForm::is_dirty).map(|form| form.draft())
    }

    /// Save the form's side order; returns the order the store kept
    pub async fn save_edit_form(&self) -> ReorderResult<Vec<SideName>> {
        let draft = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            if state.drag.active().is_some_and(|s| s.kind() == NodeKind::Side) {
                return Err(SessionError::AlreadyActive.into());
            }
            let form = state.form.as_ref().ok_or(ReorderError::NoEditForm)?;
            if !form.is_dirty() {
                return Ok(form.side_order());
            }
            let container = ContainerRef::Item(form.item().clone());
            if !state.in_flight.insert(container.clone()) {
                return Err(ReorderError::ContainerBusy(container));
            }
            form.draft()
        };

        let result = self.api.set_side_order(&draft.item, &draft.order).await;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.in_flight.remove(&ContainerRef::Item(draft.item.clone()));

        match result {
            Ok(stored) => {
                for model in [&mut state.provisional, &mut state.canonical] {
                    if let Some(record) = model.item_mut(&draft.item) {
                        record.side_order = Some(OrderedCollection::from_vec(stored.clone())?);
                    }
                }
                if let Some(form) = state.form.as_mut().filter(|f| *f.item() == draft.item) {
                    form.saved(stored.clone())?;
                }
                log::info!("Side order of {} saved: {:?}", draft.item, stored);
                Ok(stored)
            }
            Err(reason) => {
                // The draft stays in the form so the user can retry
                log::warn!("Saving side order of {} failed: {}", draft.item, reason);
                let error = ReorderError::Persistence(reason);
                state.notify(NoticeLevel::Error, error.to_string());
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::RecordingApi;
    use crate::models::CategoryId;
    use crate::store::fixtures::sample_snapshot;
    use menu_dragdrop::DropHint;

    fn item(id: &str) -> NodeRef {
        NodeRef::Item(id.to_string())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn editor() -> MenuEditor<RecordingApi> {
        editor_with(EditorConfig::default()).await
    }

    async fn editor_with(config: EditorConfig) -> MenuEditor<RecordingApi> {
        let api = Arc::new(RecordingApi::new(sample_snapshot()));
        MenuEditor::load(api, config).await.unwrap()
    }

    #[tokio::test]
    async fn test_reorder_within_category() {
        let editor = editor().await;
        editor.start_drag(item("Pizza")).await.unwrap();
        editor
            .drag_over(MenuDragOver::node(item("Burger"), DropHint::Before))
            .await
            .unwrap();
        let outcome = editor.end_drag(Some(MenuDragOver::node(item("Burger"), DropHint::Before))).await.unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Saved(vec![PersistCall::SetItemOrder {
                category: "mains".into(),
                items: names(&["Pizza", "Burger"]),
            }])
        );
        assert_eq!(editor.api().calls().len(), 1);
        let canonical = editor.canonical().await;
        assert_eq!(canonical.item_ids(&"mains".into()).unwrap(), names(&["Pizza", "Burger"]));
        assert_eq!(canonical, editor.model().await);
        assert!(editor.in_flight().await.is_empty());
    }

    #[tokio::test]
    async fn test_move_into_other_category() {
        let editor = editor().await;
        editor.start_drag(item("Burger")).await.unwrap();
        let t = editor
            .drag_over(MenuDragOver::node(item("Fries"), DropHint::After))
            .await
            .unwrap();
        assert!(matches!(t, Transition::Transferred { .. }));

        editor.end_drag(Some(MenuDragOver::node(item("Fries"), DropHint::After))).await.unwrap();

        assert_eq!(
            editor.api().calls(),
            vec![
                PersistCall::SetItemCategory { item: "Burger".into(), category: "sides".into() },
                PersistCall::SetItemOrder { category: "sides".into(), items: names(&["Fries", "Burger"]) },
            ]
        );
        let canonical = editor.canonical().await;
        assert_eq!(canonical.item_ids(&"mains".into()).unwrap(), names(&["Pizza"]));
        assert_eq!(canonical.item(&"Burger".into()).unwrap().category, "sides");
        assert!(canonical.check_invariants().is_ok());
    }

    #[tokio::test]
    async fn test_failed_order_call_refetches() {
        let editor = editor().await;
        editor.api().fail_on("set_item_order");
        let fetches = editor.api().fetch_count();

        editor.start_drag(item("Burger")).await.unwrap();
        editor.drag_over(MenuDragOver::node(item("Fries"), DropHint::After)).await.unwrap();
        let err = editor.end_drag(Some(MenuDragOver::node(item("Fries"), DropHint::After))).await.unwrap_err();

        assert!(matches!(err, ReorderError::PartialTransfer { .. }));
        // Membership went through, nothing after the failure was attempted
        assert_eq!(editor.api().calls().len(), 1);
        assert_eq!(editor.api().fetch_count(), fetches + 1);

        // Models now mirror the store: Burger appended to sides
        let model = editor.model().await;
        assert_eq!(model.item_ids(&"sides".into()).unwrap(), names(&["Fries", "Burger"]));
        assert_eq!(model, editor.canonical().await);

        let notices = editor.take_notices().await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(editor.take_notices().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_membership_call_stops_sequence() {
        let editor = editor().await;
        editor.api().fail_on("set_item_category");

        editor.start_drag(item("Burger")).await.unwrap();
        editor.drag_over(MenuDragOver::node(item("Fries"), DropHint::After)).await.unwrap();
        let err = editor.end_drag(Some(MenuDragOver::node(item("Fries"), DropHint::After))).await.unwrap_err();

        assert!(matches!(err, ReorderError::Persistence(_)));
        assert!(editor.api().calls().is_empty());
        let model = editor.model().await;
        assert_eq!(model.item_ids(&"mains".into()).unwrap(), names(&["Burger", "Pizza"]));
        assert_eq!(editor.take_notices().await[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_drop_outside_restores_without_calls() {
        let editor = editor().await;
        let before = editor.canonical().await;

        editor.start_drag(item("Burger")).await.unwrap();
        editor.drag_over(MenuDragOver::node(item("Fries"), DropHint::After)).await.unwrap();
        assert_ne!(editor.model().await, before);

        assert_eq!(editor.end_drag(None).await.unwrap(), DropOutcome::Abandoned);
        assert!(editor.api().calls().is_empty());
        assert_eq!(editor.model().await, before);
        assert_eq!(editor.canonical().await, before);
        assert!(editor.session().await.is_none());
    }

    #[tokio::test]
    async fn test_abandon_can_refetch() {
        let config = EditorConfig { refetch_on_abandon: true, ..EditorConfig::default() };
        let editor = editor_with(config).await;
        let fetches = editor.api().fetch_count();

        editor.start_drag(item("Pizza")).await.unwrap();
        editor.drag_over(MenuDragOver::node(item("Burger"), DropHint::Before)).await.unwrap();
        editor.abort_drag().await.unwrap();

        assert_eq!(editor.api().fetch_count(), fetches + 1);
        assert_eq!(editor.model().await, editor.canonical().await);
        assert!(editor.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_session() {
        let editor = editor().await;
        editor.start_drag(item("Burger")).await.unwrap();
        assert_eq!(
            editor.start_drag(item("Pizza")).await,
            Err(ReorderError::Session(SessionError::AlreadyActive))
        );
        assert_eq!(editor.end_drag(None).await.unwrap(), DropOutcome::Abandoned);
        assert_eq!(editor.end_drag(None).await, Err(ReorderError::NoSession));
    }

    #[tokio::test]
    async fn test_vanished_target_aborts_and_refetches() {
        let editor = editor().await;
        let fetches = editor.api().fetch_count();
        editor.start_drag(item("Burger")).await.unwrap();

        let err = editor
            .drag_over(MenuDragOver::node(item("Ghost"), DropHint::After))
            .await
            .unwrap_err();
        assert!(matches!(err, ReorderError::Resolution(_)));
        assert!(editor.session().await.is_none());
        assert_eq!(editor.api().fetch_count(), fetches + 1);
    }

    #[tokio::test]
    async fn test_session_refused_while_container_saving() {
        let (api, gate) = RecordingApi::gated(sample_snapshot());
        let editor = MenuEditor::load(Arc::new(api), EditorConfig::default()).await.unwrap();

        editor.start_drag(item("Pizza")).await.unwrap();
        editor.drag_over(MenuDragOver::node(item("Burger"), DropHint::Before)).await.unwrap();
        let pending = {
            let editor = editor.clone();
            tokio::spawn(async move {
                editor.end_drag(Some(MenuDragOver::node(item("Burger"), DropHint::Before))).await
            })
        };

        // Wait until the commit has marked its container
        while editor.in_flight().await.is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            editor.start_drag(item("Burger")).await,
            Err(ReorderError::ContainerBusy(ContainerRef::Category("mains".into())))
        );

        // Other containers stay usable, but cannot receive items from elsewhere
        editor.start_drag(item("Fries")).await.unwrap();
        let t = editor
            .drag_over(MenuDragOver::node(item("Pizza"), DropHint::Before))
            .await
            .unwrap();
        assert_eq!(t, Transition::Ignored);
        assert_eq!(editor.end_drag(None).await.unwrap(), DropOutcome::Abandoned);

        gate.add_permits(1);
        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, DropOutcome::Saved(_)));
        assert!(editor.in_flight().await.is_empty());
        assert!(editor.start_drag(item("Burger")).await.is_ok());
    }

    #[tokio::test]
    async fn test_reload_during_save_keeps_pending_order() {
        let (api, gate) = RecordingApi::gated(sample_snapshot());
        let editor = MenuEditor::load(Arc::new(api), EditorConfig::default()).await.unwrap();

        editor.start_drag(item("Pizza")).await.unwrap();
        editor.drag_over(MenuDragOver::node(item("Burger"), DropHint::Before)).await.unwrap();
        let pending = {
            let editor = editor.clone();
            tokio::spawn(async move {
                editor.end_drag(Some(MenuDragOver::node(item("Burger"), DropHint::Before))).await
            })
        };
        while editor.in_flight().await.is_empty() {
            tokio::task::yield_now().await;
        }

        // The store still holds the old order while the write is held back
        editor.refresh().await.unwrap();
        let mains: CategoryId = "mains".into();
        assert_eq!(editor.model().await.item_ids(&mains).unwrap(), names(&["Pizza", "Burger"]));

        gate.add_permits(1);
        assert!(matches!(pending.await.unwrap().unwrap(), DropOutcome::Saved(_)));

        let store = editor.api().menu().categories["mains"]
            .iter()
            .map(|i| i.name.clone())
            .collect::<Vec<_>>();
        assert_eq!(store, names(&["Pizza", "Burger"]));
        assert_eq!(editor.canonical().await.item_ids(&mains).unwrap(), store);
        assert_eq!(editor.model().await, editor.canonical().await);
    }

    #[tokio::test]
    async fn test_category_reorder() {
        let editor = editor().await;
        let sides = NodeRef::Category("sides".into());
        editor.start_drag(sides).await.unwrap();
        let target = MenuDragOver::node(NodeRef::Category("mains".into()), DropHint::Before);
        editor.drag_over(target.clone()).await.unwrap();
        editor.end_drag(Some(target)).await.unwrap();

        assert_eq!(
            editor.api().calls(),
            vec![PersistCall::SetCategoryOrder(names(&["sides", "mains"]))]
        );
        assert_eq!(editor.api().menu().category_order, names(&["sides", "mains"]));
    }

    #[tokio::test]
    async fn test_failed_category_order_refetches() {
        let editor = editor().await;
        editor.api().fail_on("set_category_order");
        let fetches = editor.api().fetch_count();

        editor.start_drag(NodeRef::Category("sides".into())).await.unwrap();
        let target = MenuDragOver::node(NodeRef::Category("mains".into()), DropHint::Before);
        editor.drag_over(target.clone()).await.unwrap();
        let err = editor.end_drag(Some(target)).await.unwrap_err();

        assert!(matches!(err, ReorderError::Persistence(_)));
        assert!(editor.api().calls().is_empty());
        assert_eq!(editor.api().fetch_count(), fetches + 1);
        let model = editor.model().await;
        assert_eq!(model.category_order().ids_in_order(), names(&["mains", "sides"]));
        assert_eq!(model, editor.canonical().await);
        assert!(editor.in_flight().await.is_empty());

        let notices = editor.take_notices().await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_category_drop_outside_restores_order() {
        let editor = editor().await;
        let fetches = editor.api().fetch_count();

        editor.start_drag(NodeRef::Category("sides".into())).await.unwrap();
        editor
            .drag_over(MenuDragOver::node(NodeRef::Category("mains".into()), DropHint::Before))
            .await
            .unwrap();
        assert_eq!(editor.model().await.category_order().ids_in_order(), names(&["sides", "mains"]));

        assert_eq!(editor.end_drag(None).await.unwrap(), DropOutcome::Abandoned);
        assert!(editor.api().calls().is_empty());
        assert_eq!(editor.api().fetch_count(), fetches);
        assert_eq!(editor.model().await.category_order().ids_in_order(), names(&["mains", "sides"]));
        assert_eq!(editor.model().await, editor.canonical().await);
    }

    #[tokio::test]
    async fn test_side_drop_outside_restores_form_without_reload() {
        let config = EditorConfig { refetch_on_abandon: true, ..EditorConfig::default() };
        let editor = editor_with(config).await;
        let fetches = editor.api().fetch_count();

        editor.open_edit_form("Burger").await.unwrap();
        editor.start_drag(NodeRef::side("Burger", "chips")).await.unwrap();
        editor
            .drag_over(MenuDragOver::node(NodeRef::side("Burger", "salad"), DropHint::After))
            .await
            .unwrap();
        assert_eq!(editor.edit_form().await.unwrap().side_order(), names(&["salad", "chips", "none"]));

        assert_eq!(editor.end_drag(None).await.unwrap(), DropOutcome::Abandoned);
        assert_eq!(editor.api().fetch_count(), fetches);
        assert!(editor.api().side_saves().is_empty());
        let form = editor.edit_form().await.unwrap();
        assert_eq!(form.side_order(), names(&["chips", "salad", "none"]));
        assert!(editor.session().await.is_none());
    }

    #[tokio::test]
    async fn test_side_drag_needs_form_and_saves_with_it() {
        let editor = editor().await;
        let chips = NodeRef::side("Burger", "chips");
        assert_eq!(
            editor.start_drag(chips.clone()).await,
            Err(ReorderError::NotEditing("Burger".into()))
        );

        editor.open_edit_form("Burger").await.unwrap();
        editor.start_drag(chips).await.unwrap();
        let target = MenuDragOver::node(NodeRef::side("Burger", "salad"), DropHint::After);
        editor.drag_over(target.clone()).await.unwrap();
        let outcome = editor.end_drag(Some(target)).await.unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Drafted(SideDraft { item: "Burger".into(), order: names(&["salad", "chips", "none"]) })
        );
        assert!(editor.api().calls().is_empty());
        assert_eq!(
            editor.model().await.item(&"Burger".into()).unwrap().ordered_sides(),
            names(&["chips", "salad", "none"])
        );

        let stored = editor.save_edit_form().await.unwrap();
        assert_eq!(stored, names(&["salad", "chips", "none"]));
        assert_eq!(editor.api().side_saves().len(), 1);
        assert_eq!(
            editor.canonical().await.item(&"Burger".into()).unwrap().ordered_sides(),
            stored
        );
        assert!(!editor.edit_form().await.unwrap().is_dirty());
    }

    #[tokio::test]
    async fn test_failed_side_save_keeps_draft() {
        let editor = editor().await;
        editor.api().fail_on("set_side_order");
        editor.open_edit_form("Burger").await.unwrap();
        editor.start_drag(NodeRef::side("Burger", "salad")).await.unwrap();
        let target = MenuDragOver::node(NodeRef::side("Burger", "chips"), DropHint::Before);
        editor.drag_over(target.clone()).await.unwrap();
        editor.end_drag(Some(target)).await.unwrap();

        assert!(matches!(editor.save_edit_form().await, Err(ReorderError::Persistence(_))));
        let form = editor.edit_form().await.unwrap();
        assert!(form.is_dirty());
        assert_eq!(form.side_order(), names(&["salad", "chips", "none"]));

        editor.api().succeed();
        assert!(editor.save_edit_form().await.is_ok());
        assert!(editor.close_edit_form().await.is_none());
    }

    #[tokio::test]
    async fn test_close_form_discards_draft() {
        let editor = editor().await;
        editor.open_edit_form("Burger").await.unwrap();
        editor.start_drag(NodeRef::side("Burger", "none")).await.unwrap();
        editor
            .drag_over(MenuDragOver::node(NodeRef::side("Burger", "chips"), DropHint::Before))
            .await
            .unwrap();

        let draft = editor.close_edit_form().await.unwrap();
        assert_eq!(draft.order, names(&["none", "chips", "salad"]));
        assert!(editor.session().await.is_none());
        assert!(editor.edit_form().await.is_none());
    }
}
