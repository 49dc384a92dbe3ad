use std::{cell::RefCell, rc::Rc};

use gpui::{
    AnyElement, App, AppContext as _, Context, CursorStyle, DispatchPhase, ElementId, Entity,
    FocusHandle, InteractiveElement as _, IntoElement, KeyDownEvent, MouseButton, MouseDownEvent,
    MouseMoveEvent, MouseUpEvent, ParentElement as _, Pixels, Render, RenderOnce, StyleRefinement,
    Styled, Window, canvas, deferred, div, prelude::FluentBuilder as _, px,
};
use gpui_component::list::ListItem;
use gpui_component::{ActiveTheme as _, StyledExt as _, v_flex};
use gpui_dnd_core::{DndError, DragSession, DragStart, DropResult, MeasureTicket, PointerSample};
use tracing::{debug, warn};

const CONTEXT: &str = "DndList";

type RenderItem<T> = Rc<dyn Fn(usize, &T, DndListRowState, &mut Window, &mut App) -> ListItem>;

/// Create a [`DndList`].
pub fn dnd_list<T, R>(state: &Entity<DndListState<T>>, render_item: R) -> DndList<T>
where
    T: Clone + 'static,
    R: Fn(usize, &T, DndListRowState, &mut Window, &mut App) -> ListItem + 'static,
{
    DndList::new(state, render_item)
}

/// What a row needs to know to style itself during a drag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DndListRowState {
    /// The row is the one being dragged and is painted above its siblings.
    pub active: bool,
    /// Vertical offset applied to the row.
    pub offset: Pixels,
}

struct DndListStateCallbacks<T> {
    on_drag_start: Option<Rc<dyn Fn(&DragStart<T>)>>,
    on_drop: Option<Rc<dyn Fn(&DropResult<T>)>>,
}

impl<T> Default for DndListStateCallbacks<T> {
    fn default() -> Self {
        Self {
            on_drag_start: None,
            on_drop: None,
        }
    }
}

/// State for a list that is reordered by dragging rows vertically.
///
/// Rows may have different heights. Heights are read from the last prepaint
/// when a drag starts, and siblings slide out of the way while the dragged
/// row follows the pointer.
pub struct DndListState<T> {
    focus_handle: FocusHandle,
    items: Vec<T>,
    session: DragSession,
    row_heights: Rc<RefCell<Option<Vec<Pixels>>>>,
    drag_handle_width: Option<Pixels>,
    apply_drop: bool,
    callbacks: DndListStateCallbacks<T>,
    render_item: RenderItem<T>,
}

impl<T: Clone + 'static> DndListState<T> {
    pub fn new(cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            items: Vec::new(),
            session: DragSession::new(),
            row_heights: Rc::new(RefCell::new(None)),
            drag_handle_width: Some(px(32.)),
            apply_drop: true,
            callbacks: DndListStateCallbacks::default(),
            render_item: Rc::new(|_, _, _, _, _| ListItem::new("dnd-list-empty")),
        }
    }

    pub fn items(mut self, items: impl Into<Vec<T>>) -> Self {
        self.items = items.into();
        self
    }

    /// Restrict drag start to a left-side handle area with the given width.
    pub fn drag_handle_width(mut self, width: Pixels) -> Self {
        self.drag_handle_width = Some(width);
        self
    }

    /// Allow dragging from anywhere on the row.
    pub fn drag_on_row(mut self) -> Self {
        self.drag_handle_width = None;
        self
    }

    /// Whether a drop replaces the list's own items with the reordered snapshot.
    ///
    /// Disable this when the items are owned elsewhere and pushed back through
    /// [`DndListState::set_items`] from the drop callback.
    pub fn apply_drop(mut self, apply_drop: bool) -> Self {
        self.apply_drop = apply_drop;
        self
    }

    /// Provide a callback invoked when a row is picked up.
    pub fn on_drag_start(mut self, on_drag_start: impl Fn(&DragStart<T>) + 'static) -> Self {
        self.callbacks.on_drag_start = Some(Rc::new(on_drag_start));
        self
    }

    /// Provide a callback invoked once per released drag.
    ///
    /// The drop carries the whole list with the move applied.
    pub fn on_drop(mut self, on_drop: impl Fn(&DropResult<T>) + 'static) -> Self {
        self.callbacks.on_drop = Some(Rc::new(on_drop));
        self
    }

    /// Replace the items. An active drag is cancelled, since its measured
    /// heights no longer line up with the list.
    pub fn set_items(&mut self, items: impl Into<Vec<T>>, cx: &mut Context<Self>) {
        self.items = items.into();
        self.session.cancel();
        cx.notify();
    }

    pub fn items_ref(&self) -> &[T] {
        &self.items
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Abandon the active drag, if any, without reordering.
    pub fn cancel_drag(&mut self, cx: &mut Context<Self>) {
        if self.session.cancel() {
            cx.notify();
        }
    }

    fn measured_heights(&self) -> Result<Vec<f32>, DndError> {
        self.row_heights
            .borrow()
            .as_ref()
            .map(|heights| heights.iter().copied().map(f32::from).collect())
            .ok_or(DndError::NotMounted)
    }

    fn on_row_mouse_down(
        &mut self,
        ix: usize,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let sample = PointerSample::mouse(f32::from(event.position.y));
        let Some(ticket) = self.begin_drag(ix, sample, cx) else {
            return;
        };

        window.focus(&self.focus_handle);
        self.request_heights(ticket, window, cx);
    }

    fn begin_drag(
        &mut self,
        ix: usize,
        sample: PointerSample,
        cx: &mut Context<Self>,
    ) -> Option<MeasureTicket> {
        let ticket = match self.session.start_at(ix, self.items.len(), sample) {
            Ok(ticket) => ticket?,
            Err(err) => {
                warn!(%err, ix, "cannot start drag");
                return None;
            }
        };
        cx.notify();

        if let Some(on_drag_start) = self.callbacks.on_drag_start.as_ref() {
            on_drag_start(&DragStart {
                item: self.items[ix].clone(),
                original_index: ix,
            });
        }
        Some(ticket)
    }

    /// Heights are read on the next tick; until then the drag resolves in place.
    fn request_heights(&mut self, ticket: MeasureTicket, window: &mut Window, cx: &mut Context<Self>) {
        cx.spawn_in(window, async move |this, cx| {
            this.update(cx, |this, cx| this.apply_measured_heights(ticket, cx))
                .ok();
        })
        .detach();
    }

    fn apply_measured_heights(&mut self, ticket: MeasureTicket, cx: &mut Context<Self>) {
        let heights = self.measured_heights();
        if let Ok(true) = self.session.resolve_heights(ticket, heights) {
            cx.notify();
        }
    }

    fn on_drag_move(&mut self, event: &MouseMoveEvent, cx: &mut Context<Self>) {
        self.move_drag(PointerSample::mouse(f32::from(event.position.y)), cx);
    }

    fn move_drag(&mut self, sample: PointerSample, cx: &mut Context<Self>) {
        if self.session.update(sample) {
            cx.notify();
        }
    }

    fn on_drag_end(&mut self, event: &MouseUpEvent, cx: &mut Context<Self>) {
        self.finish_drag(PointerSample::mouse(f32::from(event.position.y)), cx);
    }

    fn finish_drag(&mut self, sample: PointerSample, cx: &mut Context<Self>) {
        let Some(drop) = self.session.end(&self.items, sample) else {
            return;
        };

        debug!(
            from = drop.original_index,
            to = drop.new_index,
            "dnd list drop"
        );
        if self.apply_drop && !drop.is_noop() {
            self.items = drop.items.clone();
        }
        cx.notify();

        if let Some(on_drop) = self.callbacks.on_drop.as_ref() {
            on_drop(&drop);
        }
    }
}

/// Window-level mouse listeners, so the drag keeps tracking once the
/// pointer leaves the list.
fn drag_listener<T: Clone + 'static>(state: Entity<DndListState<T>>) -> impl IntoElement {
    canvas(
        |_, _, _| {},
        move |_, _, window, _| {
            window.on_mouse_event({
                let state = state.clone();
                move |event: &MouseMoveEvent, phase, _window, cx| {
                    if phase != DispatchPhase::Bubble {
                        return;
                    }
                    state.update(cx, |this, cx| this.on_drag_move(event, cx));
                }
            });

            window.on_mouse_event(move |event: &MouseUpEvent, phase, _window, cx| {
                if phase != DispatchPhase::Bubble || event.button != MouseButton::Left {
                    return;
                }
                state.update(cx, |this, cx| this.on_drag_end(event, cx));
            });
        },
    )
    .absolute()
    .size_full()
}

impl<T: Clone + 'static> Render for DndListState<T> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let render_item = Rc::clone(&self.render_item);
        let row_heights = Rc::clone(&self.row_heights);
        let drag_handle_width = self.drag_handle_width;
        let drag_border = cx.theme().drag_border;
        let offsets = self.session.offsets(self.items.len());

        let mut rows: Vec<AnyElement> = Vec::with_capacity(self.items.len());
        for (ix, offset) in offsets.into_iter().enumerate() {
            let row_state = DndListRowState {
                active: offset.active,
                offset: px(offset.offset),
            };
            let list_item = (render_item)(ix, &self.items[ix], row_state, window, cx);

            let on_mouse_down = cx.listener(move |this, event: &MouseDownEvent, window, cx| {
                this.on_row_mouse_down(ix, event, window, cx);
            });

            let row = div()
                .id(ix)
                .relative()
                .top(row_state.offset)
                .child(list_item.selected(row_state.active))
                .when(row_state.active, |this| {
                    this.shadow_md().border_1().border_color(drag_border)
                })
                .map(|this| match drag_handle_width {
                    Some(handle_width) => this.child(
                        div()
                            .id(("dnd-list-handle", ix))
                            .absolute()
                            .top_0()
                            .left_0()
                            .bottom_0()
                            .w(handle_width)
                            .cursor(CursorStyle::OpenHand)
                            .on_mouse_down(MouseButton::Left, on_mouse_down),
                    ),
                    None => this
                        .cursor(CursorStyle::OpenHand)
                        .on_mouse_down(MouseButton::Left, on_mouse_down),
                });

            rows.push(if row_state.active {
                deferred(row).with_priority(1).into_any_element()
            } else {
                row.into_any_element()
            });
        }

        div()
            .id("dnd-list-state")
            .size_full()
            .relative()
            .child(
                v_flex()
                    .w_full()
                    .on_children_prepainted(move |bounds, _window, _cx| {
                        *row_heights.borrow_mut() =
                            Some(bounds.iter().map(|bounds| bounds.size.height).collect());
                    })
                    .children(rows),
            )
            .when(self.session.is_active(), |this| {
                this.child(drag_listener(cx.entity()))
            })
    }
}

/// A vertically reorderable list element.
#[derive(IntoElement)]
pub struct DndList<T: Clone + 'static> {
    id: ElementId,
    state: Entity<DndListState<T>>,
    style: StyleRefinement,
    render_item: RenderItem<T>,
}

impl<T: Clone + 'static> DndList<T> {
    pub fn new<R>(state: &Entity<DndListState<T>>, render_item: R) -> Self
    where
        R: Fn(usize, &T, DndListRowState, &mut Window, &mut App) -> ListItem + 'static,
    {
        Self {
            id: ElementId::Name(format!("dnd-list-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_item: Rc::new(render_item),
        }
    }
}

impl<T: Clone + 'static> Styled for DndList<T> {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl<T: Clone + 'static> RenderOnce for DndList<T> {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let focus_handle = self.state.read(cx).focus_handle.clone();
        self.state
            .update(cx, |state, _| state.render_item = self.render_item);

        div()
            .id(self.id)
            .key_context(CONTEXT)
            .track_focus(&focus_handle)
            .on_key_down({
                let state = self.state.clone();
                move |event: &KeyDownEvent, _window, cx| {
                    if event.keystroke.key == "escape" {
                        state.update(cx, |state, cx| state.cancel_drag(cx));
                    }
                }
            })
            .size_full()
            .child(self.state)
            .refine_style(&self.style)
    }
}

#[cfg(test)]
mod tests {
    use gpui::TestAppContext;
    use gpui_dnd_core::Heights;

    use super::*;

    fn list_state(
        cx: &mut TestAppContext,
        build: impl FnOnce(DndListState<&'static str>) -> DndListState<&'static str> + 'static,
    ) -> Entity<DndListState<&'static str>> {
        cx.update(|cx| cx.new(|cx| build(DndListState::new(cx).items(vec!["A", "B", "C", "D"]))))
    }

    fn heights(state: &Entity<DndListState<&'static str>>, cx: &mut TestAppContext) -> Heights {
        cx.update(|cx| {
            state
                .read(cx)
                .session()
                .gesture()
                .map(|gesture| gesture.heights().clone())
                .unwrap_or_default()
        })
    }

    #[gpui::test]
    fn drag_start_reports_item_and_index(cx: &mut TestAppContext) {
        let started = Rc::new(RefCell::new(Vec::new()));
        let list = list_state(cx, {
            let started = Rc::clone(&started);
            move |state| state.on_drag_start(move |start| started.borrow_mut().push(start.clone()))
        });

        cx.update(|cx| {
            list.update(cx, |state, cx| {
                assert!(state.begin_drag(2, PointerSample::mouse(40.), cx).is_some());
                assert!(state.begin_drag(0, PointerSample::mouse(0.), cx).is_none());
            })
        });

        assert_eq!(
            *started.borrow(),
            [DragStart {
                item: "C",
                original_index: 2,
            }]
        );
    }

    #[gpui::test]
    fn drag_before_first_paint_has_no_heights(cx: &mut TestAppContext) {
        let list = list_state(cx, |state| state);

        cx.update(|cx| {
            list.update(cx, |state, cx| {
                assert_eq!(state.measured_heights(), Err(DndError::NotMounted));
                let ticket = state
                    .begin_drag(1, PointerSample::mouse(100.), cx)
                    .expect("drag starts");
                state.apply_measured_heights(ticket, cx);
                state.move_drag(PointerSample::mouse(400.), cx);
                assert_eq!(state.session().target_index(), Some(1));
            })
        });

        assert_eq!(heights(&list, cx), Heights::Failed);
    }

    #[gpui::test]
    fn drop_replaces_items_only_on_real_move(cx: &mut TestAppContext) {
        let drops = Rc::new(RefCell::new(Vec::new()));
        let list = list_state(cx, {
            let drops = Rc::clone(&drops);
            move |state| state.on_drop(move |drop| drops.borrow_mut().push(drop.new_index))
        });

        cx.update(|cx| {
            list.update(cx, |state, cx| {
                *state.row_heights.borrow_mut() = Some(vec![px(100.); 4]);

                let ticket = state
                    .begin_drag(1, PointerSample::mouse(100.), cx)
                    .expect("drag starts");
                state.apply_measured_heights(ticket, cx);
                state.move_drag(PointerSample::mouse(240.), cx);
                state.finish_drag(PointerSample::mouse(240.), cx);
                assert_eq!(state.items_ref(), ["A", "C", "B", "D"]);
                assert!(!state.session().is_active());

                let ticket = state
                    .begin_drag(0, PointerSample::mouse(0.), cx)
                    .expect("drag starts");
                state.apply_measured_heights(ticket, cx);
                state.finish_drag(PointerSample::mouse(10.), cx);
                assert_eq!(state.items_ref(), ["A", "C", "B", "D"]);
            })
        });

        assert_eq!(*drops.borrow(), [2, 0]);
    }

    #[gpui::test]
    fn drop_leaves_items_alone_when_not_applied(cx: &mut TestAppContext) {
        let list = list_state(cx, |state| state.apply_drop(false));

        cx.update(|cx| {
            list.update(cx, |state, cx| {
                *state.row_heights.borrow_mut() = Some(vec![px(50.); 4]);
                let ticket = state
                    .begin_drag(3, PointerSample::mouse(200.), cx)
                    .expect("drag starts");
                state.apply_measured_heights(ticket, cx);
                state.finish_drag(PointerSample::mouse(0.), cx);
                assert_eq!(state.items_ref(), ["A", "B", "C", "D"]);
            })
        });
    }
}
