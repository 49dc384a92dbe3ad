use std::{cell::RefCell, rc::Rc};

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::list::ListItem;
use gpui_component::{Icon, IconName, Sizable as _, h_flex, v_flex};
use gpui_dnd_list::{DndListRowState, DndListState, dnd_list};
use tracing::info;

const MAX_LOG_LINES: usize = 12;

/// A demo row; the number of detail lines gives every row its own height.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub title: SharedString,
    pub details: usize,
}

impl Card {
    fn new(title: impl Into<SharedString>, details: usize) -> Self {
        Self {
            title: title.into(),
            details,
        }
    }
}

pub struct DndListExample {
    list: Entity<DndListState<Card>>,
    log: Rc<RefCell<Vec<String>>>,
    _subscription: Subscription,
}

impl DndListExample {
    pub fn view(_window: &mut Window, cx: &mut App) -> Entity<Self> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let list = cx.new(|cx| {
            let start_log = Rc::clone(&log);
            let drop_log = Rc::clone(&log);
            DndListState::new(cx)
                .items(demo_items())
                .drag_on_row()
                .on_drag_start(move |start| {
                    push_line(
                        &start_log,
                        format!("picked {} at {}", start.item.title, start.original_index),
                    );
                })
                .on_drop(move |drop| {
                    info!(
                        from = drop.original_index,
                        to = drop.new_index,
                        order = ?drop.items.iter().map(|card| card.title.as_ref()).collect::<Vec<_>>(),
                        "story list reordered"
                    );
                    push_line(
                        &drop_log,
                        format!(
                            "dropped {} -> {} (delta {})",
                            drop.original_index,
                            drop.new_index,
                            drop.index_delta()
                        ),
                    );
                })
        });

        cx.new(|cx| {
            let _subscription = cx.observe(&list, |_, _, cx| cx.notify());
            Self {
                list,
                log,
                _subscription,
            }
        })
    }
}

fn push_line(log: &RefCell<Vec<String>>, line: String) {
    let mut log = log.borrow_mut();
    log.push(line);
    if log.len() > MAX_LOG_LINES {
        let excess = log.len() - MAX_LOG_LINES;
        log.drain(..excess);
    }
}

impl Render for DndListExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let items = self.list.read(cx).items_ref();
        let target = self
            .list
            .read(cx)
            .session()
            .target_index()
            .map(|ix| ix.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        let dump = items
            .iter()
            .enumerate()
            .map(|(ix, item)| format!("{ix:02}  {}", item.title))
            .chain(std::iter::once(String::new()))
            .chain(self.log.borrow().iter().cloned())
            .collect::<Vec<_>>()
            .join("\n");

        v_flex()
            .size_full()
            .p(px(16.))
            .gap_y_3()
            .child(
                v_flex()
                    .gap_y_1()
                    .child(
                        div()
                            .text_xl()
                            .font_weight(FontWeight::BOLD)
                            .child("DnD List"),
                    )
                    .child(div().text_sm().text_color(theme.muted_foreground).child(
                        "Drag a row up or down; it swaps with a neighbour once it has crossed half of it. Press Escape to cancel.",
                    ))
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child(format!("Drop target: {target}")),
                    ),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h(px(0.))
                    .gap_x_3()
                    .child(
                        v_flex()
                            .w(px(420.))
                            .min_w(px(0.))
                            .h_full()
                            .gap_y_2()
                            .child(
                                div()
                                    .text_sm()
                                    .font_weight(FontWeight::MEDIUM)
                                    .child("List"),
                            )
                            .child(
                                div()
                                    .flex_1()
                                    .min_h(px(0.))
                                    .rounded(px(12.))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(theme.background)
                                    .child(dnd_list(
                                        &self.list,
                                        move |ix, item, row_state, _window, cx| {
                                            render_list_row(ix, item, row_state, cx)
                                        },
                                    )),
                            ),
                    )
                    .child(
                        v_flex()
                            .flex_1()
                            .min_w(px(0.))
                            .h_full()
                            .gap_y_2()
                            .child(
                                div()
                                    .text_sm()
                                    .font_weight(FontWeight::MEDIUM)
                                    .child("Debug (order and events)"),
                            )
                            .child(
                                div()
                                    .flex_1()
                                    .min_h(px(0.))
                                    .rounded(px(12.))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(theme.background)
                                    .p(px(12.))
                                    .child(render_dump(dump)),
                            ),
                    ),
            )
    }
}

fn render_list_row(ix: usize, item: &Card, row_state: DndListRowState, cx: &mut App) -> ListItem {
    let theme = cx.theme();

    ListItem::new(ix)
        .when(row_state.active, |this| this.bg(theme.popover))
        .child(
            v_flex()
                .gap_y_1()
                .child(
                    h_flex()
                        .gap_x_2()
                        .items_center()
                        .child(
                            Icon::from(IconName::Menu)
                                .small()
                                .text_color(theme.muted_foreground),
                        )
                        .child(item.title.clone()),
                )
                .children((0..item.details).map(|line| {
                    div()
                        .pl(px(24.))
                        .text_xs()
                        .text_color(theme.muted_foreground)
                        .child(format!("detail line {}", line + 1))
                })),
        )
}

fn render_dump(text: String) -> impl IntoElement {
    let lines = text
        .lines()
        .map(|line| div().text_sm().child(line.to_string()));
    v_flex().gap_y_0p5().children(lines)
}

fn demo_items() -> Vec<Card> {
    vec![
        Card::new("Inbox", 0),
        Card::new("Write release notes", 2),
        Card::new("Review layout fix", 1),
        Card::new("Triage", 0),
        Card::new("Plan sprint", 3),
        Card::new("Update dependencies", 1),
    ]
}
