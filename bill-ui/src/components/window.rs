use gpui::{
    App, Context, Entity, IntoElement, ParentElement, Render, Styled, Subscription, Window, div,
};
use gpui_component::StyledExt;
use tracing::info;

use crate::{
    Quit,
    components::{Navigate, WaterBillScreen},
    quit,
};

pub struct AppWindow {
    screen: Entity<WaterBillScreen>,
    _subscriptions: Vec<Subscription>,
}

impl AppWindow {
    pub fn new(
        screen: Entity<WaterBillScreen>,
        cx: &mut Context<Self>,
    ) -> Self {
        let window_closed = cx.on_window_closed(|cx: &mut App| {
            info!("Window closed callback");
            quit(&Quit, cx);
        });

        // Other screens are not part of this app; the request is only recorded.
        let navigation = cx.subscribe(
            &screen,
            |_this, _screen, event: &Navigate, _cx| {
                info!(route = %event.0, "navigation requested");
            },
        );

        info!("Window constructed");
        Self {
            screen,
            _subscriptions: vec![window_closed, navigation],
        }
    }
}

impl Render for AppWindow {
    fn render(
        &mut self,
        _: &mut Window,
        _cx: &mut Context<Self>,
    ) -> impl IntoElement {
        div()
            .v_flex()
            .size_full()
            .items_center()
            .child(self.screen.clone())
    }
}
