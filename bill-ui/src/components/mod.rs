pub mod entry_form;
pub mod water_bill_screen;
pub mod window;

use gpui::{
    App, ClickEvent, Div, ParentElement, Pixels, SharedString, Size, Styled, TextAlign, Window,
    div, px,
};
use gpui_component::{
    Sizable, h_flex,
    button::{Button, ButtonVariants},
};

pub use entry_form::BillEntryForm;
pub use water_bill_screen::{Navigate, WaterBillScreen};
pub use window::AppWindow;

#[derive(Debug, Clone, Copy)]
pub struct WindowPreferences {
    pub size: Size<Pixels>,
}

impl Default for WindowPreferences {
    fn default() -> Self {
        Self {
            size: Size {
                width: px(720.0),
                height: px(820.0),
            },
        }
    }
}

/// Creates a primary-styled button with a custom click handler.
pub fn make_button(
    id: impl Into<SharedString>,
    label: impl Into<SharedString>,
    on_click: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
) -> Button {
    Button::new(id.into())
        .primary()
        .large()
        .min_w(px(140.))
        .label(label.into())
        .on_click(on_click)
}

/// Creates an outlined button for secondary actions such as cancel.
pub fn make_outline_button(
    id: impl Into<SharedString>,
    label: impl Into<SharedString>,
    on_click: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
) -> Button {
    Button::new(id.into())
        .outline()
        .large()
        .min_w(px(140.))
        .label(label.into())
        .on_click(on_click)
}

/// Creates the common outer container and right-aligned label used by form rows.
pub fn make_labeled_row(label: impl Into<SharedString>) -> Div {
    h_flex()
        .items_center()
        .gap_5()
        .p(px(2.))
        .rounded_md()
        .border_1()
        .child(
            div()
                .min_w(px(150.))
                .text_align(TextAlign::Right)
                .child(label.into()),
        )
}
