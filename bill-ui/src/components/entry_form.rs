use bill_core::{BillField, BillFields};
use gpui::{
    App, AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled,
    Window,
};
use gpui_component::{
    input::{Input, InputState, MaskPattern},
    v_flex,
};

use crate::components::make_labeled_row;

/// The three editable inputs of the entry form.
pub struct BillEntryForm {
    usage: Entity<InputState>,
    amount: Entity<InputState>,
    date: Entity<InputState>,
}

impl BillEntryForm {
    pub fn new(
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let usage = make_input_state(BillField::Usage, None, window, cx);
        let amount = make_input_state(
            BillField::Amount,
            Some(MaskPattern::Number {
                separator: Some(','),
                fraction: Some(2),
            }),
            window,
            cx,
        );
        let date = make_input_state(BillField::Date, None, window, cx);

        Self {
            usage,
            amount,
            date,
        }
    }

    fn input(
        &self,
        field: BillField,
    ) -> &Entity<InputState> {
        match field {
            BillField::Usage => &self.usage,
            BillField::Amount => &self.amount,
            BillField::Date => &self.date,
        }
    }

    /// Collects what is currently typed into the inputs.
    pub fn to_fields(
        &self,
        cx: &App,
    ) -> BillFields {
        let mut fields = BillFields::default();
        for field in BillField::ALL {
            fields.set(field, self.input(field).read(cx).value().as_str());
        }
        fields
    }

    /// Overwrites every input with `fields`.
    pub fn fill(
        &mut self,
        fields: &BillFields,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        for field in BillField::ALL {
            let value = SharedString::from(fields.get(field).to_string());
            self.input(field).update(cx, |state, cx| {
                state.set_value(value, window, cx);
            });
        }
        cx.notify();
    }
}

impl Render for BillEntryForm {
    fn render(
        &mut self,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> impl IntoElement {
        v_flex()
            .gap_2()
            .w_full()
            .children(BillField::ALL.into_iter().map(|field| {
                make_labeled_row(field.label()).child(Input::new(self.input(field)).flex_grow())
            }))
    }
}

fn make_input_state(
    field: BillField,
    mask: Option<MaskPattern>,
    window: &mut Window,
    cx: &mut Context<BillEntryForm>,
) -> Entity<InputState> {
    cx.new(|input_cx| {
        let state = InputState::new(window, input_cx).placeholder(field.placeholder());
        match mask {
            Some(pattern) => state.mask_pattern(pattern),
            None => state,
        }
    })
}
