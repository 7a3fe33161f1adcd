//! The water bill screen: scan prompt, entry form and success card.

use std::{path::PathBuf, sync::Arc, time::Duration};

use bill_core::{
    AppConfig, BillField, EntryFlow, FlowError, FollowUp, Route, SubmissionReceipt,
    SubmissionTicket, SubmitError, Submitter, View,
};
use gpui::{
    AppContext, ClickEvent, Context, Div, Entity, EventEmitter, FontWeight, Hsla, IntoElement,
    ParentElement, Render, SharedString, Styled, TextAlign, Window, div, px,
};
use gpui_component::{ActiveTheme, Disableable, h_flex, v_flex};
use tokio::{runtime::Handle, task::JoinError};
use tracing::{debug, info, warn};

use crate::{
    components::{BillEntryForm, make_button, make_outline_button},
    logging::log_task_error,
    scan::{pick_scan_file, read_scan},
};

const WATER_SAVING_TIP: &str = "Fix leaky faucets promptly! Even a slow drip can waste up to 20 gallons of water per day.";

/// Emitted when the user follows a link out of the success state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigate(pub Route);

type SubmitOutcome = Result<Result<SubmissionReceipt, SubmitError>, JoinError>;

pub struct WaterBillScreen {
    flow: EntryFlow,
    form: Entity<BillEntryForm>,
    submitter: Arc<dyn Submitter>,
    /// Runs the submission future; the screen awaits it from gpui's executor.
    runtime: Handle,
    success_window: Duration,
    scan_dir: PathBuf,
    toast: Option<FollowUp>,
    errors: Vec<SharedString>,
}

impl EventEmitter<Navigate> for WaterBillScreen {}

impl WaterBillScreen {
    pub fn new(
        config: &AppConfig,
        submitter: Arc<dyn Submitter>,
        runtime: Handle,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let form = cx.new(|form_cx| BillEntryForm::new(window, form_cx));

        Self {
            flow: EntryFlow::new(),
            form,
            submitter,
            runtime,
            success_window: config.submission.success_window(),
            scan_dir: std::env::current_dir().unwrap_or_default(),
            toast: None,
            errors: Vec::new(),
        }
    }

    fn show_errors(
        &mut self,
        errors: impl IntoIterator<Item = String>,
    ) {
        self.errors = errors.into_iter().map(SharedString::from).collect();
    }

    /// Pushes the flow's field values into the inputs.
    fn sync_form(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let fields = self.flow.fields().clone();
        self.form
            .update(cx, |form, form_cx| form.fill(&fields, window, form_cx));
    }

    fn start_scan(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let location = self.scan_dir.to_string_lossy().into_owned();

        cx.spawn_in(window, async move |this, cx| {
            let Some(path) = pick_scan_file(location).await else {
                debug!("scan dialog dismissed");
                return;
            };
            let result = this.update_in(cx, |this, window, cx| this.load_scan(path, window, cx));
            log_task_error("load scan", result);
        })
        .detach();
    }

    pub fn load_scan(
        &mut self,
        path: PathBuf,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if let Some(parent) = path.parent() {
            self.scan_dir = parent.to_path_buf();
        }

        match read_scan(&path) {
            Ok(text) => self.scan_completed(text, window, cx),
            Err(error) => {
                warn!(%error, "scan failed");
                self.show_errors([error.to_string()]);
                cx.notify();
            }
        }
    }

    /// Callback for a finished scan: fill the form from the recognised text.
    pub fn scan_completed(
        &mut self,
        text: String,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match self.flow.scan_completed(text) {
            Ok(_) => {
                self.errors.clear();
                self.sync_form(window, cx);
            }
            Err(error) => warn!(%error, "scan ignored"),
        }
        cx.notify();
    }

    /// Callback for the manual-entry request.
    fn manual_entry(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match self.flow.request_manual_entry() {
            Ok(()) => {
                self.errors.clear();
                self.sync_form(window, cx);
            }
            Err(error) => warn!(%error, "manual entry ignored"),
        }
        cx.notify();
    }

    fn cancel(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match self.flow.cancel() {
            Ok(()) => {
                self.errors.clear();
                self.sync_form(window, cx);
            }
            Err(error) => warn!(%error, "cancel ignored"),
        }
        cx.notify();
    }

    fn submit(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let typed = self.form.read(cx).to_fields(cx);
        for field in BillField::ALL {
            if let Err(error) = self.flow.set_field(field, typed.get(field)) {
                warn!(%error, "submit ignored");
                return;
            }
        }

        let ticket = match self.flow.begin_submit() {
            Ok(ticket) => ticket,
            Err(FlowError::Invalid(errors)) => {
                self.show_errors(errors.iter().map(ToString::to_string));
                cx.notify();
                return;
            }
            Err(error) => {
                warn!(%error, "submit ignored");
                return;
            }
        };
        self.errors.clear();
        cx.notify();

        let submitter = Arc::clone(&self.submitter);
        let bill = ticket.bill().clone();
        let job = self
            .runtime
            .spawn(async move { submitter.submit(&bill).await });
        let success_window = self.success_window;

        cx.spawn_in(window, async move |this, cx| {
            let outcome = job.await;
            match this.update_in(cx, |this, _, cx| this.submission_settled(&ticket, outcome, cx)) {
                Ok(true) => {}
                Ok(false) => return,
                Err(error) => {
                    log_task_error("submit bill", Err(error));
                    return;
                }
            }

            cx.background_executor().timer(success_window).await;
            let result = this.update_in(cx, |this, window, cx| {
                this.success_window_elapsed(&ticket, window, cx)
            });
            log_task_error("reset entry screen", result);
        })
        .detach();
    }

    /// Returns whether the success state is now showing.
    fn submission_settled(
        &mut self,
        ticket: &SubmissionTicket,
        outcome: SubmitOutcome,
        cx: &mut Context<Self>,
    ) -> bool {
        let receipt = match outcome {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(error)) => {
                self.submission_failed(ticket, error.to_string(), cx);
                return false;
            }
            Err(error) => {
                self.submission_failed(ticket, format!("submission task failed: {error}"), cx);
                return false;
            }
        };

        match self.flow.complete_submission(ticket, receipt) {
            Ok(()) => {
                self.toast = Some(receipt.follow_up);
                cx.notify();
                true
            }
            Err(error) => {
                debug!(%error, "submission result dropped");
                false
            }
        }
    }

    fn submission_failed(
        &mut self,
        ticket: &SubmissionTicket,
        message: String,
        cx: &mut Context<Self>,
    ) {
        warn!(ticket = ticket.id(), %message, "submission failed");
        if self.flow.abort_submission(ticket).is_ok() {
            self.show_errors([message]);
            cx.notify();
        }
    }

    fn success_window_elapsed(
        &mut self,
        ticket: &SubmissionTicket,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match self.flow.finish(ticket) {
            Ok(()) => {
                self.toast = None;
                self.sync_form(window, cx);
                cx.notify();
            }
            Err(error) => debug!(%error, "reset skipped"),
        }
    }

    fn navigate(
        &mut self,
        route: Route,
        cx: &mut Context<Self>,
    ) {
        info!(%route, "follow-up link clicked");
        self.toast = None;
        cx.emit(Navigate(route));
        cx.notify();
    }

    fn render_errors(
        &self,
        color: Hsla,
    ) -> Option<Div> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            v_flex()
                .gap_1()
                .text_sm()
                .text_color(color)
                .children(self.errors.iter().cloned()),
        )
    }

    fn render_toast(
        &self,
        cx: &mut Context<Self>,
    ) -> Option<Div> {
        let follow_up = self.toast?;
        let route = follow_up.route();

        Some(
            h_flex()
                .gap_4()
                .p_4()
                .items_center()
                .rounded_lg()
                .border_1()
                .border_color(cx.theme().border)
                .bg(cx.theme().secondary)
                .child(
                    v_flex()
                        .flex_1()
                        .gap_1()
                        .child(
                            div()
                                .font_weight(FontWeight::SEMIBOLD)
                                .child(follow_up.toast_title()),
                        )
                        .child(
                            div()
                                .text_sm()
                                .text_color(cx.theme().muted_foreground)
                                .child(follow_up.toast_description()),
                        ),
                )
                .child(make_outline_button(
                    "toast-action",
                    follow_up.toast_action_label(),
                    cx.listener(move |this, _: &ClickEvent, _, cx| this.navigate(route, cx)),
                )),
        )
    }

    fn render_prompt(
        &self,
        cx: &mut Context<Self>,
    ) -> Div {
        let muted = cx.theme().muted_foreground;

        v_flex()
            .items_center()
            .gap_6()
            .py_8()
            .child(
                v_flex()
                    .items_center()
                    .gap_2()
                    .child(
                        div()
                            .text_xl()
                            .font_weight(FontWeight::SEMIBOLD)
                            .child("Add Your Water Bill"),
                    )
                    .child(
                        div()
                            .max_w(px(420.))
                            .text_align(TextAlign::Center)
                            .text_color(muted)
                            .child("Scan your bill or enter details manually to track your consumption"),
                    ),
            )
            .child(
                h_flex()
                    .gap_4()
                    .child(make_button(
                        "scan-bill",
                        "Scan Bill",
                        cx.listener(|this, _: &ClickEvent, window, cx| this.start_scan(window, cx)),
                    ))
                    .child(make_outline_button(
                        "manual-entry",
                        "Enter Manually",
                        cx.listener(|this, _: &ClickEvent, window, cx| {
                            this.manual_entry(window, cx)
                        }),
                    )),
            )
            .children(self.render_errors(cx.theme().danger))
            .child(tip_card(
                "Water Saving Tip",
                WATER_SAVING_TIP,
                cx.theme().secondary,
                muted,
            ))
    }

    fn render_entry(
        &self,
        cx: &mut Context<Self>,
    ) -> Div {
        let border = cx.theme().border;
        let muted = cx.theme().muted_foreground;
        let submitting = self.flow.is_submitting();
        let heading = self
            .flow
            .entry_mode()
            .map_or("Enter Water Bill Details", |mode| mode.heading());

        let scan_card = self.flow.scan_result().map(|text| {
            card(border).child(
                v_flex()
                    .gap_2()
                    .child(div().font_weight(FontWeight::MEDIUM).child("OCR Scan Result"))
                    .child(
                        div()
                            .p_2()
                            .rounded_md()
                            .bg(cx.theme().secondary)
                            .font_family("monospace")
                            .text_sm()
                            .child(SharedString::from(text.to_string())),
                    ),
            )
        });

        let missing = self.flow.missing_fields();
        let missing_hint = (!missing.is_empty()).then(|| {
            let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
            div()
                .text_sm()
                .text_color(muted)
                .child(SharedString::from(format!(
                    "Not found in the scan: {}",
                    labels.join(", ")
                )))
        });

        v_flex().gap_6().children(scan_card).child(
            card(border).child(
                v_flex()
                    .gap_4()
                    .child(div().text_lg().font_weight(FontWeight::MEDIUM).child(heading))
                    .child(div().h(px(1.)).w_full().bg(border))
                    .children(missing_hint)
                    .child(self.form.clone())
                    .children(self.render_errors(cx.theme().danger))
                    .child(
                        h_flex()
                            .pt_4()
                            .gap_2()
                            .justify_end()
                            .child(
                                make_outline_button(
                                    "cancel",
                                    "Cancel",
                                    cx.listener(|this, _: &ClickEvent, window, cx| {
                                        this.cancel(window, cx)
                                    }),
                                )
                                .disabled(submitting),
                            )
                            .child(
                                make_button(
                                    "submit-bill",
                                    if submitting {
                                        "Processing..."
                                    } else {
                                        "Submit Bill"
                                    },
                                    cx.listener(|this, _: &ClickEvent, window, cx| {
                                        this.submit(window, cx)
                                    }),
                                )
                                .disabled(submitting),
                            ),
                    ),
            ),
        )
    }

    fn render_submitted(
        &self,
        cx: &mut Context<Self>,
    ) -> Div {
        let Some(receipt) = self.flow.receipt().copied() else {
            return div();
        };
        let follow_up = receipt.follow_up;
        let route = follow_up.route();
        let muted = cx.theme().muted_foreground;

        card(cx.theme().border).bg(cx.theme().secondary).child(
            v_flex()
                .items_center()
                .gap_3()
                .py_8()
                .child(div().text_3xl().text_color(cx.theme().success).child("✓"))
                .child(
                    div()
                        .text_xl()
                        .font_weight(FontWeight::SEMIBOLD)
                        .child("Bill Successfully Recorded!"),
                )
                .child(div().text_color(muted).child(SharedString::from(format!(
                    "You've earned {} eco points for tracking your water usage.",
                    receipt.eco_points
                ))))
                .child(make_button(
                    "follow-up",
                    follow_up.link_label(),
                    cx.listener(move |this, _: &ClickEvent, _, cx| this.navigate(route, cx)),
                ))
                .children(
                    follow_up
                        .next_steps()
                        .map(|text| tip_card("Next Steps", text, cx.theme().background, muted)),
                ),
        )
    }
}

impl Render for WaterBillScreen {
    fn render(
        &mut self,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let body = match self.flow.view() {
            View::Prompt => self.render_prompt(cx),
            View::Entry => self.render_entry(cx),
            View::Submitted => self.render_submitted(cx),
        };

        v_flex()
            .w_full()
            .max_w(px(640.))
            .gap_6()
            .p_6()
            .child(
                v_flex()
                    .gap_2()
                    .child(
                        div()
                            .text_2xl()
                            .font_weight(FontWeight::BOLD)
                            .child("💧 Water Bill Tracker"),
                    )
                    .child(
                        div()
                            .text_color(cx.theme().muted_foreground)
                            .child("Track your water consumption by scanning or manually entering your bill"),
                    ),
            )
            .children(self.render_toast(cx))
            .child(body)
    }
}

fn card(border: Hsla) -> Div {
    v_flex().p_6().rounded_lg().border_1().border_color(border)
}

fn tip_card(
    title: &'static str,
    body: &'static str,
    background: Hsla,
    muted: Hsla,
) -> Div {
    v_flex()
        .gap_1()
        .p_4()
        .max_w(px(460.))
        .rounded_lg()
        .bg(background)
        .child(div().font_weight(FontWeight::MEDIUM).child(title))
        .child(div().text_sm().text_color(muted).child(body))
}
