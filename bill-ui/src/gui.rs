use std::sync::Arc;

use bill_core::{AppConfig, SimulatedSubmitter, Submitter};
use gpui::{
    AnyView, App, AppContext, Bounds, KeyBinding, Menu, MenuItem, TitlebarOptions, WindowBounds,
    WindowOptions,
};
use gpui_component::Root;
use tokio::runtime::Handle;
use tracing::info;

use crate::{
    Quit,
    components::{AppWindow, WaterBillScreen, WindowPreferences},
    quit,
};

pub fn setup_app(app_cx: &mut App) {
    // This must be called before using any GPUI Component features.
    gpui_component::init(app_cx);

    app_cx.activate(true);

    #[cfg(target_os = "macos")]
    app_cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);

    #[cfg(not(target_os = "macos"))]
    app_cx.bind_keys([
        KeyBinding::new("ctrl-q", Quit, None),
        KeyBinding::new("alt-F4", Quit, None),
    ]);

    app_cx.on_action(quit);

    app_cx.set_menus(vec![Menu {
        name: "Water Bill Tracker".into(),
        items: vec![MenuItem::action("Quit", Quit)],
    }]);
}

/// Opens the water bill window.
///
/// `runtime` drives the simulated submission. When `initial_scan` is given,
/// the screen starts on the entry form as if that text had just been scanned.
pub fn open_main_window(
    app_cx: &mut App,
    config: AppConfig,
    runtime: Handle,
    initial_scan: Option<String>,
) -> anyhow::Result<()> {
    let preferences = WindowPreferences::default();
    let options = WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
            None,
            preferences.size,
            app_cx,
        ))),
        titlebar: Some(TitlebarOptions {
            title: Some("Water Bill Tracker".into()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let submitter: Arc<dyn Submitter> =
        Arc::new(SimulatedSubmitter::from_config(&config.submission));

    app_cx.open_window(options, move |window, cx| {
        let screen = cx.new(|screen_cx| {
            WaterBillScreen::new(&config, submitter, runtime, window, screen_cx)
        });
        if let Some(text) = initial_scan {
            screen.update(cx, |screen, screen_cx| {
                screen.scan_completed(text, window, screen_cx)
            });
        }

        let app_window = cx.new(|window_cx| AppWindow::new(screen, window_cx));
        let view: AnyView = app_window.into();
        cx.new(|root_cx| Root::new(view, window, root_cx))
    })?;

    info!("Main window opened");
    Ok(())
}
