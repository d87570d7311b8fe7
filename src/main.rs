#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // File dialogs are spawned onto this runtime from the UI thread
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    globe_travel::run_app()?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    wasm_bindgen_futures::spawn_local(async {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("globe_travel_canvas"))
            .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        let Some(canvas) = canvas else {
            log::error!("no canvas element with id globe_travel_canvas");
            return;
        };
        if let Err(err) = globe_travel::start_web(canvas).await {
            log::error!("failed to start eframe: {err}");
        }
    });
}
