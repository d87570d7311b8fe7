//! Export and import of travel plans.
//!
//! Native builds use rfd file dialogs on the tokio runtime. Browser builds
//! download a blob for export and read a picked file for import. Either way
//! results come back over the `FileState` channel and are applied on the UI
//! thread by [`GlobeTravelApp::handle_pending_operations`].

use super::state::{FileOperationResult, GlobeTravelApp};
use crate::constants::EXPORT_FILE_NAME;
use eframe::egui;

impl GlobeTravelApp {
    /// Applies finished file operations and starts newly requested ones.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context, used to repaint when a dialog finishes
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.file.receiver.try_recv() {
            self.apply_file_result(result);
        }

        if std::mem::take(&mut self.file.pending_export) {
            self.start_export(ctx);
        }

        if std::mem::take(&mut self.file.pending_import) {
            self.start_import(ctx);
        }
    }

    /// Applies one finished file operation to the app.
    pub fn apply_file_result(&mut self, result: FileOperationResult) {
        let status = match result {
            FileOperationResult::ExportCompleted(destination) => {
                log::info!("exported travel plans to {destination}");
                format!("Exported to {destination}")
            }
            FileOperationResult::ImportCompleted(source, content) => {
                match self.import_plans(&content) {
                    Ok(count) => format!("Imported {count} plans from {source}"),
                    Err(err) => {
                        log::error!("failed to import {source}: {err}");
                        format!("Import failed: {err}")
                    }
                }
            }
            FileOperationResult::OperationFailed(error) => {
                log::error!("file operation failed: {error}");
                error
            }
        };
        self.file.status = Some(status);
    }

    fn start_export(&mut self, ctx: &egui::Context) {
        let json = self.plans.export_json();
        let sender = self.file.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            let result = match browser::download_json(EXPORT_FILE_NAME, &json) {
                Ok(()) => FileOperationResult::ExportCompleted(EXPORT_FILE_NAME.to_string()),
                Err(e) => FileOperationResult::OperationFailed(e),
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .set_file_name(EXPORT_FILE_NAME)
                    .save_file()
                    .await
                {
                    let path = handle.path();
                    let result = match std::fs::write(path, json) {
                        Ok(()) => FileOperationResult::ExportCompleted(path.display().to_string()),
                        Err(e) => {
                            FileOperationResult::OperationFailed(format!("Failed to export plans: {e}"))
                        }
                    };
                    let _ = sender.send(result);
                }
                ctx.request_repaint();
            });
        }
    }

    fn start_import(&mut self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        let sender = self.file.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = match browser::pick_file().await {
                    Ok(Some(file)) => Some(match browser::read_text(&file).await {
                        Ok(content) => FileOperationResult::ImportCompleted(file.name(), content),
                        Err(e) => FileOperationResult::OperationFailed(e),
                    }),
                    Ok(None) => {
                        log::debug!("import picker cancelled");
                        None
                    }
                    Err(e) => Some(FileOperationResult::OperationFailed(e)),
                };
                if let Some(result) = result {
                    let _ = sender.send(result);
                }
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                    .await
                {
                    let path = handle.path();
                    let result = match std::fs::read_to_string(path) {
                        Ok(json) => {
                            FileOperationResult::ImportCompleted(path.display().to_string(), json)
                        }
                        Err(e) => {
                            FileOperationResult::OperationFailed(format!("Failed to read file: {e}"))
                        }
                    };
                    let _ = sender.send(result);
                }
                ctx.request_repaint();
            });
        }
    }

    /// Requests an export of all stored plans.
    pub fn export_plans(&mut self) {
        self.file.pending_export = true;
    }

    /// Requests an import dialog.
    pub fn import_plans_dialog(&mut self) {
        self.file.pending_import = true;
    }
}

/// DOM plumbing for export and import in the browser.
#[cfg(target_arch = "wasm32")]
mod browser {
    use eframe::wasm_bindgen::closure::Closure;
    use eframe::wasm_bindgen::{JsCast, JsValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn js_error(context: &str) -> impl Fn(JsValue) -> String + '_ {
        move |err| format!("Failed to {context}: {err:?}")
    }

    fn document() -> Result<web_sys::Document, String> {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| "No document available".to_string())
    }

    /// Creates an invisible `<tag>` element attached to the page body.
    fn hidden_element<T>(tag: &str) -> Result<T, String>
    where
        T: JsCast + AsRef<web_sys::Element>,
    {
        let document = document()?;
        let body = document.body().ok_or("No document body")?;
        let element = document
            .create_element(tag)
            .map_err(js_error("create element"))?
            .dyn_into::<T>()
            .map_err(|_| format!("<{tag}> has an unexpected type"))?;
        let raw: &web_sys::Element = element.as_ref();
        raw.set_attribute("style", "display: none")
            .map_err(js_error("hide element"))?;
        body.append_child(raw).map_err(js_error("attach element"))?;
        Ok(element)
    }

    /// Saves `content` as a JSON download named `filename`.
    pub fn download_json(filename: &str, content: &str) -> Result<(), String> {
        let parts = js_sys::Array::of1(&JsValue::from_str(content));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/json");
        let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
            .map_err(js_error("create blob"))?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(js_error("create object URL"))?;

        let anchor: web_sys::HtmlAnchorElement = hidden_element("a")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();
        anchor.remove();

        web_sys::Url::revoke_object_url(&url).map_err(js_error("revoke object URL"))
    }

    /// Lets the user pick one JSON file. Resolves to `None` when the picker
    /// is dismissed; the input element is removed either way.
    pub async fn pick_file() -> Result<Option<web_sys::File>, String> {
        let input: web_sys::HtmlInputElement = hidden_element("input")?;
        input.set_type("file");
        input.set_accept(".json,application/json");

        let (sender, receiver) = futures::channel::oneshot::channel::<Option<web_sys::File>>();
        let sender = Rc::new(RefCell::new(Some(sender)));

        let on_change = {
            let sender = Rc::clone(&sender);
            let input = input.clone();
            Closure::<dyn FnMut()>::new(move || {
                let file = input.files().and_then(|files| files.get(0));
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(file);
                }
            })
        };
        let on_cancel = Closure::<dyn FnMut()>::new(move || {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(None);
            }
        });

        input.set_onchange(Some(on_change.as_ref().unchecked_ref()));
        let listening = input
            .add_event_listener_with_callback("cancel", on_cancel.as_ref().unchecked_ref())
            .map_err(js_error("listen for cancel"));

        let file = match listening {
            Ok(()) => {
                input.click();
                receiver.await.unwrap_or(None)
            }
            Err(err) => {
                input.remove();
                return Err(err);
            }
        };

        input.set_onchange(None);
        let _ = input
            .remove_event_listener_with_callback("cancel", on_cancel.as_ref().unchecked_ref());
        input.remove();
        Ok(file)
    }

    /// Reads a picked file as UTF-8 text.
    pub async fn read_text(file: &web_sys::File) -> Result<String, String> {
        let text = wasm_bindgen_futures::JsFuture::from(file.text())
            .await
            .map_err(js_error("read file"))?;
        text.as_string()
            .ok_or_else(|| "File content is not text".to_string())
    }
}
