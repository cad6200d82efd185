//! Browser binding: wires the page's forms and panels to a [`ClientAdapter`].
//!
//! Expects the page to contain `#upload-form` (with a file input),
//! `#delete-form`, `#ask-form` (with `textarea[name="question"]`),
//! `#stats-text`, `#answer-text` and a hidden `.answer` container.

use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, HtmlTextAreaElement, Window};

use crate::adapter::ClientAdapter;
use crate::error::ClientError;
use crate::transport::{HttpBackend, UploadFile};
use crate::view::{Dialogs, Region, TextTarget};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

type PageAdapter = Rc<ClientAdapter<HttpBackend>>;

struct DomText(Element);

impl TextTarget for DomText {
    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

struct DomRegion(HtmlElement);

impl Region for DomRegion {
    fn show(&self) {
        let _ = self.0.style().set_property("display", "block");
    }
}

struct BrowserDialogs(Window);

impl Dialogs for BrowserDialogs {
    fn alert(&self, message: &str) {
        let _ = self.0.alert_with_message(message);
    }

    fn confirm(&self, message: &str) -> bool {
        self.0.confirm_with_message(message).unwrap_or(false)
    }
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

fn select(root: &Element, selector: &str) -> Result<Element, JsValue> {
    root.query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing element {selector}")))
}

fn on_submit(form: &Element, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

async fn read_selected_file(input: HtmlInputElement) -> Result<Option<UploadFile>, ClientError> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let name = file.name();
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ClientError::File {
            path: PathBuf::from(&name),
            source: io::Error::other(format!("{e:?}")),
        })?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Some(UploadFile::new(name, bytes)))
}

/// Build the adapter against the serving origin, attach the three form
/// handlers and run the initial stats fetch.
pub fn mount() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let origin = window.location().origin()?;
    let backend = HttpBackend::builder(origin)
        .build()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let answer_region: HtmlElement = document
        .query_selector(".answer")?
        .ok_or_else(|| JsValue::from_str("missing element .answer"))?
        .dyn_into()?;

    let adapter: PageAdapter = Rc::new(ClientAdapter::new(
        backend,
        DomText(by_id(&document, "stats-text")?),
        DomText(by_id(&document, "answer-text")?),
        DomRegion(answer_region),
        BrowserDialogs(window),
    ));

    let upload_form = by_id(&document, "upload-form")?;
    let file_input: HtmlInputElement = select(&upload_form, "input[type=\"file\"]")?.dyn_into()?;
    {
        let adapter = Rc::clone(&adapter);
        on_submit(&upload_form, move |event: Event| {
            event.prevent_default();
            let adapter = Rc::clone(&adapter);
            let input = file_input.clone();
            spawn_local(async move {
                adapter.submit_upload_from(read_selected_file(input)).await;
            });
        })?;
    }

    let delete_form = by_id(&document, "delete-form")?;
    {
        let adapter = Rc::clone(&adapter);
        on_submit(&delete_form, move |event: Event| {
            event.prevent_default();
            let adapter = Rc::clone(&adapter);
            spawn_local(async move {
                adapter.submit_delete().await;
            });
        })?;
    }

    let ask_form = by_id(&document, "ask-form")?;
    let question_input: HtmlTextAreaElement =
        select(&ask_form, "textarea[name=\"question\"]")?.dyn_into()?;
    {
        let adapter = Rc::clone(&adapter);
        on_submit(&ask_form, move |event: Event| {
            event.prevent_default();
            let adapter = Rc::clone(&adapter);
            let question = question_input.value();
            spawn_local(async move {
                adapter.submit_query(&question).await;
            });
        })?;
    }

    spawn_local(async move {
        adapter.start().await;
    });

    console_log!("rag-console attached to page");
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    mount()
}
