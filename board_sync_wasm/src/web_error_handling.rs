// Errors crossing into JS come in two flavors: `RustError` values returned through
// `JsResult` (recoverable, the board stays usable) and panics (the board is dead and the
// page should reload it). Both can be turned into an `ErrorReport` for the embedding page
// to log or send home.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;


pub type JsResult<T> = Result<T, JsValue>;

#[macro_export]
macro_rules! rust_error {
    ($($arg:tt)*) => {
        wasm_bindgen::JsValue::from(
            $crate::web_error_handling::RustError { message: format!($($arg)*) }
        )
    };
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub enum ErrorReport {
    RustPanic { panic_info: String, backtrace: String },
    RustError { message: String },
    // Something thrown by the page itself while driving the board.
    UnknownError { message: String },
}

impl ErrorReport {
    fn to_json(&self) -> JsResult<String> {
        serde_json::to_string(self).map_err(|err| rust_error!("Cannot serialize report: {err}"))
    }
}

// Single-threaded: one board per page.
thread_local! {
    static LAST_PANIC: RefCell<Option<ErrorReport>> = const { RefCell::new(None) };
}

#[wasm_bindgen]
extern "C" {
    // JS `Error`, constructed only to capture a stack trace.
    type Error;
    #[wasm_bindgen(constructor)]
    fn new() -> Error;
    #[wasm_bindgen(structural, method, getter)]
    fn stack(error: &Error) -> String;
}

// Should be called once before the first `WebBoard` is created. Repeated calls are fine.
#[wasm_bindgen]
pub fn set_panic_hook() {
    static SET_HOOK: std::sync::Once = std::sync::Once::new();
    SET_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            // Prints the panic to the browser developer console.
            console_error_panic_hook::hook(panic_info);
            let report = ErrorReport::RustPanic {
                panic_info: panic_info.to_string(),
                backtrace: Error::new().stack(),
            };
            LAST_PANIC.with(|cell| *cell.borrow_mut() = Some(report));
        }));
    });
}

// JSON `ErrorReport` of the panic that killed the board, or `undefined` if there was none.
#[wasm_bindgen]
pub fn last_panic() -> JsResult<Option<String>> {
    LAST_PANIC.with(|cell| cell.borrow().as_ref().map(ErrorReport::to_json).transpose())
}

#[wasm_bindgen(getter_with_clone)]
#[derive(Clone, Debug)]
pub struct RustError {
    pub message: String,
}

#[wasm_bindgen]
pub fn make_rust_error_report(error: RustError) -> JsResult<String> {
    ErrorReport::RustError { message: error.message }.to_json()
}

#[wasm_bindgen]
pub fn make_unknown_error_report(message: String) -> JsResult<String> {
    ErrorReport::UnknownError { message }.to_json()
}
