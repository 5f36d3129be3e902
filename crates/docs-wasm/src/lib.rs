//! # docs-wasm
//!
//! WebAssembly bindings for gateway-docs code-sample widgets.
//!
//! This crate lets a documentation page drive the same state machines the
//! preview server uses:
//! - `WasmSampleBlock`: variant tabs of one code block
//! - `WasmCopyFeedback`: clipboard write plus the timed "copied" indicator
//! - `variant_label`: tab label lookup
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmSampleBlock, WasmCopyFeedback } from 'gateway-docs-wasm';
//!
//! await init();
//!
//! const block = new WasmSampleBlock({
//!   variants: [
//!     { key: 'curl', body: 'curl -X POST ...' },
//!     { key: 'nodejs', body: 'await gateway.payments.create(...)' },
//!   ],
//! });
//! const feedback = new WasmCopyFeedback();
//! feedback.set_listener((status) => button.dataset.status = status);
//!
//! block.select('nodejs');
//! await feedback.copy(block.active_body);
//!
//! // on unmount
//! feedback.free();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use docs_core::{
    variant_label as label_for, CodeSampleSet, CopyFeedback, CopyStatus, SampleSelector,
    COPY_FEEDBACK_WINDOW,
};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Tab label for a variant key
#[wasm_bindgen]
pub fn variant_label(key: &str) -> String {
    label_for(key).into_owned()
}

/// Variant selection for one code block
#[wasm_bindgen]
pub struct WasmSampleBlock {
    selector: SampleSelector,
}

#[wasm_bindgen]
impl WasmSampleBlock {
    /// Build from `{ default?: string, variants: [{ key, body }] }`
    #[wasm_bindgen(constructor)]
    pub fn new(samples: JsValue) -> Result<WasmSampleBlock, JsValue> {
        let samples: CodeSampleSet = serde_wasm_bindgen::from_value(samples)
            .map_err(|e| JsValue::from_str(&format!("Invalid sample set: {}", e)))?;
        Ok(Self::from_samples(samples))
    }

    /// Switch variant; returns false (and changes nothing) for unknown keys
    pub fn select(&mut self, key: &str) -> bool {
        self.selector.select_variant(key)
    }

    #[wasm_bindgen(getter)]
    pub fn active_key(&self) -> String {
        self.selector.active_key().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn active_body(&self) -> String {
        self.selector.active_body().to_string()
    }

    /// Tabs as `[{ key, label, active }]`
    pub fn tabs(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.selector.tabs())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WasmSampleBlock {
    pub fn from_samples(samples: CodeSampleSet) -> Self {
        Self {
            selector: SampleSelector::mount(samples),
        }
    }
}

struct FeedbackSlot {
    /// Sequence number of the most recent copy
    calls: u64,
    feedback: CopyFeedback,
    /// Pending reversion; replacing or dropping it cancels the timeout
    timer: Option<Timeout>,
    listener: Option<js_sys::Function>,
}

/// Copy button state for one code block.
///
/// Calling `free()` from JS unmounts it: the pending timeout is cancelled
/// with the state it belongs to.
#[wasm_bindgen]
pub struct WasmCopyFeedback {
    slot: Rc<RefCell<FeedbackSlot>>,
    window_ms: u32,
}

#[wasm_bindgen]
impl WasmCopyFeedback {
    /// `window_ms` defaults to 2000
    #[wasm_bindgen(constructor)]
    pub fn new(window_ms: Option<u32>) -> WasmCopyFeedback {
        Self {
            slot: Rc::new(RefCell::new(FeedbackSlot {
                calls: 0,
                feedback: CopyFeedback::new(),
                timer: None,
                listener: None,
            })),
            window_ms: window_ms.unwrap_or(COPY_FEEDBACK_WINDOW.as_millis() as u32),
        }
    }

    /// Called with the status string ("idle", "copied", "failed") on change
    pub fn set_listener(&self, listener: js_sys::Function) {
        self.slot.borrow_mut().listener = Some(listener);
    }

    /// Write `text` to the system clipboard, then show the outcome.
    ///
    /// Resolves with "copied" or rejects with the clipboard error after
    /// entering "failed". When another copy starts before this write
    /// settles, the newer copy decides the status and this one resolves
    /// with whatever that is.
    pub fn copy(&self, text: String) -> js_sys::Promise {
        let call = begin_call(&self.slot);
        let slot = Rc::downgrade(&self.slot);
        let window_ms = self.window_ms;

        future_to_promise(async move {
            let result = write_clipboard(&text).await;

            // Freed while the write was in flight: nothing left to update
            let Some(slot) = slot.upgrade() else {
                return result.map(|()| JsValue::from_str(CopyStatus::Idle.as_str()));
            };

            if let Err(e) = &result {
                web_sys::console::warn_2(&JsValue::from_str("clipboard write failed:"), e);
            }

            let status = finish_call(&slot, call, result.is_ok(), window_ms);
            result.map(|()| JsValue::from_str(status.as_str()))
        })
    }

    /// Record the outcome of a clipboard write performed by the page itself
    pub fn record_result(&self, succeeded: bool) -> String {
        let call = begin_call(&self.slot);
        finish_call(&self.slot, call, succeeded, self.window_ms)
            .as_str()
            .to_string()
    }

    /// Cancel any pending reversion and go back to idle
    pub fn reset(&self) {
        let mut slot = self.slot.borrow_mut();
        slot.timer = None;
        slot.feedback.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.slot.borrow().feedback.status().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn is_active(&self) -> bool {
        self.slot.borrow().feedback.is_active()
    }

    #[wasm_bindgen(getter)]
    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }
}

async fn write_clipboard(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = window.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text)).await.map(|_| ())
}

fn begin_call(slot: &Rc<RefCell<FeedbackSlot>>) -> u64 {
    let mut state = slot.borrow_mut();
    state.calls += 1;
    state.calls
}

/// Apply the outcome of copy `call` unless a newer copy has started
fn finish_call(
    slot: &Rc<RefCell<FeedbackSlot>>,
    call: u64,
    succeeded: bool,
    window_ms: u32,
) -> CopyStatus {
    let latest = slot.borrow().calls;
    if latest != call {
        return slot.borrow().feedback.status();
    }
    record(slot, succeeded, window_ms)
}

/// Enter copied/failed and schedule the reversion, replacing the old one
fn record(slot: &Rc<RefCell<FeedbackSlot>>, succeeded: bool, window_ms: u32) -> CopyStatus {
    let token = {
        let mut state = slot.borrow_mut();
        if succeeded {
            state.feedback.confirm()
        } else {
            state.feedback.fail()
        }
    };

    let weak: Weak<RefCell<FeedbackSlot>> = Rc::downgrade(slot);
    let timer = Timeout::new(window_ms, move || {
        let Some(slot) = weak.upgrade() else {
            return;
        };
        // The fired timeout stays in the slot until the next copy replaces
        // it; dropping it from inside its own callback is not allowed.
        if slot.borrow_mut().feedback.revert(token) {
            notify(&slot);
        }
    });
    slot.borrow_mut().timer = Some(timer);

    notify(slot);
    slot.borrow().feedback.status()
}

fn notify(slot: &Rc<RefCell<FeedbackSlot>>) {
    let (listener, status) = {
        let state = slot.borrow();
        (state.listener.clone(), state.feedback.status())
    };
    if let Some(listener) = listener {
        if let Err(e) = listener.call1(&JsValue::NULL, &JsValue::from_str(status.as_str())) {
            web_sys::console::warn_2(&JsValue::from_str("copy feedback listener threw:"), &e);
        }
    }
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> WasmSampleBlock {
        WasmSampleBlock::from_samples(
            CodeSampleSet::new([("curl", "A"), ("nodejs", "B")]).unwrap(),
        )
    }

    #[test]
    fn test_block_select() {
        let mut block = block();
        assert_eq!(block.active_key(), "curl");
        assert_eq!(block.active_body(), "A");

        assert!(block.select("nodejs"));
        assert_eq!(block.active_body(), "B");

        assert!(!block.select("ruby"));
        assert_eq!(block.active_key(), "nodejs");
    }

    #[test]
    fn test_variant_label() {
        assert_eq!(variant_label("nodejs"), "Node.js");
        assert_eq!(variant_label("elixir"), "ELIXIR");
    }

    #[test]
    fn test_feedback_starts_idle() {
        let feedback = WasmCopyFeedback::new(None);
        assert_eq!(feedback.status(), "idle");
        assert!(!feedback.is_active());
        assert_eq!(feedback.window_ms(), 2000);

        let feedback = WasmCopyFeedback::new(Some(750));
        assert_eq!(feedback.window_ms(), 750);
    }

    #[test]
    fn test_superseded_copy_is_discarded() {
        let feedback = WasmCopyFeedback::new(None);
        let first = begin_call(&feedback.slot);
        let second = begin_call(&feedback.slot);
        assert!(second > first);

        // The earlier write settles after the newer copy started
        let status = finish_call(&feedback.slot, first, true, feedback.window_ms);
        assert_eq!(status, CopyStatus::Idle);
        assert_eq!(feedback.status(), "idle");
        assert!(feedback.slot.borrow().timer.is_none());
    }
}
