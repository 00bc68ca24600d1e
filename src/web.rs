//! Browser entry points
//!
//! The page's canvas is transferred to a dedicated worker as an
//! `OffscreenCanvas`; after the transfer the main thread cannot draw to it.
//! Message shape: `{ type: "canvas", data: { canvas, settings } }` where
//! `settings` is the JSON read from LocalStorage on the main thread.
//!
//! The same module is loaded on the page and by `web/worker.js`; the start
//! function tells the two apart by whether a `window` exists.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    DedicatedWorkerGlobalScope, HtmlCanvasElement, MessageEvent, OffscreenCanvas, Worker,
    WorkerOptions, WorkerType,
};

use crate::app::{self, Simulation};
use crate::error::{Result, StartupError};
use crate::platform::PerformanceClock;
use crate::render::CanvasSurface;
use crate::scheduler::BrowserScheduler;
use crate::settings::Settings;

/// Worker module script, relative to the page
pub const WORKER_SCRIPT: &str = "./worker.js";
/// Message type carrying the transferred canvas
pub const CANVAS_MESSAGE: &str = "canvas";

fn js_err(context: &str, e: JsValue) -> String {
    format!("{}: {:?}", context, e)
}

/// Module start: runs on the page and again inside the worker
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    if web_sys::window().is_some() {
        log::info!("Torus Duel starting...");
        let worker = start_main_thread().expect("Failed to start simulation worker");
        // The page has to keep the worker alive
        std::mem::forget(worker);
    } else {
        start_worker().expect("Failed to start worker");
    }
}

/// Main thread: transfer the page's canvas to a freshly started worker
pub fn start_main_thread() -> Result<Worker> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| StartupError::MissingCanvas("no document".into()))?;

    let canvas: HtmlCanvasElement = document
        .query_selector("canvas")
        .ok()
        .flatten()
        .ok_or_else(|| StartupError::MissingCanvas("no <canvas> on the page".into()))?
        .dyn_into()
        .map_err(|_| StartupError::MissingCanvas("element is not a canvas".into()))?;

    let offscreen = canvas
        .transfer_control_to_offscreen()
        .map_err(|e| StartupError::MissingCanvas(js_err("transferControlToOffscreen", e)))?;

    let options = WorkerOptions::new();
    options.set_type(WorkerType::Module);
    let worker = Worker::new_with_options(WORKER_SCRIPT, &options)
        .map_err(|e| StartupError::WorkerStart(js_err("new Worker", e)))?;

    let settings = Settings::load();
    let data = Object::new();
    Reflect::set(&data, &"canvas".into(), &offscreen)
        .and_then(|_| Reflect::set(&data, &"settings".into(), &settings.to_json().into()))
        .map_err(|e| StartupError::Message(js_err("build payload", e)))?;
    let message = Object::new();
    Reflect::set(&message, &"type".into(), &CANVAS_MESSAGE.into())
        .and_then(|_| Reflect::set(&message, &"data".into(), &data))
        .map_err(|e| StartupError::Message(js_err("build message", e)))?;

    worker
        .post_message_with_transfer(&message, &Array::of1(&offscreen))
        .map_err(|e| StartupError::WorkerStart(js_err("postMessage", e)))?;

    log::info!("Canvas transferred to worker");
    Ok(worker)
}

/// Worker: wait for the canvas, then run the simulation on it
pub fn start_worker() -> Result<()> {
    let scope: DedicatedWorkerGlobalScope = js_sys::global()
        .dyn_into()
        .map_err(|_| StartupError::NotInWorker)?;

    let on_message = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
        if let Err(e) = handle_message(&event.data()) {
            log::error!("Worker startup failed: {}", e);
            wasm_bindgen::throw_str(&e.to_string());
        }
    });
    scope.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    log::info!("Worker waiting for canvas");
    Ok(())
}

fn handle_message(message: &JsValue) -> Result<()> {
    let kind = Reflect::get(message, &"type".into())
        .ok()
        .and_then(|v| v.as_string())
        .ok_or_else(|| StartupError::Message("missing type".into()))?;
    if kind != CANVAS_MESSAGE {
        log::warn!("Ignoring message of type {}", kind);
        return Ok(());
    }

    let data = Reflect::get(message, &"data".into())
        .map_err(|e| StartupError::Message(js_err("data", e)))?;
    let canvas: OffscreenCanvas = Reflect::get(&data, &"canvas".into())
        .map_err(|e| StartupError::Message(js_err("canvas", e)))?
        .dyn_into()
        .map_err(|_| StartupError::MissingCanvas("payload is not an OffscreenCanvas".into()))?;

    let settings = Reflect::get(&data, &"settings".into())
        .ok()
        .and_then(|v| v.as_string())
        .map(|json| {
            Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings: {}", e);
                Settings::default()
            })
        })
        .unwrap_or_default();
    settings.validate()?;

    let surface = CanvasSurface::new(&canvas)?;
    let clock = PerformanceClock::new()?;
    let scheduler = BrowserScheduler::new()?;

    let sim = Rc::new(RefCell::new(Simulation::new(surface, Box::new(clock), &settings)));
    app::start(sim, Rc::new(scheduler));
    Ok(())
}
