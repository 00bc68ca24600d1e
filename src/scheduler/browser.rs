//! Browser scheduler
//!
//! Frames come from `requestAnimationFrame`. Turns are posted through a
//! `MessageChannel`: each handle is sent as a message and the callback runs
//! when it arrives, which lands at the next task without the clamping that
//! `setTimeout(0)` gets.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{DedicatedWorkerGlobalScope, MessageChannel, MessageEvent, Window};

use super::{FrameCallback, Scheduler, TurnCallback, TurnHandle, TurnTable};
use crate::error::{Result, StartupError};

/// Global scope that can request animation frames
enum FrameSource {
    Window(Window),
    Worker(DedicatedWorkerGlobalScope),
}

impl FrameSource {
    fn current() -> Result<Self> {
        let global = js_sys::global();
        if let Some(window) = global.dyn_ref::<Window>() {
            return Ok(FrameSource::Window(window.clone()));
        }
        global
            .dyn_into::<DedicatedWorkerGlobalScope>()
            .map(FrameSource::Worker)
            .map_err(|_| StartupError::NotInWorker)
    }

    fn request(&self, callback: &js_sys::Function) -> std::result::Result<i32, JsValue> {
        match self {
            FrameSource::Window(window) => window.request_animation_frame(callback),
            FrameSource::Worker(scope) => scope.request_animation_frame(callback),
        }
    }
}

pub struct BrowserScheduler {
    frames: FrameSource,
    turns: Rc<RefCell<TurnTable>>,
    channel: MessageChannel,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
}

impl BrowserScheduler {
    pub fn new() -> Result<Self> {
        let frames = FrameSource::current()?;
        let channel = MessageChannel::new()
            .map_err(|e| StartupError::Scheduler(format!("MessageChannel: {:?}", e)))?;
        let turns = Rc::new(RefCell::new(TurnTable::new()));

        let table = turns.clone();
        let on_message = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            let Some(handle) = event
                .data()
                .as_f64()
                .and_then(|raw| TurnHandle::from_raw(raw as u32))
            else {
                log::warn!("Ignoring non-handle message on the turn channel");
                return;
            };
            // Release the borrow before running: the task reschedules itself
            let task = table.borrow_mut().take(handle);
            if let Some(task) = task {
                task();
            }
        });
        channel
            .port1()
            .set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        Ok(Self {
            frames,
            turns,
            channel,
            _on_message: on_message,
        })
    }
}

impl Scheduler for BrowserScheduler {
    fn next_frame(&self, callback: FrameCallback) {
        let closure = Closure::once_into_js(move |time: f64| callback(time));
        if let Err(e) = self.frames.request(closure.unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }

    fn next_turn(&self, callback: TurnCallback) -> TurnHandle {
        let handle = self.turns.borrow_mut().insert(callback);
        if let Err(e) = self.channel.port2().post_message(&JsValue::from(handle.get())) {
            log::error!("Turn {} could not be posted: {:?}", handle.get(), e);
            self.turns.borrow_mut().cancel(handle);
        }
        handle
    }

    fn cancel_turn(&self, handle: TurnHandle) {
        self.turns.borrow_mut().cancel(handle);
    }
}
