//! Browser frame loop
//!
//! Re-arms `requestAnimationFrame` after every frame until stopped. Dropping
//! the loop cancels the pending frame so nothing runs after a level is left.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::{GameError, GameResult};

type FrameCallback = Closure<dyn FnMut(f64)>;

pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
    // Keeps the closure alive while frames are pending
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    /// Start calling `on_frame` with the frame timestamp (ms) once per
    /// display frame
    pub fn start<F>(mut on_frame: F) -> GameResult<Self>
    where
        F: FnMut(f64) + 'static,
    {
        let window = web_sys::window().ok_or_else(|| GameError::Platform("no window".into()))?;
        let handle = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        {
            let handle = handle.clone();
            let running = running.clone();
            let callback_ref = callback.clone();
            let window = window.clone();
            *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                if !running.get() {
                    return;
                }
                on_frame(time);
                if let Some(cb) = callback_ref.borrow().as_ref() {
                    handle.set(
                        window
                            .request_animation_frame(cb.as_ref().unchecked_ref())
                            .ok(),
                    );
                }
            }));
        }

        if let Some(cb) = callback.borrow().as_ref() {
            handle.set(
                window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .ok(),
            );
        }

        Ok(Self {
            handle,
            running,
            callback,
        })
    }

    /// Cancel the pending frame and stop re-arming
    pub fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        // Breaks the closure's reference back to its own slot
        self.callback.borrow_mut().take();
    }
}
