//! Vertex Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use vertex_pop::audio::WebAudio;
    use vertex_pop::levels::Catalogue;
    use vertex_pop::platform::Viewport;
    use vertex_pop::platform::web::FrameLoop;
    use vertex_pop::progress::LocalStorageStore;
    use vertex_pop::sim::GameEvent;
    use vertex_pop::{GameError, GameResult, Session, Settings, Tuning};

    thread_local! {
        static FRAME_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Vertex Pop starting...");

        if let Err(e) = start() {
            log::error!("Failed to start: {}", e);
        }
    }

    fn start() -> GameResult<()> {
        let window = web_sys::window().ok_or_else(|| GameError::Platform("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GameError::Platform("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| GameError::Platform("no canvas".into()))?
            .dyn_into()
            .map_err(|_| GameError::Platform("not a canvas".into()))?;

        let tuning = Tuning::default();
        canvas.set_width(tuning.playfield_width as u32);
        canvas.set_height(tuning.playfield_height as u32);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            Catalogue::standard(),
            tuning,
            0,
            Box::new(WebAudio::new(&settings)),
            Box::new(LocalStorageStore),
            seed,
        )?;
        let session = Rc::new(RefCell::new(session));

        setup_input_handlers(&canvas, &document, session.clone());

        let frame_loop = {
            let session = session.clone();
            let document = document.clone();
            FrameLoop::start(move |_time| {
                let events = session.borrow_mut().frame();
                let s = session.borrow();
                update_hud(&document, &s, &events);
                draw(&s);
            })?
        };
        FRAME_LOOP.with(|slot| *slot.borrow_mut() = Some(frame_loop));
        Ok(())
    }

    /// Canvas rectangle as a viewport for pointer mapping
    fn viewport_of(canvas: &HtmlCanvasElement) -> Viewport {
        let rect = canvas.get_bounding_client_rect();
        Viewport::new(
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
            Vec2::new(canvas.width() as f32, canvas.height() as f32),
        )
    }

    fn client_pos(event: &MouseEvent) -> Vec2 {
        Vec2::new(event.client_x() as f32, event.client_y() as f32)
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        document: &Document,
        session: Rc<RefCell<Session>>,
    ) {
        // Mouse down - grab the ball
        {
            let session = session.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = session.borrow_mut();
                s.set_viewport(viewport_of(&canvas_clone));
                s.pointer_down(client_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Move and release on the document so a pull can leave the canvas
        {
            let session = session.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = session.borrow_mut();
                s.set_viewport(viewport_of(&canvas_clone));
                s.pointer_move(client_pos(&event));
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let session = session.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = session.borrow_mut();
                s.set_viewport(viewport_of(&canvas_clone));
                s.pointer_up(client_pos(&event));
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - R retries, N goes to the next level
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut s = session.borrow_mut();
                match event.key().as_str() {
                    "r" | "R" => s.retry(),
                    "n" | "N" => {
                        if let Err(e) = s.next_level() {
                            log::info!("{}", e);
                        }
                    }
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn update_hud(document: &Document, session: &Session, events: &[GameEvent]) {
        let state = session.state();
        set_text(
            document,
            "level",
            &format!("Level {} / {}", state.level_index + 1, session.level_count()),
        );
        set_text(
            document,
            "attempts",
            &format!("Attempts: {}", state.attempts_left(session.tuning())),
        );

        for event in events {
            match event {
                GameEvent::Status(msg) => set_text(document, "status", msg.as_str()),
                GameEvent::Won { stars: 0, .. } => {
                    set_text(document, "status", "Out of stars! Press R to retry.")
                }
                GameEvent::Won {
                    stars, best_stars, ..
                } => set_text(
                    document,
                    "status",
                    &format!("Popped! {stars} stars (best {best_stars}). Press N for the next level."),
                ),
                GameEvent::OutOfAttempts => set_text(
                    document,
                    "status",
                    "No attempts left. Press R to retry.",
                ),
                GameEvent::Cue(_) => {}
            }
        }
    }

    /// Hand the frame to the page's drawing hook, when it defines one
    fn draw(session: &Session) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(hook) = js_sys::Reflect::get(&window, &JsValue::from_str("vertexPopDraw")) else {
            return;
        };
        let Ok(hook) = hook.dyn_into::<js_sys::Function>() else {
            return;
        };
        match serde_json::to_string(&session.snapshot()) {
            Ok(json) => {
                let _ = hook.call1(&JsValue::NULL, &JsValue::from_str(&json));
            }
            Err(e) => log::warn!("Snapshot encode failed: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vertex Pop (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in a browser");

    if let Err(e) = demo::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless scripted shots against the shipped levels
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use vertex_pop::audio::NullAudio;
    use vertex_pop::levels::Catalogue;
    use vertex_pop::progress::MemoryStore;
    use vertex_pop::sim::{GameEvent, GamePhase};
    use vertex_pop::{GameResult, Session, Tuning};

    /// Longest a single shot may run before giving up
    const MAX_FRAMES_PER_SHOT: usize = 5000;

    /// Release offsets (from the ball) tried on every level in turn
    const SHOTS: [Vec2; 4] = [
        Vec2::new(-220.0, 180.0),
        Vec2::new(-260.0, 120.0),
        Vec2::new(-300.0, 60.0),
        Vec2::new(-180.0, 240.0),
    ];

    pub fn run(tuning_path: Option<String>) -> GameResult<()> {
        let tuning = match tuning_path {
            Some(path) => {
                let json = std::fs::read_to_string(&path).map_err(|e| {
                    vertex_pop::GameError::InvalidTuning(format!("{path}: {e}"))
                })?;
                Tuning::from_json(&json)?
            }
            None => Tuning::default(),
        };

        let catalogue = Catalogue::standard();
        let count = catalogue.len();
        let mut session = Session::new(
            catalogue,
            tuning,
            0,
            Box::new(NullAudio),
            Box::new(MemoryStore::default()),
            0x5eed,
        )?;

        for index in 0..count {
            if index > 0 {
                session.next_level()?;
            }
            let outcome = play_level(&mut session);
            println!("Level {}: {}", index + 1, outcome);
        }
        Ok(())
    }

    fn play_level(session: &mut Session) -> String {
        for offset in SHOTS {
            let ball = session.state().ball.pos;
            session.pointer_down(ball);
            session.pointer_move(ball + offset);
            session.pointer_up(ball + offset);

            for _ in 0..MAX_FRAMES_PER_SHOT {
                for event in session.frame() {
                    if let GameEvent::Won {
                        stars, attempts, ..
                    } = event
                    {
                        return format!("popped on attempt {attempts} ({stars} stars)");
                    }
                }
                if session.state().phase != GamePhase::Playing {
                    break;
                }
            }
        }
        format!("not popped after {} attempts", session.state().attempts)
    }
}
