//! Ragdoll Hangman entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent};

    use ragdoll_hangman::platform::dom::Hud;
    use ragdoll_hangman::platform::{StageView, document, now_ms, window};
    use ragdoll_hangman::{RagdollSimulation, Session, Settings, WordList};

    const CONTAINER_ID: &str = "ragdoll";

    /// Everything the page callbacks share
    struct App {
        session: Session,
        ragdoll: RagdollSimulation,
        hud: Hud,
        container: Element,
        view: Option<StageView>,
        last_time: f64,
    }

    impl App {
        fn guess(&mut self, input: &str) {
            match self.session.guess(input, now_ms(), &mut self.ragdoll) {
                Ok(event) => log::debug!("Guess {:?}: {:?}", input, event),
                Err(e) => log::warn!("{}", e),
            }
            self.refresh_hud();
        }

        fn refresh_hud(&self) {
            if let Err(e) = self.hud.update(&self.session) {
                log::error!("HUD update failed: {:?}", e);
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            self.ragdoll.advance(dt);
            if self.session.update(now_ms(), &mut self.ragdoll) {
                self.refresh_hud();
            }

            if let (Some(view), Some(viewport)) = (&self.view, self.ragdoll.viewport()) {
                view.draw(&viewport, &self.ragdoll.frame());
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&format!("logger init failed: {e}")));
        }

        log::info!("Ragdoll Hangman starting...");

        let document = document()?;
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        log::info!("Using seed: {}", seed);

        let hud = Hud::build(&document)?;
        let container = document
            .get_element_by_id(CONTAINER_ID)
            .ok_or_else(|| JsValue::from_str("missing #ragdoll"))?;

        let app = Rc::new(RefCell::new(App {
            session: Session::new(WordList::builtin(), &settings, seed),
            ragdoll: RagdollSimulation::new(&settings),
            hud,
            container,
            view: None,
            last_time: 0.0,
        }));

        app.borrow().refresh_hud();
        attach(&app);
        setup_input_handlers(app.clone())?;
        setup_visibility(app.clone())?;

        request_animation_frame(app);
        Ok(())
    }

    /// Create the canvas and hand the ragdoll a viewport
    fn attach(app: &Rc<RefCell<App>>) {
        let on_pointer = {
            let app = Rc::downgrade(app);
            move |x, y| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().ragdoll.pointer_moved(x, y);
                }
            }
        };
        let on_resize = {
            let app = Rc::downgrade(app);
            move |width, height| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().ragdoll.resize(width, height);
                }
            }
        };

        let mut a = app.borrow_mut();
        if a.view.is_some() {
            return;
        }
        match StageView::create(&a.container, on_pointer, on_resize) {
            Ok(view) => {
                a.ragdoll.attach(view.viewport());
                a.view = Some(view);
            }
            Err(e) => log::error!("Could not attach ragdoll: {:?}", e),
        }
    }

    fn detach(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        a.view = None;
        a.ragdoll.detach();
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // On-screen keyboard
        let keys = app.borrow().hud.keys().to_vec();
        for (letter, button) in keys {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().guess(&letter.to_string());
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Physical keyboard
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.ctrl_key() || event.meta_key() || event.alt_key() {
                return;
            }
            let key = event.key();
            // Named keys ("Enter", "Shift") are not guesses
            if key.chars().count() == 1 {
                app.borrow_mut().guess(&key);
            }
        });
        window()?.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Drop the canvas while the tab is hidden
    fn setup_visibility(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let document = document()?;
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                detach(&app);
            } else {
                app.borrow_mut().last_time = 0.0;
                attach(&app);
            }
        });
        document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Ok(window) = window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Setup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Text front-end: type letters, watch the ragdoll's parts pile up
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{self, BufRead, Write};
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    use ragdoll_hangman::consts::{VIEW_HEIGHT, VIEW_WIDTH};
    use ragdoll_hangman::renderer::Viewport;
    use ragdoll_hangman::{RagdollSimulation, Session, SessionEvent, Settings, WordList};

    pub fn run() -> io::Result<()> {
        let settings = if std::env::args().any(|arg| arg == "--three-strikes") {
            Settings::budgeted()
        } else {
            Settings::load()
        };
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        log::info!("Ragdoll Hangman (native) starting, seed {}", seed);

        let mut session = Session::new(WordList::builtin(), &settings, seed);
        let mut ragdoll = RagdollSimulation::new(&settings);
        ragdoll.attach(Viewport::new(VIEW_WIDTH, VIEW_HEIGHT));

        let start = Instant::now();
        let mut last = start;
        let now_ms = |at: Instant| at.duration_since(start).as_secs_f64() * 1000.0;

        let stdin = io::stdin();
        let mut out = io::stdout();
        print_status(&mut out, &session, &ragdoll)?;

        for line in stdin.lock().lines() {
            let line = line?;
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let now = Instant::now();
            ragdoll.advance(now.duration_since(last).as_secs_f32());
            last = now;

            match session.guess(input, now_ms(now), &mut ragdoll) {
                Ok(SessionEvent::Won { word }) => writeln!(out, "You got it: {word}")?,
                Ok(SessionEvent::Lost { word }) => {
                    writeln!(out, "Hanged. The word was {word}")?;
                    std::thread::sleep(std::time::Duration::from_secs_f64(
                        settings.loss_reset_delay_ms / 1000.0,
                    ));
                    session.update(now_ms(Instant::now()), &mut ragdoll);
                }
                Ok(SessionEvent::Repeat) => writeln!(out, "Already tried that")?,
                Ok(_) => {}
                Err(e) => writeln!(out, "{e}")?,
            }
            print_status(&mut out, &session, &ragdoll)?;
        }

        ragdoll.destroy();
        Ok(())
    }

    fn print_status(out: &mut impl Write, session: &Session, ragdoll: &RagdollSimulation) -> io::Result<()> {
        let word: String = session
            .word_status()
            .into_iter()
            .map(|slot| slot.unwrap_or('_'))
            .collect();
        let score = session.score();
        writeln!(out, "{word}   wins {} / losses {}", score.wins, score.losses)?;
        writeln!(out, "ragdoll: {}", ragdoll.active_labels().join(" "))?;
        write!(out, "> ")?;
        out.flush()
    }
}
