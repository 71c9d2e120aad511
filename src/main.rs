//! Konami Flap entry point
//!
//! Handles platform-specific initialization: on wasm32 this wires the
//! landing page (Konami listener, game overlay DOM, animation-frame loop);
//! the native build runs a short headless simulation as a smoke check.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

    use konami_flap::animate::{Animator, Easing, OnComplete};
    use konami_flap::consts::*;
    use konami_flap::konami::{SequenceMatcher, konami_matcher};
    use konami_flap::sim::{Field, GamePhase, GameState, TickEvent, TickInput, tick};

    fn window() -> web_sys::Window {
        web_sys::window().expect("no window")
    }

    fn document() -> Document {
        window().document().expect("no document")
    }

    /// Run a closure after `ms` milliseconds
    fn set_timeout(callback: impl FnOnce() + 'static, ms: u32) {
        let closure = Closure::once(callback);
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ms as i32,
        );
        closure.forget();
    }

    /// `Animator` backed by CSS transitions on elements looked up by id
    struct CssAnimator;

    impl Animator for CssAnimator {
        fn animate(
            &self,
            target: &str,
            properties: &[(&str, String)],
            duration_ms: u32,
            easing: Easing,
            on_complete: Option<OnComplete>,
        ) {
            let element = document()
                .get_element_by_id(target)
                .and_then(|e| e.dyn_into::<HtmlElement>().ok());

            match element {
                Some(el) => {
                    let style = el.style();
                    let _ = style.set_property(
                        "transition",
                        &format!("all {}ms {}", duration_ms, easing.as_css()),
                    );
                    for (name, value) in properties {
                        let _ = style.set_property(name, value);
                    }
                    if let Some(complete) = on_complete {
                        set_timeout(complete, duration_ms);
                    }
                }
                None => {
                    // Element not on the page (yet); skip the tween but keep
                    // the completion contract
                    log::warn!("animate target #{target} not found");
                    if let Some(complete) = on_complete {
                        complete();
                    }
                }
            }
        }
    }

    /// One mounted game instance and its DOM subscriptions
    struct GameHandle {
        state: GameState,
        input: TickInput,
        /// Cleared at teardown so no queued frame or key event does work
        mounted: bool,
        /// Exit animation in flight; stop scheduling frames
        closing: bool,
        key_closure: Option<Closure<dyn FnMut(KeyboardEvent)>>,
        /// Celebration hook for passed obstacles (replaces the old global
        /// trophy event)
        on_score: Box<dyn Fn(u32)>,
        /// Invoked once when the instance closes
        on_close: Option<Box<dyn FnOnce()>>,
    }

    /// Page-level state: the unlock matcher and at most one mounted game
    struct App {
        matcher: SequenceMatcher,
        konami_closure: Option<Closure<dyn FnMut(KeyboardEvent)>>,
        game: Option<GameHandle>,
    }

    impl App {
        fn new() -> Self {
            Self {
                matcher: konami_matcher(),
                konami_closure: None,
                game: None,
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Konami Flap page loaded; listening for the code");

        let app = Rc::new(RefCell::new(App::new()));
        arm_konami(&app);
    }

    /// Attach the unlock listener. No-op when already attached.
    fn arm_konami(app: &Rc<RefCell<App>>) {
        if app.borrow().konami_closure.is_some() {
            return;
        }

        let app2 = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let matched = {
                let mut a = app2.borrow_mut();
                if a.game.is_some() {
                    false
                } else {
                    a.matcher.observe(&event.key())
                }
            };
            // Mount outside the borrow; the callback runs synchronously in
            // this event turn
            if matched {
                log::info!("konami code entered - mounting game");
                mount_game(&app2);
            }
        });
        let _ =
            window().add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        app.borrow_mut().konami_closure = Some(closure);
    }

    /// Detach the unlock listener and discard partial match state. Idempotent.
    fn disarm_konami(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if let Some(closure) = a.konami_closure.take() {
            let _ = window()
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            a.matcher.reset();
        }
    }

    /// Build the overlay DOM and start the frame loop. No-op when a game is
    /// already mounted.
    fn mount_game(app: &Rc<RefCell<App>>) {
        if app.borrow().game.is_some() {
            return;
        }
        disarm_konami(app);

        if let Err(err) = build_overlay(&document()) {
            log::warn!("failed to build game overlay: {err:?}");
            arm_konami(app);
            return;
        }

        let seed = js_sys::Date::now() as u64;
        let handle = GameHandle {
            state: GameState::new(seed),
            input: TickInput::default(),
            mounted: true,
            closing: false,
            key_closure: None,
            on_score: Box::new(|score| {
                // Celebration hook: pop the score readout
                log::debug!("obstacle passed, score {score}");
                CssAnimator.animate(
                    "kf-score",
                    &[("transform", "scale(1.4)".to_string())],
                    120,
                    Easing::EaseOut,
                    Some(Box::new(|| {
                        CssAnimator.animate(
                            "kf-score",
                            &[("transform", "scale(1)".to_string())],
                            120,
                            Easing::EaseIn,
                            None,
                        );
                    })),
                );
            }),
            on_close: Some(Box::new(|| log::info!("game closed"))),
        };
        app.borrow_mut().game = Some(handle);
        log::info!("game mounted (seed {seed})");

        attach_game_keys(app);

        // Fade the overlay in
        CssAnimator.animate(
            "kf-overlay",
            &[("opacity", "1".to_string())],
            EXIT_ANIM_MS,
            Easing::EaseOut,
            None,
        );

        request_animation_frame(app.clone());
    }

    /// Tear down the mounted game: remove listeners and DOM, fire the close
    /// callback, and re-arm the unlock listener. Idempotent.
    fn unmount_game(app: &Rc<RefCell<App>>) {
        let game = app.borrow_mut().game.take();
        let Some(mut game) = game else { return };
        game.mounted = false;

        if let Some(closure) = game.key_closure.take() {
            let _ = window()
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        }
        if let Some(overlay) = document().get_element_by_id("kf-overlay") {
            overlay.remove();
        }
        if let Some(on_close) = game.on_close.take() {
            on_close();
        }

        arm_konami(app);
    }

    /// Window keydown handler for the mounted game (one-shot tick inputs)
    fn attach_game_keys(app: &Rc<RefCell<App>>) {
        let app2 = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app2.borrow_mut();
            let Some(game) = a.game.as_mut() else { return };
            if !game.mounted {
                return;
            }
            match event.key().as_str() {
                "ArrowUp" | " " => {
                    event.prevent_default();
                    game.input.flap = true;
                }
                "ArrowDown" => {
                    event.prevent_default();
                    game.input.dive = true;
                }
                "Escape" => game.input.close = true,
                _ => {}
            }
        });
        let _ =
            window().add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        if let Some(game) = app.borrow_mut().game.as_mut() {
            game.key_closure = Some(closure);
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window().request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, _time: f64) {
        let mut reschedule = false;
        {
            let mut a = app.borrow_mut();
            let Some(game) = a.game.as_mut() else { return };
            if !game.mounted || game.closing {
                return;
            }

            if game.state.phase == GamePhase::Idle {
                // Field not measured yet; retry next frame if layout is
                // still pending
                match measure_field() {
                    Some(field) => game.state.start_run(field),
                    None => {
                        request_animation_frame(app.clone());
                        return;
                    }
                }
            }

            let input = game.input;
            game.input = TickInput::default();
            let events = tick(&mut game.state, &input);

            for event in events {
                match event {
                    TickEvent::ObstaclePassed { score } => (game.on_score)(score),
                    TickEvent::Crashed => {
                        log::info!("crashed at score {}", game.state.score);
                        CssAnimator.animate(
                            "kf-player",
                            &[("transform", "rotate(120deg) scale(0.8)".to_string())],
                            EXIT_ANIM_MS,
                            Easing::EaseIn,
                            None,
                        );
                    }
                    TickEvent::Restarted => {
                        if let Some(player) = html_by_id("kf-player") {
                            let _ = player.style().set_property("transition", "none");
                            let _ = player.style().set_property("transform", "none");
                        }
                    }
                    TickEvent::CloseRequested => {
                        game.closing = true;
                        let app3 = app.clone();
                        CssAnimator.animate(
                            "kf-overlay",
                            &[("opacity", "0".to_string())],
                            EXIT_ANIM_MS,
                            Easing::EaseIn,
                            Some(Box::new(move || unmount_game(&app3))),
                        );
                    }
                }
            }

            render(game);
            reschedule = !game.closing;
        }
        if reschedule {
            request_animation_frame(app);
        }
    }

    fn html_by_id(id: &str) -> Option<HtmlElement> {
        document()
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    /// Play-field pixel dimensions, `None` until layout has happened
    fn measure_field() -> Option<Field> {
        let field = document().get_element_by_id("kf-field")?;
        let width = field.client_width() as f32;
        let height = field.client_height() as f32;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Field { width, height })
    }

    /// Write the sim's read-only view into the overlay elements. Missing
    /// elements are skipped silently.
    fn render(game: &GameHandle) {
        let state = &game.state;

        if let Some(player) = html_by_id("kf-player") {
            let _ = player
                .style()
                .set_property("top", &format!("{}%", state.player_y));
        }

        for (i, obstacle) in state.obstacles.iter().enumerate() {
            if let Some(top) = html_by_id(&format!("kf-obstacle-top-{i}")) {
                let _ = top.style().set_property("left", &format!("{}px", obstacle.x));
                let _ = top
                    .style()
                    .set_property("height", &format!("{}%", obstacle.gap_top));
            }
            if let Some(bottom) = html_by_id(&format!("kf-obstacle-bot-{i}")) {
                let _ = bottom
                    .style()
                    .set_property("left", &format!("{}px", obstacle.x));
                let _ = bottom
                    .style()
                    .set_property("height", &format!("{}%", obstacle.bottom_height()));
            }
        }

        if let Some(score) = document().get_element_by_id("kf-score") {
            score.set_text_content(Some(&state.score.to_string()));
        }
    }

    /// Create the game overlay: full-screen layer, play field, player box,
    /// three obstacle bar pairs, score readout.
    fn build_overlay(document: &Document) -> Result<(), JsValue> {
        let body = document.body().ok_or("no body")?;

        let overlay = styled_div(
            document,
            "kf-overlay",
            "position:fixed;inset:0;background:#10101a;opacity:0;z-index:1000;",
        )?;
        let field = styled_div(
            document,
            "kf-field",
            "position:relative;width:100%;height:100%;overflow:hidden;",
        )?;

        let player = styled_div(
            document,
            "kf-player",
            &format!(
                "position:absolute;left:{PLAYER_X}px;top:{PLAYER_Y_START}%;\
                 width:{PLAYER_SIZE}px;height:{PLAYER_SIZE}px;\
                 background:#ffd75e;border-radius:8px;"
            ),
        )?;
        field.append_child(&player)?;

        for i in 0..OBSTACLE_COUNT {
            let top = styled_div(
                document,
                &format!("kf-obstacle-top-{i}"),
                &format!(
                    "position:absolute;top:0;left:-999px;width:{OBSTACLE_WIDTH}px;\
                     background:#5ec26a;"
                ),
            )?;
            let bottom = styled_div(
                document,
                &format!("kf-obstacle-bot-{i}"),
                &format!(
                    "position:absolute;bottom:0;left:-999px;width:{OBSTACLE_WIDTH}px;\
                     background:#5ec26a;"
                ),
            )?;
            field.append_child(&top)?;
            field.append_child(&bottom)?;
        }

        let score = styled_div(
            document,
            "kf-score",
            "position:absolute;top:16px;right:24px;color:#fff;\
             font:700 32px monospace;",
        )?;
        score.set_text_content(Some("0"));
        field.append_child(&score)?;

        overlay.append_child(&field)?;
        body.append_child(&overlay)?;
        Ok(())
    }

    fn styled_div(document: &Document, id: &str, css: &str) -> Result<Element, JsValue> {
        let div = document.create_element("div")?;
        div.set_id(id);
        div.set_attribute("style", css)?;
        Ok(div)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_page::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use konami_flap::consts::*;
    use konami_flap::sim::{Field, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Konami Flap (native) starting...");
    log::info!("The page version needs a browser - this runs a headless smoke check");

    let mut state = GameState::new(0xC0DE);
    state.start_run(Field {
        width: 800.0,
        height: 600.0,
    });

    // Hold the player mid-field and let the obstacles stream past
    let mut crashes = 0u32;
    for tick_no in 0..3600u32 {
        let input = TickInput {
            flap: tick_no % 25 == 0,
            ..Default::default()
        };
        for event in tick(&mut state, &input) {
            if matches!(event, konami_flap::sim::TickEvent::Crashed) {
                crashes += 1;
            }
        }
        assert!(state.player_y >= 0.0 && state.player_y <= PLAYER_Y_MAX);
    }

    println!(
        "simulated 3600 ticks: score {}, {} crash(es), {} live obstacles",
        state.score,
        crashes,
        state.obstacles.len()
    );
}
