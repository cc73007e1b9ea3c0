//! Gridcast entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use gridcast::renderer::RenderState;
    use gridcast::sim::{FrameInput, ViewPose};
    use gridcast::{Session, Settings, SimulationKind};

    /// LocalStorage key for the saved camera pose
    const POSE_KEY: &str = "gridcast_pose";

    /// App instance holding all state
    struct App {
        session: Session,
        settings: Settings,
        input: FrameInput,
        last_time: f64,
        /// Pattern-shader clock, frozen under reduced motion
        pattern_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(kind: SimulationKind, settings: Settings) -> Self {
            Self {
                session: Session::new(kind),
                settings,
                input: FrameInput::default(),
                last_time: 0.0,
                pattern_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation substeps and advance the clocks
        fn update(&mut self, dt: f32, time: f64) {
            self.session.advance(&mut self.input, dt);

            if self.settings.pattern_animated() {
                self.pattern_time += dt as f64;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let time = self.pattern_time as f32;
            match self.session.render(&self.settings, time) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = canvas_pixel_size();
                    self.session.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                } else {
                    el.set_text_content(Some(""));
                }
            }

            if let Some(el) = document.query_selector("#hud-sim .hud-value").ok().flatten() {
                el.set_text_content(Some(self.session.kind.as_str()));
            }

            // "Click to play" hint: raycaster only, while the pointer is free
            if let Some(el) = document.get_element_by_id("lock-hint") {
                let show = self.session.kind == SimulationKind::Raycaster && !self.input.active;
                let _ = el.set_attribute("class", if show { "" } else { "hidden" });
            }

            // Controls help while playing
            if let Some(el) = document.get_element_by_id("controls-help") {
                let show = self.settings.show_help
                    && self.session.kind == SimulationKind::Raycaster
                    && self.input.active;
                let _ = el.set_attribute("class", if show { "" } else { "hidden" });
            }
        }

        /// Save the camera pose to LocalStorage
        fn save_pose(&self) {
            let pose = self.session.world.pose();
            if let Ok(json) = serde_json::to_string(&pose) {
                if let Some(storage) = web_sys::window()
                    .and_then(|w| w.local_storage().ok())
                    .flatten()
                {
                    let _ = storage.set_item(POSE_KEY, &json);
                    log::info!("Pose saved");
                }
            }
        }

        /// Drop all held keys, e.g. when focus is lost mid-press
        fn release_keys(&mut self) {
            self.input.forward = false;
            self.input.backward = false;
            self.input.strafe_left = false;
            self.input.strafe_right = false;
            self.input.turn_pixels = 0.0;
        }
    }

    /// Load the saved camera pose from LocalStorage
    fn load_saved_pose() -> Option<ViewPose> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(POSE_KEY).ok()??;
        serde_json::from_str(&json).ok()
    }

    /// Canvas backing-store size for the current display
    fn canvas_pixel_size() -> (u32, u32) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    /// Simulation kind for this visit: `?sim=` override, else a random pick
    fn pick_kind(window: &web_sys::Window) -> SimulationKind {
        if let Ok(search) = window.location().search() {
            let param = search
                .trim_start_matches('?')
                .split('&')
                .find_map(|kv| kv.strip_prefix("sim="));
            if let Some(kind) = param.and_then(SimulationKind::from_str) {
                log::info!("Simulation from URL: {}", kind.as_str());
                return kind;
            }
        }
        SimulationKind::random(js_sys::Date::now() as u64)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gridcast starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_pixel_size();
        canvas.set_width(width);
        canvas.set_height(height);

        let kind = pick_kind(&window);
        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App::new(kind, settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;

        {
            let mut a = app.borrow_mut();
            a.session.start(Some(render_state));

            // Resume where the last visit left off, when the pose still fits
            if let Some(pose) = load_saved_pose() {
                if a.session.world.apply_pose(pose) {
                    log::info!("Restored saved pose");
                }
            }
        }

        setup_input_handlers(&canvas, app.clone());
        setup_lifecycle_handlers(app.clone());

        // Start frame loop
        request_animation_frame(app);

        log::info!("Gridcast running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Pointer lock change: movement runs only while the canvas holds
        // the pointer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let document = web_sys::window().unwrap().document().unwrap();
                let locked = document.pointer_lock_element().is_some();
                let mut a = app.borrow_mut();
                a.input.active = locked;
                if locked {
                    log::info!("Pointer lock acquired");
                } else {
                    log::info!("Pointer lock released");
                    a.release_keys();
                    a.save_pose();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "pointerlockchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Pointer lock error: stay inactive, keep rendering
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                log::warn!("Pointer lock request failed");
            });
            let _ = document.add_event_listener_with_callback(
                "pointerlockerror",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Mouse down: capture the pointer for the raycaster
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let a = app.borrow();
                if a.session.kind == SimulationKind::Raycaster && !a.input.active {
                    canvas_clone.request_pointer_lock();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move: relative travel only while locked
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.input.active {
                    let sensitivity = a.settings.mouse_sensitivity;
                    a.input.turn_pixels += event.movement_x() as f32 * sensitivity;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: WASD/arrows move, digits switch simulations
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => a.input.forward = true,
                    "KeyS" | "ArrowDown" => a.input.backward = true,
                    "KeyA" | "ArrowLeft" => a.input.strafe_left = true,
                    "KeyD" | "ArrowRight" => a.input.strafe_right = true,
                    "Digit1" => a.session.switch_kind(SimulationKind::Raycaster),
                    "Digit2" => a.session.switch_kind(SimulationKind::Voronoi),
                    "Digit3" => a.session.switch_kind(SimulationKind::Fluid),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => a.input.forward = false,
                    "KeyS" | "ArrowDown" => a.input.backward = false,
                    "KeyA" | "ArrowLeft" => a.input.strafe_left = false,
                    "KeyD" | "ArrowRight" => a.input.strafe_right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize: new backing-store size, surface reconfigure; the world
        // carries over untouched
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (w, h) = canvas_pixel_size();
                canvas_clone.set_width(w);
                canvas_clone.set_height(h);
                app.borrow_mut().session.resize(w, h);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Tab hidden: drop held keys so nothing sticks, keep the pose safe
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    a.release_keys();
                    a.save_pose();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                a.release_keys();
                a.save_pose();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page teardown: stop the session so GPU resources release
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                a.save_pose();
                a.session.stop();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                gridcast::consts::SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.update_hud();

            a.session.is_running()
        };

        // The chain re-arms only while the session runs; stop() is the
        // loop's exit condition
        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gridcast::consts::SIM_DT;
    use gridcast::sim::{FrameInput, cast_rays};
    use gridcast::{Session, Settings, SimulationKind};

    env_logger::init();
    log::info!("Gridcast (native) starting...");

    // Headless demo: a few simulated seconds of walking forward, then one
    // frame of rays to show the world is consistent
    let settings = Settings::default();
    let mut session = Session::new(SimulationKind::Raycaster);
    session.start(None);

    let mut input = FrameInput {
        active: true,
        forward: true,
        ..Default::default()
    };

    let frame_dt = 1.0 / 60.0;
    let mut elapsed = 0.0_f32;
    while elapsed < 3.0 {
        session.advance(&mut input, frame_dt);
        elapsed += frame_dt;
    }

    let world = &session.world;
    assert!(
        !gridcast::sim::circle_overlaps_solid(&world.map, world.player.pos, world.player.radius),
        "player ended inside a wall"
    );

    let columns = settings.columns_for_width(1280);
    let rays = cast_rays(world, columns);
    let hits = rays.iter().filter(|r| r.hit.is_some()).count();
    let ticks = world.time_ticks;
    let pos = world.player.pos;

    session.stop();

    println!(
        "Walked {ticks} ticks to ({:.1}, {:.1}); {hits}/{} columns hit a wall",
        pos.x,
        pos.y,
        rays.len()
    );
    log::info!("Native demo complete ({ticks} ticks of {SIM_DT}s)");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
