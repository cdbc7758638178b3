//! Ring Bounce entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use ring_bounce::consts::*;
    use ring_bounce::renderer::{RenderState, VertexBatch};
    use ring_bounce::{App, Settings};

    /// Everything the browser callbacks share
    struct Runner {
        app: App,
        render_state: Option<RenderState>,
        batch: VertexBatch,
        last_time: f64,
        quit: bool,
    }

    impl Runner {
        fn frame(&mut self, time: f64) -> bool {
            // Frame clock: clamp long gaps (tab switches) before they reach the simulation
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(MAX_FRAME_DT)
            } else {
                1.0 / FPS as f32
            };
            self.last_time = time;

            self.batch.clear();
            if !self.app.frame(dt, self.quit, &mut self.batch) {
                return false;
            }

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            true
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Ring Bounce starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        document.set_title(WINDOW_TITLE);

        let settings = Settings::load();
        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No <canvas id=\"canvas\"> element");
                return;
            }
        };

        // Backing store at device resolution; scene stays in logical pixels
        let dpr = window.device_pixel_ratio();
        let width = (settings.window.width as f64 * dpr) as u32;
        let height = (settings.window.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let runner = Rc::new(RefCell::new(Runner {
            app: App::new(&settings, seed),
            render_state: None,
            batch: VertexBatch::new(),
            last_time: 0.0,
            quit: false,
        }));
        log::info!("Simulation initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let scene_size = (settings.window.width as f32, settings.window.height as f32);
        match RenderState::new(surface, &adapter, width, height, scene_size, settings.background)
            .await
        {
            Ok(render_state) => runner.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_quit_key(runner.clone());
        request_animation_frame(runner);

        log::info!("Ring Bounce running!");
    }

    fn setup_quit_key(runner: Rc<RefCell<Runner>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Escape" {
                runner.borrow_mut().quit = true;
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(runner: Rc<RefCell<Runner>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(runner, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(runner: Rc<RefCell<Runner>>, time: f64) {
        let keep_going = runner.borrow_mut().frame(time);
        if keep_going {
            request_animation_frame(runner);
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
    use ring_bounce::consts::WINDOW_TITLE;
    use ring_bounce::renderer::VertexBatch;
    use ring_bounce::{App, Settings};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Simulated seconds when no frame count is given
    const DEFAULT_SECONDS: u64 = 30;

    env_logger::init();
    log::info!("{} (native, headless) starting...", WINDOW_TITLE);
    log::info!("Windowed mode needs the wasm32 build");

    // Usage: ring-bounce [settings.json] [frames]
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(&path),
        None => Settings::load(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::warn!("Bad frame count ({}), using default", e);
            DEFAULT_SECONDS * settings.window.fps as u64
        }
        None => DEFAULT_SECONDS * settings.window.fps as u64,
    };

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let mut app = App::new(&settings, seed);
    log::info!("Simulation initialized with seed: {}", seed);

    // Fixed-step frame clock; geometry is tessellated but never presented
    let dt = settings.window.frame_dt();
    let mut batch = VertexBatch::new();
    let mut peak_vertices = 0;
    for _ in 0..frames {
        batch.clear();
        if !app.frame(dt, false, &mut batch) {
            break;
        }
        peak_vertices = peak_vertices.max(batch.vertices().len());
    }
    app.request_quit();

    let ball = app.ball();
    println!(
        "seed {}: {} frames, {:.1}s simulated, {} bounces",
        app.seed(),
        app.stats().frames,
        app.stats().sim_time,
        app.stats().bounces
    );
    println!(
        "ball at ({:.1}, {:.1}) speed {:.1} radius {:.1} color {:?}, peak {} vertices/frame",
        ball.pos.x,
        ball.pos.y,
        ball.vel.length(),
        ball.radius,
        ball.color(),
        peak_vertices
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
