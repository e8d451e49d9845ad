use anyhow::Context;
use lustre::{LoadError, ViewerConfig, ViewerEvent, ViewerState};
use lustre_mesh::Mesh;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
    window::WindowBuilder,
};

mod depth;
mod gpu_mesh;
mod msaa;
mod renderer;
mod resources;
mod uniforms;

pub use renderer::Renderer;
pub use resources::load_model;

// This is needed because wgpu uses Direct-X style coordinates while cgmath uses
// OpenGL style coordinates.
//
// This matrix simply transforms the coordinates used by cgmath into the ones
// that wgpu need.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

// Mouse wheels report lines, touchpads report pixels.
const PIXELS_PER_LINE: f32 = 50.0;

/// Events the event loop receives from outside of winit.
#[derive(Debug)]
pub enum UserEvent {
    ModelLoaded(Result<Mesh, LoadError>),
}

/// Translates the window events the viewer cares about.
fn viewer_event(event: &WindowEvent) -> Option<ViewerEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(ViewerEvent::PointerMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput {
            state,
            button: MouseButton::Left,
            ..
        } => Some(ViewerEvent::PointerButton {
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::MouseWheel { delta, .. } => Some(ViewerEvent::Scroll {
            delta: match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
            },
        }),
        _ => None,
    }
}

struct App {
    renderer: Renderer,
    state: ViewerState,
}

impl App {
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(new_size);
        self.state.handle(ViewerEvent::Resized {
            width: new_size.width,
            height: new_size.height,
        });
    }

    fn handle_window_event(&mut self, window_event: WindowEvent, control_flow: &mut ControlFlow) {
        if let Some(event) = viewer_event(&window_event) {
            self.state.handle(event);
            return;
        }
        match window_event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::KeyboardInput { input, .. } => {
                if input.virtual_keycode == Some(VirtualKeyCode::Escape) {
                    *control_flow = ControlFlow::Exit;
                }
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size);
            }
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                // new_inner_size is &&mut so we have to dereference it twice
                self.resize(*new_inner_size);
            }
            _ => {}
        }
    }

    fn handle_event(&mut self, event: Event<'_, UserEvent>, control_flow: &mut ControlFlow) {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event, window_id } if window_id == self.renderer.window().id() => {
                self.handle_window_event(event, control_flow)
            }
            Event::UserEvent(UserEvent::ModelLoaded(result)) => {
                self.state.handle(ViewerEvent::ModelLoaded(result));
            }
            Event::RedrawRequested(_) => {
                self.state.handle(ViewerEvent::Frame);
                match self.renderer.render(&self.state) {
                    Ok(_) => {}
                    // Reconfigure the surface if lost
                    Err(wgpu::SurfaceError::Lost) => self.renderer.resize(self.renderer.size()),
                    // The system is out of memory, we should probably quit
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory");
                        *control_flow = ControlFlow::Exit
                    }
                    // All other errors (Outdated, Timeout) should be resolved by the next frame
                    Err(e) => log::warn!("{:?}", e),
                }
            }
            Event::MainEventsCleared => {
                // RedrawRequested will only trigger once, unless we manually
                // request it.
                self.renderer.window().request_redraw();
            }
            _ => (),
        }
    }
}

/// Loads the model off the event loop and hands the result back to it.
fn spawn_load(config: &ViewerConfig, proxy: EventLoopProxy<UserEvent>) {
    let path = config.model_path.clone();
    let task = async move {
        let result = load_model(&path).await;
        if proxy.send_event(UserEvent::ModelLoaded(result)).is_err() {
            log::warn!("viewer closed before the model finished loading");
        }
    };
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            wasm_bindgen_futures::spawn_local(task);
        } else {
            std::thread::spawn(move || pollster::block_on(task));
        }
    }
}

pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Warn).is_err() {
                web_sys::console::warn_1(&"logger was already initialized".into());
            }
        } else {
            env_logger::init();
        }
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    init_logging();
    if let Err(e) = run_with(ViewerConfig::default()).await {
        log::error!("viewer failed: {e:#}");
    }
}

/// Opens the viewer window and runs it until it is closed.
pub async fn run_with(config: ViewerConfig) -> anyhow::Result<()> {
    // Loop provided by winit for handling window events
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let window = WindowBuilder::new()
        .with_title("lustre")
        .build(&event_loop)?;

    #[cfg(target_arch = "wasm32")]
    {
        // Winit prevents sizing with CSS, so we have to set
        // the size manually when on web.
        use winit::dpi::PhysicalSize;
        let (width, height) = web_sys::window()
            .and_then(|win| {
                let width = win.inner_width().ok()?.as_f64()?;
                let height = win.inner_height().ok()?.as_f64()?;
                Some((width, height))
            })
            .unwrap_or((800.0, 600.0));
        window.set_inner_size(PhysicalSize::new(width as u32, height as u32));

        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("lustre").or_else(|| doc.body().map(Into::into))?;
                let canvas = web_sys::Element::from(window.canvas());
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .context("couldn't append canvas to document body")?;
    }

    let size = window.inner_size();
    let renderer = Renderer::new(window)
        .await
        .context("failed to initialize graphics")?;
    let state = ViewerState::new(config, size.width, size.height);
    log::info!("loading {}", state.config().model_path.display());
    spawn_load(state.config(), event_loop.create_proxy());

    let mut app = App { renderer, state };
    event_loop.run(move |event, _, control_flow| {
        app.handle_event(event, control_flow);
    });
}
