#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::Arc;
    use std::time::Instant;

    use tilt_tank::{Control, DemoScene, PointWorld, ToyConfig, ToyError, WaterToy};
    use winit::application::ApplicationHandler;
    use winit::dpi::PhysicalSize;
    use winit::event::{ElementState, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::window::{Window, WindowId};

    struct App {
        window: Option<Arc<Window>>,
        toy: WaterToy<PointWorld>,
        window_size: PhysicalSize<u32>,
        last_frame: Option<Instant>,
        settled: usize,
        seed: u64,
    }

    impl App {
        fn new() -> Result<Self, ToyError> {
            // Desktop has no orientation sensor; the pointer tilts the camera.
            let toy = WaterToy::new(ToyConfig::default(), PointWorld::default(), false)?;
            let mut app = Self {
                window: None,
                toy,
                window_size: PhysicalSize::new(1280, 720),
                last_frame: None,
                settled: 0,
                seed: 1,
            };
            app.populate();
            Ok(app)
        }

        fn populate(&mut self) {
            if let Err(e) = DemoScene::new(self.seed).build(&mut self.toy) {
                log::error!("Failed to build scene: {}", e);
            }
        }

        fn restart(&mut self) {
            self.toy.reset();
            self.seed += 1;
            self.populate();
        }

        fn update(&mut self) {
            let now = Instant::now();
            let dt = self
                .last_frame
                .map(|t| now.duration_since(t).as_secs_f32())
                .unwrap_or(1.0 / 60.0);
            self.last_frame = Some(now);

            self.toy.frame(dt.min(0.1));

            let settled = self.toy.settled_count();
            if settled != self.settled {
                self.settled = settled;
                log::info!("{} of {} rings on target", settled, self.toy.ring_count());
                if let Some(window) = &self.window {
                    window.set_title(&format!("Tilt Tank ({}/{})", settled, self.toy.ring_count()));
                }
            }
        }

        fn on_key(&mut self, code: KeyCode, pressed: bool) {
            match code {
                KeyCode::ArrowLeft => self.toy.controls_mut().set(Control::Left, pressed),
                KeyCode::ArrowRight => self.toy.controls_mut().set(Control::Right, pressed),
                KeyCode::Space => {
                    for control in Control::ALL {
                        self.toy.controls_mut().set(control, pressed);
                    }
                }
                KeyCode::ArrowUp if pressed => self.toy.nudge(Control::Right, 1),
                KeyCode::ArrowDown if pressed => self.toy.nudge(Control::Right, -1),
                KeyCode::KeyR if pressed => self.restart(),
                _ => {}
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let window_attrs = Window::default_attributes()
                .with_title("Tilt Tank")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

            match event_loop.create_window(window_attrs) {
                Ok(window) => {
                    let window = Arc::new(window);
                    self.window_size = window.inner_size();
                    self.toy.set_aspect(
                        self.window_size.width.max(1) as f32 / self.window_size.height.max(1) as f32,
                    );
                    window.request_redraw();
                    self.window = Some(window);
                }
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                }
            }
        }

        fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
            match event {
                WindowEvent::CloseRequested => {
                    self.toy.teardown();
                    event_loop.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        if code == KeyCode::Escape {
                            self.toy.teardown();
                            event_loop.exit();
                        } else {
                            self.on_key(code, event.state == ElementState::Pressed);
                        }
                    }
                }
                WindowEvent::Focused(false) => self.toy.controls_mut().release_all(),
                WindowEvent::Resized(size) => {
                    self.window_size = size;
                    self.toy
                        .set_aspect(size.width.max(1) as f32 / size.height.max(1) as f32);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let size = self.window_size;
                    self.toy.sampler_mut().on_pointer_move(
                        position.x as f32,
                        position.y as f32,
                        size.width as f32,
                        size.height as f32,
                    );
                }
                WindowEvent::RedrawRequested => {
                    self.update();
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
                _ => {}
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::init();

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new()?;
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
