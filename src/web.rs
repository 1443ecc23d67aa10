//! WASM entry point - DOM input adapters around a [`WaterToy`]
//!
//! The page owns rendering and the animation loop. It constructs a
//! [`TankToy`], calls `frame` from `requestAnimationFrame`, and reads back a
//! flat `Float32Array` of transforms.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{DeviceOrientationEvent, Event, KeyboardEvent, MouseEvent, Window};

use crate::bodies::{RingSpec, TankLayout};
use crate::config::ToyConfig;
use crate::input::{Control, PermissionGate};
use crate::physics::PointWorld;
use crate::scene::DemoScene;
use crate::toy::{FrameOutput, WaterToy};

/// Floats written per ring: id, 4x4 matrix, rgb, opacity.
const RING_STRIDE: usize = 21;

type SharedToy = Rc<RefCell<WaterToy<PointWorld>>>;

struct Listener {
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

#[wasm_bindgen]
pub struct TankToy {
    toy: SharedToy,
    window: Window,
    listeners: Vec<Listener>,
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn window_size(window: &Window) -> (f32, f32) {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (read(window.inner_width()), read(window.inner_height()))
}

fn orientation_supported(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("DeviceOrientationEvent")).unwrap_or(false)
}

/// Current screen rotation in degrees: the legacy `window.orientation`
/// first, then `screen.orientation.angle`.
fn read_screen_angle(window: &Window) -> Option<f32> {
    let number = |target: &JsValue, key: &str| {
        js_sys::Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };

    if let Some(angle) = number(window, "orientation") {
        return Some(angle as f32);
    }
    let screen = js_sys::Reflect::get(window, &JsValue::from_str("screen")).ok()?;
    let orientation = js_sys::Reflect::get(&screen, &JsValue::from_str("orientation")).ok()?;
    if orientation.is_undefined() || orientation.is_null() {
        return None;
    }
    number(&orientation, "angle").map(|angle| angle as f32)
}

fn control_for_key(key: &str) -> Option<Control> {
    match key {
        "ArrowLeft" => Some(Control::Left),
        "ArrowRight" => Some(Control::Right),
        _ => None,
    }
}

#[wasm_bindgen]
impl TankToy {
    /// Builds the scene. Every argument is optional JSON; missing ones use the default tank.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        rings_json: Option<String>,
        tank_json: Option<String>,
    ) -> Result<TankToy, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let config = match config_json {
            Some(json) => ToyConfig::from_json(&json).map_err(to_js)?,
            None => ToyConfig::default(),
        };
        let mut scene = DemoScene::new(js_sys::Date::now() as u64);
        if let Some(json) = rings_json {
            scene = scene.with_rings(RingSpec::list_from_json(&json).map_err(to_js)?);
        }
        if let Some(json) = tank_json {
            scene = scene.with_tank(TankLayout::from_json(&json).map_err(to_js)?);
        }

        let supported = orientation_supported(&window);
        let mut toy = WaterToy::new(config, PointWorld::default(), supported).map_err(to_js)?;
        scene.build(&mut toy).map_err(to_js)?;
        if let Some(angle) = read_screen_angle(&window) {
            toy.sampler_mut().on_screen_orientation(angle);
        }

        let (width, height) = window_size(&window);
        if height > 0.0 {
            toy.set_aspect(width / height);
        }

        let mut handle = TankToy {
            toy: Rc::new(RefCell::new(toy)),
            window,
            listeners: Vec::new(),
        };
        handle.attach()?;
        log::info!("tank toy ready (orientation sensor: {})", supported);
        Ok(handle)
    }

    /// Asks for sensor access. Must be called from a user gesture.
    ///
    /// Browsers without a permission prompt grant immediately. Resolves to
    /// whether orientation now drives the scene.
    pub fn request_permission(&self) -> js_sys::Promise {
        let toy = self.toy.clone();
        future_to_promise(async move {
            if toy.borrow().sampler().gate() == PermissionGate::Unavailable {
                return Ok(JsValue::FALSE);
            }

            let global = js_sys::global();
            let class: js_sys::Object =
                js_sys::Reflect::get(&global, &JsValue::from_str("DeviceOrientationEvent"))?.unchecked_into();
            let request = js_sys::Reflect::get(&class, &JsValue::from_str("requestPermission"))?;

            let granted = match request.dyn_into::<js_sys::Function>() {
                Ok(request) => match request.call0(&class) {
                    Ok(promise) => match JsFuture::from(js_sys::Promise::resolve(&promise)).await {
                        Ok(state) => state.as_string().as_deref() == Some("granted"),
                        Err(e) => {
                            log::warn!("orientation permission request failed: {:?}", e);
                            false
                        }
                    },
                    Err(e) => {
                        log::warn!("orientation permission request threw: {:?}", e);
                        false
                    }
                },
                Err(_) => true,
            };

            toy.borrow_mut().sampler_mut().resolve_permission(granted);
            Ok(JsValue::from_bool(granted))
        })
    }

    /// Overrides the screen rotation, in degrees. The handle already tracks
    /// `orientationchange` on its own.
    pub fn set_screen_angle(&self, degrees: f32) {
        self.toy.borrow_mut().sampler_mut().on_screen_orientation(degrees);
    }

    pub fn set_control(&self, left: bool, held: bool) {
        let control = if left { Control::Left } else { Control::Right };
        self.toy.borrow_mut().controls_mut().set(control, held);
    }

    pub fn resize(&self, width: f32, height: f32) {
        if height > 0.0 {
            self.toy.borrow_mut().set_aspect(width / height);
        }
    }

    pub fn tick(&self, dt: f32) {
        self.toy.borrow_mut().tick(dt);
    }

    /// Advances one frame and returns, in order: the camera matrix (16), gravity (3),
    /// each ring (id, matrix, rgb, opacity) and each actuator matrix (16).
    pub fn frame(&self, dt: f32) -> Vec<f32> {
        let output = self.toy.borrow_mut().frame(dt.min(0.1));
        pack_frame(&output)
    }

    pub fn view_projection(&self) -> Vec<f32> {
        self.toy.borrow().camera().view_projection().to_cols_array().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn ring_count(&self) -> usize {
        self.toy.borrow().ring_count()
    }

    #[wasm_bindgen(getter)]
    pub fn settled_count(&self) -> usize {
        self.toy.borrow().settled_count()
    }

    #[wasm_bindgen(getter)]
    pub fn device_driven(&self) -> bool {
        self.toy.borrow().sampler().is_device_driven()
    }

    /// Removes every DOM listener and all bodies. The handle is inert afterwards.
    pub fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(e) = self.window.remove_event_listener_with_callback(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
            ) {
                log::warn!("failed to remove {} listener: {:?}", listener.kind, e);
            }
        }
        self.toy.borrow_mut().teardown();
    }
}

impl TankToy {
    fn listen(&mut self, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        self.window
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.push(Listener { kind, closure });
        Ok(())
    }

    fn attach(&mut self) -> Result<(), JsValue> {
        let toy = self.toy.clone();
        self.listen("deviceorientation", move |event| {
            if let Some(event) = event.dyn_ref::<DeviceOrientationEvent>() {
                toy.borrow_mut().sampler_mut().on_device_orientation(
                    event.alpha().map(|v| v as f32),
                    event.beta().map(|v| v as f32),
                    event.gamma().map(|v| v as f32),
                );
            }
        })?;

        let toy = self.toy.clone();
        let window = self.window.clone();
        self.listen("orientationchange", move |_| {
            if let Some(angle) = read_screen_angle(&window) {
                toy.borrow_mut().sampler_mut().on_screen_orientation(angle);
            }
        })?;

        let toy = self.toy.clone();
        let window = self.window.clone();
        self.listen("mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let (width, height) = window_size(&window);
                toy.borrow_mut().sampler_mut().on_pointer_move(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    width,
                    height,
                );
            }
        })?;

        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let toy = self.toy.clone();
            self.listen(kind, move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                let mut toy = toy.borrow_mut();
                match key.as_str() {
                    " " => {
                        for control in Control::ALL {
                            toy.controls_mut().set(control, pressed);
                        }
                    }
                    "ArrowUp" if pressed => toy.nudge(Control::Right, 1),
                    "ArrowDown" if pressed => toy.nudge(Control::Right, -1),
                    other => {
                        if let Some(control) = control_for_key(other) {
                            toy.controls_mut().set(control, pressed);
                        }
                    }
                }
            })?;
        }

        let toy = self.toy.clone();
        self.listen("blur", move |_| toy.borrow_mut().controls_mut().release_all())?;
        Ok(())
    }
}

impl Drop for TankToy {
    fn drop(&mut self) {
        if !self.listeners.is_empty() {
            self.teardown();
        }
    }
}

fn pack_frame(output: &FrameOutput) -> Vec<f32> {
    let mut data =
        Vec::with_capacity(19 + output.rings.len() * RING_STRIDE + output.actuators.len() * 16);
    data.extend_from_slice(&output.camera.to_matrix().to_cols_array());
    data.extend_from_slice(&output.gravity.to_array());
    for ring in &output.rings {
        data.push(ring.id as f32);
        data.extend_from_slice(&ring.transform.to_matrix().to_cols_array());
        data.extend_from_slice(&ring.appearance.color.to_rgb().to_array());
        data.push(ring.appearance.opacity);
    }
    for actuator in &output.actuators {
        data.extend_from_slice(&actuator.to_matrix().to_cols_array());
    }
    data
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init only fails because a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);
}
