/// DC3D Web - canvas 2D host for the polygon renderer
///
/// Draws into an `HtmlCanvasElement` through its 2D context, feeds DOM mouse
/// events to the pointer generator and drives the rotation animation with
/// `setInterval`. Exports navigate the window to the produced `data:` URI.
use std::cell::RefCell;
use std::rc::Rc;

use dc3d_core::{
    timer::{TIMER_INTERVAL, TIMER_ROTATION},
    Capabilities, ControlMode, DataUriSink, Error, FillStyle, InputEvent, OffscreenSurface,
    PointerDragGenerator, RasterDriver, RasterExportDriver, RenderConfig, Renderer, Scene,
    Surface, SvgExportDriver,
};
use nalgebra::Point2;
use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, MouseEvent, Window};

/// Edge length of the cube shown when no scene is supplied
const CUBE_SIZE: f64 = 200.0;

fn js_error(call: &str, value: JsValue) -> Error {
    Error::Surface(format!("{call} failed: {value:?}"))
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn window() -> Result<Window, Error> {
    web_sys::window().ok_or_else(|| Error::Surface("no window".to_string()))
}

/// A canvas element and its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, Error> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| js_error("getContext", e))?
            .ok_or(Error::MissingCapability("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::MissingCapability("2d context"))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, point: Point2<f64>) {
        self.ctx.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Point2<f64>) {
        self.ctx.line_to(point.x, point.y);
    }

    fn fill(&mut self, style: &FillStyle) -> Result<(), Error> {
        match style {
            FillStyle::Solid(color) => self.ctx.set_fill_style_str(&color.to_string()),
            FillStyle::Linear(linear) => {
                let gradient = self.ctx.create_linear_gradient(
                    linear.start.x,
                    linear.start.y,
                    linear.end.x,
                    linear.end.y,
                );
                for (offset, color) in &linear.stops {
                    gradient
                        .add_color_stop(*offset as f32, &color.to_string())
                        .map_err(|e| js_error("addColorStop", e))?;
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        self.ctx.fill();
        Ok(())
    }
}

/// Detached canvases back the PNG export
impl OffscreenSurface for CanvasSurface {
    fn create(width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::Surface(format!("cannot create a {width}x{height} canvas")));
        }
        let document = window()?
            .document()
            .ok_or_else(|| Error::Surface("no document".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|e| js_error("createElement", e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::Surface("created element is not a canvas".to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        Self::new(canvas)
    }

    fn to_data_uri(&self) -> Result<String, Error> {
        self.canvas
            .to_data_url()
            .map_err(|e| js_error("toDataURL", e))
    }
}

/// Hands exports to the browser by navigating to them
struct LocationSink;

impl DataUriSink for LocationSink {
    fn deliver(&mut self, uri: String) -> Result<(), Error> {
        window()?
            .location()
            .set_href(&uri)
            .map_err(|e| js_error("location.href", e))
    }
}

/// DOM listener that unregisters itself when dropped
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(MouseEvent)>,
}

impl Listener {
    fn register(
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(MouseEvent)>,
    ) -> Result<Self, Error> {
        target
            .add_event_listener_with_callback_and_bool(
                kind,
                callback.as_ref().unchecked_ref(),
                true,
            )
            .map_err(|e| js_error("addEventListener", e))?;
        Ok(Self {
            target,
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
            true,
        );
    }
}

/// `setInterval` registration, cleared when dropped
struct Interval {
    window: Window,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.handle);
    }
}

type SharedRenderer = Rc<RefCell<Renderer<RasterDriver<CanvasSurface>>>>;

/// Toolbar index to control mode: T XY, T Z, R XY, R Z
fn control_mode(index: u32) -> Option<ControlMode> {
    match index {
        0 => Some(ControlMode::TranslateXY),
        1 => Some(ControlMode::TranslateZ),
        2 => Some(ControlMode::RotateXY),
        3 => Some(ControlMode::RotateZ),
        _ => None,
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    renderer: SharedRenderer,
    mode: ControlMode,
    listeners: Vec<Listener>,
    interval: Option<Interval>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Render into the canvas with id `canvas_id`.
    ///
    /// `scene_json` is a JSON polygon list; a cube is shown when it is left out.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, scene_json: Option<String>) -> Result<WebRenderer, JsValue> {
        Self::build(canvas_id, scene_json.as_deref()).map_err(to_js)
    }

    fn build(canvas_id: &str, scene_json: Option<&str>) -> Result<WebRenderer, Error> {
        let document = window()?
            .document()
            .ok_or_else(|| Error::Surface("no document".to_string()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| Error::Config(format!("no element with id {canvas_id:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::Config(format!("#{canvas_id} is not a canvas")))?;

        let scene = match scene_json {
            Some(text) => Scene::from_json(text)?,
            None => Scene::cube(CUBE_SIZE),
        };
        let config = RenderConfig::new(f64::from(canvas.width()), f64::from(canvas.height()));

        let driver = RasterDriver::new(CanvasSurface::new(canvas.clone())?)?;
        let mut renderer = Renderer::new(scene, config, driver)?;
        renderer.set_event_generator(Box::new(PointerDragGenerator::new()))?;
        renderer.render()?;
        let renderer = Rc::new(RefCell::new(renderer));

        // Drags start on the canvas but are followed over the whole document
        let canvas_target: EventTarget = canvas.unchecked_into();
        let document_target: EventTarget = document.unchecked_into();
        let listeners = vec![
            Self::listen(&renderer, canvas_target, "mousedown", |x, y| InputEvent::Press { x, y })?,
            Self::listen(&renderer, document_target.clone(), "mousemove", |x, y| {
                InputEvent::Move { x, y }
            })?,
            Self::listen(&renderer, document_target, "mouseup", |x, y| {
                InputEvent::Release { x, y }
            })?,
        ];

        log::info!("web renderer attached to #{canvas_id}");
        Ok(WebRenderer {
            renderer,
            mode: ControlMode::default(),
            listeners,
            interval: None,
        })
    }

    fn listen(
        renderer: &SharedRenderer,
        target: EventTarget,
        kind: &'static str,
        input: fn(f64, f64) -> InputEvent,
    ) -> Result<Listener, Error> {
        let renderer = Rc::clone(renderer);
        let callback = Closure::wrap(Box::new(move |event: MouseEvent| {
            let input = input(f64::from(event.client_x()), f64::from(event.client_y()));
            if let Err(err) = renderer.borrow_mut().handle_input(&input) {
                log::error!("{kind} handling failed: {err}");
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        Listener::register(target, kind, callback)
    }

    pub fn render(&self) -> Result<(), JsValue> {
        self.renderer.borrow_mut().render().map_err(to_js)
    }

    /// Select the drag behaviour by toolbar index: 0 T XY, 1 T Z, 2 R XY, 3 R Z
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, index: u32) -> Result<(), JsValue> {
        let mode = control_mode(index)
            .ok_or_else(|| JsValue::from_str(&format!("unknown control mode {index}")))?;
        self.mode = mode;
        self.renderer
            .borrow_mut()
            .handle_input(&InputEvent::Mode(mode))
            .map(|_| ())
            .map_err(to_js)
    }

    /// Rotate the scene every 10ms until `stopAnimation`. Pointer control pauses meanwhile.
    #[wasm_bindgen(js_name = startAnimation)]
    pub fn start_animation(&mut self) -> Result<(), JsValue> {
        if self.interval.is_some() {
            return Ok(());
        }
        self.renderer.borrow_mut().take_event_generator();

        let window = window().map_err(to_js)?;
        let renderer = Rc::clone(&self.renderer);
        let callback = Closure::wrap(Box::new(move || {
            if let Err(err) = renderer.borrow_mut().notify(TIMER_ROTATION) {
                log::error!("animation frame failed: {err}");
            }
        }) as Box<dyn FnMut()>);
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            TIMER_INTERVAL.as_millis() as i32,
        )?;

        self.interval = Some(Interval {
            window,
            handle,
            _callback: callback,
        });
        Ok(())
    }

    #[wasm_bindgen(js_name = stopAnimation)]
    pub fn stop_animation(&mut self) -> Result<(), JsValue> {
        if self.interval.take().is_none() {
            return Ok(());
        }
        let mut pointer = PointerDragGenerator::new();
        pointer.set_mode(self.mode);
        self.renderer
            .borrow_mut()
            .set_event_generator(Box::new(pointer))
            .map(|_| ())
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.interval.is_some()
    }

    /// Open the current view as a PNG data URI
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self) -> Result<(), JsValue> {
        let mut driver = RasterExportDriver::<CanvasSurface>::new(LocationSink);
        self.renderer.borrow_mut().export(&mut driver).map_err(to_js)
    }

    /// Open the current view as an SVG data URI
    #[wasm_bindgen(js_name = exportSvg)]
    pub fn export_svg(&self) -> Result<(), JsValue> {
        let mut driver = SvgExportDriver::new(LocationSink);
        self.renderer.borrow_mut().export(&mut driver).map_err(to_js)
    }
}

impl Drop for WebRenderer {
    fn drop(&mut self) {
        self.interval.take();
        self.listeners.clear();
        log::debug!("web renderer released");
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second module instance finds the logger already installed
    let _ = console_log::init_with_level(log::Level::Info);
    Ok(())
}
