//! The game side of the error mapper: reading the room registry, logging to
//! the console, loading the source map and turning JS exceptions into
//! [`Thrown`] values.

use std::cell::RefCell;

use js_sys::{JsString, Reflect, JSON};
use sourcemap::SourceMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

use super::escape::escape;
use super::source_map::{parse_source_map, SourceMapError};
use super::trace::{Failure, TraceMapper};
use super::wrap::{report, TraceHost, Thrown};
use crate::config::config;

mod bindings {
  use wasm_bindgen::prelude::*;
  #[wasm_bindgen]
  extern "C" {
    pub type Game;

    #[wasm_bindgen(static_method_of = Game, getter = rooms)]
    pub fn rooms() -> JsValue;

    #[wasm_bindgen(catch, js_name = require)]
    pub fn require(module: &str) -> Result<JsValue, JsValue>;
  }
}

/// Name of the room the simulator puts you in.
const SIM_ROOM: &str = "sim";

pub struct ScreepsHost;

impl TraceHost for ScreepsHost {
  type Unrecognized = JsValue;

  fn is_simulator(&self) -> bool {
    let rooms = bindings::Game::rooms();
    Reflect::has(&rooms, &JsString::from(SIM_ROOM)).unwrap_or(false)
  }

  fn emit(&self, html: &str) {
    console::log_1(&JsValue::from_str(html));
  }

  fn rethrow(&self, value: JsValue) -> ! {
    wasm_bindgen::throw_val(value)
  }
}

thread_local! {
  static TRACE_MAPPER: RefCell<TraceMapper<SourceMap>> = RefCell::new(
    TraceMapper::new(config().bundle_file, || load_source_map(config().source_map_module))
  );
}

/// Run `fun` with the instance's trace mapper.
pub fn with_trace_mapper<R>(fun: impl FnOnce(&RefCell<TraceMapper<SourceMap>>) -> R) -> R {
  TRACE_MAPPER.with(fun)
}

/// Log a panic with a source mapped trace of where it happened.
pub fn report_panic(message: String) {
  let failure = Failure::capture("panic", message);
  let reported = TRACE_MAPPER.try_with(|mapper| report(mapper, &ScreepsHost, &failure));
  if reported.is_err() {
    console::error_1(&JsValue::from_str(&escape(&format!("{failure}\n{}", failure.stack))));
  }
}

/// Load the source map that the build uploads next to the bundle.
pub fn load_source_map(module: &str) -> Result<SourceMap, SourceMapError> {
  let missing = || SourceMapError::Missing(module.to_string());
  let exports = bindings::require(module).map_err(|_| missing())?;
  let json: String = JSON::stringify(&exports).map_err(|_| missing())?.into();
  parse_source_map(json.as_bytes())
}

impl From<js_sys::Error> for Failure {
  fn from(err: js_sys::Error) -> Failure {
    let stack = Reflect::get(&err, &JsString::from("stack"))
      .ok()
      .and_then(|stack| stack.as_string())
      .unwrap_or_default();
    Failure::new(String::from(err.name()), String::from(err.message()), stack)
  }
}

impl Failure {
  /// A failure with the current JS stack attached.
  pub fn capture(name: &str, message: impl Into<String>) -> Failure {
    let err = js_sys::Error::new(&message.into());
    err.set_name(name);
    err.into()
  }
}

impl From<JsValue> for Thrown<JsValue> {
  fn from(value: JsValue) -> Self {
    match value.dyn_into::<js_sys::Error>() {
      Ok(err) => Thrown::Failure(err.into()),
      Err(other) => Thrown::Other(other),
    }
  }
}
