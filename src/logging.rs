use std::panic;

use js_sys::JsString;
use log::*;
use web_sys::console;

use crate::error_mapper::host::report_panic;

struct JsLog;
struct JsNotify;

impl log::Log for JsLog {
  fn enabled(&self, _: &log::Metadata<'_>) -> bool {
    true
  }
  fn log(&self, record: &log::Record<'_>) {
    console::log_1(&JsString::from(format!("{}", record.args())));
  }
  fn flush(&self) {}
}

impl log::Log for JsNotify {
  fn enabled(&self, _: &log::Metadata<'_>) -> bool {
    true
  }
  fn log(&self, record: &log::Record<'_>) {
    screeps::game::notify(&format!("{}", record.args()), None);
  }
  fn flush(&self) {}
}

/// Send `log` output to the console, and warnings and up to `Game.notify`
/// as well. Only call this once per instance.
pub fn setup_logging(verbosity: log::LevelFilter) {
  let applied = fern::Dispatch::new()
    .level(verbosity)
    .format(|out, message, record| {
      out.finish(format_args!(
        "({}) {}: {}",
        record.level(),
        record.target(),
        message
      ))
    })
    .chain(Box::new(JsLog) as Box<dyn log::Log>)
    .chain(
      fern::Dispatch::new()
        .level(log::LevelFilter::Warn)
        .format(|out, message, _record| {
          let time = screeps::game::time();
          out.finish(format_args!("[{}] {}", time, message))
        })
        .chain(Box::new(JsNotify) as Box<dyn log::Log>),
    )
    .apply();
  if let Err(err) = applied {
    console::error_1(&JsString::from(format!("logging was already set up: {err}")));
  }

  panic::set_hook(Box::new(|info| report_panic(info.to_string())));
  debug!("logging set up at {verbosity}");
}
