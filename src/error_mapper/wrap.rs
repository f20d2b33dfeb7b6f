use std::cell::RefCell;

use log::*;

use super::escape::escape;
use super::source_map::PositionLookup;
use super::trace::{Failure, TraceMapper};

const SIM_WARNING: &str = "Source maps don't work in the simulator - displaying original error";

/// Where the wrapper sends its diagnostics, and how it gives up on things
/// it doesn't understand.
pub trait TraceHost {
  /// Whatever else a tick might throw.
  type Unrecognized;

  /// Source maps are known not to work in the simulator.
  fn is_simulator(&self) -> bool;

  /// Write a line of HTML to the console.
  fn emit(&self, html: &str);

  /// Throw `value` on up, untouched.
  fn rethrow(&self, value: Self::Unrecognized) -> !;
}

/// What a tick can bail out with.
#[derive(Debug)]
pub enum Thrown<T> {
  /// An error with a stack we know how to read.
  Failure(Failure),
  Other(T),
}

impl<T> From<Failure> for Thrown<T> {
  fn from(failure: Failure) -> Self {
    Thrown::Failure(failure)
  }
}

/// The line we log for a failure.
pub fn failure_html<L: PositionLookup>(
  mapper: &mut TraceMapper<L>,
  is_simulator: bool,
  failure: &Failure,
) -> String {
  if is_simulator {
    format!("<span style='color:red'>{}<br>{}</span>", SIM_WARNING, escape(&failure.stack))
  } else {
    let mapped = mapper.translate_failure(failure);
    format!("<span style='color:red'>{}</span>", escape(&mapped))
  }
}

/// Log `failure` through `mapper`. If the mapper is already in use (a
/// failure while reporting another one) the raw stack is logged instead.
pub fn report<L, H>(mapper: &RefCell<TraceMapper<L>>, host: &H, failure: &Failure)
where
  L: PositionLookup,
  H: TraceHost,
{
  let html = match mapper.try_borrow_mut() {
    Ok(mut mapper) => failure_html(&mut mapper, host.is_simulator(), failure),
    Err(_) => format!("<span style='color:red'>{}</span>", escape(&failure.stack)),
  };
  host.emit(&html);
}

/// Wrap a tick so that failures get logged with a source mapped trace
/// instead of taking the whole tick down with them.
///
/// The mapper is only borrowed while reporting, so a panic hook can share
/// it. Anything the tick throws that isn't a [`Failure`] goes straight back
/// to the host.
pub fn wrap<'a, L, H, F>(
  mapper: &'a RefCell<TraceMapper<L>>,
  host: &'a H,
  mut tick: F,
) -> impl FnMut() + 'a
where
  L: PositionLookup,
  H: TraceHost,
  F: FnMut() -> Result<(), Thrown<H::Unrecognized>> + 'a,
{
  move || {
    match tick() {
      Ok(()) => (),
      Err(Thrown::Failure(failure)) => {
        debug!("tick failed: {failure}");
        report(mapper, host, &failure);
      }
      Err(Thrown::Other(value)) => host.rethrow(value),
    }
  }
}
