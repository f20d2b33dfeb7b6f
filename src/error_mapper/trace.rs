use std::collections::HashMap;
use std::fmt;
use std::mem;

use log::*;
use regex::Regex;

use super::source_map::{PositionLookup, SourceMapError};

/// `at <function> (<file>:<line>:<column>)`, with the function and the
/// parentheses optional.
const FRAME_PATTERN: &str = r"^\s+at\s+(.+?\s+)?\(?([0-z._\-\\/]+):(\d+):(\d+)\)?$";

/// An error that was thrown during a tick, along with its stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
  pub name: String,
  pub message: String,
  pub stack: String,
}

impl Failure {
  pub fn new(name: impl Into<String>, message: impl Into<String>, stack: impl Into<String>) -> Failure {
    Failure {
      name: name.into(),
      message: message.into(),
      stack: stack.into(),
    }
  }
}

impl fmt::Display for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.message.is_empty() {
      write!(f, "{}", self.name)
    } else {
      write!(f, "{}: {}", self.name, self.message)
    }
  }
}

type Loader<L> = Box<dyn FnOnce() -> Result<L, SourceMapError>>;

enum Consumer<L> {
  Pending(Loader<L>),
  Ready(L),
  Failed,
}

impl<L: PositionLookup> Consumer<L> {
  /// Loads on first use. A failed load is not retried.
  fn get(&mut self) -> Option<&L> {
    match mem::replace(self, Consumer::Failed) {
      Consumer::Pending(load) => match load() {
        Ok(lookup) => *self = Consumer::Ready(lookup),
        Err(err) => warn!("stack traces will not be source mapped: {err}"),
      },
      settled => *self = settled,
    }
    match &*self {
      Consumer::Ready(lookup) => Some(lookup),
      _ => None,
    }
  }
}

/// Turns stack traces from the bundle into traces pointing at the original
/// sources.
///
/// Building the lookup is expensive so it only happens the first time a
/// trace actually needs it. Every translated trace is cached for the life of
/// the instance.
pub struct TraceMapper<L> {
  consumer: Consumer<L>,
  cache: HashMap<String, String>,
  frame_re: Regex,
  bundle_file: String,
}

impl<L: PositionLookup> TraceMapper<L> {
  pub fn new(
    bundle_file: impl Into<String>,
    load: impl FnOnce() -> Result<L, SourceMapError> + 'static,
  ) -> TraceMapper<L> {
    TraceMapper {
      consumer: Consumer::Pending(Box::new(load)),
      cache: HashMap::new(),
      frame_re: Regex::new(FRAME_PATTERN).expect("frame pattern must compile"),
      bundle_file: bundle_file.into(),
    }
  }

  /// Translate a pre-formatted trace. The trace text itself heads the
  /// result.
  pub fn translate(&mut self, trace: &str) -> String {
    self.map_stack(trace, || trace.to_string())
  }

  /// Translate a failure's stack, headed by `<name>: <message>`.
  pub fn translate_failure(&mut self, failure: &Failure) -> String {
    self.map_stack(&failure.stack, || failure.to_string())
  }

  pub fn cached(&self) -> usize {
    self.cache.len()
  }

  fn map_stack(&mut self, stack: &str, header: impl FnOnce() -> String) -> String {
    if let Some(mapped) = self.cache.get(stack) {
      return mapped.clone();
    }

    let mut out = header();
    for line in stack.lines() {
      let Some(caps) = self.frame_re.captures(line) else {
        continue
      };
      // frames outside the bundle come from the host and can't be mapped;
      // everything after them is assumed to be host frames too.
      if &caps[2] != self.bundle_file {
        break;
      }
      let (Ok(frame_line), Ok(frame_col)) = (caps[3].parse::<u32>(), caps[4].parse::<u32>()) else {
        break
      };
      let Some(pos) = self.consumer.get()
        .and_then(|lookup| lookup.original_position_for(frame_line, frame_col)) else {
        break
      };
      let name = pos.name.as_deref()
        .or_else(|| caps.get(1).map(|m| m.as_str().trim()).filter(|n| !n.is_empty()));
      match name {
        Some(name) => out.push_str(&format!("\n    at {} ({}:{}:{})", name, pos.source, pos.line, pos.column)),
        None => out.push_str(&format!("\n    at {}:{}:{}", pos.source, pos.line, pos.column)),
      }
    }

    self.cache.insert(stack.to_string(), out.clone());
    out
  }
}
