use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::fmt::Debug;

use minicbor::Encoder;
use base64::{Engine as _, engine::general_purpose};
use thiserror::Error;

use screeps::raw_memory;
use wasm_bindgen::prelude::*;

use log::*;
use crate::config::config;
use crate::memory::Memory;

#[derive(Debug, Error)]
pub enum MemError {
  #[error("memory was not valid base64: {0}")]
  Base64(#[from] base64::DecodeError),
  #[error("could not decode memory: {0}")]
  DecodeCbor(#[from] minicbor::decode::Error),
  #[error("could not encode memory: {0}")]
  EncodeCbor(String),
}

impl<T: Debug> From<minicbor::encode::Error<T>> for MemError {
  fn from(err: minicbor::encode::Error<T>) -> MemError {
    MemError::EncodeCbor(format!("{err:?}"))
  }
}

fn from_buffer(buffer: &[u8]) -> Result<Memory, MemError> {
  Ok(minicbor::decode(buffer)?)
}

fn to_buffer(memory: &Memory, buffer: &mut Vec<u8>) -> Result<(), MemError> {
  let mut encoder = Encoder::new(buffer);
  encoder.encode(memory)?;
  Ok(())
}

// For the memory we're going to keep around a vector in the local heap
// that we'll clear and deserialize the memory into every time we need it.
fn to_mem_string(data: &[u8]) -> String {
  general_purpose::STANDARD_NO_PAD.encode(data)
}

fn from_mem_string(string: String, target: &mut Vec<u8>) -> Result<(), MemError> {
  Ok(general_purpose::STANDARD_NO_PAD.decode_vec(string, target)?)
}

fn load_mem(mem_str: String, buffer: &mut Vec<u8>) -> Result<Memory, MemError> {
  from_mem_string(mem_str, buffer)?;
  from_buffer(buffer.deref())
}

/// Encode `memory` into the string we keep in the segment.
fn save_mem(memory: &Memory, buffer: &mut Vec<u8>) -> Result<String, MemError> {
  buffer.clear();
  to_buffer(memory, buffer)?;
  Ok(to_mem_string(buffer.deref()))
}

mod bindings {
  use wasm_bindgen::prelude::*;
  #[wasm_bindgen]
  extern "C" {
    pub type RawMemory;

    #[wasm_bindgen(catch, static_method_of = RawMemory, js_name = setActiveSegments)]
    pub fn set_active_segments(ids: &js_sys::Array) -> Result<(), JsValue>;
  }
}

/// Ask for our memory segment to be readable next tick. The game throws
/// for an invalid id or too many active segments.
pub fn request_segment() -> Result<(), JsValue> {
  let ids = js_sys::Array::of1(&JsValue::from(config().memory_segment));
  bindings::RawMemory::set_active_segments(&ids)
}

thread_local! {
  static MEMORY_DECODE_BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::new());
}

/// Load memory from its raw memory segment, hand it to `fun`, and write it
/// back.
///
/// The segment has to be requested with [`request_segment`] a tick before
/// it is readable, so the first tick after a reset skips `fun`. Memory that
/// fails to decode is replaced with the default; failing to encode it again
/// is an error.
pub fn with_memory(fun: impl FnOnce(&mut Memory)) -> Result<(), MemError> {
  let index = config().memory_segment;
  MEMORY_DECODE_BUFFER.with(|buf_refcell| {
    let active_segments = raw_memory::segments();
    if let Some(mem_str) = active_segments.get(index) {
      let mut buffer = buf_refcell.borrow_mut();
      buffer.clear();
      let mut memory = match load_mem(mem_str, buffer.deref_mut()) {
        Err(err) => {
          warn!("generating default memory because of error: {err}");
          Memory::default()
        },
        Ok(mem) => mem
      };
      fun(&mut memory);
      memory.last_time = screeps::game::time();
      let new_mem_str = save_mem(&memory, buffer.deref_mut())?;
      active_segments.set(index, new_mem_str);
    } else {
      active_segments.set(index, "".to_string());
      warn!("active segments not loaded yet");
    }
    Ok(())
  })
}
