mod body;
mod config;
mod storage;
mod logging;
mod memory;
mod creeps;
mod managers;
pub mod error_mapper;

use js_sys::{JsString, Reflect};
use log::*;
use screeps::game;
use wasm_bindgen::prelude::*;

use crate::config::config;
use crate::error_mapper::{Failure, ScreepsHost, Thrown};
use crate::memory::Memory;
use crate::storage::serialization::{request_segment, with_memory};

static INIT_LOGGING: std::sync::Once = std::sync::Once::new();

#[wasm_bindgen(js_name = loop)]
pub fn game_loop() {
  INIT_LOGGING.call_once(|| {
    logging::setup_logging(config().log_level);
  });
  error_mapper::with_trace_mapper(|mapper| {
    let host = ScreepsHost;
    let mut run = error_mapper::wrap(mapper, &host, tick);
    run();
  });
  info!("done! cpu: {}", game::cpu::get_used());
}

fn tick() -> Result<(), Thrown<JsValue>> {
  request_segment()?;
  with_memory(|mem| {
    managers::spawn::spawn_loop(mem);
    creeps::creep_loop(mem);
    clean_up(mem);
  }).map_err(|err| Failure::capture("MemError", err.to_string()))?;
  Ok(())
}

mod my_game {
  use wasm_bindgen::prelude::*;
  #[wasm_bindgen]
  extern "C" {
    pub type Game;

    #[wasm_bindgen(static_method_of = Game, getter = creeps)]
    pub fn creeps() -> JsValue;
  }
}

fn clean_up(memory: &mut Memory) {
  if game::time() % config().clean_up_period == 0 {
    debug!("running memory cleanup");
    let game_creeps = my_game::Game::creeps();
    memory.forget_dead(|name| {
      // if we can't tell, keep it around until next time
      Reflect::has(&game_creeps, &JsString::from(name)).unwrap_or(true)
    });
  }
}
