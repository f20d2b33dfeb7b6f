//! Knobs for the bot that would otherwise be scattered around as magic
//! constants.

use std::sync::OnceLock;

use log::LevelFilter;

use crate::body::BodyDesign;

pub struct Config {
  /// Verbosity of the `console.log` sink.
  pub log_level: LevelFilter,
  /// Which raw memory segment we keep our encoded `Memory` in.
  pub memory_segment: u8,
  /// How often (in ticks) we drop the memory of dead creeps.
  pub clean_up_period: u32,
  /// File component of a stack frame that belongs to our bundle.
  pub bundle_file: &'static str,
  /// Module name passed to `require` to load the bundle's source map.
  pub source_map_module: &'static str,
  /// How many upgraders each spawn tries to keep alive.
  pub upgrader_count: u32,
  /// Colour of the path drawn while heading to a source.
  pub harvest_path_stroke: &'static str,
  /// Colour of the path drawn while heading to the controller.
  pub upgrade_path_stroke: &'static str,
}

impl Config {
  /// Base body for an upgrader, scaled up to whatever the spawn can afford.
  pub fn upgrader_body(&self) -> BodyDesign {
    BodyDesign::new().work(1).carry(1).r#move(1)
  }
}

impl Default for Config {
  fn default() -> Config {
    Config {
      log_level: LevelFilter::Debug,
      memory_segment: 1,
      clean_up_period: 1000,
      bundle_file: "main",
      source_map_module: "main.js.map",
      upgrader_count: 4,
      harvest_path_stroke: "#ffaa00",
      upgrade_path_stroke: "#ffffff",
    }
  }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// The config for this instance. Built on first use.
pub fn config() -> &'static Config {
  CONFIG.get_or_init(Config::default)
}
