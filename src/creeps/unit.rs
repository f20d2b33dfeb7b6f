use screeps::constants::{ErrorCode, ResourceType};
use screeps::objects::{Creep, MoveToOptions, PolyStyle, Source, StructureController};
use screeps::local::Position;
use screeps::prelude::*;
use screeps::find;

/// The parts of a creep that role code is allowed to touch.
///
/// Roles are written against this rather than `Creep` directly so that
/// they can be driven by something other than the game.
pub trait Unit {
  type Controller: HasPosition;
  type Source: HasPosition;

  fn name(&self) -> String;

  /// Energy currently carried.
  fn energy(&self) -> u32;

  /// Free space across the whole store.
  fn free_capacity(&self) -> i32;

  /// Controller of the room the unit is in, if any.
  fn controller(&self) -> Option<Self::Controller>;

  /// First source in the unit's room, in whatever order the room lists them.
  fn first_source(&self) -> Option<Self::Source>;

  fn upgrade_controller(&self, controller: &Self::Controller) -> Result<(), ErrorCode>;

  fn harvest(&self, source: &Self::Source) -> Result<(), ErrorCode>;

  /// Path towards `pos`, drawn in the room with the given stroke colour.
  fn move_to(&self, pos: Position, stroke: &str) -> Result<(), ErrorCode>;

  fn say(&self, message: &str);
}

impl Unit for Creep {
  type Controller = StructureController;
  type Source = Source;

  fn name(&self) -> String {
    SharedCreepProperties::name(self)
  }

  fn energy(&self) -> u32 {
    self.store().get_used_capacity(Some(ResourceType::Energy))
  }

  fn free_capacity(&self) -> i32 {
    self.store().get_free_capacity(None)
  }

  fn controller(&self) -> Option<StructureController> {
    self.room()?.controller()
  }

  fn first_source(&self) -> Option<Source> {
    self.room()?.find(find::SOURCES, None).into_iter().next()
  }

  fn upgrade_controller(&self, controller: &StructureController) -> Result<(), ErrorCode> {
    Creep::upgrade_controller(self, controller)
  }

  fn harvest(&self, source: &Source) -> Result<(), ErrorCode> {
    Creep::harvest(self, source)
  }

  fn move_to(&self, pos: Position, stroke: &str) -> Result<(), ErrorCode> {
    let options = MoveToOptions::new()
      .visualize_path_style(PolyStyle::default().stroke(stroke));
    SharedCreepProperties::move_to_with_options(self, pos, Some(options))
  }

  fn say(&self, message: &str) {
    // saying only fails when the creep is still spawning
    let _ = SharedCreepProperties::say(self, message, false);
  }
}
