use minicbor::{Encode, Decode};
use log::*;
use screeps::constants::ErrorCode;
use screeps::prelude::*;

use super::role::Role;
use super::unit::Unit;
use crate::config::config;

/// Harvests until full, then upgrades the room controller until empty.
#[derive(Clone, Default, PartialEq, Eq, Debug, Encode, Decode)]
pub struct Upgrader {
  /// Whether we are delivering energy to the controller rather than
  /// harvesting it.
  #[n(0)] pub upgrading: bool,
}

impl Upgrader {
  fn upgrade<U: Unit>(unit: &U) {
    let Some(controller) = unit.controller() else {
      warn!("Upgrader {} is in a room without a controller", unit.name());
      return
    };
    match unit.upgrade_controller(&controller) {
      Ok(()) => (),
      Err(ErrorCode::NotInRange) => move_or_log(unit, controller.pos(), config().upgrade_path_stroke),
      Err(err) => debug!("{} could not upgrade controller: {err:?}", unit.name()),
    }
  }

  fn harvest<U: Unit>(unit: &U) {
    let Some(source) = unit.first_source() else {
      warn!("Upgrader {} has no source to harvest", unit.name());
      return
    };
    match unit.harvest(&source) {
      Ok(()) => (),
      Err(ErrorCode::NotInRange) => move_or_log(unit, source.pos(), config().harvest_path_stroke),
      Err(err) => debug!("{} could not harvest: {err:?}", unit.name()),
    }
  }
}

fn move_or_log<U: Unit>(unit: &U, pos: screeps::local::Position, stroke: &str) {
  match unit.move_to(pos, stroke) {
    Ok(()) | Err(ErrorCode::Tired) => (),
    Err(err) => debug!("{} couldn't move because: {err:?}", unit.name()),
  }
}

impl Role for Upgrader {
  fn run<U: Unit>(&mut self, unit: &U) {
    // The flag picks this tick's action. It is only re-checked afterwards,
    // so a creep that just emptied itself still upgrades once more.
    if self.upgrading {
      Self::upgrade(unit);
    } else {
      Self::harvest(unit);
    }

    if self.upgrading && unit.energy() == 0 {
      self.upgrading = false;
      unit.say("🔄 harvest");
    } else if !self.upgrading && unit.free_capacity() == 0 {
      self.upgrading = true;
      unit.say("⚡ upgrade");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;
  use screeps::local::{Position, RoomCoordinate, RoomName};

  fn pos_at(x: u8, y: u8) -> Position {
    let room: RoomName = "W1N1".parse().expect("room name");
    Position::new(
      RoomCoordinate::new(x).expect("x"),
      RoomCoordinate::new(y).expect("y"),
      room,
    )
  }

  #[derive(Debug, Clone, PartialEq)]
  struct Target(&'static str, Position);

  impl HasPosition for Target {
    fn pos(&self) -> Position {
      self.1
    }
  }

  #[derive(Debug, PartialEq)]
  enum Call {
    Upgrade(&'static str),
    Harvest(&'static str),
    MoveTo(Position, String),
    Say(String),
  }

  struct MockUnit {
    energy: u32,
    free: i32,
    upgrade_result: Result<(), ErrorCode>,
    harvest_result: Result<(), ErrorCode>,
    calls: RefCell<Vec<Call>>,
  }

  impl MockUnit {
    fn new(energy: u32, free: i32) -> MockUnit {
      MockUnit {
        energy,
        free,
        upgrade_result: Ok(()),
        harvest_result: Ok(()),
        calls: RefCell::new(Vec::new()),
      }
    }

    fn moves(&self) -> Vec<Position> {
      self.calls.borrow().iter().filter_map(|call| match call {
        Call::MoveTo(pos, _) => Some(*pos),
        _ => None,
      }).collect()
    }

    fn called(&self, call: &Call) -> bool {
      self.calls.borrow().contains(call)
    }
  }

  fn controller() -> Target {
    Target("controller", pos_at(10, 10))
  }

  fn sources() -> [Target; 2] {
    [Target("source1", pos_at(20, 20)), Target("source2", pos_at(30, 30))]
  }

  impl Unit for MockUnit {
    type Controller = Target;
    type Source = Target;

    fn name(&self) -> String {
      "Upgrader-0".to_string()
    }

    fn energy(&self) -> u32 {
      self.energy
    }

    fn free_capacity(&self) -> i32 {
      self.free
    }

    fn controller(&self) -> Option<Target> {
      Some(controller())
    }

    fn first_source(&self) -> Option<Target> {
      sources().into_iter().next()
    }

    fn upgrade_controller(&self, controller: &Target) -> Result<(), ErrorCode> {
      self.calls.borrow_mut().push(Call::Upgrade(controller.0));
      self.upgrade_result
    }

    fn harvest(&self, source: &Target) -> Result<(), ErrorCode> {
      self.calls.borrow_mut().push(Call::Harvest(source.0));
      self.harvest_result
    }

    fn move_to(&self, pos: Position, stroke: &str) -> Result<(), ErrorCode> {
      self.calls.borrow_mut().push(Call::MoveTo(pos, stroke.to_string()));
      Ok(())
    }

    fn say(&self, message: &str) {
      self.calls.borrow_mut().push(Call::Say(message.to_string()));
    }
  }

  #[test]
  fn upgrades_when_in_range() {
    let unit = MockUnit::new(50, 0);
    let mut mem = Upgrader { upgrading: true };
    mem.run(&unit);
    assert!(mem.upgrading);
    assert!(unit.called(&Call::Upgrade("controller")));
    assert!(unit.moves().is_empty());
  }

  #[test]
  fn moves_to_controller_when_out_of_range() {
    let mut unit = MockUnit::new(50, 0);
    unit.upgrade_result = Err(ErrorCode::NotInRange);
    let mut mem = Upgrader { upgrading: true };
    mem.run(&unit);
    assert!(mem.upgrading);
    assert!(unit.called(&Call::Upgrade("controller")));
    assert_eq!(unit.moves(), vec![controller().1]);
    assert!(unit.called(&Call::MoveTo(controller().1, config().upgrade_path_stroke.to_string())));
  }

  #[test]
  fn harvests_first_source_when_not_full() {
    let unit = MockUnit::new(0, 50);
    let mut mem = Upgrader { upgrading: false };
    mem.run(&unit);
    assert!(!mem.upgrading);
    assert!(unit.called(&Call::Harvest("source1")));
    assert!(!unit.called(&Call::Harvest("source2")));
  }

  #[test]
  fn moves_to_first_source_when_out_of_range() {
    let mut unit = MockUnit::new(0, 50);
    unit.harvest_result = Err(ErrorCode::NotInRange);
    let mut mem = Upgrader { upgrading: false };
    mem.run(&unit);
    assert!(!mem.upgrading);
    assert_eq!(unit.moves(), vec![sources()[0].1]);
    assert!(unit.called(&Call::MoveTo(sources()[0].1, config().harvest_path_stroke.to_string())));
  }

  #[test]
  fn switches_to_upgrading_when_full() {
    for result in [Ok(()), Err(ErrorCode::NotInRange), Err(ErrorCode::NotEnough)] {
      let mut unit = MockUnit::new(50, 0);
      unit.harvest_result = result;
      let mut mem = Upgrader { upgrading: false };
      mem.run(&unit);
      assert!(mem.upgrading);
      assert!(unit.called(&Call::Say("⚡ upgrade".to_string())));
    }
  }

  #[test]
  fn switches_to_harvesting_when_empty() {
    for result in [Ok(()), Err(ErrorCode::NotInRange), Err(ErrorCode::NotEnough)] {
      let mut unit = MockUnit::new(0, 50);
      unit.upgrade_result = result;
      let mut mem = Upgrader { upgrading: true };
      mem.run(&unit);
      assert!(!mem.upgrading);
      assert!(unit.called(&Call::Say("🔄 harvest".to_string())));
    }
  }

  #[test]
  fn acts_on_the_flag_read_before_switching() {
    let unit = MockUnit::new(0, 50);
    let mut mem = Upgrader { upgrading: true };
    mem.run(&unit);
    // still upgraded this tick even though it flipped afterwards
    assert!(unit.called(&Call::Upgrade("controller")));
    assert!(!unit.called(&Call::Harvest("source1")));
    assert!(!mem.upgrading);
  }

  #[test]
  fn other_errors_are_absorbed() {
    let mut unit = MockUnit::new(20, 30);
    unit.upgrade_result = Err(ErrorCode::NotOwner);
    let mut mem = Upgrader { upgrading: true };
    mem.run(&unit);
    assert!(mem.upgrading);
    assert!(unit.moves().is_empty());
  }

  #[test]
  fn fresh_memory_harvests() {
    let unit = MockUnit::new(0, 50);
    let mut mem = Upgrader::default();
    mem.run(&unit);
    assert!(unit.called(&Call::Harvest("source1")));
  }
}
