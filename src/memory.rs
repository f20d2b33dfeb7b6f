use std::collections::BTreeMap;
use std::default::Default;

use minicbor::{Encode, Decode};
use log::*;

use crate::creeps::{RoleTag, CreepMemory};

/// Everything we persist between ticks.
///
/// See `storage::serialization` for how this gets into raw memory.
#[derive(PartialEq, Debug, Encode, Decode)]
pub struct Memory {
  #[n(0)] pub creep_counter: u32,
  #[n(1)] pub creeps: BTreeMap<String, CreepMemory>,
  /// Tracks the last known tick so we can tell if we need to deserialize or not.
  #[n(2)] pub last_time: u32,
}

impl Memory {
  pub fn creep_name(&mut self, role: RoleTag) -> String {
    let c = self.creep_counter;
    self.creep_counter += 1;
    format!("{:?}-{}", role, c)
  }

  pub fn initialize_creep(&mut self, name: String, mem: CreepMemory) {
    if self.creeps.contains_key(&name) {
      warn!("Tried to initialze the memory of an already existing creep {}", name);
      return;
    }
    self.creeps.insert(name, mem);
  }

  /// How many creeps of `role` are still alive.
  pub fn role_count(&self, role: RoleTag, is_alive: impl Fn(&str) -> bool) -> u32 {
    self.creeps.iter()
      .filter(|(name, mem)| mem.tag() == role && is_alive(name))
      .count() as u32
  }

  /// Drop the memory of every creep `is_alive` says no longer exists.
  pub fn forget_dead(&mut self, is_alive: impl Fn(&str) -> bool) {
    self.creeps.retain(|name, _| {
      let alive = is_alive(name);
      if !alive {
        info!("deleting memory for dead creep {}", name);
      }
      alive
    });
  }
}

impl Default for Memory {
  fn default() -> Memory {
    Memory {
      creep_counter: 0,
      creeps: BTreeMap::default(),
      last_time: 0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::creeps::upgrader::Upgrader;

  #[test]
  fn creep_names_count_up() {
    let mut mem = Memory::default();
    assert_eq!(mem.creep_name(RoleTag::Upgrader), "Upgrader-0");
    assert_eq!(mem.creep_name(RoleTag::Upgrader), "Upgrader-1");
    assert_eq!(mem.creep_counter, 2);
  }

  #[test]
  fn initialize_does_not_clobber() {
    let mut mem = Memory::default();
    mem.initialize_creep("a".to_string(), Upgrader { upgrading: true }.into());
    mem.initialize_creep("a".to_string(), Upgrader { upgrading: false }.into());
    assert_eq!(mem.creeps["a"], CreepMemory::Upgrader(Upgrader { upgrading: true }));
    assert_eq!(mem.role_count(RoleTag::Upgrader, |_| true), 1);
    assert_eq!(mem.role_count(RoleTag::Upgrader, |_| false), 0);
  }

  #[test]
  fn forget_dead_keeps_living() {
    let mut mem = Memory::default();
    mem.initialize_creep("alive".to_string(), Upgrader::default().into());
    mem.initialize_creep("dead".to_string(), Upgrader::default().into());
    mem.forget_dead(|name| name == "alive");
    assert!(mem.creeps.contains_key("alive"));
    assert!(!mem.creeps.contains_key("dead"));
  }
}
