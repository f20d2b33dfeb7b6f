use super::role::Role;
use crate::memory::Memory;

use log::*;
use screeps::{game, SharedCreepProperties};

pub fn creep_loop(memory: &mut Memory) {
  for creep in game::creeps().values() {
    if creep.spawning() {
      continue;
    }
    let name = creep.name();
    debug!("running creep {}", name);
    if let Some(mem) = memory.creeps.get_mut(&name) {
      mem.run(&creep);
    } else {
      warn!("no memory for creep: {}", &name);
    }
  }
}
