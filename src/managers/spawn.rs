use std::collections::HashSet;

use log::*;
use screeps::constants::Part;
use screeps::objects::StructureSpawn;
use screeps::prelude::*;
use screeps::game;

use crate::body::BodyDesign;
use crate::config::config;
use crate::creeps::{CreepMemory, RoleTag};
use crate::creeps::upgrader::Upgrader;
use crate::memory::Memory;

/// The body to spawn right now, or `None` if we should wait for more energy.
///
/// We wait until the room can pay for the biggest version of the design its
/// capacity allows, so we don't fill the room with tiny creeps.
fn affordable_body(design: &BodyDesign, available: u32, capacity: u32) -> Option<Vec<Part>> {
  let cost = design.max_cost(capacity);
  if available < cost {
    debug!("need {} more energy for cost {}", cost - available, cost);
    None
  } else {
    Some(design.scale(available))
  }
}

fn design_for_memory(memory: &CreepMemory) -> BodyDesign {
  match memory {
    CreepMemory::Upgrader(_) => config().upgrader_body(),
  }
}

/// Returns the name of the creep if the spawn started on it.
pub fn spawn_creep(spawn: &StructureSpawn,
                   creep_memory: CreepMemory,
                   memory: &mut Memory) -> Option<String> {
  let Some(room) = spawn.room() else {
    warn!("spawn {} is not in a room", String::from(spawn.name()));
    return None
  };
  let design = design_for_memory(&creep_memory);
  let body = affordable_body(&design, room.energy_available(), room.energy_capacity_available())?;
  let name = memory.creep_name(creep_memory.tag());
  match spawn.spawn_creep(&body, &name) {
    Ok(()) => {
      info!("spawning {}", name);
      memory.initialize_creep(name.clone(), creep_memory);
      Some(name)
    }
    Err(err) => {
      warn!("Spawn failed: {err:?}");
      None
    }
  }
}

/// Whether we are short of upgraders. `present` holds every creep that
/// exists or was started this tick.
fn needs_upgrader(memory: &Memory, present: &HashSet<String>) -> bool {
  memory.role_count(RoleTag::Upgrader, |name| present.contains(name)) < config().upgrader_count
}

/// Hand out upgraders to idle spawns while we are short, counting each one
/// as soon as it is started.
fn top_up<S>(memory: &mut Memory,
             present: &mut HashSet<String>,
             idle_spawns: impl IntoIterator<Item = S>,
             mut spawn: impl FnMut(&S, &mut Memory) -> Option<String>) {
  for idle in idle_spawns {
    if !needs_upgrader(memory, present) {
      break;
    }
    if let Some(name) = spawn(&idle, memory) {
      present.insert(name);
    }
  }
}

/// Keep each room topped up with upgraders.
pub fn spawn_loop(memory: &mut Memory) {
  let mut present: HashSet<String> = game::creeps().keys().collect();
  let idle_spawns = game::spawns().values().filter(|spawn| spawn.spawning().is_none());
  top_up(memory, &mut present, idle_spawns, |spawn, memory| {
    spawn_creep(spawn, Upgrader::default().into(), memory)
  });
}
