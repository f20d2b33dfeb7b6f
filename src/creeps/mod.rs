pub mod role;
pub mod creep_loop;
pub mod memory;
pub mod unit;
pub mod upgrader;

pub use creep_loop::*;
pub use role::Role;
pub use unit::Unit;
pub use memory::{RoleTag, CreepMemory};
