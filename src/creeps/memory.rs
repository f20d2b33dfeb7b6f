use minicbor::{Encode, Decode};
use super::role::Role;
use super::unit::Unit;
use super::upgrader::Upgrader;

macro_rules! gen_roles {
  ($($n:literal => $t:ident)*) => {
    #[derive(PartialEq, Eq, Debug, Copy, Clone, Encode, Decode)]
    #[cbor(index_only)]
    #[repr(u8)]
    pub enum RoleTag {
      $(
        #[n($n)] $t = $n
      ),*
    }

    impl Role for CreepMemory {
      fn run<U: Unit>(&mut self, unit: &U) {
        match self {
          $(
            CreepMemory::$t(ref mut mem) => mem.run(unit)
          ),*
        }
      }
    }

    #[derive(Clone, PartialEq, Debug, Encode, Decode)]
    pub enum CreepMemory {
      $(
        #[n($n)] $t(#[n(0)] $t)
      ),*
    }

    impl CreepMemory {
      pub fn tag(&self) -> RoleTag {
        match self {
          $(
            CreepMemory::$t(_) => RoleTag::$t
          ),*
        }
      }
    }

    $(
      impl From<$t> for CreepMemory {
        fn from(mem: $t) -> CreepMemory {
          CreepMemory::$t(mem)
        }
      }
    )*
  }
}

gen_roles! {
  0 => Upgrader
}
