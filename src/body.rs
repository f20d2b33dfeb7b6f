use screeps::constants::{Part, MAX_CREEP_SIZE};
use std::iter::Iterator;

macro_rules! gen_body_design {
  ($($p:ident => $m:ident $u:ident)*) => {
    /// How many of each part a body has at scale 1.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BodyDesign {
      $(
        pub $p : u8
      ),*
    }

    impl Default for BodyDesign {
      fn default() -> Self {
        BodyDesign {
          $($p: 0),*
        }
      }
    }

    impl BodyDesign {
      pub fn new() -> Self {
        Default::default()
      }

      $(
        pub fn $m(mut self, val: u8) -> Self {
          self.$p = val;
          self
        }
      )*

      pub fn size(&self) -> u32 {
        0 $(+ self.$p as u32)*
      }

      pub fn scale_to_iter(&self, scale: u32) -> impl Iterator<Item = Part> {
        [$(
          std::iter::repeat(Part::$u).take((scale * (self.$p as u32)) as usize)
        ),*].into_iter().flatten()
      }

      pub fn base_cost(&self) -> u32 {
        0 $(+ (self.$p as u32) * Part::$u.cost())*
      }
    }
  }
}

gen_body_design! {
  work_count => work Work
  carry_count => carry Carry
  move_count => r#move Move
}

impl BodyDesign {
  /// Largest multiple of the design we can afford that still fits in a creep.
  /// Always at least one.
  fn scale_factor(&self, max_energy: u32) -> u32 {
    use std::cmp::{min, max};
    let base_cost = self.base_cost();
    let size = self.size();
    if base_cost == 0 || size == 0 {
      return 1;
    }
    max(1, min(max_energy / base_cost, MAX_CREEP_SIZE / size))
  }

  pub fn max_cost(&self, max_energy: u32) -> u32 {
    self.base_cost() * self.scale_factor(max_energy)
  }

  pub fn scale(&self, max_energy: u32) -> Vec<Part> {
    let scale = self.scale_factor(max_energy);
    self.scale_to_iter(scale).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn upgrader() -> BodyDesign {
    BodyDesign::new().work(1).carry(1).r#move(1)
  }

  #[test]
  fn base_cost_sums_parts() {
    assert_eq!(upgrader().base_cost(), 200);
    assert_eq!(upgrader().size(), 3);
  }

  #[test]
  fn scales_with_energy() {
    assert_eq!(upgrader().scale(300).len(), 3);
    assert_eq!(upgrader().scale(650).len(), 9);
    assert_eq!(upgrader().max_cost(650), 600);
  }

  #[test]
  fn never_scales_below_one() {
    let parts = upgrader().scale(50);
    assert_eq!(parts, vec![Part::Work, Part::Carry, Part::Move]);
  }

  #[test]
  fn capped_at_max_creep_size() {
    let parts = upgrader().scale(1_000_000);
    assert_eq!(parts.len(), 48);
  }
}
