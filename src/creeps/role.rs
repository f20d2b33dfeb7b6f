use super::unit::Unit;

pub trait Role {
  /// Run the creep actions for this tick.
  ///
  /// `self` is the creep's memory and is written back after the call, so
  /// anything the role wants to remember for next tick goes in there.
  fn run<U: Unit>(&mut self, unit: &U);
}
