//! Timer-driven workers.  Exactly one of them holds the periodic timer at a
//! time: the [`monitor`] while idle, the [`generator`] while running.

pub mod generator;
pub mod monitor;
