//! Analog inputs.  The board has one: the speed knob.

pub mod frequency_pot;
