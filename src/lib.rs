//! Exhaustive search for the third-register value that makes an
//! Ackermann-like routine over the mod-32768 domain hit a target output.

pub mod confirm;
pub mod mod_arith;
pub mod search;
