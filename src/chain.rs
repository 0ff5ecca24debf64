// Thin re-export module: implementation is split across `chain/` submodules
// (entry construction, mining, verification, the stateful ledger).

pub mod entry;
pub mod ledger;
pub mod mining;
pub mod verify;

pub use entry::*;
pub use ledger::*;
pub use mining::*;
pub use verify::*;
