//! Elementary cellular automata on a ring of cells.
//!
//! ```
//! use ecell::row::Row;
//! use ecell::universe::Universe;
//!
//! let mut uni = Universe::configure(30, Some(Row::from(1u32 << 15))).unwrap();
//! uni.simulate(31);
//! assert_eq!(uni.generation(), 31);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod orbit;
pub mod rle;
pub mod row;
pub mod rule;
pub mod session;
pub mod universe;

pub use error::{Error, Result};
pub use row::Row;
pub use rule::Rule;
pub use universe::{run, step, Generations, Universe};
