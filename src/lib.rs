pub mod annotations;
pub mod calibration;
pub mod grid;
pub mod io;
pub mod overlay;
pub mod projection;
pub mod session;
pub mod types;

mod error;
pub use error::{Error, Result};
