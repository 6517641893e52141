pub mod record;
pub mod store;
pub mod lookup;
pub mod io;
pub mod error;

mod constants;
