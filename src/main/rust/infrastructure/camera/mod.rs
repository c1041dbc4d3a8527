mod name_lookup;
mod nokhwa_backend;

pub use name_lookup::NokhwaNameLookup;
pub use nokhwa_backend::{NokhwaBackend, NokhwaDevice};
