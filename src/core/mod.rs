pub mod aggregate;
pub mod config;
pub mod extract;
pub mod fastqc;
pub mod inputs;
pub mod io;
pub mod model;
pub mod overrep;
