//! Live adapters that run the external tools.

pub mod imagemagick;
