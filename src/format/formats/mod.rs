//! Format implementations.

mod regions_json;

#[cfg(test)]
mod tests;

pub use regions_json::RegionsJsonFormat;
