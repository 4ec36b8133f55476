pub mod health;
pub mod registries;
pub mod scans;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;
