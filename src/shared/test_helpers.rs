#[cfg(test)]
pub use in_memory::InMemoryFileRepository;
