mod file;

pub use file::{ExtensionStat, FileRecord, FileStats, NewFileRecord};
