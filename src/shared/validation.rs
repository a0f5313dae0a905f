use thiserror::Error;

use crate::core::config::UploadConfig;
use crate::modules::storage::extension_of;

/// Reason an upload was refused before anything touched the disk
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("File size exceeds maximum allowed size: {max_file_size} bytes")]
    SizeExceeded { max_file_size: u64 },

    #[error("File extension not allowed: {extension}")]
    ExtensionNotAllowed { extension: String },
}

/// Size and extension rules applied to every upload.
///
/// A zero `max_file_size` or an empty `allowed_extensions` list disables the
/// corresponding check.
#[derive(Debug, Clone, Default)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_file_size, config.allowed_extensions.clone())
    }

    pub fn validate(&self, file_size: u64, filename: &str) -> Result<(), PolicyViolation> {
        if self.max_file_size > 0 && file_size > self.max_file_size {
            return Err(PolicyViolation::SizeExceeded {
                max_file_size: self.max_file_size,
            });
        }

        if !self.allowed_extensions.is_empty() {
            let extension = extension_of(filename);
            if !self.allowed_extensions.iter().any(|e| *e == extension) {
                return Err(PolicyViolation::ExtensionNotAllowed { extension });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_policy_accepts_everything() {
        let policy = UploadPolicy::default();
        assert!(policy.validate(u64::MAX, "anything.exe").is_ok());
        assert!(policy.validate(0, "no_extension").is_ok());
    }

    #[test]
    fn test_size_limit() {
        let policy = UploadPolicy::new(10, vec![]);
        assert!(policy.validate(10, "a.txt").is_ok());
        assert_eq!(
            policy.validate(11, "a.txt"),
            Err(PolicyViolation::SizeExceeded { max_file_size: 10 })
        );
    }

    #[test]
    fn test_extension_allow_list_is_case_insensitive() {
        let policy = UploadPolicy::new(0, vec![".txt".into(), ".pdf".into()]);
        assert!(policy.validate(1, "notes.TXT").is_ok());
        assert!(policy.validate(1, "report.pdf").is_ok());
        assert_eq!(
            policy.validate(1, "photo.png"),
            Err(PolicyViolation::ExtensionNotAllowed {
                extension: ".png".into()
            })
        );
        assert_eq!(
            policy.validate(1, "README"),
            Err(PolicyViolation::ExtensionNotAllowed {
                extension: String::new()
            })
        );
    }

    #[test]
    fn test_size_checked_before_extension() {
        let policy = UploadPolicy::new(5, vec![".txt".into()]);
        assert!(matches!(
            policy.validate(6, "photo.png"),
            Err(PolicyViolation::SizeExceeded { .. })
        ));
    }

    #[test]
    fn test_violation_messages() {
        assert_eq!(
            PolicyViolation::SizeExceeded { max_file_size: 10 }.to_string(),
            "File size exceeds maximum allowed size: 10 bytes"
        );
        assert_eq!(
            PolicyViolation::ExtensionNotAllowed {
                extension: ".exe".into()
            }
            .to_string(),
            "File extension not allowed: .exe"
        );
    }
}
