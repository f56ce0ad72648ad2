use crate::config::{AllowedTypes, UploadConfig};
use crate::size::format_size;

pub const IMAGE_MIME_PREFIX: &str = "image/";

/// What the validator needs to know about a picked file.
pub trait CandidateFile {
    fn size(&self) -> u64;
    fn mime_type(&self) -> String;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileInfo {
    pub fn new(name: &str, size: u64, mime: &str) -> Self {
        Self {
            name: name.to_string(),
            size,
            mime: mime.to_string(),
        }
    }
}

impl CandidateFile for FileInfo {
    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> String {
        self.mime.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File should not be more than {limit}.")]
    SizeExceeded { limit: String },
    #[error("File must be an image{}", types_suffix(.allowed))]
    TypeNotAllowed { allowed: Option<Vec<String>> },
}

fn types_suffix(allowed: &Option<Vec<String>>) -> String {
    match allowed {
        Some(subtypes) => format!(" of types: {}.", subtypes.join(", ")),
        None => String::new(),
    }
}

/// Runs the size and type checks. Both always run; size comes first.
pub fn validate<F: CandidateFile + ?Sized>(file: &F, config: &UploadConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(max_bytes) = config.max_size.bytes() {
        if file.size() > max_bytes {
            errors.push(ValidationError::SizeExceeded {
                limit: format_size(max_bytes),
            });
        }
    }
    let mime = file.mime_type();
    match &config.allowed {
        AllowedTypes::Any => {
            if !mime.starts_with(IMAGE_MIME_PREFIX) {
                errors.push(ValidationError::TypeNotAllowed { allowed: None });
            }
        }
        AllowedTypes::Only(subtypes) => {
            let matched = mime
                .strip_prefix(IMAGE_MIME_PREFIX)
                .is_some_and(|subtype| subtypes.iter().any(|allowed| allowed == subtype));
            if !matched {
                errors.push(ValidationError::TypeNotAllowed {
                    allowed: Some(subtypes.clone()),
                });
            }
        }
    }
    errors
}

pub fn validate_messages<F: CandidateFile + ?Sized>(file: &F, config: &UploadConfig) -> Vec<String> {
    validate(file, config)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeLimit;

    fn config(max_kb: Option<u64>, types: Option<&[&str]>) -> UploadConfig {
        UploadConfig {
            max_size: max_kb
                .map(|kb| SizeLimit::Bytes(kb * 1024))
                .unwrap_or(SizeLimit::Unbounded),
            allowed: types
                .map(|types| AllowedTypes::Only(types.iter().map(|t| t.to_string()).collect()))
                .unwrap_or(AllowedTypes::Any),
            ..UploadConfig::default()
        }
    }

    #[test]
    fn any_image_passes_without_limits() {
        let config = config(None, None);
        for mime in ["image/png", "image/svg+xml", "image/x-icon"] {
            let file = FileInfo::new("a", u64::MAX, mime);
            assert!(validate(&file, &config).is_empty(), "{mime}");
        }
    }

    #[test]
    fn wildcard_still_requires_image_prefix() {
        let file = FileInfo::new("notes.txt", 10, "text/plain");
        assert_eq!(
            validate_messages(&file, &config(None, None)),
            vec!["File must be an image".to_string()]
        );
    }

    #[test]
    fn size_limit_is_inclusive() {
        let config = config(Some(1), None);
        assert!(validate(&FileInfo::new("a", 1024, "image/png"), &config).is_empty());
        assert_eq!(
            validate_messages(&FileInfo::new("a", 1025, "image/png"), &config),
            vec!["File should not be more than 1KB.".to_string()]
        );
    }

    #[test]
    fn subtype_must_match_exactly() {
        let config = config(None, Some(&["png", "jpeg"]));
        assert!(validate(&FileInfo::new("a", 1, "image/jpeg"), &config).is_empty());
        for mime in ["image/jpg", "image/pngx", "png", "", "text/png"] {
            assert_eq!(
                validate_messages(&FileInfo::new("a", 1, mime), &config),
                vec!["File must be an image of types: png, jpeg.".to_string()],
                "{mime}"
            );
        }
    }

    #[test]
    fn both_errors_reported_size_first() {
        let config = config(Some(1024), Some(&["png"]));
        let errors = validate(&FileInfo::new("a.gif", 4 * 1024 * 1024, "image/gif"), &config);
        assert_eq!(
            errors,
            vec![
                ValidationError::SizeExceeded {
                    limit: "1MB".to_string()
                },
                ValidationError::TypeNotAllowed {
                    allowed: Some(vec!["png".to_string()])
                },
            ]
        );
    }
}
