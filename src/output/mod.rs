use serde::{Deserialize, Serialize};

pub mod console;
pub mod export;
pub mod reporter;

pub use reporter::Reporter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Json,
    Text,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            _ => OutputFormat::Json,
        }
    }
}

pub fn add_file_extension(path: &str, format: &OutputFormat) -> String {
    let extension = match format {
        OutputFormat::Json => ".json",
        OutputFormat::Text => ".txt",
    };

    if path.ends_with(extension) {
        path.to_string()
    } else {
        format!("{}{}", path, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(
            add_file_extension("report", &OutputFormat::Json),
            "report.json"
        );
        assert_eq!(
            add_file_extension("report.json", &OutputFormat::Json),
            "report.json"
        );
        assert_eq!(
            add_file_extension("report", &OutputFormat::Text),
            "report.txt"
        );
    }

    #[test]
    fn unknown_format_defaults_to_json() {
        assert!(matches!(OutputFormat::from("yaml"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from("TEXT"), OutputFormat::Text));
    }
}
