//! Training-file intake: only plain text and markdown are read, everything
//! else is stored as a short description of the file.

use uuid::Uuid;

use crate::models::NewTrainingFile;

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Declared content type, or the file extension when none was sent.
    pub fn file_type(&self) -> String {
        match self.content_type.as_deref() {
            Some(ct) if !ct.is_empty() => ct.to_string(),
            _ => file_extension(&self.file_name),
        }
    }

    pub fn is_text(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text"))
            || self.file_name.ends_with(".txt")
            || self.file_name.ends_with(".md")
    }

    /// Text content, or the placeholder for types that need server-side
    /// extraction.
    pub fn extract_content(&self) -> String {
        if self.is_text() {
            return String::from_utf8_lossy(&self.bytes).into_owned();
        }
        format!(
            "[文件名: {}, 类型: {}, 大小: {}]\n注意：该文件类型的内容提取需要服务器端处理。",
            self.file_name,
            self.content_type.as_deref().unwrap_or(""),
            format_file_size(self.bytes.len() as u64)
        )
    }

    pub fn into_training_file(self, agent_id: Uuid) -> NewTrainingFile {
        NewTrainingFile {
            agent_id,
            file_type: self.file_type(),
            file_size: self.bytes.len() as i64,
            content: self.extract_content(),
            file_name: self.file_name,
        }
    }
}

/// Text after the last `.`; the whole name when there is none.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit('.').next() {
        Some(ext) if !ext.is_empty() => ext.to_string(),
        _ => "unknown".to_string(),
    }
}

/// Human-readable size with two decimals at most: `0 Bytes`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exponent = 0;
    while exponent + 1 < UNITS.len() && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let scaled = (bytes as f64 / 1024f64.powi(exponent as i32) * 100.0).round() / 100.0;
    format!("{} {}", scaled, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: Option<&str>, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn sizes_match_display_format() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_file_size(1263), "1.23 KB");
    }

    #[test]
    fn markdown_is_read_even_without_type() {
        let file = upload("notes.md", None, "春天的风很温柔".as_bytes());
        assert!(file.is_text());
        assert_eq!(file.extract_content(), "春天的风很温柔");
        assert_eq!(file.file_type(), "md");
    }

    #[test]
    fn binary_files_become_a_placeholder() {
        let file = upload("poems.pdf", Some("application/pdf"), &[0u8; 2048]);
        let content = file.extract_content();
        assert_eq!(
            content,
            "[文件名: poems.pdf, 类型: application/pdf, 大小: 2 KB]\n注意：该文件类型的内容提取需要服务器端处理。"
        );
    }

    #[test]
    fn training_record_keeps_size_and_type() {
        let agent = Uuid::now_v7();
        let record = upload("a.txt", Some("text/plain"), b"hello").into_training_file(agent);
        assert_eq!(record.agent_id, agent);
        assert_eq!(record.file_size, 5);
        assert_eq!(record.file_type, "text/plain");
        assert_eq!(record.content, "hello");
    }

    #[test]
    fn extension_fallbacks() {
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("trailing."), "unknown");
    }
}
