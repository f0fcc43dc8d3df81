//! Best-effort document text extraction.
//!
//! The contract is deliberately infallible: extraction problems become part
//! of the returned text (an inline `[PDF parse error]` marker) instead of
//! an error, so an unreadable upload still flows through preview and
//! prompting like any other résumé text.

pub fn document_text(filename: &str, data: &[u8]) -> String {
    if is_pdf(filename, data) {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => format!("[PDF parse error] {e}"),
        }
    } else {
        String::from_utf8_lossy(data).into_owned()
    }
}

fn is_pdf(filename: &str, data: &[u8]) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf") || data.starts_with(b"%PDF")
}
