use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the main document part of a .docx and returns its paragraphs, one per line.
pub(super) fn read_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
    paragraphs_to_text(&xml)
}

/// Collects `w:t` runs, mapping `w:tab` to a tab and `w:br`/paragraph ends to newlines.
fn paragraphs_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Maria Souza</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Executiva de </w:t></w:r><w:r><w:t>Contas &amp; Vendas</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>2019</w:t><w:tab/><w:t>Acme</w:t><w:br/><w:t>Meta batida em 120%</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let text = paragraphs_to_text(BODY).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Maria Souza");
        assert_eq!(lines[1], "Executiva de Contas & Vendas");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "2019\tAcme");
        assert_eq!(lines[4], "Meta batida em 120%");
    }

    #[test]
    fn test_whitespace_between_elements_is_ignored() {
        let text = paragraphs_to_text(BODY).unwrap();
        assert!(!text.starts_with(char::is_whitespace));
    }

    #[test]
    fn test_read_docx_from_archive() {
        let bytes = build_docx(BODY);
        let text = read_docx(&bytes).unwrap();
        assert!(text.contains("Maria Souza"));
        assert!(text.contains("Meta batida em 120%"));
    }

    #[test]
    fn test_archive_without_document_part_is_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(matches!(read_docx(&bytes), Err(ExtractError::Zip(_))));
    }
}
