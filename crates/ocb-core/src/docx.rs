//! Text extraction from `.docx` containers.
//!
//! A `.docx` file is a zip archive whose main text lives in
//! `word/document.xml`. Extraction concatenates the literal text nodes in
//! document order, one line per paragraph, and ignores images, styles and
//! everything else in the package.

use std::{
    io::{Read, Seek},
    path::Path,
};

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use zip::ZipArchive;

use crate::{errors::Error, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extension gate, applied before any download or extraction work.
pub fn is_docx(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".docx")
}

/// Extract the visible text of a `.docx` file on disk.
pub fn extract_text(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)?;
    extract_text_from(file)
}

/// Extraction core, generic over the reader so tests can feed an in-memory
/// archive.
pub fn extract_text_from<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| Error::Extraction(format!("not a valid docx archive: {e}")))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| Error::Extraction(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| Error::Extraction(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<String> {
    let mut reader = XmlReader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = true,
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_node {
                    let value = e
                        .unescape()
                        .map_err(|err| Error::Extraction(format!("bad text node: {err}")))?;
                    output.push_str(&value);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = false,
                // Paragraph boundary.
                b"w:p" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(Error::Extraction(format!("malformed document xml: {err}")))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(output.trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            zip.start_file(DOCUMENT_PART, FileOptions::default())
                .unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    const TWO_PARAGRAPHS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Hello</w:t></w:r></w:p>
    <w:p><w:r><w:t>World</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn concatenates_paragraph_text_with_newlines() {
        let bytes = docx_bytes(TWO_PARAGRAPHS);
        let text = extract_text_from(Cursor::new(bytes)).unwrap();
        assert_eq!(text, "Hello\nWorld");
    }

    #[test]
    fn ignores_non_text_markup() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:jc w:val="center"/></w:pPr>
      <w:r><w:rPr><w:b/></w:rPr><w:t>Bold</w:t></w:r>
      <w:r><w:t xml:space="preserve"> text</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;
        let text = extract_text_from(Cursor::new(docx_bytes(xml))).unwrap();
        assert_eq!(text, "Bold text");
    }

    #[test]
    fn line_break_inside_a_paragraph() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>first</w:t><w:br/><w:t>second</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = extract_text_from(Cursor::new(docx_bytes(xml))).unwrap();
        assert_eq!(text, "first\nsecond");
    }

    #[test]
    fn rejects_non_zip_input() {
        let err = extract_text_from(Cursor::new(b"this is not a zip".to_vec())).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn rejects_archive_without_document_part() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            zip.start_file("word/other.xml", FileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_text_from(Cursor::new(cursor.into_inner())).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn extension_gate_is_case_insensitive() {
        assert!(is_docx("essay.docx"));
        assert!(is_docx("ESSAY.DOCX"));
        assert!(!is_docx("essay.doc"));
        assert!(!is_docx("essay.pdf"));
        assert!(!is_docx("docx"));
    }
}
