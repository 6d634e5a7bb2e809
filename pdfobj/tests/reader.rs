use std::io::Cursor;

use pdfobj::{
    pdf::{Array, Dictionary, IndirectObject, Name, Object, ObjectPointer, PdfString, Stream},
    CipherMode, Crypt, DiagnosticKind, Error, ObjectReader, ParseContext,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dict<const N: usize>(entries: [(&str, Object); N]) -> Dictionary {
    entries
        .into_iter()
        .map(|(k, v)| (Name::from(k), v))
        .collect()
}

const DOCUMENT: &[u8] = b"%PDF-1.4
%\xbf\xbf\xbf\xbf
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /Contents 4 0 R /MediaBox [0 0 612 792] >>
endobj
4 0 obj
<< /Length 13 >>
stream
BT (Hi) Tj ET
endstream
endobj
5 0 obj
(tail)
endobj
";

fn offset_of(needle: &[u8]) -> u64 {
    DOCUMENT
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap() as u64
}

#[test]
fn reads_every_object_of_a_document() {
    init_logger();
    let mut reader = ObjectReader::from_bytes(DOCUMENT);

    let mut objects = Vec::new();
    loop {
        let parsed = match reader.parse_next().unwrap() {
            Some(parsed) => parsed,
            None => break,
        };
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        if let Object::Indirect(IndirectObject { object, .. }) = &parsed.object {
            if let Object::Stream(stream) = object.as_ref() {
                // skip the payload like a document reader with a known length would
                let end = stream.payload_offset + stream.length().unwrap();
                reader.seek_forward(end).unwrap();
                assert_eq!(reader.read_token().unwrap().unwrap(), keyword("endstream"));
                assert_eq!(reader.read_token().unwrap().unwrap(), keyword("endobj"));
            }
        }
        objects.push(parsed.object);
    }

    assert_eq!(objects.len(), 5);
    assert_eq!(
        objects[0],
        Object::Indirect(IndirectObject::new(
            ObjectPointer::new(1, 0),
            Object::Dictionary(dict([
                ("Type", Object::Name(Name::from("Catalog"))),
                ("Pages", Object::Reference(ObjectPointer::new(2, 0))),
            ]))
        ))
    );
    assert_eq!(
        objects[2].indirect().unwrap().object.dictionary().unwrap()[&b"MediaBox"[..]],
        Object::Array(Array::from([
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]))
    );
    assert_eq!(
        objects[3],
        Object::Indirect(IndirectObject::new(
            ObjectPointer::new(4, 0),
            Object::Stream(Stream {
                dictionary: dict([("Length", Object::Integer(13))]),
                pointer: ObjectPointer::new(4, 0),
                payload_offset: offset_of(b"BT (Hi)"),
            })
        ))
    );
    assert_eq!(
        objects[4],
        Object::Indirect(IndirectObject::new(
            ObjectPointer::new(5, 0),
            Object::String("tail".into())
        ))
    );
}

fn keyword(s: &str) -> pdfobj::parse::Token {
    pdfobj::parse::Token::Keyword(s.into())
}

#[test]
fn seeks_to_object_offsets() {
    init_logger();
    let mut reader = ObjectReader::new(Cursor::new(DOCUMENT));

    reader.seek(offset_of(b"3 0 obj")).unwrap();
    let page = reader.parse_object().unwrap().object;
    assert_eq!(page.indirect().unwrap().pointer, ObjectPointer::new(3, 0));

    // going backwards works as well
    reader.seek(offset_of(b"1 0 obj")).unwrap();
    let catalog = reader.parse_object().unwrap().object;
    assert_eq!(catalog.indirect().unwrap().pointer, ObjectPointer::new(1, 0));
}

#[test]
fn reads_from_a_known_offset() {
    init_logger();
    let start = offset_of(b"4 0 obj");
    let tail = &DOCUMENT[start as usize..];
    let mut reader = ObjectReader::at_offset(tail, start);

    let parsed = reader.parse_object().unwrap();
    let stream = parsed.object.indirect().unwrap().object.stream().unwrap();
    assert_eq!(stream.payload_offset, offset_of(b"BT (Hi)"));
}

#[test]
fn parses_an_object_body_with_a_caller_context() {
    init_logger();
    fn rot(_key: &[u8], mode: CipherMode, object: ObjectPointer, data: Vec<u8>) -> Vec<u8> {
        assert_eq!(mode, CipherMode::Aes);
        data.into_iter()
            .map(|b| b.wrapping_sub(object.id as u8))
            .collect()
    }

    let ctx = ParseContext::new()
        .with_crypt(Crypt::new(b"secret".to_vec(), CipherMode::Aes, rot))
        .with_object(ObjectPointer::new(2, 0));

    // the collaborator has already consumed `2 0 obj`
    let mut reader = ObjectReader::from_bytes(b"<< /Title (JK) /Nested [<4A4B>] >>");
    let parsed = reader.parse_object_with(&ctx).unwrap();
    assert_eq!(
        parsed.object,
        Object::Dictionary(dict([
            ("Title", Object::String("HI".into())),
            ("Nested", Object::from(vec![Object::String("HI".into())])),
        ]))
    );
}

#[test]
fn reports_recoverable_problems_with_the_result() {
    init_logger();
    let mut reader = ObjectReader::from_bytes(
        b"7 0 obj << /Bad#G1 (a\\qb) /Hex <41 4Z> 12 /Oct (\\400) >> 8 0 obj null endobj",
    );

    let parsed = reader.parse_object().unwrap();
    let kinds: Vec<_> = parsed.diagnostics.iter().map(|d| d.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::MalformedNameEscape,
            DiagnosticKind::InvalidEscapeSequence(b'q'),
            DiagnosticKind::MalformedHexString,
            DiagnosticKind::NonNameDictKey,
            DiagnosticKind::InvalidOctalEscape(0o400),
            DiagnosticKind::MissingEndobj,
        ]
    );
    assert_eq!(
        parsed.object,
        Object::Indirect(IndirectObject::new(
            ObjectPointer::new(7, 0),
            Object::Dictionary(dict([
                ("Bad#G1", Object::String("a\\qb".into())),
                ("Hex", Object::String("A".into())),
                ("Oct", Object::String(vec![0u8].into())),
            ]))
        ))
    );

    // nothing was lost for the following definition
    let next = reader.parse_object().unwrap();
    assert!(next.diagnostics.is_empty());
    assert_eq!(
        next.object,
        Object::Indirect(IndirectObject::new(ObjectPointer::new(8, 0), Object::Null))
    );
}

#[test]
fn keeps_diagnostics_of_failed_parses() {
    init_logger();
    let mut reader = ObjectReader::from_bytes(b"[<4G>] endobj 1");
    assert!(reader.parse_object().unwrap().diagnostics.len() == 1);

    assert!(matches!(reader.parse_object(), Err(Error::UnexpectedKeyword { .. })));
    let mut reader = ObjectReader::from_bytes(b"[(\\777) >] 1");
    assert!(matches!(
        reader.parse_object(),
        Err(Error::UnexpectedDelimiter { .. })
    ));
    assert_eq!(
        reader.take_diagnostics()[0].kind,
        DiagnosticKind::InvalidOctalEscape(0o777)
    );
}

#[test]
fn surfaces_io_errors() {
    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
        }
    }

    let mut reader = ObjectReader::new(Broken);
    assert!(matches!(reader.parse_object(), Err(Error::Io(_))));
}

#[test]
fn parse_helpers() {
    assert_eq!(
        pdfobj::parse_bytes(b"<</A 1>>").unwrap().object,
        Object::Dictionary(dict([("A", Object::Integer(1))]))
    );
    let all = pdfobj::parse_all(b"1 2 0 R (x) /N").unwrap();
    assert_eq!(
        all.into_iter().map(|p| p.object).collect::<Vec<_>>(),
        vec![
            Object::Integer(1),
            Object::Reference(ObjectPointer::new(2, 0)),
            Object::String("x".into()),
            Object::Name(Name::from("N")),
        ]
    );
}

#[test]
fn input_ending_inside_a_token_is_an_error() {
    init_logger();
    assert!(pdfobj::parse_all(b"(abc").unwrap_err().is_end_of_input());
    assert!(matches!(pdfobj::parse_all(b"5 <41"), Err(Error::EndOfInput)));

    // the integer before the truncated string is still delivered
    let mut reader = ObjectReader::from_bytes(b"5 (abc");
    let results: Vec<_> = reader.objects().collect();
    assert_eq!(results.len(), 2);
    assert!(matches!(&results[0], Ok(parsed) if parsed.object == Object::Integer(5)));
    assert!(matches!(results[1], Err(Error::EndOfInput)));

    // trailing whitespace and comments are a clean end
    assert_eq!(pdfobj::parse_all(b"5 % done").unwrap().len(), 1);
    assert!(ObjectReader::from_bytes(b"(abc").parse_next().is_err());
}

#[test]
fn truncated_strings_are_kept_when_end_of_input_is_allowed() {
    let mut reader = ObjectReader::from_bytes(b"5 (abc");
    reader.set_allow_eof(true);
    assert_eq!(reader.parse_object().unwrap().object, Object::Integer(5));
    let parsed = reader.parse_object().unwrap();
    assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::UnterminatedString);
    let bytes = parsed.object.string().cloned().map(PdfString::into_bytes);
    assert_eq!(bytes, Some(b"abc".to_vec()));
    assert!(reader.parse_next().unwrap().is_none());
}
