//! Integration tests for the parse, read and build entry points.
//!
//! Each test drives the public API end to end on complete messages.

use emlkit::boundary::SequentialBoundary;
use emlkit::{
    Attachment, Body, BuildOptions, Diagnostic, EmailAddress, ParseOptions, ReadOptions,
    SemanticMessage, build, build_with, parse, parse_with, read, read_parsed, rebuild,
};

const SIMPLE: &str = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                      From: \"Sender\" <sender@example.com>\r\n\
                      Subject: Test Email\r\n\
                      Content-Type: text/plain; charset=utf-8\r\n\
                      \r\n\
                      This is the body of the email.\r\n";

const NESTED: &str = "Date: Tue, 01 Oct 2024 09:30:00 +0200\r\n\
                      From: Alice <alice@example.com>\r\n\
                      To: Bob <bob@example.com>, carol@example.com\r\n\
                      Subject: =?UTF-8?B?UXVhcnRlcmx5IHJlcG9ydA==?=\r\n\
                      Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                      \r\n\
                      --outer\r\n\
                      Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
                      \r\n\
                      --inner\r\n\
                      Content-Type: text/plain; charset=utf-8\r\n\
                      \r\n\
                      Plain text part.\r\n\
                      --inner\r\n\
                      Content-Type: text/html; charset=utf-8\r\n\
                      \r\n\
                      <p>HTML part.</p>\r\n\
                      --inner--\r\n\
                      --outer\r\n\
                      Content-Type: application/octet-stream\r\n\
                      Content-Disposition: attachment; filename=\"dummy.pdf\"\r\n\
                      Content-Transfer-Encoding: base64\r\n\
                      \r\n\
                      JVBERi0xLjQK\r\n\
                      --outer--\r\n";

#[test]
fn test_concrete_scenario() {
    let message = read(SIMPLE, &ReadOptions::default()).unwrap();

    assert_eq!(message.subject.as_deref(), Some("Test Email"));
    assert_eq!(
        message.from,
        Some(vec![EmailAddress::new("Sender", "sender@example.com")])
    );
    assert_eq!(message.text.as_deref(), Some("This is the body of the email."));
    assert_eq!(message.html, None);
    assert!(message.attachments.is_empty());
}

#[test]
fn test_date_is_required() {
    let eml = "From: sender@example.com\r\n\
               Subject: No Date\r\n\
               Content-Type: text/plain; charset=utf-8\r\n\
               \r\n\
               This email has no date.\r\n";
    let err = read(eml, &ReadOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Required Date header is missing");
}

#[test]
fn test_multipart_block_count() {
    for count in 1..=5 {
        let mut eml = String::from("Content-Type: multipart/mixed; boundary=\"sep\"\r\n\r\n");
        for index in 0..count {
            eml.push_str(&format!(
                "--sep\r\nContent-Type: text/plain\r\n\r\npart {index}\r\n"
            ));
        }
        eml.push_str("\r\n--sep--\r\n");

        let part = parse(&eml, &ParseOptions::default());
        assert_eq!(part.parts().len(), count);
        assert!(part.parts().iter().all(|block| block.boundary == "sep"));
    }
}

#[test]
fn test_nested_multipart_structure() {
    let part = parse(NESTED, &ParseOptions::default());
    let outer = part.parts();
    assert_eq!(outer.len(), 2);
    assert_eq!(outer[0].part.parts().len(), 2);
    assert!(matches!(outer[1].part.body, Some(Body::Text(_))));
}

#[test]
fn test_nested_multipart_read() {
    let message = read(NESTED, &ReadOptions::default()).unwrap();

    assert_eq!(message.subject.as_deref(), Some("Quarterly report"));
    assert_eq!(
        message.to,
        Some(vec![
            EmailAddress::new("Bob", "bob@example.com"),
            EmailAddress::new("", "carol@example.com"),
        ])
    );
    assert_eq!(message.text.as_deref(), Some("Plain text part."));
    assert_eq!(message.html.as_deref(), Some("<p>HTML part.</p>"));
    assert_eq!(
        message.multipart_alternative.as_deref(),
        Some("multipart/alternative; boundary=\"inner\"")
    );
    assert_eq!(message.attachments.len(), 1);
    assert_eq!(message.attachments[0].name.as_deref(), Some("dummy.pdf"));
    assert_eq!(message.attachments[0].data, b"%PDF-1.4\n");
}

#[test]
fn test_folded_header_round_trip() {
    let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
               X-Long: first line\r\n\
               \t  second line\r\n\
               \x20third line\r\n\
               Content-Type: text/plain\r\n\
               \r\n\
               body";
    let part = parse(eml, &ParseOptions::default());
    assert_eq!(
        part.headers.get("X-Long"),
        Some("first line\r\nsecond line\r\nthird line")
    );
}

#[test]
fn test_attachment_round_trip() {
    let mut message = SemanticMessage::new("Mon, 23 Sep 2024 10:00:00 +0000");
    message.headers.append("Date", "Mon, 23 Sep 2024 10:00:00 +0000");
    message
        .attachments
        .push(Attachment::new(b"Hello World".to_vec()).with_name("hello.txt"));

    let eml = build(&message, &BuildOptions::default()).unwrap();
    let reread = read_parsed(&parse(&eml, &ParseOptions::default())).unwrap();

    assert_eq!(reread.attachments.len(), 1);
    assert_eq!(reread.attachments[0].data, b"Hello World");
    assert_eq!(reread.attachments[0].name.as_deref(), Some("hello.txt"));
}

#[test]
fn test_large_binary_attachment_round_trip() {
    let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let mut message = SemanticMessage::new("Mon, 23 Sep 2024 10:00:00 +0000");
    message.headers.append("Date", "Mon, 23 Sep 2024 10:00:00 +0000");
    message
        .headers
        .append("Content-Type", "multipart/mixed; boundary=\"bin\"");
    message.text = Some("see attachment".into());
    message.attachments.push(
        Attachment::new(data.clone())
            .with_name("blob.bin")
            .with_content_type("application/octet-stream"),
    );

    let eml = build(&message, &BuildOptions::default()).unwrap();
    assert!(eml.lines().all(|line| line.len() <= 78));

    let reread = read(&eml, &ReadOptions::default()).unwrap();
    assert_eq!(reread.text.as_deref(), Some("see attachment"));
    assert_eq!(reread.attachments.len(), 1);
    assert_eq!(reread.attachments[0].data, data);
}

#[test]
fn test_synthesized_boundary_is_not_closed() {
    let mut message = SemanticMessage::new("Mon, 23 Sep 2024 10:00:00 +0000");
    message.headers.append("Date", "Mon, 23 Sep 2024 10:00:00 +0000");
    message.text = Some("Hello".into());

    let eml = build_with(
        &message,
        &BuildOptions::default(),
        &SequentialBoundary::new("quirk"),
    )
    .unwrap();

    assert!(eml.contains("Content-Type: multipart/mixed;\r\n  boundary=\"----=quirk0001\"\r\n"));
    assert!(!eml.contains("------=quirk0001"));
}

#[test]
fn test_rebuild_alternative_message() {
    let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\n\
               From: sender@example.com\r\n\
               Subject: Multipart Alternative Email\r\n\
               Content-Type: multipart/alternative; boundary=\"alt\"\r\n\
               \r\n\
               --alt\r\n\
               Content-Type: text/plain; charset=utf-8\r\n\
               \r\n\
               This is the plain text version.\r\n\
               --alt\r\n\
               Content-Type: text/html; charset=utf-8\r\n\
               \r\n\
               <p>This is the <b>HTML</b> version.</p>\r\n\
               --alt--\r\n";

    let rebuilt = rebuild(eml, &ReadOptions::default(), &BuildOptions::default()).unwrap();
    assert!(rebuilt.contains("From: <sender@example.com>\r\n"));

    let message = read(&rebuilt, &ReadOptions::default()).unwrap();
    assert_eq!(
        message.subject.as_deref(),
        Some("Multipart Alternative Email")
    );
    assert_eq!(message.text.as_deref(), Some("This is the plain text version."));
    assert_eq!(
        message.html.as_deref(),
        Some("<p>This is the <b>HTML</b> version.</p>")
    );
}

#[test]
fn test_diagnostics_are_collected() {
    let eml = "Subject: loose\r\n\r\nno content type here\r\n";
    let mut diagnostics = Vec::new();
    let part = parse_with(eml, &ParseOptions::default(), &mut diagnostics);

    assert_eq!(part.text(), Some("no content type here"));
    assert_eq!(diagnostics, vec![Diagnostic::MissingContentType]);
}
