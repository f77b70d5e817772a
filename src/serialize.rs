//! Serialization of the report tree into the jUnit-style XML document.

use crate::error::Result;
use crate::model::{Case, PROJECT_LABEL, Report, Suite, Variation};
use std::io::Write;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

/// Render `report` as a pretty-printed XML document.
///
/// Rendering is a pure function of the tree; the same report always yields the
/// same bytes.
pub fn to_xml(report: &Report) -> Result<String> {
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .write_document_declaration(true)
        .create_writer(Vec::new());

    writer.write(XmlEvent::StartDocument {
        version: XmlVersion::Version10,
        encoding: Some("UTF-8"),
        standalone: None,
    })?;

    let name = sanitize(&report.name);
    writer.write(XmlEvent::start_element("resource").attr("name", &name))?;
    for suite in &report.suites {
        write_suite(&mut writer, suite)?;
    }
    writer.write(XmlEvent::end_element())?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_suite<W: Write>(writer: &mut EventWriter<W>, suite: &Suite) -> Result<()> {
    let start = suite.start.to_string();
    let end = timestamp(suite.end);
    let name = sanitize(&suite.name);
    let total = suite.total_tests.to_string();
    writer.write(
        XmlEvent::start_element("testsuite")
            .attr("start", &start)
            .attr("end", &end)
            .attr("name", &name)
            .attr("totalTests", &total),
    )?;
    for case in &suite.cases {
        write_case(writer, case)?;
    }
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

fn write_case<W: Write>(writer: &mut EventWriter<W>, case: &Case) -> Result<()> {
    let start = case.start.to_string();
    let end = timestamp(case.end);
    let name = sanitize(&case.name);
    let result = case.result.map(|r| r.as_str()).unwrap_or(UNRESOLVED);
    writer.write(
        XmlEvent::start_element("testcase")
            .attr("start", &start)
            .attr("end", &end)
            .attr("name", &name)
            .attr("result", result),
    )?;
    for variation in &case.variations {
        write_variation(writer, variation)?;
    }
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

fn write_variation<W: Write>(writer: &mut EventWriter<W>, variation: &Variation) -> Result<()> {
    let start = variation.start.to_string();
    let end = timestamp(variation.end);
    let name = sanitize(&variation.name);
    writer.write(
        XmlEvent::start_element("variation")
            .attr("start", &start)
            .attr("end", &end)
            .attr("name", &name),
    )?;

    writer.write(XmlEvent::start_element("severity"))?;
    writer.write(XmlEvent::characters(variation.severity.as_str()))?;
    writer.write(XmlEvent::end_element())?;

    writer.write(XmlEvent::start_element("description"))?;
    write_text(writer, &sanitize(&variation.description))?;
    writer.write(XmlEvent::end_element())?;

    writer.write(XmlEvent::start_element("resource"))?;
    writer.write(XmlEvent::characters(PROJECT_LABEL))?;
    writer.write(XmlEvent::end_element())?;

    writer.write(XmlEvent::end_element())?;
    Ok(())
}

/// Plain text when nothing needs escaping, CDATA otherwise.
fn write_text<W: Write>(writer: &mut EventWriter<W>, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    if !text.contains(['<', '>', '&']) {
        writer.write(XmlEvent::characters(text))?;
        return Ok(());
    }
    // A CDATA section cannot contain its own terminator, so `]]>` is split
    // between two adjacent sections.
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        writer.write(XmlEvent::cdata(&rest[..pos + 2]))?;
        rest = &rest[pos + 2..];
    }
    writer.write(XmlEvent::cdata(rest))?;
    Ok(())
}

/// Written for an end time or result that was never resolved.
const UNRESOLVED: &str = "null";

fn timestamp(value: Option<u64>) -> String {
    value.map_or_else(|| UNRESOLVED.to_string(), |v| v.to_string())
}

/// Drop characters XML 1.0 does not allow anywhere in a document.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CaseResult, Severity};

    fn sample(description: &str) -> Report {
        let mut report = Report::default();
        let mut suite = Suite::open("Login [Chrome]".into(), 10);
        let mut case = Case::open("can log in".into(), 11);
        case.variations.push(Variation {
            start: 12,
            end: Some(13),
            name: "title".into(),
            severity: Severity::Pass,
            description: description.into(),
        });
        case.end = Some(13);
        case.result = Some(CaseResult::Passed);
        suite.cases.push(case);
        suite.total_tests = 1;
        suite.end = Some(14);
        report.suites.push(suite);
        report
    }

    #[test]
    fn test_declaration_and_root() {
        let xml = to_xml(&Report::default()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<resource name="DalekJSTest""#));
    }

    #[test]
    fn test_render_nested_elements() {
        let xml = to_xml(&sample("ok")).unwrap();
        assert!(xml.contains(
            r#"<testsuite start="10" end="14" name="Login [Chrome]" totalTests="1">"#
        ));
        assert!(xml.contains(r#"<testcase start="11" end="13" name="can log in" result="Passed">"#));
        assert!(xml.contains(r#"<variation start="12" end="13" name="title">"#));
        assert!(xml.contains("<severity>pass</severity>"));
        assert!(xml.contains("<description>ok</description>"));
        assert!(xml.contains("<resource>DalekJSTest</resource>"));
        // pretty printed
        assert!(xml.contains("\n  <testsuite"));
    }

    #[test]
    fn test_markup_goes_into_cdata() {
        let xml = to_xml(&sample("a < b && c")).unwrap();
        assert!(xml.contains("<description><![CDATA[a < b && c]]></description>"));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let xml = to_xml(&sample("x]]>y <z>")).unwrap();
        assert!(xml.contains("<![CDATA[x]]]]><![CDATA[>y <z>]]>"));
    }

    #[test]
    fn test_unfinished_entities_render_null() {
        let mut report = Report::default();
        let mut suite = Suite::open("Open".into(), 5);
        suite.cases.push(Case::open("pending".into(), 6));
        report.suites.push(suite);
        let xml = to_xml(&report).unwrap();
        assert!(xml.contains(r#"<testsuite start="5" end="null" name="Open" totalTests="0">"#));
        assert!(xml.contains(r#"<testcase start="6" end="null" name="pending" result="null""#));
    }

    #[test]
    fn test_sanitize_drops_control_characters() {
        assert_eq!(sanitize("a\u{1}b\tc\u{FFFF}"), "ab\tc");
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = sample("same");
        assert_eq!(to_xml(&report).unwrap(), to_xml(&report).unwrap());
    }
}
