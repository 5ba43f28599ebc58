//! Translation of xunit-compliant XML test reports into reStructuredText
//! tables, after validating the report against its XSD schema.
//!
//! The schema handling covers the subset of XSD an xunit report actually
//! uses: top-level element declarations, which child elements an element
//! may contain, and which attributes are required. Anything outside that
//! subset in the instance document is rejected, matching the fail-fast
//! behavior expected of report tooling.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Minimal in-memory XML element tree.
#[derive(Clone, Debug, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn required_attr(&self, name: &str) -> Result<&str, String> {
        self.attr(name)
            .ok_or_else(|| format!("element <{}> lacks attribute {name:?}", self.name))
    }

    fn counter(&self, name: &str) -> Result<i64, String> {
        let val = self.required_attr(name)?;
        val.parse()
            .map_err(|e| format!("element <{}> attribute {name}={val:?}: {e}", self.name))
    }

    /// Depth-first traversal of this element and all descendants.
    pub fn iter(&self) -> impl Iterator<Item = &XmlElement> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let element = stack.pop()?;
            // Reverse keeps document order on the stack.
            stack.extend(element.children.iter().rev());
            Some(element)
        })
    }
}

fn element_from_start(start: &BytesStart) -> Result<XmlElement, String> {
    let name = String::from_utf8_lossy(start.name().into_inner()).to_string();

    let mut attributes = HashMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("element <{name}>: {e}"))?;
        attributes.insert(
            String::from_utf8_lossy(attr.key.into_inner()).to_string(),
            String::from_utf8_lossy(&attr.value).to_string(),
        );
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Parse an XML file into an element tree. Text content is discarded,
/// which is all an xunit report needs.
pub fn load_xml(path: &Path) -> Result<XmlElement, String> {
    let mut reader =
        Reader::from_file(path).map_err(|e| format!("open {}: {e}", path.display()))?;
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("parse {}: {e}", path.display()))?
        {
            Event::Start(ref e) => stack.push(element_from_start(e)?),
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let element = stack.pop().expect("parser guarantees balanced tags");
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| format!("{}: no root element", path.display()))
}

#[derive(Debug, Default)]
struct ElementDecl {
    children: HashSet<String>,
    required_attrs: HashSet<String>,
}

/// Element declarations extracted from an XSD schema.
#[derive(Debug, Default)]
pub struct Schema {
    elements: HashMap<String, ElementDecl>,
}

fn local_name(raw: &str) -> &str {
    raw.rsplit_once(':').map(|(_, local)| local).unwrap_or(raw)
}

impl Schema {
    /// Parse the schema file. Only `xs:element` and `xs:attribute`
    /// declarations matter; the rest of the schema vocabulary (types,
    /// facets, occurrence bounds) is skipped.
    pub fn load(path: &Path) -> Result<Self, String> {
        let xsd = load_xml(path).map_err(|e| format!("invalid XML schema: {e}"))?;
        if local_name(&xsd.name) != "schema" {
            return Err(format!(
                "invalid XML schema: {} root is <{}>, expected <schema>",
                path.display(),
                xsd.name
            ));
        }

        let mut schema = Schema::default();
        for decl in xsd.iter() {
            if local_name(&decl.name) != "element" {
                continue;
            }
            let Some(name) = decl.attr("name") else {
                continue;
            };

            let mut element = ElementDecl::default();
            let mut stack: Vec<&XmlElement> = decl.children.iter().collect();
            while let Some(inner) = stack.pop() {
                match local_name(&inner.name) {
                    // Nested element declarations and references both name
                    // an allowed child. Inline declarations get their own
                    // entry from the outer pass, so don't descend further.
                    "element" => {
                        if let Some(child) = inner.attr("ref").or_else(|| inner.attr("name")) {
                            element.children.insert(child.to_string());
                        }
                    }
                    "attribute" => {
                        if let (Some(attr), Some("required")) =
                            (inner.attr("name"), inner.attr("use"))
                        {
                            element.required_attrs.insert(attr.to_string());
                        }
                    }
                    _ => stack.extend(inner.children.iter()),
                }
            }

            schema.elements.insert(name.to_string(), element);
        }

        if schema.elements.is_empty() {
            return Err(format!(
                "invalid XML schema: {} declares no elements",
                path.display()
            ));
        }

        Ok(schema)
    }

    /// Validate a document tree against the declarations.
    pub fn validate(&self, root: &XmlElement) -> Result<(), String> {
        for element in root.iter() {
            let decl = self
                .elements
                .get(&element.name)
                .ok_or_else(|| format!("undeclared element <{}>", element.name))?;

            for attr in &decl.required_attrs {
                if element.attr(attr).is_none() {
                    return Err(format!(
                        "element <{}> lacks required attribute {attr:?}",
                        element.name
                    ));
                }
            }

            for child in &element.children {
                if !decl.children.contains(&child.name) {
                    return Err(format!(
                        "element <{}> may not contain <{}>",
                        element.name, child.name
                    ));
                }
            }
        }

        Ok(())
    }
}

/// A schema-validated xunit report.
#[derive(Debug)]
pub struct XunitReport {
    root: XmlElement,
}

impl XunitReport {
    pub fn load(xml_path: &Path, xsd_path: &Path) -> Result<Self, String> {
        let root = load_xml(xml_path)?;
        Schema::load(xsd_path)?
            .validate(&root)
            .map_err(|e| format!("{}: {e}", xml_path.display()))?;
        Ok(XunitReport { root })
    }

    /// Emit the reStructuredText rendition: a `csv-table` for the root
    /// suite (renamed to `name`) followed by one per nested `testsuite`.
    pub fn translate(&self, name: &str, out: &mut dyn Write) -> Result<(), String> {
        let mut root = self.root.clone();
        root.attributes
            .insert("name".to_string(), name.to_string());

        writeln!(out, ".. include:: <isopub.txt>").map_err(|e| e.to_string())?;

        show_suite(&root, out).map_err(|e| e.to_string())?;
        for suite in root.iter().skip(1).filter(|e| e.name == "testsuite") {
            show_suite(suite, out).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

fn show_suite(suite: &XmlElement, out: &mut dyn Write) -> Result<(), String> {
    let name = suite.required_attr("name")?;

    let write = |out: &mut dyn Write, line: String| -> Result<(), String> {
        writeln!(out, "{line}").map_err(|e| e.to_string())
    };

    write(out, String::new())?;
    write(out, format!(".. csv-table:: {name} suite status"))?;
    write(out, "\t:widths: 50, 10, 10, 10, 10".to_string())?;
    write(
        out,
        "\t:header: Name, #errors, #failures, #success, #count".to_string(),
    )?;
    write(out, String::new())?;

    for child in &suite.children {
        match child.name.as_str() {
            "testsuite" => {
                let name = child.required_attr("name")?;
                let tests = child.counter("tests")?;
                let errors = child.counter("errors")?;
                let failures = child.counter("failures")?;
                let skipped = child.counter("skipped")?;
                let success = tests - errors - failures - skipped;
                write(
                    out,
                    format!("\t|check| {name}, {errors}, {failures}, {success}, {tests}"),
                )?;
            }
            "testcase" => {
                let name = child.required_attr("name")?;
                match child.attr("status") {
                    Some("error") => write(out, format!("\t|cross| {name}, 1, 0, 0, 1"))?,
                    Some("failure") => write(out, format!("\t|cross| {name}, 0, 1, 0, 1"))?,
                    Some("success") => write(out, format!("\t|check| {name}, 0, 0, 1, 1"))?,
                    _ => write(out, format!("\t{name}, ?, ?, ?, 1"))?,
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const XSD: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="testsuites">
    <xs:complexType>
      <xs:sequence>
        <xs:element ref="testsuite" maxOccurs="unbounded"/>
      </xs:sequence>
      <xs:attribute name="name" use="required"/>
    </xs:complexType>
  </xs:element>
  <xs:element name="testsuite">
    <xs:complexType>
      <xs:sequence>
        <xs:element ref="testcase" maxOccurs="unbounded"/>
      </xs:sequence>
      <xs:attribute name="name" use="required"/>
      <xs:attribute name="tests" use="required"/>
      <xs:attribute name="errors" use="required"/>
      <xs:attribute name="failures" use="required"/>
      <xs:attribute name="skipped" use="required"/>
    </xs:complexType>
  </xs:element>
  <xs:element name="testcase">
    <xs:complexType>
      <xs:attribute name="name" use="required"/>
      <xs:attribute name="status" use="required"/>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    const XML: &str = r#"<?xml version="1.0"?>
<testsuites name="nightly">
  <testsuite name="avl" tests="3" errors="1" failures="0" skipped="0">
    <testcase name="insert" status="success"/>
    <testcase name="remove" status="error"/>
    <testcase name="rotate" status="success"/>
  </testsuite>
</testsuites>"#;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_and_validates_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let xml = write_file(dir.path(), "report.xml", XML);
        let xsd = write_file(dir.path(), "report.xsd", XSD);

        assert!(XunitReport::load(&xml, &xsd).is_ok());
    }

    #[test]
    fn rejects_undeclared_elements() {
        let dir = tempfile::tempdir().unwrap();
        let xml = write_file(
            dir.path(),
            "report.xml",
            r#"<testsuites name="x"><bogus/></testsuites>"#,
        );
        let xsd = write_file(dir.path(), "report.xsd", XSD);

        let err = XunitReport::load(&xml, &xsd).unwrap_err();
        assert!(err.contains("bogus"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_missing_required_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let xml = write_file(
            dir.path(),
            "report.xml",
            r#"<testsuites name="x">
                 <testsuite name="s" tests="1" errors="0" failures="0" skipped="0">
                   <testcase name="t"/>
                 </testsuite>
               </testsuites>"#,
        );
        let xsd = write_file(dir.path(), "report.xsd", XSD);

        let err = XunitReport::load(&xml, &xsd).unwrap_err();
        assert!(err.contains("status"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_a_non_schema_xsd() {
        let dir = tempfile::tempdir().unwrap();
        let xsd = write_file(dir.path(), "report.xsd", "<notaschema/>");
        let err = Schema::load(&xsd).unwrap_err();
        assert!(err.contains("invalid XML schema"), "unexpected error: {err}");
    }

    #[test]
    fn translates_to_rst_tables() {
        let dir = tempfile::tempdir().unwrap();
        let xml = write_file(dir.path(), "report.xml", XML);
        let xsd = write_file(dir.path(), "report.xsd", XSD);

        let report = XunitReport::load(&xml, &xsd).unwrap();
        let mut out = Vec::new();
        report.translate("sortperf", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with(".. include:: <isopub.txt>\n"));
        assert!(text.contains(".. csv-table:: sortperf suite status"));
        assert!(text.contains("\t|check| avl, 1, 0, 2, 3"));
        assert!(text.contains(".. csv-table:: avl suite status"));
        assert!(text.contains("\t|check| insert, 0, 0, 1, 1"));
        assert!(text.contains("\t|cross| remove, 1, 0, 0, 1"));
    }
}
