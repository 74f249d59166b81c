//! Per-parameter configuration fragments.
//!
//! A fragment wraps one sampled value in the tag path of its parameter:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <scenario>
//!   <climate>
//!     <magicc-input>
//!       <climate_sensitivity>3.14</climate_sensitivity>
//!     </magicc-input>
//!   </climate>
//! </scenario>
//! ```

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::parameter::Parameter;
use crate::xml::{XmlDocument, xml_err};

/// Root tag of every fragment.
pub const FRAGMENT_ROOT: &str = "scenario";

/// Serialize `value` at `parameter`'s XML path.
pub fn create_fragment(parameter: &Parameter, value: f64) -> Result<String> {
    let segments: Vec<&str> = parameter.path_segments().collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(Error::InvalidParameter(format!(
            "{}: empty xml path",
            parameter.name()
        )));
    };

    let mut doc = XmlDocument::new()?;
    doc.open(FRAGMENT_ROOT, &[])?;
    for tag in parents {
        doc.open(tag, &[])?;
    }
    doc.leaf(leaf, &[], &format_value(value))?;
    for tag in parents.iter().rev() {
        doc.close(tag)?;
    }
    doc.close(FRAGMENT_ROOT)?;
    doc.finish()
}

/// Shortest round-trip text of a sampled value.
///
/// Integral values keep a trailing `.0`; magnitudes below `1e-4` or from
/// `1e16` up use an exponent with a sign and at least two digits (`1e-07`).
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() || value == 0.0 || (1e-4..1e16).contains(&magnitude) {
        if value.is_finite() && value.fract() == 0.0 {
            return format!("{value:.1}");
        }
        return format!("{value}");
    }
    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) => {
            let (sign, digits) = match power.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', power),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => exp,
    }
}

/// A value read back from a fragment: its tag path (below the root) and text.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentValue {
    pub root: String,
    pub path: Vec<String>,
    pub text: String,
}

impl FragmentValue {
    pub fn value(&self) -> Result<f64> {
        self.text
            .parse()
            .map_err(|e| Error::Xml(format!("leaf text '{}' is not a number: {e}", self.text)))
    }
}

/// Parse a fragment and return its first text-bearing leaf.
pub fn parse_fragment(xml: &str) -> Result<FragmentValue> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(xml_err)?.into_owned();
                let Some((root, path)) = stack.split_first() else {
                    return Err(Error::Xml("text outside of root element".into()));
                };
                return Ok(FragmentValue {
                    root: root.clone(),
                    path: path.to_vec(),
                    text,
                });
            }
            Event::Eof => return Err(Error::Xml("fragment has no value".into())),
            _ => {}
        }
    }
}
