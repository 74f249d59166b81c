//! A single sampled model parameter.

use crate::error::{Error, Result};

/// A named, bounded scalar that is injected into the GCAM configuration tree.
///
/// Parameters are immutable once built; a [`ParameterSpace`](crate::ParameterSpace)
/// owns them.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    lower_bound: f64,
    upper_bound: f64,
    units: String,
    description: String,
    xml_path: String,
    default_value: f64,
}

impl Parameter {
    /// Create a parameter with bounds and an XML path.
    ///
    /// `xml_path` is a slash-delimited list of tag names. An empty path
    /// falls back to the parameter name as a single tag.
    pub fn new(
        name: impl Into<String>,
        lower_bound: f64,
        upper_bound: f64,
        xml_path: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidParameter("name must not be empty".into()));
        }
        if !lower_bound.is_finite() || !upper_bound.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "{name}: bounds must be finite"
            )));
        }
        if lower_bound >= upper_bound {
            return Err(Error::InvalidParameter(format!(
                "{name}: lower bound {lower_bound} must be below upper bound {upper_bound}"
            )));
        }

        let mut xml_path: String = xml_path.into();
        if xml_path.trim().is_empty() {
            xml_path = name.clone();
        }
        if xml_path.split('/').any(|segment| segment.trim().is_empty()) {
            return Err(Error::InvalidParameter(format!(
                "{name}: xml path '{xml_path}' has an empty segment"
            )));
        }
        if let Some(segment) = xml_path.split('/').find(|s| !is_xml_name(s)) {
            return Err(Error::InvalidParameter(format!(
                "{name}: '{segment}' in xml path '{xml_path}' is not a valid tag name"
            )));
        }

        Ok(Self {
            default_value: (lower_bound + upper_bound) / 2.0,
            name,
            lower_bound,
            upper_bound,
            units: String::new(),
            description: String::new(),
            xml_path,
        })
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Override the default value (the bound midpoint otherwise).
    pub fn with_default(mut self, default_value: f64) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn xml_path(&self) -> &str {
        &self.xml_path
    }

    /// Tag names along the XML path, outermost first.
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.xml_path.split('/')
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// File stem used for this parameter's fragment (`-` becomes `_`).
    pub fn file_stem(&self) -> String {
        self.name.replace('-', "_")
    }
}

/// XML element name without namespace prefix: a letter or `_`, then
/// letters, digits, `-`, `.` or `_`.
fn is_xml_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parameter({}, range=[{}, {}] {})",
            self.name, self.lower_bound, self.upper_bound, self.units
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_midpoint() {
        let p = Parameter::new("interest-rate", 0.05, 0.10, "socioeconomics/interest_rate").unwrap();
        assert!((p.default_value() - 0.075).abs() < 1e-12);
    }

    #[test]
    fn explicit_default_wins() {
        let p = Parameter::new("x", 0.0, 1.0, "a/x").unwrap().with_default(0.2);
        assert_eq!(p.default_value(), 0.2);
    }

    #[test]
    fn reject_inverted_bounds() {
        assert!(Parameter::new("x", 2.0, 1.0, "a").is_err());
        assert!(Parameter::new("x", 1.0, 1.0, "a").is_err());
    }

    #[test]
    fn reject_non_finite_bounds() {
        assert!(Parameter::new("x", f64::NAN, 1.0, "a").is_err());
        assert!(Parameter::new("x", 0.0, f64::INFINITY, "a").is_err());
    }

    #[test]
    fn reject_empty_name() {
        assert!(Parameter::new("  ", 0.0, 1.0, "a").is_err());
    }

    #[test]
    fn reject_empty_path_segment() {
        assert!(Parameter::new("x", 0.0, 1.0, "a//b").is_err());
        assert!(Parameter::new("x", 0.0, 1.0, "a/b/").is_err());
    }

    #[test]
    fn reject_invalid_tag_names() {
        for path in ["a b/c", "a/1c", " a/b", "a/<b>", "a/b&c", "x:y"] {
            let err = Parameter::new("y", 0.0, 1.0, path).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "{path}");
        }
        // The name is the fallback path, so it must be a valid tag too.
        assert!(Parameter::new("sea level", 0.0, 1.0, "").is_err());
        assert!(Parameter::new("y", 0.0, 1.0, "_climate/ocean-uptake/v1.2").is_ok());
    }

    #[test]
    fn empty_path_falls_back_to_name() {
        let p = Parameter::new("ccs-efficiency", 0.85, 0.95, "").unwrap();
        assert_eq!(p.xml_path(), "ccs-efficiency");
        assert_eq!(p.path_segments().collect::<Vec<_>>(), vec!["ccs-efficiency"]);
    }

    #[test]
    fn file_stem_replaces_dashes() {
        let p = Parameter::new("social-discount-rate", 0.01, 0.05, "s/r").unwrap();
        assert_eq!(p.file_stem(), "social_discount_rate");
    }

    #[test]
    fn display_format() {
        let p = Parameter::new("x", 1.5, 3.5, "a").unwrap().with_units("GtC/yr");
        assert_eq!(p.to_string(), "Parameter(x, range=[1.5, 3.5] GtC/yr)");
    }
}
