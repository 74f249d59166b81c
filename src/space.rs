//! Ordered collection of parameters.
//!
//! Insertion order is the canonical column order for bound vectors and
//! sample matrices. Re-adding a name replaces the old parameter in place,
//! keeping its original column.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::parameter::Parameter;

#[derive(Debug, Clone, Default)]
pub struct ParameterSpace {
    parameters: Vec<Parameter>,
    index: FxHashMap<String, usize>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, overwriting any existing parameter with the same name.
    ///
    /// Returns the replaced parameter, if there was one.
    pub fn add(&mut self, parameter: Parameter) -> Option<Parameter> {
        match self.index.get(parameter.name()) {
            Some(&i) => Some(std::mem::replace(&mut self.parameters[i], parameter)),
            None => {
                self.index
                    .insert(parameter.name().to_string(), self.parameters.len());
                self.parameters.push(parameter);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<&Parameter> {
        self.index
            .get(name)
            .map(|&i| &self.parameters[i])
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn lower_bounds(&self) -> Vec<f64> {
        self.parameters.iter().map(Parameter::lower_bound).collect()
    }

    pub fn upper_bounds(&self) -> Vec<f64> {
        self.parameters.iter().map(Parameter::upper_bound).collect()
    }

    pub fn size(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }
}

impl Extend<Parameter> for ParameterSpace {
    fn extend<I: IntoIterator<Item = Parameter>>(&mut self, iter: I) {
        for parameter in iter {
            self.add(parameter);
        }
    }
}

impl FromIterator<Parameter> for ParameterSpace {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut space = Self::new();
        space.extend(iter);
        space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, lo: f64, hi: f64) -> Parameter {
        Parameter::new(name, lo, hi, format!("root/{name}")).unwrap()
    }

    #[test]
    fn preserves_insertion_order() {
        let space: ParameterSpace = [param("b", 0.0, 1.0), param("a", 2.0, 3.0), param("c", 4.0, 5.0)]
            .into_iter()
            .collect();

        assert_eq!(space.names(), vec!["b", "a", "c"]);
        assert_eq!(space.lower_bounds(), vec![0.0, 2.0, 4.0]);
        assert_eq!(space.upper_bounds(), vec![1.0, 3.0, 5.0]);
        assert_eq!(space.size(), 3);
    }

    #[test]
    fn duplicate_name_overwrites_in_place() {
        let mut space = ParameterSpace::new();
        space.add(param("a", 0.0, 1.0));
        space.add(param("b", 0.0, 1.0));
        let old = space.add(param("a", 10.0, 20.0).with_units("K"));

        assert_eq!(old.unwrap().upper_bound(), 1.0);
        assert_eq!(space.size(), 2);
        assert_eq!(space.names(), vec!["a", "b"]);
        let a = space.get("a").unwrap();
        assert_eq!(a.lower_bound(), 10.0);
        assert_eq!(a.units(), "K");
    }

    #[test]
    fn get_missing_is_not_found() {
        let space = ParameterSpace::new();
        assert!(matches!(space.get("nope"), Err(Error::NotFound(name)) if name == "nope"));
    }

    #[test]
    fn bounds_align_with_names() {
        let space: ParameterSpace = (0..6)
            .map(|i| param(&format!("p{i}"), i as f64, i as f64 + 0.5))
            .collect();
        let names = space.names();
        let lower = space.lower_bounds();
        let upper = space.upper_bounds();
        for i in 0..space.size() {
            let p = space.get(&names[i]).unwrap();
            assert_eq!(p.lower_bound(), lower[i]);
            assert_eq!(p.upper_bound(), upper[i]);
        }
    }
}
