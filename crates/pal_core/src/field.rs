use serde_json::Value;

use crate::core_api::CoreError;

/// Borrowed view of one node in a save export that remembers the dotted path
/// it was reached by, so decode failures can name the exact field.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> FieldReader<'a> {
    pub fn new(value: &'a Value, path: impl Into<String>) -> Self {
        Self {
            value,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Follows `segments` below this node. Explicit `null` counts as absent.
    pub fn find(&self, segments: &[&str]) -> Option<FieldReader<'a>> {
        let mut node = self.value;
        for segment in segments {
            node = node.get(*segment)?;
        }
        if node.is_null() {
            return None;
        }
        Some(FieldReader::new(node, self.join(segments)))
    }

    pub fn get(&self, segments: &[&str]) -> Result<FieldReader<'a>, CoreError> {
        let mut node = self.value;
        for (depth, segment) in segments.iter().enumerate() {
            node = match node.get(*segment) {
                Some(next) if !next.is_null() => next,
                _ => return Err(CoreError::missing_field(self.join(&segments[..=depth]))),
            };
        }
        Ok(FieldReader::new(node, self.join(segments)))
    }

    pub fn has(&self, segments: &[&str]) -> bool {
        self.find(segments).is_some()
    }

    pub fn as_str(&self) -> Result<&'a str, CoreError> {
        self.value
            .as_str()
            .ok_or_else(|| CoreError::wrong_type(self.path.clone(), "a string"))
    }

    pub fn as_i64(&self) -> Result<i64, CoreError> {
        self.value
            .as_i64()
            .ok_or_else(|| CoreError::wrong_type(self.path.clone(), "an integer"))
    }

    pub fn as_f64(&self) -> Result<f64, CoreError> {
        self.value
            .as_f64()
            .ok_or_else(|| CoreError::wrong_type(self.path.clone(), "a number"))
    }

    pub fn elements(&self) -> Result<Vec<FieldReader<'a>>, CoreError> {
        let items = self
            .value
            .as_array()
            .ok_or_else(|| CoreError::wrong_type(self.path.clone(), "an array"))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(index, item)| FieldReader::new(item, format!("{}[{index}]", self.path)))
            .collect())
    }

    pub fn read_str(&self, segments: &[&str]) -> Result<&'a str, CoreError> {
        self.get(segments)?.as_str()
    }

    pub fn read_i64(&self, segments: &[&str]) -> Result<i64, CoreError> {
        self.get(segments)?.as_i64()
    }

    pub fn read_f64(&self, segments: &[&str]) -> Result<f64, CoreError> {
        self.get(segments)?.as_f64()
    }

    pub fn read_array(&self, segments: &[&str]) -> Result<Vec<FieldReader<'a>>, CoreError> {
        self.get(segments)?.elements()
    }

    pub fn read_opt_str(&self, segments: &[&str]) -> Result<Option<&'a str>, CoreError> {
        self.find(segments).map(|field| field.as_str()).transpose()
    }

    fn join(&self, segments: &[&str]) -> String {
        let mut out = self.path.clone();
        for segment in segments {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }
}
