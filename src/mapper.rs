use anyhow::{Result, anyhow};
use serde_json::Value;

/// Path-based lookups over a parsed JSON document. Paths are split on a
/// delimiter (default `.`) and walked key by key. A terminal JSON `null`
/// counts as absent.
pub struct Mapper<'a> {
    root: &'a Value,
}

impl<'a> Mapper<'a> {
    pub fn new(root: &'a Value) -> Self {
        Mapper { root }
    }

    fn resolve(&self, path: &str, delimiter: char) -> Option<&'a Value> {
        let mut current = self.root;
        for key in path.split(delimiter) {
            current = current.get(key)?;
        }
        if current.is_null() { None } else { Some(current) }
    }

    pub fn get(&self, path: &str) -> Result<&'a Value> {
        self.get_at(path, '.')
    }

    /// Lookup with an explicit delimiter. Vendor keys may contain the
    /// default delimiter themselves (`@odata.type`); passing a delimiter
    /// that does not occur in the path disables splitting.
    pub fn get_at(&self, path: &str, delimiter: char) -> Result<&'a Value> {
        self.resolve(path, delimiter)
            .ok_or_else(|| anyhow!("missing required field '{}'", path))
    }

    pub fn get_str(&self, path: &str) -> Result<String> {
        self.get_str_at(path, '.')
    }

    pub fn get_str_at(&self, path: &str, delimiter: char) -> Result<String> {
        let value = self.get_at(path, delimiter)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("field '{}' is not a string", path))
    }

    /// Missing or null resolves to `default`. A present non-string value is
    /// still an error.
    pub fn get_str_or(&self, path: &str, default: &str) -> Result<String> {
        match self.resolve(path, '.') {
            Some(value) => value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("field '{}' is not a string", path)),
            None => Ok(default.to_string()),
        }
    }

    /// Missing or null lists resolve to an empty Vec.
    pub fn get_str_list(&self, path: &str) -> Result<Vec<String>> {
        let value = match self.resolve(path, '.') {
            Some(value) => value,
            None => return Ok(Vec::new()),
        };
        let items = value
            .as_array()
            .ok_or_else(|| anyhow!("field '{}' is not an array", path))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("field '{}' contains a non-string entry", path))
            })
            .collect()
    }

    /// Required lookup followed by a conversion of the raw string value.
    /// Converter failures propagate unchanged.
    pub fn transform<T>(
        &self,
        path: &str,
        transformer: impl FnOnce(&str) -> Result<T>,
    ) -> Result<T> {
        let raw = self.get_str(path)?;
        transformer(&raw)
    }

    /// Like `transform`, but missing or null yields `None`. A value that is
    /// present and fails to convert is still an error.
    pub fn transform_opt<T>(
        &self,
        path: &str,
        transformer: impl FnOnce(&str) -> Result<T>,
    ) -> Result<Option<T>> {
        match self.resolve(path, '.') {
            Some(value) => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| anyhow!("field '{}' is not a string", path))?;
                transformer(raw).map(Some)
            }
            None => Ok(None),
        }
    }

    /// One sub-accessor per element of an array field, in source order.
    /// Missing or null arrays resolve to an empty Vec.
    pub fn entries(&self, path: &str) -> Result<Vec<Mapper<'a>>> {
        let value = match self.resolve(path, '.') {
            Some(value) => value,
            None => return Ok(Vec::new()),
        };
        let items = value
            .as_array()
            .ok_or_else(|| anyhow!("field '{}' is not an array", path))?;
        Ok(items.iter().map(Mapper::new).collect())
    }
}
