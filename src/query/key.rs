//! Query keys
//!
//! A key is an ordered sequence of segments: the resource name first, an
//! optional parameter bag last. The cache indexes by structural equality, so
//! two keys built from equal parameter values must compare equal; the sorted
//! parameter map guarantees that regardless of insertion order.

use std::collections::BTreeMap;
use std::fmt;

/// One segment of a query key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySegment {
    /// A fixed name ("clusters", "status")
    Text(String),
    /// A parameter bag; sorted so equality is value equality
    Params(BTreeMap<String, String>),
}

/// The identifier a cached value is stored and looked up under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    segments: Vec<KeySegment>,
}

impl QueryKey {
    /// Start a key with its resource-name segment
    #[must_use]
    pub fn of(resource: &str) -> Self {
        Self {
            segments: vec![KeySegment::Text(resource.to_owned())],
        }
    }

    /// Append a fixed text segment
    #[must_use]
    pub fn seg(mut self, name: &str) -> Self {
        self.segments.push(KeySegment::Text(name.to_owned()));
        self
    }

    /// Append a single-parameter bag
    #[must_use]
    pub fn param(self, name: &str, value: impl ToString) -> Self {
        self.params([(name, value.to_string())])
    }

    /// Append a parameter bag
    ///
    /// Opens a new bag segment; keys within a bag are sorted, so call order
    /// never leaks into equality.
    #[must_use]
    pub fn params<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let bag: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();
        self.segments.push(KeySegment::Params(bag));
        self
    }

    /// The leading resource name
    ///
    /// Keys always start with a text segment; invalidation-by-resource
    /// matches on this.
    #[must_use]
    pub fn resource(&self) -> &str {
        match self.segments.first() {
            Some(KeySegment::Text(name)) => name,
            _ => "",
        }
    }

    /// All segments, in order
    #[must_use]
    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match segment {
                KeySegment::Text(name) => f.write_str(name)?,
                KeySegment::Params(bag) => {
                    f.write_str("{")?;
                    for (j, (k, v)) in bag.iter().enumerate() {
                        if j > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{k}={v}")?;
                    }
                    f.write_str("}")?;
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_keys_are_equal() {
        assert_eq!(QueryKey::of("clusters"), QueryKey::of("clusters"));
    }

    #[test]
    fn test_equal_params_equal_keys() {
        let a = QueryKey::of("servers").params([("page", "1"), ("limit", "12")]);
        let b = QueryKey::of("servers").params([("limit", "12"), ("page", "1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_differing_params_differ() {
        let a = QueryKey::of("servers").param("page", 1);
        let b = QueryKey::of("servers").param("page", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_resource_is_leading_segment() {
        let key = QueryKey::of("deployments").seg("status").param("id", 7);
        assert_eq!(key.resource(), "deployments");
    }

    #[test]
    fn test_display() {
        let key = QueryKey::of("servers").params([("page", "2"), ("limit", "5")]);
        assert_eq!(key.to_string(), "servers/{limit=5,page=2}");
    }
}
