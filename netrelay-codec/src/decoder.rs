//! State decoder collaborator interface
//!
//! A decoder turns the parsed `<datavalues>` root into a typed snapshot for
//! one device family. The session engine never looks inside the snapshot.

use netrelay_core::{RelayError, RelayResult};
use roxmltree::Node;
use std::fmt;
use std::str::FromStr;

/// Decoder for one device family
pub trait StateDecoder: Send + Sync + 'static {
    /// Snapshot produced by a successful decode
    type State: Clone + fmt::Debug + Send + Sync + 'static;

    /// Human readable family name, used in log lines
    fn family(&self) -> &'static str;

    /// Number of counting inputs (valid counter indices are `1..=input_count`)
    fn input_count(&self) -> usize;

    /// Decode the `<datavalues>` root element
    ///
    /// # Errors
    /// Returns `Decode` when a required child is absent or not numeric
    fn decode(&self, root: Node<'_, '_>) -> RelayResult<Self::State>;
}

/// Families that drive relay outputs
pub trait RelayControl: StateDecoder {
    /// Number of relays (valid indices are `1..=relay_count`)
    fn relay_count(&self) -> usize;
}

/// Named-field access over the children of the root element
///
/// Element names are matched case-insensitively; the devices are not
/// consistent about `powerupflag` versus `powerUpFlag`.
#[derive(Clone, Copy)]
pub struct Fields<'a, 'input> {
    root: Node<'a, 'input>,
}

impl<'a, 'input> Fields<'a, 'input> {
    pub fn new(root: Node<'a, 'input>) -> Self {
        Self { root }
    }

    fn find(&self, name: &str) -> Option<Node<'a, 'input>> {
        self.root
            .children()
            .filter(Node::is_element)
            .find(|child| child.tag_name().name().eq_ignore_ascii_case(name))
    }

    /// Whether the element exists
    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Trimmed text of a required element
    pub fn text(&self, name: &str) -> RelayResult<&'a str> {
        let node = self
            .find(name)
            .ok_or_else(|| RelayError::decode(name, "element is missing"))?;
        Ok(node.text().map(str::trim).unwrap_or(""))
    }

    /// Parse a required numeric element
    pub fn number<T>(&self, name: &str) -> RelayResult<T>
    where
        T: FromStr,
    {
        let text = self.text(name)?;
        text.parse::<T>()
            .map_err(|_| RelayError::decode(name, format!("'{}' is not a number", text)))
    }

    /// Parse a numeric element that the device reports as `x.x` (or
    /// similar non-numeric placeholder) when nothing is attached
    pub fn optional_number<T>(&self, name: &str) -> RelayResult<Option<T>>
    where
        T: FromStr,
    {
        let text = self.text(name)?;
        Ok(text.parse::<T>().ok())
    }

    /// Parse a required `0`/`1` element
    pub fn flag(&self, name: &str) -> RelayResult<bool> {
        match self.text(name)? {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(RelayError::decode(
                name,
                format!("expected 0 or 1, got '{}'", other),
            )),
        }
    }

    /// Collect `<prefix1>..<prefixN>` in index order
    pub fn indexed<T>(
        &self,
        prefix: &str,
        suffix: &str,
        count: usize,
        parse: impl Fn(&Self, &str) -> RelayResult<T>,
    ) -> RelayResult<Vec<T>> {
        (1..=count)
            .map(|index| parse(self, &format!("{}{}{}", prefix, index, suffix)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const DOC: &str = "<datavalues><input1state>1</input1state><count1> 42 </count1>\
        <sensor1>x.x</sensor1><powerUpFlag>0</powerUpFlag><bad>abc</bad></datavalues>";

    #[test]
    fn test_field_access() {
        let doc = Document::parse(DOC).unwrap();
        let fields = Fields::new(doc.root_element());

        assert!(fields.flag("input1state").unwrap());
        assert_eq!(fields.number::<u32>("count1").unwrap(), 42);
        assert!(!fields.flag("powerupflag").unwrap());
        assert_eq!(fields.optional_number::<f64>("sensor1").unwrap(), None);
        assert!(fields.has("bad"));
    }

    #[test]
    fn test_missing_and_non_numeric() {
        let doc = Document::parse(DOC).unwrap();
        let fields = Fields::new(doc.root_element());

        match fields.number::<u32>("count2") {
            Err(RelayError::Decode { field, .. }) => assert_eq!(field, "count2"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            fields.number::<u32>("bad"),
            Err(RelayError::Decode { .. })
        ));
        assert!(matches!(fields.flag("bad"), Err(RelayError::Decode { .. })));
    }

    #[test]
    fn test_indexed() {
        let doc = Document::parse(
            "<datavalues><count1>1</count1><count2>2</count2><count3>3</count3></datavalues>",
        )
        .unwrap();
        let fields = Fields::new(doc.root_element());
        let counts = fields
            .indexed("count", "", 3, |f, name| f.number::<u32>(name))
            .unwrap();
        assert_eq!(counts, vec![1, 2, 3]);
    }
}
