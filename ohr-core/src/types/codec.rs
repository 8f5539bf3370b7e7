//! Element lookups shared by the metadata codecs

use crate::error::MetadataError;
use crate::xml::Element;

/// Fail unless the element carries the expected tag
pub(crate) fn expect_tag(element: &Element, expected: &'static str) -> Result<(), MetadataError> {
    if element.name() == expected {
        Ok(())
    } else {
        Err(MetadataError::UnexpectedTag {
            expected,
            found: element.name().to_string(),
        })
    }
}

pub(crate) fn required_attribute<'a>(
    element: &'a Element,
    owner: &'static str,
    attribute: &'static str,
) -> Result<&'a str, MetadataError> {
    element
        .attribute(attribute)
        .ok_or_else(|| MetadataError::missing_attribute(owner, attribute))
}

pub(crate) fn required_child<'a>(
    element: &'a Element,
    owner: &'static str,
    child: &'static str,
) -> Result<&'a Element, MetadataError> {
    element
        .child(child)
        .ok_or_else(|| MetadataError::NullInput(format!("<{}> in <{}>", child, owner)))
}
